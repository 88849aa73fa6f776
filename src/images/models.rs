//! Image data models
//!
//! Matrix axes, image candidates and the Docker Hub tag document.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

use super::matrix::{image_tag, sanitize_jvm};

/// Java feature version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
pub enum Version {
    #[serde(rename = "8")]
    #[value(name = "8")]
    V8,
    #[serde(rename = "11")]
    #[value(name = "11")]
    V11,
    #[serde(rename = "14")]
    #[value(name = "14")]
    V14,
}

impl Version {
    pub const ALL: [Version; 3] = [Version::V8, Version::V11, Version::V14];

    pub fn as_str(self) -> &'static str {
        match self {
            Version::V8 => "8",
            Version::V11 => "11",
            Version::V14 => "14",
        }
    }
}

/// Java virtual machine implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Jvm {
    Hotspot,
    Openj9,
}

impl Jvm {
    pub const ALL: [Jvm; 2] = [Jvm::Hotspot, Jvm::Openj9];

    pub fn as_str(self) -> &'static str {
        match self {
            Jvm::Hotspot => "hotspot",
            Jvm::Openj9 => "openj9",
        }
    }
}

/// Base operating system of the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
pub enum Os {
    #[serde(rename = "alpine")]
    #[value(name = "alpine")]
    Alpine,
    #[serde(rename = "debian")]
    #[value(name = "debian")]
    Debian,
    #[serde(rename = "debianslim")]
    #[value(name = "debianslim")]
    DebianSlim,
    #[serde(rename = "ubi")]
    #[value(name = "ubi")]
    Ubi,
    #[serde(rename = "ubi-minimal")]
    #[value(name = "ubi-minimal")]
    UbiMinimal,
    #[serde(rename = "centos")]
    #[value(name = "centos")]
    Centos,
    #[serde(rename = "clefos")]
    #[value(name = "clefos")]
    Clefos,
    #[serde(rename = "ubuntu")]
    #[value(name = "ubuntu")]
    Ubuntu,
    #[serde(rename = "alma")]
    #[value(name = "alma")]
    Alma,
    #[serde(rename = "alma-minimal")]
    #[value(name = "alma-minimal")]
    AlmaMinimal,
}

impl Os {
    pub const ALL: [Os; 10] = [
        Os::Alpine,
        Os::Debian,
        Os::DebianSlim,
        Os::Ubi,
        Os::UbiMinimal,
        Os::Centos,
        Os::Clefos,
        Os::Ubuntu,
        Os::Alma,
        Os::AlmaMinimal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Os::Alpine => "alpine",
            Os::Debian => "debian",
            Os::DebianSlim => "debianslim",
            Os::Ubi => "ubi",
            Os::UbiMinimal => "ubi-minimal",
            Os::Centos => "centos",
            Os::Clefos => "clefos",
            Os::Ubuntu => "ubuntu",
            Os::Alma => "alma",
            Os::AlmaMinimal => "alma-minimal",
        }
    }
}

/// Distribution package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Package {
    Jdk,
    Jre,
}

impl Package {
    pub const ALL: [Package; 2] = [Package::Jdk, Package::Jre];

    pub fn as_str(self) -> &'static str {
        match self {
            Package::Jdk => "jdk",
            Package::Jre => "jre",
        }
    }
}

/// Image build flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Build {
    Slim,
    Full,
}

impl Build {
    pub const ALL: [Build; 2] = [Build::Slim, Build::Full];

    pub fn as_str(self) -> &'static str {
        match self {
            Build::Slim => "slim",
            Build::Full => "full",
        }
    }
}

/// CPU architecture, named the way the build farm names it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
pub enum Arch {
    #[serde(rename = "armv7l")]
    #[value(name = "armv7l")]
    Armv7l,
    #[serde(rename = "aarch64")]
    #[value(name = "aarch64")]
    Aarch64,
    #[serde(rename = "ppc64le")]
    #[value(name = "ppc64le")]
    Ppc64le,
    #[serde(rename = "s390x")]
    #[value(name = "s390x")]
    S390x,
    #[serde(rename = "x86_64")]
    #[value(name = "x86_64")]
    X86_64,
}

impl Arch {
    pub const ALL: [Arch; 5] = [
        Arch::Armv7l,
        Arch::Aarch64,
        Arch::Ppc64le,
        Arch::S390x,
        Arch::X86_64,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Arch::Armv7l => "armv7l",
            Arch::Aarch64 => "aarch64",
            Arch::Ppc64le => "ppc64le",
            Arch::S390x => "s390x",
            Arch::X86_64 => "x86_64",
        }
    }

    /// Architecture name as it appears in a Docker manifest
    pub fn docker_name(self) -> &'static str {
        match self {
            Arch::Armv7l => "arm",
            Arch::Aarch64 => "arm64",
            Arch::Ppc64le => "ppc64le",
            Arch::S390x => "s390x",
            Arch::X86_64 => "amd64",
        }
    }
}

impl FromStr for Arch {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Arch::ALL
            .into_iter()
            .find(|arch| arch.as_str() == s)
            .ok_or_else(|| ScanError::UnsupportedArchitecture(s.to_string()))
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_str!(Version, Jvm, Os, Package, Build, Arch);

/// One point of the image matrix
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageCandidate {
    pub version: Version,
    pub jvm: Jvm,
    pub arch: Arch,
    pub os: Os,
    pub package: Package,
    pub build: Build,
    pub tag: String,
}

impl ImageCandidate {
    pub fn new(version: Version, jvm: Jvm, os: Os, package: Package, build: Build, arch: Arch) -> Self {
        Self {
            version,
            jvm,
            arch,
            os,
            package,
            build,
            tag: image_tag(package, version, os, build),
        }
    }

    /// Identity of the registry tag this candidate lives in
    pub fn manifest_key(&self) -> ManifestKey {
        ManifestKey {
            version: self.version,
            jvm: self.jvm,
            os: self.os,
            package: self.package,
            build: self.build,
            tag: self.tag.clone(),
        }
    }

    /// Full image reference, e.g. `adoptopenjdk/openjdk11-openj9:jdk11u-ubi-nightly`
    pub fn reference(&self, org: &str) -> String {
        format!("{}/{}:{}", org, repository_name(self.version, self.jvm), self.tag)
    }
}

/// An image without its architecture: the granularity of registry lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ManifestKey {
    pub version: Version,
    pub jvm: Jvm,
    pub os: Os,
    pub package: Package,
    pub build: Build,
    pub tag: String,
}

impl ManifestKey {
    /// Docker repository, e.g. `openjdk8` or `openjdk8-openj9`
    pub fn repository(&self) -> String {
        repository_name(self.version, self.jvm)
    }

    pub fn reference(&self, org: &str) -> String {
        format!("{}/{}:{}", org, self.repository(), self.tag)
    }
}

fn repository_name(version: Version, jvm: Jvm) -> String {
    format!("openjdk{}{}", version, sanitize_jvm(jvm))
}

/// Tag document returned by the Docker Hub tags API
///
/// Only the fields the scanner reads are modelled; their absence is
/// reported when the field is actually needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagManifest {
    pub last_updated: Option<String>,
    pub images: Option<Vec<ManifestImage>>,
}

/// Per-architecture entry of a tag document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestImage {
    pub architecture: Option<String>,
}

/// A candidate with the tag document of its manifest key attached
///
/// Lives only inside the pipeline; result buckets hold bare candidates.
#[derive(Debug, Clone)]
pub struct EnrichedImage {
    pub image: ImageCandidate,
    pub manifest: Arc<TagManifest>,
}

impl EnrichedImage {
    pub fn into_image(self) -> ImageCandidate {
        self.image
    }
}
