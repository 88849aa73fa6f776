//! Image matrix generation
//!
//! Expands the supported axes into every possible image/tag combination.

use super::models::{Arch, Build, ImageCandidate, Jvm, Os, Package, Version};

/// Tag suffix for a build: `""` for full, `"-slim"` for slim
pub fn sanitize_build(build: Build) -> &'static str {
    match build {
        Build::Full => "",
        Build::Slim => "-slim",
    }
}

/// Repository suffix for a JVM: `""` for hotspot, `"-openj9"` for openj9
pub fn sanitize_jvm(jvm: Jvm) -> &'static str {
    match jvm {
        Jvm::Hotspot => "",
        Jvm::Openj9 => "-openj9",
    }
}

/// Nightly tag name, e.g. `jre11u-alpine-nightly` or `jdk8u-debian-nightly-slim`
pub fn image_tag(package: Package, version: Version, os: Os, build: Build) -> String {
    format!(
        "{}{}u-{}-nightly{}",
        package,
        version,
        os,
        sanitize_build(build)
    )
}

/// The axes an image matrix is generated from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixAxes {
    pub versions: Vec<Version>,
    pub jvms: Vec<Jvm>,
    pub oses: Vec<Os>,
    pub packages: Vec<Package>,
    pub builds: Vec<Build>,
    pub archs: Vec<Arch>,
}

impl MatrixAxes {
    /// Number of candidates `generate_all_images` will produce
    pub fn size(&self) -> usize {
        self.versions.len()
            * self.jvms.len()
            * self.oses.len()
            * self.packages.len()
            * self.builds.len()
            * self.archs.len()
    }
}

impl Default for MatrixAxes {
    fn default() -> Self {
        Self {
            versions: Version::ALL.to_vec(),
            jvms: Jvm::ALL.to_vec(),
            oses: Os::ALL.to_vec(),
            packages: Package::ALL.to_vec(),
            builds: Build::ALL.to_vec(),
            archs: Arch::ALL.to_vec(),
        }
    }
}

/// Generate every combination of the given axes
///
/// No filtering happens here; an empty axis yields an empty matrix.
pub fn generate_all_images(axes: &MatrixAxes) -> Vec<ImageCandidate> {
    let mut images = Vec::with_capacity(axes.size());

    for &version in &axes.versions {
        for &jvm in &axes.jvms {
            for &os in &axes.oses {
                for &package in &axes.packages {
                    for &build in &axes.builds {
                        for &arch in &axes.archs {
                            images.push(ImageCandidate::new(version, jvm, os, package, build, arch));
                        }
                    }
                }
            }
        }
    }

    images
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_build() {
        assert_eq!(sanitize_build(Build::Full), "");
        assert_eq!(sanitize_build(Build::Slim), "-slim");
    }

    #[test]
    fn test_sanitize_jvm() {
        assert_eq!(sanitize_jvm(Jvm::Hotspot), "");
        assert_eq!(sanitize_jvm(Jvm::Openj9), "-openj9");
    }

    #[test]
    fn test_image_tag() {
        assert_eq!(
            image_tag(Package::Jdk, Version::V8, Os::Alpine, Build::Full),
            "jdk8u-alpine-nightly"
        );
        assert_eq!(
            image_tag(Package::Jre, Version::V11, Os::UbiMinimal, Build::Slim),
            "jre11u-ubi-minimal-nightly-slim"
        );
    }

    #[test]
    fn test_generate_full_matrix_size() {
        let axes = MatrixAxes::default();
        let images = generate_all_images(&axes);
        assert_eq!(images.len(), 3 * 2 * 10 * 2 * 2 * 5);
        assert_eq!(images.len(), axes.size());
    }

    #[test]
    fn test_generate_empty_axis() {
        let axes = MatrixAxes {
            oses: vec![],
            ..MatrixAxes::default()
        };
        assert!(generate_all_images(&axes).is_empty());
    }

    #[test]
    fn test_generate_order_and_tags() {
        let axes = MatrixAxes {
            versions: vec![Version::V11],
            jvms: vec![Jvm::Openj9],
            oses: vec![Os::Debian],
            packages: vec![Package::Jre],
            builds: vec![Build::Full],
            archs: vec![Arch::S390x, Arch::X86_64],
        };
        let images = generate_all_images(&axes);

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].arch, Arch::S390x);
        assert_eq!(images[1].arch, Arch::X86_64);
        assert!(images.iter().all(|img| img.tag == "jre11u-debian-nightly"));
        assert_eq!(
            images[0].reference("adoptopenjdk"),
            "adoptopenjdk/openjdk11-openj9:jre11u-debian-nightly"
        );
    }
}
