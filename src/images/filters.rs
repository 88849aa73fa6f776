//! Static validity filters
//!
//! Business rules that reject combinations which are never built, before
//! any request reaches the registry.

use crate::log_debug;
use crate::pipeline::PipelineResult;

use super::models::{Arch, Build, ImageCandidate, Jvm, Os, Package};

const MODULE: &str = "images::filters";

/// Result of splitting a list of images by a predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<T> {
    pub kept: Vec<T>,
    pub removed: Vec<T>,
}

impl<T> Partition<T> {
    /// Split `items` by `keep`, preserving order on both sides
    pub fn split(items: Vec<T>, mut keep: impl FnMut(&T) -> bool) -> Self {
        let (kept, removed) = items.into_iter().partition(|item| keep(item));
        Self { kept, removed }
    }
}

/// No slim JRE builds are produced
pub fn is_valid_package_and_build(package: Package, build: Build) -> bool {
    if package == Package::Jre && build == Build::Slim {
        log_debug!(MODULE, "Package & Build Check Failed with {} and {}", package, build);
        return false;
    }
    true
}

/// Check the OS is built for the architecture
pub fn is_valid_os_and_arch(os: Os, arch: Arch) -> bool {
    let valid = match os {
        // ClefOS only runs on s390x
        Os::Clefos => arch == Arch::S390x,
        Os::Centos => arch != Arch::S390x,
        Os::Ubi | Os::UbiMinimal => arch != Arch::Armv7l,
        _ => true,
    };
    if !valid {
        log_debug!(MODULE, "OS Check Failed with {} and {}", os, arch);
    }
    valid
}

/// OpenJ9 is only built for ppc64le, s390x and x86_64
pub fn is_valid_jvm_and_arch(jvm: Jvm, arch: Arch) -> bool {
    if jvm == Jvm::Openj9 && matches!(arch, Arch::Armv7l | Arch::Aarch64) {
        log_debug!(MODULE, "JVM Check Failed with {} and {}", jvm, arch);
        return false;
    }
    true
}

pub fn filter_valid_package_and_build(images: Vec<ImageCandidate>) -> Partition<ImageCandidate> {
    Partition::split(images, |img| is_valid_package_and_build(img.package, img.build))
}

pub fn filter_valid_os_and_arch(images: Vec<ImageCandidate>) -> Partition<ImageCandidate> {
    Partition::split(images, |img| is_valid_os_and_arch(img.os, img.arch))
}

pub fn filter_valid_jvm_and_arch(images: Vec<ImageCandidate>) -> Partition<ImageCandidate> {
    Partition::split(images, |img| is_valid_jvm_and_arch(img.jvm, img.arch))
}

/// Run the three static filters, recording every reject in `result`
///
/// The surviving images end up in `result.filtered_images`.
pub fn apply_general_filters(images: Vec<ImageCandidate>, result: &mut PipelineResult) {
    let Partition { kept, removed } = filter_valid_package_and_build(images);
    result.package_and_build.extend(removed);

    let Partition { kept, removed } = filter_valid_os_and_arch(kept);
    result.os_and_arch.extend(removed);

    let Partition { kept, removed } = filter_valid_jvm_and_arch(kept);
    result.jvm_and_arch.extend(removed);

    result.filtered_images = kept;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::matrix::{generate_all_images, MatrixAxes};

    #[test]
    fn test_package_and_build() {
        assert!(!is_valid_package_and_build(Package::Jre, Build::Slim));
        assert!(is_valid_package_and_build(Package::Jre, Build::Full));
        assert!(is_valid_package_and_build(Package::Jdk, Build::Slim));
        assert!(is_valid_package_and_build(Package::Jdk, Build::Full));
    }

    #[test]
    fn test_os_and_arch() {
        assert!(!is_valid_os_and_arch(Os::Clefos, Arch::X86_64));
        assert!(is_valid_os_and_arch(Os::Clefos, Arch::S390x));
        assert!(!is_valid_os_and_arch(Os::Centos, Arch::S390x));
        assert!(is_valid_os_and_arch(Os::Centos, Arch::Aarch64));
        assert!(!is_valid_os_and_arch(Os::Ubi, Arch::Armv7l));
        assert!(!is_valid_os_and_arch(Os::UbiMinimal, Arch::Armv7l));
        assert!(is_valid_os_and_arch(Os::Ubi, Arch::Ppc64le));
        assert!(is_valid_os_and_arch(Os::Alpine, Arch::Armv7l));
    }

    #[test]
    fn test_jvm_and_arch() {
        assert!(!is_valid_jvm_and_arch(Jvm::Openj9, Arch::Aarch64));
        assert!(!is_valid_jvm_and_arch(Jvm::Openj9, Arch::Armv7l));
        assert!(is_valid_jvm_and_arch(Jvm::Openj9, Arch::S390x));
        for arch in Arch::ALL {
            assert!(is_valid_jvm_and_arch(Jvm::Hotspot, arch));
        }
    }

    #[test]
    fn test_partitions_are_complete_and_disjoint() {
        let images = generate_all_images(&MatrixAxes::default());
        let total = images.len();

        let pb = filter_valid_package_and_build(images);
        assert_eq!(pb.kept.len() + pb.removed.len(), total);
        assert!(pb.removed.iter().all(|img| !pb.kept.contains(img)));

        let input = pb.kept.len();
        let oa = filter_valid_os_and_arch(pb.kept);
        assert_eq!(oa.kept.len() + oa.removed.len(), input);

        let input = oa.kept.len();
        let ja = filter_valid_jvm_and_arch(oa.kept);
        assert_eq!(ja.kept.len() + ja.removed.len(), input);
    }

    #[test]
    fn test_apply_general_filters() {
        let axes = MatrixAxes {
            versions: vec![crate::images::models::Version::V8],
            jvms: vec![Jvm::Openj9],
            oses: vec![Os::Clefos],
            packages: vec![Package::Jre],
            builds: vec![Build::Slim, Build::Full],
            archs: vec![Arch::S390x, Arch::X86_64, Arch::Aarch64],
        };
        let mut result = PipelineResult::default();
        apply_general_filters(generate_all_images(&axes), &mut result);

        // jre slim: all three archs
        assert_eq!(result.package_and_build.len(), 3);
        // clefos off s390x: x86_64 and aarch64 of the full build
        assert_eq!(result.os_and_arch.len(), 2);
        assert!(result.jvm_and_arch.is_empty());
        assert_eq!(result.filtered_images.len(), 1);
        assert_eq!(result.filtered_images[0].arch, Arch::S390x);
    }
}
