//! Image management module
//!
//! Generates the image matrix and classifies it: static validity filters,
//! registry existence, manifest architectures and time delta.

mod filters;
mod freshness;
mod manifest;
mod matrix;
mod models;

pub use filters::{
    apply_general_filters, filter_valid_jvm_and_arch, filter_valid_os_and_arch,
    filter_valid_package_and_build, is_valid_jvm_and_arch, is_valid_os_and_arch,
    is_valid_package_and_build, Partition,
};
pub use freshness::{filter_timedelta, is_timedelta, known_tag_timestamps, tag_timestamps};
pub use manifest::{
    docker_arch_name, enrich_images, filter_arch_in_manifest, filter_image_exist,
    is_arch_in_manifest, manifest_keys,
};
pub use matrix::{generate_all_images, image_tag, sanitize_build, sanitize_jvm, MatrixAxes};
pub use models::{
    Arch, Build, EnrichedImage, ImageCandidate, Jvm, ManifestImage, ManifestKey, Os, Package,
    TagManifest, Version,
};
