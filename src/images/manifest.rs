//! Registry checks at manifest granularity
//!
//! Every architecture of an image shares one registry tag, so existence and
//! manifest lookups happen once per [`ManifestKey`] and the answer is fanned
//! out to all architectures of that key.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use indexmap::{IndexMap, IndexSet};

use crate::config;
use crate::error::{Result, ScanError};
use crate::registry::{RegistryClient, TagLookup};
use crate::{log_debug, log_info};

use super::filters::Partition;
use super::models::{Arch, EnrichedImage, ImageCandidate, ManifestKey, TagManifest};

const MODULE: &str = "images::manifest";

/// Distinct manifest keys of `images`, in first-occurrence order
pub fn manifest_keys(images: &[ImageCandidate]) -> IndexSet<ManifestKey> {
    images.iter().map(ImageCandidate::manifest_key).collect()
}

/// Run one lookup per key, at most `MAX_CONCURRENT_REQUESTS` at a time
///
/// Results come back in key order and the first error in key order wins,
/// so a failing scan always reports the same image.
async fn lookup_per_key<'a, T, F, Fut>(keys: &'a IndexSet<ManifestKey>, lookup: F) -> Result<Vec<T>>
where
    F: FnMut(&'a ManifestKey) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    stream::iter(keys.iter())
        .map(lookup)
        .buffered(config::registry::MAX_CONCURRENT_REQUESTS)
        .try_collect()
        .await
}

/// Split images by whether their tag exists in the registry
///
/// A missing tag removes every architecture of that key at once.
pub async fn filter_image_exist<R>(
    registry: &R,
    org: &str,
    images: Vec<ImageCandidate>,
) -> Result<Partition<ImageCandidate>>
where
    R: RegistryClient + ?Sized,
{
    let keys = manifest_keys(&images);
    log_debug!(
        MODULE,
        "Checking existence of {} tags for {} images",
        keys.len(),
        images.len()
    );

    let exists = lookup_per_key(&keys, |key| async move {
        let repo = key.repository();
        let found = registry.tag_exists(org, &repo, &key.tag).await?;
        if !found {
            log_debug!(MODULE, "Image {} does not exist", key.reference(org));
        }
        Ok(found)
    })
    .await?;

    let missing: HashSet<&ManifestKey> = keys
        .iter()
        .zip(exists)
        .filter_map(|(key, found)| (!found).then_some(key))
        .collect();

    Ok(Partition::split(images, |img| {
        !missing.contains(&img.manifest_key())
    }))
}

/// Attach the tag document of each image's manifest key
///
/// The document is fetched once per key and shared by all architectures.
pub async fn enrich_images<R>(
    registry: &R,
    org: &str,
    images: Vec<ImageCandidate>,
) -> Result<Vec<EnrichedImage>>
where
    R: RegistryClient + ?Sized,
{
    let keys = manifest_keys(&images);
    log_info!(MODULE, "Fetching {} manifests.......", keys.len());

    let manifests = lookup_per_key(&keys, |key| async move {
        let reference = key.reference(org);
        log_debug!(MODULE, "Getting image information for: {}", reference);

        match registry.tag_metadata(org, &key.repository(), &key.tag).await? {
            TagLookup::Found(manifest) => Ok(Arc::new(manifest)),
            TagLookup::NotFound => Err(ScanError::TagVanished(reference)),
        }
    })
    .await?;

    let by_key: IndexMap<&ManifestKey, Arc<TagManifest>> = keys.iter().zip(manifests).collect();

    Ok(images
        .into_iter()
        .map(|image| {
            let manifest = Arc::clone(&by_key[&image.manifest_key()]);
            EnrichedImage { image, manifest }
        })
        .collect())
}

/// Docker manifest name of a build-farm architecture name
pub fn docker_arch_name(arch: &str) -> Result<&'static str> {
    Ok(arch.parse::<Arch>()?.docker_name())
}

/// Check whether the manifest lists an image for `arch`
///
/// `reference` only labels the error when `images` is missing.
pub fn is_arch_in_manifest(arch: Arch, manifest: &TagManifest, reference: &str) -> Result<bool> {
    let images = manifest
        .images
        .as_ref()
        .ok_or_else(|| ScanError::MissingField {
            image: reference.to_string(),
            field: "images",
        })?;

    let wanted = arch.docker_name();
    Ok(images
        .iter()
        .any(|img| img.architecture.as_deref() == Some(wanted)))
}

/// Split enriched images by whether their architecture is in the manifest
///
/// With `filter_images == false` the bad images are still reported in
/// `removed` but every image stays in `kept`.
pub fn filter_arch_in_manifest(
    enriched: Vec<EnrichedImage>,
    org: &str,
    filter_images: bool,
) -> Result<Partition<EnrichedImage>> {
    let mut kept = Vec::with_capacity(enriched.len());
    let mut removed = Vec::new();

    for item in enriched {
        let reference = item.image.reference(org);
        if is_arch_in_manifest(item.image.arch, &item.manifest, &reference)? {
            kept.push(item);
        } else {
            log_debug!(MODULE, "{} is missing from the manifest of {}", item.image.arch, reference);
            if !filter_images {
                kept.push(item.clone());
            }
            removed.push(item);
        }
    }

    Ok(Partition { kept, removed })
}
