//! Verification pipeline
//!
//! Four entry points of increasing scope, each running the previous one and
//! adding a stage:
//!
//! - [`Pipeline::verify_images`]: static filters, then registry existence
//! - [`Pipeline::verify_manifests`]: + manifest architecture check
//! - [`Pipeline::verify_timedelta`]: + time delta check (unless forced)
//! - [`Pipeline::verify`]: everything
//!
//! Every rejected image is kept in its stage's bucket of [`PipelineResult`].
//! A fatal error aborts the invocation and no result is returned.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::config;
use crate::error::Result;
use crate::images::{
    apply_general_filters, enrich_images, filter_arch_in_manifest, filter_image_exist,
    filter_timedelta, known_tag_timestamps, tag_timestamps, EnrichedImage, ImageCandidate,
    ManifestKey, Partition,
};
use crate::log_debug;
use crate::registry::RegistryClient;

const MODULE: &str = "pipeline";

/// Surviving images plus one bucket per rejecting stage
#[derive(Debug, Clone, Default)]
pub struct PipelineResult {
    pub filtered_images: Vec<ImageCandidate>,
    pub package_and_build: Vec<ImageCandidate>,
    pub os_and_arch: Vec<ImageCandidate>,
    pub jvm_and_arch: Vec<ImageCandidate>,
    pub bad_requests: Vec<ImageCandidate>,
    pub bad_manifests: Vec<ImageCandidate>,
    pub old_images: Vec<ImageCandidate>,
    /// Publish time of every tag that went through the time delta check
    pub last_updated: IndexMap<ManifestKey, DateTime<Utc>>,
}

/// Knobs of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub docker_org: String,
    /// Drop images whose architecture is missing from the manifest.
    /// When false they are reported in `bad_manifests` but keep going.
    pub filter_bad_manifests: bool,
    pub delta_hours: i64,
    /// Skip the time delta check entirely
    pub force_old_images: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            docker_org: config::registry::DEFAULT_ORG.to_string(),
            filter_bad_manifests: false,
            delta_hours: config::scan::DEFAULT_DELTA_HOURS,
            force_old_images: false,
        }
    }
}

fn strip(enriched: Vec<EnrichedImage>) -> Vec<ImageCandidate> {
    enriched.into_iter().map(EnrichedImage::into_image).collect()
}

/// Runs verification stages against a registry
pub struct Pipeline<R> {
    registry: R,
    options: PipelineOptions,
    now: DateTime<Utc>,
}

impl<R: RegistryClient> Pipeline<R> {
    pub fn new(registry: R, options: PipelineOptions) -> Self {
        Self {
            registry,
            options,
            now: Utc::now(),
        }
    }

    /// Evaluate the time delta against `now` instead of the creation time
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    #[cfg(test)]
    pub(crate) fn registry(&self) -> &R {
        &self.registry
    }

    /// Static filters followed by the registry existence check
    pub async fn verify_images(&self, images: Vec<ImageCandidate>) -> Result<PipelineResult> {
        let mut result = PipelineResult::default();
        let generated = images.len();

        apply_general_filters(images, &mut result);
        log_debug!(
            MODULE,
            "General filters: {} of {} images are valid",
            result.filtered_images.len(),
            generated
        );

        let candidates = std::mem::take(&mut result.filtered_images);
        let Partition { kept, removed } =
            filter_image_exist(&self.registry, &self.options.docker_org, candidates).await?;
        log_debug!(
            MODULE,
            "Existence check: {} exist, {} do not",
            kept.len(),
            removed.len()
        );

        result.filtered_images = kept;
        result.bad_requests = removed;
        Ok(result)
    }

    async fn manifests_stage(
        &self,
        images: Vec<ImageCandidate>,
    ) -> Result<(PipelineResult, Vec<EnrichedImage>)> {
        let mut result = self.verify_images(images).await?;

        let existing = std::mem::take(&mut result.filtered_images);
        let enriched = enrich_images(&self.registry, &self.options.docker_org, existing).await?;

        let Partition { kept, removed } = filter_arch_in_manifest(
            enriched,
            &self.options.docker_org,
            self.options.filter_bad_manifests,
        )?;
        log_debug!(
            MODULE,
            "Manifest check: {} images missing from their manifest (filtering: {})",
            removed.len(),
            self.options.filter_bad_manifests
        );

        result.bad_manifests = strip(removed);
        Ok((result, kept))
    }

    /// [`Self::verify_images`] plus the manifest architecture check
    pub async fn verify_manifests(&self, images: Vec<ImageCandidate>) -> Result<PipelineResult> {
        let (mut result, enriched) = self.manifests_stage(images).await?;
        result.filtered_images = strip(enriched);
        Ok(result)
    }

    async fn timedelta_stage(
        &self,
        images: Vec<ImageCandidate>,
    ) -> Result<(PipelineResult, Vec<EnrichedImage>)> {
        let (mut result, enriched) = self.manifests_stage(images).await?;

        let org = &self.options.docker_org;
        if self.options.force_old_images {
            log_debug!(MODULE, "Time delta check skipped (forced)");
            result.last_updated = known_tag_timestamps(&enriched, org);
            return Ok((result, enriched));
        }

        result.last_updated = tag_timestamps(&enriched, org)?;

        let Partition { kept, removed } =
            filter_timedelta(enriched, org, self.now, self.options.delta_hours)?;
        log_debug!(
            MODULE,
            "Time delta check: {} new, {} older than {} hours",
            kept.len(),
            removed.len(),
            self.options.delta_hours
        );

        result.old_images = strip(removed);
        Ok((result, kept))
    }

    /// [`Self::verify_manifests`] plus the time delta check
    pub async fn verify_timedelta(&self, images: Vec<ImageCandidate>) -> Result<PipelineResult> {
        let (mut result, enriched) = self.timedelta_stage(images).await?;
        result.filtered_images = strip(enriched);
        Ok(result)
    }

    /// Every stage; the survivors are the images that need testing
    pub async fn verify(&self, images: Vec<ImageCandidate>) -> Result<PipelineResult> {
        self.verify_timedelta(images).await
    }
}
