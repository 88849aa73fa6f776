//! Time delta checks
//!
//! An image is "new" when its tag was pushed less than `delta_hours` ago.

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;

use crate::error::{Result, ScanError};
use crate::{log_debug, log_warn};

use super::filters::Partition;
use super::models::{EnrichedImage, ManifestKey, TagManifest};

const MODULE: &str = "images::freshness";

impl TagManifest {
    /// Parsed `last_updated` timestamp of the tag
    ///
    /// `reference` only labels the error.
    pub fn last_updated(&self, reference: &str) -> Result<DateTime<Utc>> {
        let value = self
            .last_updated
            .as_deref()
            .ok_or_else(|| ScanError::MissingField {
                image: reference.to_string(),
                field: "last_updated",
            })?;

        DateTime::parse_from_rfc3339(value)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|source| ScanError::InvalidTimestamp {
                image: reference.to_string(),
                value: value.to_string(),
                source,
            })
    }
}

/// Check the timestamp plus `delta_hours` is still ahead of `now`
///
/// Exactly `delta_hours` old still counts as new. A delta reaching past the
/// representable range of time counts every image as new.
pub fn is_timedelta(timestamp: DateTime<Utc>, now: DateTime<Utc>, delta_hours: i64) -> bool {
    match Duration::try_hours(delta_hours).and_then(|delta| timestamp.checked_add_signed(delta)) {
        Some(deadline) => deadline >= now,
        None => delta_hours > 0,
    }
}

/// Publish time of every manifest key among `enriched`
pub fn tag_timestamps(
    enriched: &[EnrichedImage],
    org: &str,
) -> Result<IndexMap<ManifestKey, DateTime<Utc>>> {
    let mut timestamps = IndexMap::new();
    for item in enriched {
        let key = item.image.manifest_key();
        if !timestamps.contains_key(&key) {
            let last_updated = item.manifest.last_updated(&key.reference(org))?;
            timestamps.insert(key, last_updated);
        }
    }
    Ok(timestamps)
}

/// Publish times for reporting only; tags without a usable timestamp are skipped
pub fn known_tag_timestamps(enriched: &[EnrichedImage], org: &str) -> IndexMap<ManifestKey, DateTime<Utc>> {
    let mut timestamps = IndexMap::new();
    for item in enriched {
        let key = item.image.manifest_key();
        if timestamps.contains_key(&key) {
            continue;
        }
        match item.manifest.last_updated(&key.reference(org)) {
            Ok(last_updated) => {
                timestamps.insert(key, last_updated);
            }
            Err(e) => log_warn!(MODULE, "Age unknown: {}", e),
        }
    }
    timestamps
}

/// Split enriched images into new (`kept`) and old (`removed`) ones
pub fn filter_timedelta(
    enriched: Vec<EnrichedImage>,
    org: &str,
    now: DateTime<Utc>,
    delta_hours: i64,
) -> Result<Partition<EnrichedImage>> {
    let mut kept = Vec::with_capacity(enriched.len());
    let mut removed = Vec::new();

    for item in enriched {
        let reference = item.image.reference(org);
        let last_updated = item.manifest.last_updated(&reference)?;

        if is_timedelta(last_updated, now, delta_hours) {
            kept.push(item);
        } else {
            log_debug!(
                MODULE,
                "{} ({}) last updated {} is older than {} hours",
                reference,
                item.image.arch,
                last_updated,
                delta_hours
            );
            removed.push(item);
        }
    }

    Ok(Partition { kept, removed })
}
