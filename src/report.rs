//! Classification reports
//!
//! Turns a [`PipelineResult`] into report sections, either human readable
//! lines or one JSON object per image, and prints them to the log.

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::images::{manifest_keys, ImageCandidate, ManifestKey};
use crate::log_info;
use crate::pipeline::PipelineResult;
use crate::utils::format_age;

const MODULE: &str = "report";

/// How results are rendered
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub docker_org: String,
    /// One JSON object per image instead of formatted strings
    pub json: bool,
    /// Also list the images that passed a check
    pub show_valid: bool,
    pub delta_hours: i64,
    /// Reference time for image ages
    pub now: DateTime<Utc>,
}

/// A titled block of report lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub count: usize,
    pub lines: Vec<String>,
}

impl Section {
    fn new(title: impl Into<String>, count: usize, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            count,
            lines,
        }
    }

    /// Print the section header and its lines
    pub fn print(&self) {
        log_info!(MODULE, "");
        log_info!(MODULE, "{}({}):", self.title, self.count);
        for line in &self.lines {
            log_info!(MODULE, "{}", line);
        }
    }
}

fn json_lines<T: Serialize>(items: impl IntoIterator<Item = T>) -> serde_json::Result<Vec<String>> {
    items
        .into_iter()
        .map(|item| serde_json::to_string(&item))
        .collect()
}

/// Images that failed one of the static filters
fn static_section(
    title: &str,
    images: &[ImageCandidate],
    opts: &ReportOptions,
    describe: impl Fn(&ImageCandidate) -> String,
) -> serde_json::Result<Section> {
    let lines = if opts.json {
        json_lines(images)?
    } else {
        images
            .iter()
            .map(|img| format!("{} for image: {}", describe(img), img.reference(&opts.docker_org)))
            .collect()
    };
    Ok(Section::new(title, images.len(), lines))
}

pub fn package_and_build(result: &PipelineResult, opts: &ReportOptions) -> serde_json::Result<Section> {
    static_section("Package and Build Image Issues", &result.package_and_build, opts, |img| {
        format!("Package & Build Check Failed with {} and {}", img.package, img.build)
    })
}

pub fn os_and_arch(result: &PipelineResult, opts: &ReportOptions) -> serde_json::Result<Section> {
    static_section("OS and Arch Image Issues", &result.os_and_arch, opts, |img| {
        format!("OS Check Failed with {} and {}", img.os, img.arch)
    })
}

pub fn jvm_and_arch(result: &PipelineResult, opts: &ReportOptions) -> serde_json::Result<Section> {
    static_section("JVM and Architecture Image Issues", &result.jvm_and_arch, opts, |img| {
        format!("JVM Check Failed with {} and {}", img.jvm, img.arch)
    })
}

/// Tag-level section: one entry per manifest key
fn key_section(
    title: &str,
    keys: &IndexSet<ManifestKey>,
    opts: &ReportOptions,
    message: &str,
) -> serde_json::Result<Section> {
    let lines = if opts.json {
        json_lines(keys)?
    } else {
        keys.iter()
            .map(|key| format!("{} for image: {}", message, key.reference(&opts.docker_org)))
            .collect()
    };
    Ok(Section::new(title, keys.len(), lines))
}

/// Nonexistent tags, plus existing ones with `show_valid`
pub fn bad_requests(result: &PipelineResult, opts: &ReportOptions) -> serde_json::Result<Vec<Section>> {
    let mut sections = vec![key_section(
        "Nonexistent(Bad Requests) Image Issues",
        &manifest_keys(&result.bad_requests),
        opts,
        "Got a bad request",
    )?];

    if opts.show_valid {
        sections.push(key_section(
            "Existent(Good Requests) Images",
            &manifest_keys(&result.filtered_images),
            opts,
            "Got a good request",
        )?);
    }

    Ok(sections)
}

/// Images whose architecture is missing from the manifest, grouped per tag
pub fn bad_manifests(result: &PipelineResult, opts: &ReportOptions) -> serde_json::Result<Section> {
    let count = result.bad_manifests.len();

    if opts.json {
        return Ok(Section::new(
            "Manifest RAW Image Issues",
            count,
            json_lines(&result.bad_manifests)?,
        ));
    }

    let mut missing: IndexMap<String, Vec<&str>> = IndexMap::new();
    for img in &result.bad_manifests {
        missing
            .entry(img.reference(&opts.docker_org))
            .or_default()
            .push(img.arch.as_str());
    }

    let lines = missing
        .into_iter()
        .map(|(reference, archs)| format!("{} : {}", reference, archs.join(", ")))
        .collect();
    Ok(Section::new("Manifest Image Issues", count, lines))
}

/// One line per tag with its age; tags without a known publish time are skipped
fn age_lines(
    images: &[ImageCandidate],
    result: &PipelineResult,
    opts: &ReportOptions,
    verdict: &str,
) -> Vec<String> {
    manifest_keys(images)
        .iter()
        .filter_map(|key| {
            let last_updated = result.last_updated.get(key)?;
            Some(format!(
                "{} delta time check of {} hours with the age of {} for image: {}",
                verdict,
                opts.delta_hours,
                format_age(opts.now - *last_updated),
                key.reference(&opts.docker_org)
            ))
        })
        .collect()
}

/// Images older than the delta, plus new ones with `show_valid`
pub fn old_images(result: &PipelineResult, opts: &ReportOptions) -> serde_json::Result<Vec<Section>> {
    let mut sections = Vec::new();

    if opts.json {
        sections.push(Section::new(
            "Delta Time(Old) RAW Image Issues",
            result.old_images.len(),
            json_lines(&result.old_images)?,
        ));
        if opts.show_valid {
            sections.push(Section::new(
                "Delta Time(NEW) RAW Images",
                result.filtered_images.len(),
                json_lines(&result.filtered_images)?,
            ));
        }
        return Ok(sections);
    }

    let lines = age_lines(&result.old_images, result, opts, "Failed");
    sections.push(Section::new("Delta Time(Old) Image Issues", lines.len(), lines));

    if opts.show_valid {
        let lines = age_lines(&result.filtered_images, result, opts, "Passed");
        sections.push(Section::new("Delta Time(NEW) Images", lines.len(), lines));
    }

    Ok(sections)
}

/// Images that passed every check
pub fn filtered_images(result: &PipelineResult, opts: &ReportOptions) -> serde_json::Result<Section> {
    if opts.json {
        return Ok(Section::new(
            "Valid(Filtered) RAW Images",
            result.filtered_images.len(),
            json_lines(&result.filtered_images)?,
        ));
    }

    key_section(
        "Valid(Filtered) Images",
        &manifest_keys(&result.filtered_images),
        opts,
        "All attributes have been verified",
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::images::{Arch, Build, Jvm, Os, Package, Version};

    fn opts(json: bool, show_valid: bool) -> ReportOptions {
        ReportOptions {
            docker_org: "adoptopenjdk".to_string(),
            json,
            show_valid,
            delta_hours: 2,
            now: Utc.with_ymd_and_hms(2020, 5, 4, 12, 0, 0).unwrap(),
        }
    }

    fn image(arch: Arch) -> ImageCandidate {
        ImageCandidate::new(Version::V8, Jvm::Hotspot, Os::Alpine, Package::Jdk, Build::Full, arch)
    }

    #[test]
    fn test_bad_manifests_grouped_per_tag() {
        let result = PipelineResult {
            bad_manifests: vec![image(Arch::Aarch64), image(Arch::Armv7l)],
            ..PipelineResult::default()
        };

        let section = bad_manifests(&result, &opts(false, false)).unwrap();
        assert_eq!(section.count, 2);
        assert_eq!(
            section.lines,
            vec!["adoptopenjdk/openjdk8:jdk8u-alpine-nightly : aarch64, armv7l"]
        );
    }

    #[test]
    fn test_bad_requests_deduplicated() {
        let result = PipelineResult {
            bad_requests: vec![image(Arch::X86_64), image(Arch::S390x)],
            ..PipelineResult::default()
        };

        let sections = bad_requests(&result, &opts(false, true)).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].count, 1);
        assert_eq!(
            sections[0].lines,
            vec!["Got a bad request for image: adoptopenjdk/openjdk8:jdk8u-alpine-nightly"]
        );
        assert_eq!(sections[1].count, 0);
    }

    #[test]
    fn test_json_lines_are_raw_candidates() {
        let result = PipelineResult {
            package_and_build: vec![image(Arch::X86_64)],
            ..PipelineResult::default()
        };

        let section = package_and_build(&result, &opts(true, false)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&section.lines[0]).unwrap();
        assert_eq!(value["arch"], "x86_64");
        assert_eq!(value["version"], "8");
        assert_eq!(value["tag"], "jdk8u-alpine-nightly");
    }

    #[test]
    fn test_old_images_show_age() {
        let old = image(Arch::X86_64);
        let mut last_updated = IndexMap::new();
        last_updated.insert(
            old.manifest_key(),
            Utc.with_ymd_and_hms(2020, 5, 1, 9, 30, 0).unwrap(),
        );
        let result = PipelineResult {
            old_images: vec![old],
            last_updated,
            ..PipelineResult::default()
        };

        let sections = old_images(&result, &opts(false, false)).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].lines,
            vec![
                "Failed delta time check of 2 hours with the age of 3 days, 02:30.00 for image: adoptopenjdk/openjdk8:jdk8u-alpine-nightly"
            ]
        );
    }
}
