//! Verify command
//!
//! Generates the image matrix, runs the pipeline up to the requested stage
//! and prints the matching report.

use anyhow::Context;
use clap::ValueEnum;

use crate::images::{generate_all_images, MatrixAxes};
use crate::pipeline::{Pipeline, PipelineOptions, PipelineResult};
use crate::registry::RegistryClient;
use crate::report::{self, ReportOptions, Section};
use crate::{log_debug, log_info};

const MODULE: &str = "commands::verify";

/// Which attribute to verify
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VerifyMode {
    /// Every check; prints the images that need testing
    All,
    /// Existence, manifests and time delta; prints old images
    Timedelta,
    /// Existence and manifests; prints bad manifests
    Manifests,
    /// Existence only; prints nonexistent images
    Images,
}

impl VerifyMode {
    pub fn as_str(self) -> &'static str {
        match self {
            VerifyMode::All => "all",
            VerifyMode::Timedelta => "timedelta",
            VerifyMode::Manifests => "manifests",
            VerifyMode::Images => "images",
        }
    }
}

/// Everything a scan needs besides the registry
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub mode: VerifyMode,
    pub axes: MatrixAxes,
    pub options: PipelineOptions,
    /// In `all` mode, also print every rejection bucket
    pub debug: bool,
    pub json: bool,
    pub show_valid: bool,
}

/// Report sections printed for a verify mode
pub fn report_sections(
    request: &ScanRequest,
    result: &PipelineResult,
    opts: &ReportOptions,
) -> serde_json::Result<Vec<Section>> {
    let mut sections = Vec::new();

    match request.mode {
        VerifyMode::All => {
            if request.debug {
                sections.push(report::package_and_build(result, opts)?);
                sections.push(report::os_and_arch(result, opts)?);
                sections.push(report::jvm_and_arch(result, opts)?);
                sections.extend(report::bad_requests(result, opts)?);
                sections.push(report::bad_manifests(result, opts)?);
                sections.extend(report::old_images(result, opts)?);
            }
            sections.push(report::filtered_images(result, opts)?);
        }
        VerifyMode::Timedelta => sections.extend(report::old_images(result, opts)?),
        VerifyMode::Manifests => sections.push(report::bad_manifests(result, opts)?),
        VerifyMode::Images => sections.extend(report::bad_requests(result, opts)?),
    }

    Ok(sections)
}

/// Run a scan against `registry` and print its report
pub async fn run<R: RegistryClient>(registry: R, request: &ScanRequest) -> anyhow::Result<PipelineResult> {
    log_info!(MODULE, "Generating All Possible Images.......");
    let images = generate_all_images(&request.axes);
    log_debug!(MODULE, "Generated {} images", images.len());

    let pipeline = Pipeline::new(registry, request.options.clone());

    log_info!(MODULE, "Processing images.......");
    let result = match request.mode {
        VerifyMode::All => pipeline.verify(images).await,
        VerifyMode::Timedelta => pipeline.verify_timedelta(images).await,
        VerifyMode::Manifests => pipeline.verify_manifests(images).await,
        VerifyMode::Images => pipeline.verify_images(images).await,
    }
    .with_context(|| format!("--verify {} aborted", request.mode.as_str()))?;

    let opts = ReportOptions {
        docker_org: pipeline.options().docker_org.clone(),
        json: request.json,
        show_valid: request.show_valid,
        delta_hours: pipeline.options().delta_hours,
        now: pipeline.now(),
    };

    let sections = report_sections(request, &result, &opts).context("Failed to render report")?;
    for section in &sections {
        section.print();
    }

    Ok(result)
}
