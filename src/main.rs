//! AdoptOpenJDK Scanner - verify attributes of AdoptOpenJDK Docker images
//!
//! Command line entry point: parses arguments, configures logging and runs
//! the requested verification.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use adoptopenjdk_scanner::commands::{self, ScanRequest, VerifyMode};
use adoptopenjdk_scanner::images::{Arch, Build, Jvm, MatrixAxes, Os, Package, Version};
use adoptopenjdk_scanner::{config, logging, DockerHubClient, PipelineOptions};
use adoptopenjdk_scanner::{log_debug, log_error, log_info};

const MODULE: &str = "main";

/// AdoptOpenJDK Scanner allows a user to verify attributes about images
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Name of the attribute you want to verify
    #[arg(long, value_enum)]
    verify: VerifyMode,

    /// Java Versions
    #[arg(long, value_enum, num_args = 1.., default_values_t = Version::ALL.to_vec())]
    versions: Vec<Version>,

    /// Name of the JVMs
    #[arg(long, value_enum, num_args = 1.., default_values_t = Jvm::ALL.to_vec())]
    jvms: Vec<Jvm>,

    /// Names of the OSs
    #[arg(long, value_enum, num_args = 1.., default_values_t = Os::ALL.to_vec())]
    oss: Vec<Os>,

    /// Names of the Packages
    #[arg(long, value_enum, num_args = 1.., default_values_t = Package::ALL.to_vec())]
    packages: Vec<Package>,

    /// Architectures
    #[arg(long, value_enum, num_args = 1.., default_values_t = Arch::ALL.to_vec())]
    archs: Vec<Arch>,

    /// Name of the Builds
    #[arg(long, value_enum, num_args = 1.., default_values_t = Build::ALL.to_vec())]
    builds: Vec<Build>,

    /// Filter out bad manifest images
    #[arg(long)]
    filter_bad_manifests: bool,

    /// Number of hours to deem an image 'old'
    #[arg(
        long,
        default_value_t = config::scan::DEFAULT_DELTA_HOURS,
        value_parser = clap::value_parser!(i64).range(0..=config::scan::MAX_DELTA_HOURS)
    )]
    delta_hours: i64,

    /// Force old images not to be filtered out
    #[arg(long)]
    force_old_images: bool,

    /// Enable Debug output
    #[arg(long)]
    debug: bool,

    /// Path to where the log file will be generated
    #[arg(long)]
    log_path: Option<PathBuf>,

    /// Prints JSON output for results instead of formatted strings
    #[arg(long)]
    json: bool,

    /// Prints valid objects in addition to the problematic objects. Only works for certain verify values
    #[arg(long)]
    show_valid: bool,

    /// Docker organization the images are published under
    #[arg(long, env = "SCANNER_DOCKER_ORG", default_value = config::registry::DEFAULT_ORG)]
    docker_org: String,

    /// Registry API base URL
    #[arg(long, env = "SCANNER_REGISTRY_URL", default_value = config::urls::DOCKER_HUB_API)]
    registry_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = config::registry::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

impl Cli {
    fn scan_request(&self) -> ScanRequest {
        ScanRequest {
            mode: self.verify,
            axes: MatrixAxes {
                versions: self.versions.clone(),
                jvms: self.jvms.clone(),
                oses: self.oss.clone(),
                packages: self.packages.clone(),
                builds: self.builds.clone(),
                archs: self.archs.clone(),
            },
            options: PipelineOptions {
                docker_org: self.docker_org.clone(),
                filter_bad_manifests: self.filter_bad_manifests,
                delta_hours: self.delta_hours,
                force_old_images: self.force_old_images,
            },
            debug: self.debug,
            json: self.json,
            show_valid: self.show_valid,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match logging::init(cli.debug, cli.log_path.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log_debug!(MODULE, "=== {} {} ===", config::app::NAME, env!("CARGO_PKG_VERSION"));
    log_debug!(MODULE, "Parsed arguments: {:?}", cli);

    let registry = match DockerHubClient::new(&cli.registry_url, Duration::from_secs(cli.timeout_secs)) {
        Ok(registry) => registry,
        Err(e) => {
            log_error!(MODULE, "Failed to create registry client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match commands::run(registry, &cli.scan_request()).await {
        Ok(_) => {
            log_debug!(MODULE, "Scan complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_error!(MODULE, "ERROR: {:#}", e);
            log_info!(MODULE, "No report was produced");
            ExitCode::FAILURE
        }
    }
}
