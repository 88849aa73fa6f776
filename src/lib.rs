//! AdoptOpenJDK Scanner
//!
//! Audits the AdoptOpenJDK Docker images: generates every
//! version × JVM × OS × package × build × architecture combination,
//! drops the ones that are never built, then checks against Docker Hub
//! that the tags exist, that their manifests list every architecture and
//! that they were published recently.

pub mod commands;
pub mod config;
pub mod error;
pub mod images;
pub mod logging;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod utils;

pub use error::{Result, ScanError};
pub use pipeline::{Pipeline, PipelineOptions, PipelineResult};
pub use registry::{DockerHubClient, RegistryClient, TagLookup};
