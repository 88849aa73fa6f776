//! Scanner error types
//!
//! A 404 from the registry is not an error: it classifies the image as
//! nonexistent. Everything here aborts the scan.

use thiserror::Error;

/// Fatal scan error
#[derive(Debug, Error)]
pub enum ScanError {
    /// Architecture name outside the supported set
    #[error("{0} is an unsupported architecture")]
    UnsupportedArchitecture(String),

    /// Registry answered with something other than 2xx or 404
    #[error("requesting {image} returned HTTP status {status}")]
    UnexpectedStatus { image: String, status: u16 },

    /// A field the scanner relies on is absent from the tag document
    #[error("{field} is missing from the tag document of {image}. Has the Docker Hub API changed?")]
    MissingField { image: String, field: &'static str },

    /// `last_updated` is present but not an ISO-8601 timestamp
    #[error("invalid last_updated timestamp {value:?} for {image}: {source}")]
    InvalidTimestamp {
        image: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A tag that passed the existence check could not be fetched
    #[error("{0} disappeared between the existence check and the manifest fetch")]
    TagVanished(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse tag document: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
