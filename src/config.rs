//! Application configuration
//!
//! Static defaults for the scanner. Anything a user can change at runtime
//! is exposed as a command line flag in `main.rs`.

/// Application metadata
pub mod app {
    /// Application name (used in the startup banner)
    pub const NAME: &str = "AdoptOpenJDK Scanner";
    /// User agent sent with every registry request
    pub const USER_AGENT: &str = concat!("adoptopenjdk-scanner/", env!("CARGO_PKG_VERSION"));
}

/// Remote endpoints
pub mod urls {
    /// Docker Hub API base URL
    pub const DOCKER_HUB_API: &str = "https://hub.docker.com";
}

/// Registry client settings
pub mod registry {
    /// Docker organization the images are published under
    pub const DEFAULT_ORG: &str = "adoptopenjdk";
    /// Request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Maximum number of tag lookups in flight at once
    pub const MAX_CONCURRENT_REQUESTS: usize = 8;
}

/// Scan behaviour
pub mod scan {
    /// Hours after which a published tag is considered old
    pub const DEFAULT_DELTA_HOURS: i64 = 2;
    /// Upper bound accepted for `--delta-hours` (100 years)
    pub const MAX_DELTA_HOURS: i64 = 100 * 365 * 24;
}

/// Logging settings
pub mod logging {
    /// File name of the debug log, created inside `--log-path`
    pub const LOG_FILE_NAME: &str = "adoptopenjdk_scanner.log";
    /// Timestamp format used by the file log and the debug console
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
}
