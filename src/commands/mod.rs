//! Command handlers invoked from `main`

pub mod verify;

pub use verify::{run, ScanRequest, VerifyMode};
