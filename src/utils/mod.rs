//! Utility functions shared across the application

mod format;

pub use format::*;
