//! Shared utilities for envsnag
//!
//! Logging setup and the small async helpers used by more than one resolver.

pub mod concurrency;
pub mod tracing;

pub use concurrency::*;
