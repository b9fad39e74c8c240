//! Error types for envsnag operations

mod builders;
mod conversions;
mod types;

pub use types::{Error, KeyNormalizationWarning, Result};
