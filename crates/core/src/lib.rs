//! Core domain types, errors, and constants for `envsnag`.
//!
//! ## Key Components
//!
//! - **`errors`**: The primary `Error` enum and `Result` alias shared by every
//!   crate in the workspace, plus the non-fatal `KeyNormalizationWarning`.
//! - **`types`**: Source descriptors, resolved entries, the ordered
//!   `EnvironmentMap` and the `RunResult` handed back to the process wrapper.
//! - **`constants`**: Environment variable names and shared limits.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, KeyNormalizationWarning, Result},
    types::*,
};
