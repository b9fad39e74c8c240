//! Rendering an environment for shells and other consumers
//!
//! Each output format is a [`Formatter`] looked up by name in a
//! [`FormatterRegistry`]. Shell-facing formats share [`escape_bash_like`].

pub mod env;
pub mod envfile;
pub mod escape;
pub mod formatter;
pub mod json;

pub use env::EnvFormatter;
pub use envfile::EnvFileFormatter;
pub use escape::escape_bash_like;
pub use formatter::{Formatter, FormatterRegistry};
pub use json::JsonFormatter;
