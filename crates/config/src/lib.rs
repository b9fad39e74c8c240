//! Runtime settings for envsnag
//!
//! Everything the tool reads from the process environment is gathered here,
//! once, into an immutable [`Settings`] value. Construction goes through an
//! injectable lookup so callers and tests never need to mutate the real
//! environment.

mod settings;
mod sources;


pub use settings::{env_bool, Settings, VaultSettings};
pub use sources::{select_sources, split_source_list};
