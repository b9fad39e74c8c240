//! Core domain types for `envsnag`.
//!
//! - **`descriptor`**: parsed source references and their schemes
//! - **`entry`**: raw resolver output
//! - **`environment`**: the ordered, merged mapping
//! - **`newtypes`**: validated names
//! - **`run`**: the result of one invocation

pub mod descriptor;
pub mod entry;
pub mod environment;
pub mod newtypes;
pub mod run;

pub use descriptor::*;
pub use entry::*;
pub use environment::*;
pub use newtypes::*;
pub use run::*;
