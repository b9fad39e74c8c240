//! Source resolution for envsnag
//!
//! Every source scheme is served by a [`Resolver`] registered in a
//! [`ResolverRegistry`]. Resolvers talk to backends only through the
//! [`SecretStore`], [`ParameterStore`] and [`ObjectStore`] capabilities, so
//! the whole pipeline runs unchanged against the in-memory doubles in
//! [`testing`].
//!
//! ## Modules
//!
//! - **`backends`**: capability traits plus the AWS and Vault clients
//! - **`registry`**: scheme dispatch and manifest nesting depth
//! - **`secret_store`**, **`parameter_store`**, **`object_store`**,
//!   **`manifest`**, **`env_file`**: one resolver per scheme
//! - **`decode`**: JSON object bodies to entries

pub mod backends;
pub mod decode;
pub mod env_file;
pub mod manifest;
pub mod object_store;
pub mod parameter_store;
pub mod registry;
pub mod resolver;
pub mod secret_store;
pub mod testing;

pub use backends::{ObjectStore, Parameter, ParameterStore, SecretStore, StoreScope};
pub use registry::ResolverRegistry;
pub use resolver::{ResolveContext, Resolver};
