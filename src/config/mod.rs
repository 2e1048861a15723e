//! Configuration for the kubectl client.
//!
//! A config file is optional YAML (`--config <path>`). It supports
//! forward-compatible parsing (unknown fields are ignored), defaults for
//! every field, and validation of values. Executable and kubeconfig
//! discovery is delegated to an [`ExecutableResolver`].

mod model;
mod operations;
mod resolver;


// Re-export public API
pub use model::{Config, DEFAULT_LOG_FILTER};
pub use resolver::{DEFAULT_EXECUTABLE, ExecutableResolver, PathResolver};
