//! Typed wrapper around the `kubectl` command-line tool.
//!
//! Operations are expressed as Rust calls on a [`Session`]; each one builds
//! a kubectl command line, runs it as a child process, and turns the exit
//! status and output into data or a [`KubernetesError`].
//!
//! - [`builder`]: argv assembly for every operation
//! - [`invocation`]: the token list and shell rendering of one command
//! - [`engine`]: replace / run / capture / piped-write execution
//! - [`client`]: the shared client and per-caller sessions
//! - [`config`]: YAML configuration and executable discovery

pub mod builder;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod exit_codes;
pub mod hooks;
pub mod invocation;
pub mod resource;
pub mod sink;

#[cfg(test)]
pub(crate) mod test_support;

pub use builder::{CommandBuilder, ExecRequest, Labels, Namespace, PatchType};
pub use client::{KubernetesCli, KubernetesCliBuilder, RedirectGuard, Session};
pub use engine::{ExecutionOutcome, LastStatus};
pub use error::{ErrorKind, KubernetesError, Result};
pub use invocation::{Invocation, Token};
pub use resource::{Manifest, Resource, ResourceRef};
pub use sink::{CaptureBuffer, Sink, Sinks};
