//! Config struct definition and default implementation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Log filter used when neither the environment nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Client configuration, as read from a YAML file.
///
/// Unset fields fall back to the resolver (`executable`, `kubeconfig`) or to
/// built-in defaults. Unknown fields in the YAML are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the kubectl-compatible binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,

    /// Path passed as `--kubeconfig`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<String>,

    /// Environment variables set on top of the inherited environment for
    /// every kubectl invocation.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// `tracing` filter directive for the binary (e.g. `debug`).
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            executable: None,
            kubeconfig: None,
            env: BTreeMap::new(),
            log_filter: default_log_filter(),
        }
    }
}
