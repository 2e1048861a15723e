//! Parameter types shared by the command builder and its callers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label selectors and annotations, kept in insertion order.
pub type Labels = IndexMap<String, String>;

/// Namespace scope of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Namespace {
    /// Every namespace (`--all-namespaces`).
    All,
    /// One namespace (`-n <name>`).
    Named(String),
    /// No namespace flag; kubectl falls back to the context's namespace.
    #[default]
    Default,
}

impl From<&str> for Namespace {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Namespace::Default
        } else {
            Namespace::Named(s.to_string())
        }
    }
}

impl From<String> for Namespace {
    fn from(s: String) -> Self {
        Namespace::from(s.as_str())
    }
}

impl From<Option<&str>> for Namespace {
    fn from(s: Option<&str>) -> Self {
        s.map(Namespace::from).unwrap_or_default()
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Namespace::All => write!(f, "all namespaces"),
            Namespace::Named(ns) => write!(f, "namespace {}", ns),
            Namespace::Default => write!(f, "the default namespace"),
        }
    }
}

/// Value for `kubectl patch --type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PatchType {
    Json,
    #[default]
    Merge,
    Strategic,
}

impl PatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchType::Json => "json",
            PatchType::Merge => "merge",
            PatchType::Strategic => "strategic",
        }
    }

    /// Parse a patch type from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "json" => Some(Self::Json),
            "merge" => Some(Self::Merge),
            "strategic" => Some(Self::Strategic),
            _ => None,
        }
    }
}

/// A command to run inside a pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    pub namespace: String,
    pub pod: String,
    /// Passed through as shell text; quote arguments that need it.
    pub command: Vec<String>,
    /// Allocate a pseudo-terminal (`-it`). On by default.
    pub tty: bool,
    pub container: Option<String>,
    /// Redirect the command's stdout to this local path (`> path`).
    pub out_file: Option<String>,
}

impl ExecRequest {
    pub fn new<S: Into<String>>(
        namespace: impl Into<String>,
        pod: impl Into<String>,
        command: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            pod: pod.into(),
            command: command.into_iter().map(Into::into).collect(),
            tty: true,
            container: None,
            out_file: None,
        }
    }

    pub fn tty(mut self, tty: bool) -> Self {
        self.tty = tty;
        self
    }

    pub fn container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    pub fn out_file(mut self, path: impl Into<String>) -> Self {
        self.out_file = Some(path.into());
        self
    }
}
