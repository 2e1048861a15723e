//! Error types for kubectl operations.
//!
//! Uses thiserror for derive macros. Every failure is a single
//! `KubernetesError` distinguished by [`ErrorKind`], so callers can branch
//! on the kind without parsing message text.

use crate::engine::LastStatus;
use crate::exit_codes;
use crate::resource::ResourceRef;
use std::fmt;
use thiserror::Error;

/// Operations whose output is decoded as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Version,
    GetObject,
    GetObjects,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Version => write!(f, "version"),
            Operation::GetObject => write!(f, "get object"),
            Operation::GetObjects => write!(f, "get objects"),
        }
    }
}

/// Coarse classification of a [`KubernetesError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidResource,
    InvalidResourceUri,
    GetResource,
    DeleteResource,
    PatchResource,
    AnnotateResource,
    GetVersion,
    Operation,
    Parse,
    Spawn,
    Io,
    Serialize,
    Config,
    NoLastStatus,
}

/// Main error type for kubectl operations.
#[derive(Error, Debug)]
pub enum KubernetesError {
    /// `apply` of an in-memory resource was rejected.
    #[error("could not apply {} '{}': kubectl exited with status code {status}", .resource.kind, .resource.name)]
    InvalidResource {
        resource: ResourceRef,
        /// The YAML document that was piped to kubectl.
        manifest: String,
        status: LastStatus,
    },

    /// `apply` of a file or URL was rejected.
    #[error("could not apply {uri}: kubectl exited with status code {status}")]
    InvalidResourceUri { uri: String, status: LastStatus },

    #[error("couldn't get {target}: kubectl exited with status code {status}")]
    GetResource { target: String, status: LastStatus },

    #[error("couldn't delete {target}: kubectl exited with status code {status}")]
    DeleteResource { target: String, status: LastStatus },

    #[error("couldn't patch {target}: kubectl exited with status code {status}")]
    PatchResource { target: String, status: LastStatus },

    #[error("could not annotate resource '{name}': kubectl exited with status code {status}")]
    AnnotateResource { name: String, status: LastStatus },

    #[error("couldn't get version info: kubectl exited with status code {status}")]
    GetVersion { status: LastStatus },

    /// Any other operation that exited non-zero.
    #[error("{message}: kubectl exited with status code {status}{}", detail_suffix(.detail))]
    Operation {
        message: String,
        status: LastStatus,
        /// Captured output worth surfacing, if any.
        detail: Option<String>,
    },

    /// kubectl exited 0 but its output was not the JSON we expected.
    #[error("{operation}: json parsing error: {source}")]
    Parse {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to execute '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {kind} '{name}' to YAML: {message}")]
    Serialize {
        kind: String,
        name: String,
        message: String,
    },

    /// Invalid configuration or user input.
    #[error("{0}")]
    Config(String),

    #[error("no kubectl command has completed in this session yet")]
    NoLastStatus,
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(text) if !text.trim().is_empty() => format!(". {}", text.trim()),
        _ => String::new(),
    }
}

impl KubernetesError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            KubernetesError::InvalidResource { .. } => ErrorKind::InvalidResource,
            KubernetesError::InvalidResourceUri { .. } => ErrorKind::InvalidResourceUri,
            KubernetesError::GetResource { .. } => ErrorKind::GetResource,
            KubernetesError::DeleteResource { .. } => ErrorKind::DeleteResource,
            KubernetesError::PatchResource { .. } => ErrorKind::PatchResource,
            KubernetesError::AnnotateResource { .. } => ErrorKind::AnnotateResource,
            KubernetesError::GetVersion { .. } => ErrorKind::GetVersion,
            KubernetesError::Operation { .. } => ErrorKind::Operation,
            KubernetesError::Parse { .. } => ErrorKind::Parse,
            KubernetesError::Spawn { .. } => ErrorKind::Spawn,
            KubernetesError::Io { .. } => ErrorKind::Io,
            KubernetesError::Serialize { .. } => ErrorKind::Serialize,
            KubernetesError::Config(_) => ErrorKind::Config,
            KubernetesError::NoLastStatus => ErrorKind::NoLastStatus,
        }
    }

    /// The kubectl exit status behind this error, when it came from one.
    pub fn status(&self) -> Option<LastStatus> {
        match self {
            KubernetesError::InvalidResource { status, .. }
            | KubernetesError::InvalidResourceUri { status, .. }
            | KubernetesError::GetResource { status, .. }
            | KubernetesError::DeleteResource { status, .. }
            | KubernetesError::PatchResource { status, .. }
            | KubernetesError::AnnotateResource { status, .. }
            | KubernetesError::GetVersion { status }
            | KubernetesError::Operation { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the appropriate process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Config | ErrorKind::NoLastStatus | ErrorKind::Serialize => {
                exit_codes::USER_ERROR
            }
            ErrorKind::Parse => exit_codes::PARSE_FAILURE,
            ErrorKind::Spawn | ErrorKind::Io => exit_codes::PROCESS_FAILURE,
            _ => exit_codes::KUBECTL_FAILURE,
        }
    }
}

/// Result type alias for kubectl operations.
pub type Result<T> = std::result::Result<T, KubernetesError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(code: i32) -> LastStatus {
        LastStatus::from_code(Some(code))
    }

    fn parse_error() -> KubernetesError {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        KubernetesError::Parse {
            operation: Operation::GetObject,
            source,
        }
    }

    #[test]
    fn exit_status_and_parse_failures_are_different_kinds() {
        let exited = KubernetesError::GetResource {
            target: "ConfigMap 'x'".to_string(),
            status: failed(1),
        };
        assert_eq!(exited.kind(), ErrorKind::GetResource);
        assert_eq!(parse_error().kind(), ErrorKind::Parse);
        assert_ne!(exited.exit_code(), parse_error().exit_code());
    }

    #[test]
    fn kubectl_failures_map_to_kubectl_exit_code() {
        let err = KubernetesError::DeleteResource {
            target: "resources of type 'Pod'".to_string(),
            status: failed(1),
        };
        assert_eq!(err.exit_code(), exit_codes::KUBECTL_FAILURE);
    }

    #[test]
    fn config_error_is_a_user_error() {
        let err = KubernetesError::Config("bad".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        assert_eq!(err.to_string(), "bad");
    }

    #[test]
    fn messages_embed_the_exit_code() {
        let err = KubernetesError::GetVersion { status: failed(7) };
        assert_eq!(
            err.to_string(),
            "couldn't get version info: kubectl exited with status code 7"
        );

        let err = KubernetesError::AnnotateResource {
            name: "test-config".to_string(),
            status: failed(1),
        };
        assert_eq!(
            err.to_string(),
            "could not annotate resource 'test-config': kubectl exited with status code 1"
        );
    }

    #[test]
    fn invalid_resource_message_names_kind_and_name() {
        let err = KubernetesError::InvalidResource {
            resource: ResourceRef {
                kind: "ConfigMap".to_string(),
                name: "test-config".to_string(),
                namespace: Some("test".to_string()),
            },
            manifest: String::new(),
            status: failed(1),
        };
        assert_eq!(
            err.to_string(),
            "could not apply ConfigMap 'test-config': kubectl exited with status code 1"
        );
    }

    #[test]
    fn operation_error_appends_detail_when_present() {
        let err = KubernetesError::Operation {
            message: "could not fetch API resources".to_string(),
            status: failed(1),
            detail: Some("error: connection refused\n".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "could not fetch API resources: kubectl exited with status code 1. error: connection refused"
        );

        let err = KubernetesError::Operation {
            message: "could not restart deployment".to_string(),
            status: failed(1),
            detail: None,
        };
        assert_eq!(
            err.to_string(),
            "could not restart deployment: kubectl exited with status code 1"
        );
    }

    #[test]
    fn status_is_exposed_for_exit_failures_only() {
        let err = KubernetesError::PatchResource {
            target: "x".to_string(),
            status: failed(5),
        };
        assert_eq!(err.status().and_then(|s| s.code()), Some(5));
        assert!(parse_error().status().is_none());
    }
}
