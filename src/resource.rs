//! The resource-definition collaborator.
//!
//! `apply` only needs a resource to report its identity and serialize itself
//! to a YAML document; full resource modeling lives elsewhere. [`Manifest`]
//! is a generic implementation over an arbitrary YAML document.

use crate::error::{KubernetesError, Result};
use serde_yaml::Value;
use std::fmt;
use std::path::Path;

/// Something that can be piped into `kubectl apply -f -`.
pub trait Resource {
    /// The resource kind, e.g. `ConfigMap`.
    fn kind(&self) -> &str;

    /// `metadata.name`.
    fn name(&self) -> &str;

    /// `metadata.namespace`, if set.
    fn namespace(&self) -> Option<&str>;

    /// Serialize to a single YAML document.
    fn to_yaml(&self) -> Result<String>;

    /// Owned identity for error reporting.
    fn to_ref(&self) -> ResourceRef {
        ResourceRef {
            kind: self.kind().to_string(),
            name: self.name().to_string(),
            namespace: self.namespace().map(str::to_string),
        }
    }
}

/// Identity of a resource, detached from the resource itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: String,
    pub name: String,
    pub namespace: Option<String>,
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{} '{}' in namespace {}", self.kind, self.name, ns),
            None => write!(f, "{} '{}'", self.kind, self.name),
        }
    }
}

/// A resource backed by a parsed YAML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    document: Value,
    kind: String,
    name: String,
    namespace: Option<String>,
}

impl Manifest {
    /// Wrap a parsed document. `kind` and `metadata.name` are required.
    pub fn new(document: Value) -> Result<Self> {
        let kind = document
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| KubernetesError::Config("manifest is missing 'kind'".to_string()))?
            .to_string();

        let metadata = document.get("metadata");
        let name = metadata
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                KubernetesError::Config(format!("{} manifest is missing 'metadata.name'", kind))
            })?
            .to_string();
        let namespace = metadata
            .and_then(|m| m.get("namespace"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            document,
            kind,
            name,
            namespace,
        })
    }

    /// Parse a manifest from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(yaml)
            .map_err(|e| KubernetesError::Config(format!("failed to parse manifest YAML: {}", e)))?;
        Self::new(document)
    }

    /// Load a manifest from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            KubernetesError::Config(format!(
                "failed to read manifest '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    pub fn document(&self) -> &Value {
        &self.document
    }
}

impl Resource for Manifest {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.document).map_err(|e| KubernetesError::Serialize {
            kind: self.kind.clone(),
            name: self.name.clone(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const CONFIG_MAP: &str = r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: test-config
  namespace: test
data:
  key: value
"#;

    #[test]
    fn manifest_reads_identity() {
        let manifest = Manifest::from_yaml(CONFIG_MAP).unwrap();
        assert_eq!(manifest.kind(), "ConfigMap");
        assert_eq!(manifest.name(), "test-config");
        assert_eq!(manifest.namespace(), Some("test"));
    }

    #[test]
    fn manifest_without_namespace() {
        let manifest =
            Manifest::from_yaml("kind: Namespace\nmetadata:\n  name: test\n").unwrap();
        assert_eq!(manifest.namespace(), None);
        assert_eq!(manifest.to_ref().to_string(), "Namespace 'test'");
    }

    #[test]
    fn manifest_requires_kind_and_name() {
        let err = Manifest::from_yaml("metadata:\n  name: x\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("'kind'"));

        let err = Manifest::from_yaml("kind: ConfigMap\n").unwrap_err();
        assert!(err.to_string().contains("metadata.name"));
    }

    #[test]
    fn to_yaml_preserves_data() {
        let manifest = Manifest::from_yaml(CONFIG_MAP).unwrap();
        let yaml = manifest.to_yaml().unwrap();
        let reparsed = Manifest::from_yaml(&yaml).unwrap();
        assert_eq!(reparsed, manifest);
        assert!(yaml.contains("key: value"));
    }

    #[test]
    fn ref_display_includes_namespace() {
        let manifest = Manifest::from_yaml(CONFIG_MAP).unwrap();
        assert_eq!(
            manifest.to_ref().to_string(),
            "ConfigMap 'test-config' in namespace test"
        );
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Manifest::load(dir.path().join("missing.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read manifest"));
    }
}
