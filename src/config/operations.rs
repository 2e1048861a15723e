//! Config loading, validation, and client construction.

use super::model::Config;
use super::resolver::ExecutableResolver;
use crate::client::{KubernetesCli, KubernetesCliBuilder};
use crate::error::{KubernetesError, Result};
use std::path::{Path, PathBuf};

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(KubernetesError::Config)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            KubernetesError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| KubernetesError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            KubernetesError::Config(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `executable` and `kubeconfig`, when set, must be non-empty
    /// - `env` keys must be non-empty and must not contain `=`
    /// - `log_filter` must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.executable.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(KubernetesError::Config(
                "config validation failed: executable must not be empty".to_string(),
            ));
        }

        if self.kubeconfig.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(KubernetesError::Config(
                "config validation failed: kubeconfig must not be empty".to_string(),
            ));
        }

        for key in self.env.keys() {
            if key.is_empty() {
                return Err(KubernetesError::Config(
                    "config validation failed: env keys must be non-empty".to_string(),
                ));
            }
            if key.contains('=') {
                return Err(KubernetesError::Config(format!(
                    "config validation failed: env key '{}' must not contain '='",
                    key
                )));
            }
        }

        if self.log_filter.trim().is_empty() {
            return Err(KubernetesError::Config(
                "config validation failed: log_filter must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Layer explicit overrides (typically command-line flags) on top.
    pub fn with_overrides(mut self, executable: Option<String>, kubeconfig: Option<String>) -> Self {
        if executable.is_some() {
            self.executable = executable;
        }
        if kubeconfig.is_some() {
            self.kubeconfig = kubeconfig;
        }
        self
    }

    /// Kubeconfig path to use, falling back to the resolver.
    pub fn resolved_kubeconfig(&self, resolver: &dyn ExecutableResolver) -> PathBuf {
        self.kubeconfig
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| resolver.default_kubeconfig())
    }

    /// Executable to use, falling back to the resolver.
    pub fn resolved_executable(&self, resolver: &dyn ExecutableResolver) -> PathBuf {
        self.executable
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| resolver.executable())
    }

    /// A client builder with this config applied. Hooks can still be added.
    pub fn client_builder(&self, resolver: &dyn ExecutableResolver) -> KubernetesCliBuilder {
        KubernetesCli::builder(self.resolved_kubeconfig(resolver))
            .executable(self.resolved_executable(resolver))
            .envs(self.env.clone())
    }
}
