//! Discovery of the kubectl binary and the default kubeconfig.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Executable name looked up on `PATH` when nothing else is configured.
pub const DEFAULT_EXECUTABLE: &str = "kubectl";

/// Supplies the executable path and default kubeconfig for a client.
///
/// Swap in a custom resolver to pin a specific binary or to isolate tests
/// from the host environment.
pub trait ExecutableResolver {
    fn executable(&self) -> PathBuf;
    fn default_kubeconfig(&self) -> PathBuf;
}

/// Resolves `kubectl` from `PATH` and the kubeconfig from the environment.
///
/// The kubeconfig is the first entry of `$KUBECONFIG` if set, otherwise
/// `$HOME/.kube/config`.
#[derive(Debug, Clone)]
pub struct PathResolver {
    kubeconfig_env: Option<OsString>,
    home: Option<PathBuf>,
}

impl PathResolver {
    /// A resolver reading `KUBECONFIG` and `HOME` from the process environment.
    pub fn from_env() -> Self {
        Self {
            kubeconfig_env: env::var_os("KUBECONFIG"),
            home: env::var_os("HOME")
                .or_else(|| env::var_os("USERPROFILE"))
                .map(PathBuf::from),
        }
    }

    /// A resolver with explicit values, independent of the environment.
    pub fn with_values(kubeconfig_env: Option<OsString>, home: Option<PathBuf>) -> Self {
        Self {
            kubeconfig_env,
            home,
        }
    }
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ExecutableResolver for PathResolver {
    fn executable(&self) -> PathBuf {
        PathBuf::from(DEFAULT_EXECUTABLE)
    }

    fn default_kubeconfig(&self) -> PathBuf {
        if let Some(first) = self
            .kubeconfig_env
            .as_ref()
            .and_then(|value| env::split_paths(value).find(|p| !p.as_os_str().is_empty()))
        {
            return first;
        }

        self.home
            .clone()
            .unwrap_or_default()
            .join(".kube")
            .join("config")
    }
}
