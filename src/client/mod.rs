//! The typed kubectl client.
//!
//! A [`KubernetesCli`] is built once (executable, kubeconfig, environment,
//! hooks) and shared freely. Work happens on a [`Session`], which is the
//! per-caller execution context: it owns the output sinks and the status of
//! the last command it ran.
//!
//! ```no_run
//! use kubernetes_cli::{KubernetesCli, Namespace, Labels};
//!
//! let cli = KubernetesCli::builder("/home/me/.kube/config").build();
//! let mut session = cli.session();
//! let mut selector = Labels::new();
//! selector.insert("app".to_string(), "web".to_string());
//! let pods = session.get_objects("Pod", &Namespace::from("default"), &selector)?;
//! println!("{} pods", pods.len());
//! # Ok::<(), kubernetes_cli::KubernetesError>(())
//! ```

mod session;


pub use session::{RedirectGuard, Session};

use crate::builder::CommandBuilder;
use crate::config::{DEFAULT_EXECUTABLE, ExecutableResolver};
use crate::engine::{Engine, LastStatus};
use crate::hooks::Hooks;
use crate::invocation::Invocation;
use std::collections::BTreeMap;
use std::path::Path;

/// Shared, immutable client configuration.
#[derive(Debug, Clone)]
pub struct KubernetesCli {
    builder: CommandBuilder,
    engine: Engine,
}

impl KubernetesCli {
    /// Start building a client for the given kubeconfig.
    pub fn builder(kubeconfig: impl AsRef<Path>) -> KubernetesCliBuilder {
        KubernetesCliBuilder::new(kubeconfig)
    }

    /// A client using the resolver's executable and default kubeconfig.
    pub fn from_resolver(resolver: &dyn ExecutableResolver) -> Self {
        Self::builder(resolver.default_kubeconfig())
            .executable(resolver.executable())
            .build()
    }

    /// Open a new execution context.
    pub fn session(&self) -> Session<'_> {
        Session::new(self)
    }

    pub fn executable(&self) -> &str {
        self.builder.executable()
    }

    pub fn kubeconfig_path(&self) -> &str {
        self.builder.kubeconfig()
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        self.builder.env()
    }

    pub fn commands(&self) -> &CommandBuilder {
        &self.builder
    }

    pub(crate) fn engine(&self) -> &Engine {
        &self.engine
    }
}

/// Construction-time settings for a [`KubernetesCli`].
pub struct KubernetesCliBuilder {
    kubeconfig: String,
    executable: Option<String>,
    env: BTreeMap<String, String>,
    hooks: Hooks,
}

impl KubernetesCliBuilder {
    fn new(kubeconfig: impl AsRef<Path>) -> Self {
        Self {
            kubeconfig: kubeconfig.as_ref().to_string_lossy().into_owned(),
            executable: None,
            env: BTreeMap::new(),
            hooks: Hooks::new(),
        }
    }

    /// Path to the kubectl-compatible binary. Defaults to `kubectl` on `PATH`.
    pub fn executable(mut self, executable: impl AsRef<Path>) -> Self {
        self.executable = Some(executable.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Set one environment variable for every invocation.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn envs(mut self, env: BTreeMap<String, String>) -> Self {
        self.env.extend(env);
        self
    }

    /// Called with every invocation before it is spawned.
    pub fn before_execute<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Invocation) + Send + Sync + 'static,
    {
        self.hooks = self.hooks.before(hook);
        self
    }

    /// Called with every synchronous invocation and its exit status.
    pub fn after_execute<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Invocation, &LastStatus) + Send + Sync + 'static,
    {
        self.hooks = self.hooks.after(hook);
        self
    }

    pub fn build(self) -> KubernetesCli {
        let executable = self
            .executable
            .unwrap_or_else(|| DEFAULT_EXECUTABLE.to_string());
        KubernetesCli {
            builder: CommandBuilder::new(executable, self.kubeconfig).with_env(self.env),
            engine: Engine::new(self.hooks),
        }
    }
}
