//! Per-caller execution context and the kubectl operations.

use super::KubernetesCli;
use crate::builder::{ExecRequest, Labels, Namespace, PatchType};
use crate::engine::{ExecContext, LastStatus};
use crate::error::{KubernetesError, Operation, Result};
use crate::invocation::Invocation;
use crate::resource::Resource;
use crate::sink::{Sink, Sinks};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::convert::Infallible;
use std::ops::{Deref, DerefMut};
use tracing::debug;

/// One caller's view of a [`KubernetesCli`].
///
/// Sessions are cheap. Give each thread its own; the sinks and last status
/// of one session are never visible to another.
#[derive(Debug)]
pub struct Session<'a> {
    cli: &'a KubernetesCli,
    ctx: ExecContext,
}

#[derive(Deserialize)]
struct ObjectList {
    items: Vec<Value>,
}

impl<'a> Session<'a> {
    pub(super) fn new(cli: &'a KubernetesCli) -> Self {
        Self {
            cli,
            ctx: ExecContext::new(),
        }
    }

    pub fn cli(&self) -> &'a KubernetesCli {
        self.cli
    }

    /// Exit status of the last command this session ran.
    ///
    /// Fails with `NoLastStatus` if nothing has run yet.
    pub fn last_status(&self) -> Result<LastStatus> {
        self.ctx.last_status().ok_or(KubernetesError::NoLastStatus)
    }

    /// Current stdout sink.
    pub fn stdout(&self) -> &Sink {
        &self.ctx.sinks().stdout
    }

    /// Current stderr sink.
    pub fn stderr(&self) -> &Sink {
        &self.ctx.sinks().stderr
    }

    /// Install new sinks until the returned guard is dropped.
    pub fn redirect(&mut self, stdout: Sink, stderr: Sink) -> RedirectGuard<'_, 'a> {
        let previous = self.ctx.replace_sinks(Sinks::new(stdout, stderr));
        RedirectGuard {
            session: self,
            previous: Some(previous),
        }
    }

    /// Run `body` with output redirected, restoring the previous sinks
    /// afterwards whether `body` succeeds, fails, or panics.
    pub fn with_redirected_output<R>(
        &mut self,
        stdout: Sink,
        stderr: Sink,
        body: impl FnOnce(&mut Session<'a>) -> R,
    ) -> R {
        let mut guard = self.redirect(stdout, stderr);
        body(&mut *guard)
    }

    /// `kubectl version -o json`
    pub fn version(&mut self) -> Result<Value> {
        let inv = self.cli.commands().version();
        let output = self.capture(&inv)?;
        self.on_failure(|status| KubernetesError::GetVersion { status })?;
        decode(Operation::Version, &output)
    }

    /// Replace this process with `kubectl --kubeconfig <path> <args...>`.
    pub fn run_cmd<S: AsRef<str>>(&mut self, args: &[S]) -> Result<Infallible> {
        let inv = self.cli.commands().raw(args);
        self.cli.engine().replace(&inv)
    }

    /// Replace this process with `kubectl exec`.
    pub fn exec_cmd(&mut self, request: &ExecRequest) -> Result<Infallible> {
        let inv = self.cli.commands().exec(request);
        self.cli.engine().replace(&inv)
    }

    /// Run `kubectl exec` to completion, relaying its output.
    ///
    /// A non-zero exit is not an error here; inspect the returned status.
    pub fn system_cmd(&mut self, request: &ExecRequest) -> Result<LastStatus> {
        let inv = self.cli.commands().exec(request);
        self.run(&inv)
    }

    /// Pipe `resource` as YAML into `kubectl apply -f -`.
    pub fn apply(&mut self, resource: &dyn Resource, dry_run: bool) -> Result<()> {
        let manifest = resource.to_yaml()?;
        let inv = self.cli.commands().apply(dry_run);
        self.cli
            .engine()
            .run_with_input(&inv, &mut self.ctx, |stdin| {
                stdin.write_all(manifest.as_bytes())?;
                if !manifest.ends_with('\n') {
                    stdin.write_all(b"\n")?;
                }
                Ok(())
            })?;

        self.on_failure(|status| KubernetesError::InvalidResource {
            resource: resource.to_ref(),
            manifest,
            status,
        })
    }

    /// `kubectl apply -f <uri>` for a local path or URL.
    pub fn apply_uri(&mut self, uri: &str, dry_run: bool) -> Result<()> {
        let inv = self.cli.commands().apply_uri(uri, dry_run);
        self.run(&inv)?;
        self.on_failure(|status| KubernetesError::InvalidResourceUri {
            uri: uri.to_string(),
            status,
        })
    }

    /// Fetch one object as JSON.
    pub fn get_object(&mut self, kind: &str, namespace: &str, name: &str) -> Result<Value> {
        let inv = self.cli.commands().get(kind, namespace, name);
        let output = self.capture(&inv)?;
        self.on_failure(|status| KubernetesError::GetResource {
            target: describe_one(kind, namespace, name),
            status,
        })?;
        decode(Operation::GetObject, &output)
    }

    /// Fetch every object of `kind` matching `labels`, in kubectl's order.
    pub fn get_objects(
        &mut self,
        kind: &str,
        namespace: &Namespace,
        labels: &Labels,
    ) -> Result<Vec<Value>> {
        let inv = self.cli.commands().get_many(kind, namespace, labels);
        let output = self.capture(&inv)?;
        self.on_failure(|status| KubernetesError::GetResource {
            target: describe_many(kind, namespace),
            status,
        })?;
        let list: ObjectList = decode(Operation::GetObjects, &output)?;
        Ok(list.items)
    }

    pub fn delete_object(&mut self, kind: &str, namespace: &str, name: &str) -> Result<()> {
        let inv = self.cli.commands().delete(kind, namespace, name);
        self.run(&inv)?;
        self.on_failure(|status| KubernetesError::DeleteResource {
            target: describe_one(kind, namespace, name),
            status,
        })
    }

    pub fn delete_objects(
        &mut self,
        kind: &str,
        namespace: &Namespace,
        labels: &Labels,
    ) -> Result<()> {
        let inv = self.cli.commands().delete_many(kind, namespace, labels);
        self.run(&inv)?;
        self.on_failure(|status| KubernetesError::DeleteResource {
            target: describe_many(kind, namespace),
            status,
        })
    }

    pub fn patch_object(
        &mut self,
        kind: &str,
        namespace: &str,
        name: &str,
        patch: &str,
        patch_type: PatchType,
    ) -> Result<()> {
        let inv = self
            .cli
            .commands()
            .patch(kind, namespace, name, patch, patch_type);
        self.run(&inv)?;
        self.on_failure(|status| KubernetesError::PatchResource {
            target: describe_one(kind, namespace, name),
            status,
        })
    }

    /// Set annotations. With `overwrite` off, kubectl refuses to change an
    /// existing key and this returns `AnnotateResource`.
    pub fn annotate(
        &mut self,
        kind: &str,
        namespace: &str,
        name: &str,
        annotations: &Labels,
        overwrite: bool,
    ) -> Result<()> {
        let inv = self
            .cli
            .commands()
            .annotate(kind, namespace, name, annotations, overwrite);
        self.run(&inv)?;
        self.on_failure(|status| KubernetesError::AnnotateResource {
            name: name.to_string(),
            status,
        })
    }

    /// Replace this process with `kubectl logs` for pods matching `selector`.
    pub fn logtail(
        &mut self,
        namespace: &str,
        selector: &Labels,
        follow: bool,
    ) -> Result<Infallible> {
        let inv = self.cli.commands().logs(namespace, selector, follow);
        self.cli.engine().replace(&inv)
    }

    /// Name of the kubeconfig's current context.
    pub fn current_context(&mut self) -> Result<String> {
        let inv = self.cli.commands().current_context();
        let output = self.capture_text(&inv)?;
        self.on_failure(|status| KubernetesError::Operation {
            message: "could not get current context".to_string(),
            status,
            detail: None,
        })?;
        Ok(output.trim().to_string())
    }

    /// Raw `kubectl api-resources` table.
    pub fn api_resources(&mut self) -> Result<String> {
        let inv = self.cli.commands().api_resources();
        let output = self.capture_text(&inv)?;
        self.on_failure(|status| KubernetesError::Operation {
            message: "could not fetch API resources".to_string(),
            status,
            detail: Some(output.clone()),
        })?;
        Ok(output)
    }

    /// `kubectl rollout restart deployment <name>`
    pub fn restart_deployment(&mut self, namespace: &str, deployment: &str) -> Result<()> {
        let inv = self.cli.commands().restart_deployment(namespace, deployment);
        self.run(&inv)?;
        self.on_failure(|status| KubernetesError::Operation {
            message: format!("could not restart deployment '{}'", deployment),
            status,
            detail: None,
        })
    }

    fn run(&mut self, inv: &Invocation) -> Result<LastStatus> {
        self.cli.engine().run(inv, &mut self.ctx)
    }

    fn capture(&mut self, inv: &Invocation) -> Result<Vec<u8>> {
        let outcome = self.cli.engine().capture(inv, &mut self.ctx)?;
        Ok(outcome.stdout.unwrap_or_default())
    }

    /// Captured stdout for human-readable output.
    fn capture_text(&mut self, inv: &Invocation) -> Result<String> {
        let output = self.capture(inv)?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    /// Turn a failed last status into the caller's error.
    fn on_failure(&self, error: impl FnOnce(LastStatus) -> KubernetesError) -> Result<()> {
        let status = self.last_status()?;
        if status.success() {
            Ok(())
        } else {
            Err(error(status))
        }
    }
}

/// Decode raw stdout. Bytes that are not UTF-8 fail like any other bad JSON.
fn decode<T: DeserializeOwned>(operation: Operation, output: &[u8]) -> Result<T> {
    serde_json::from_slice(output).map_err(|source| {
        debug!(%operation, error = %source, "kubectl output is not valid JSON");
        KubernetesError::Parse { operation, source }
    })
}

fn describe_one(kind: &str, namespace: &str, name: &str) -> String {
    format!(
        "resource of type '{}' named '{}' in {}",
        kind,
        name,
        Namespace::from(namespace)
    )
}

fn describe_many(kind: &str, namespace: &Namespace) -> String {
    format!("resources of type '{}' in {}", kind, namespace)
}

/// Restores a session's previous sinks when dropped.
pub struct RedirectGuard<'s, 'a> {
    session: &'s mut Session<'a>,
    previous: Option<Sinks>,
}

impl<'a> Deref for RedirectGuard<'_, 'a> {
    type Target = Session<'a>;

    fn deref(&self) -> &Self::Target {
        &*self.session
    }
}

impl<'a> DerefMut for RedirectGuard<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.session
    }
}

impl Drop for RedirectGuard<'_, '_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.session.ctx.replace_sinks(previous);
        }
    }
}
