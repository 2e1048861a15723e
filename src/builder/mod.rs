//! Argument assembly for every kubectl operation.
//!
//! Each method returns an [`Invocation`] that starts with
//! `<executable> --kubeconfig <path>`, followed by the operation's flags.

mod types;


pub use types::{ExecRequest, Labels, Namespace, PatchType};

use crate::invocation::{Invocation, Token};
use std::collections::BTreeMap;

/// Builds invocations against one executable and one kubeconfig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuilder {
    executable: String,
    kubeconfig: String,
    env: BTreeMap<String, String>,
}

impl CommandBuilder {
    pub fn new(executable: impl Into<String>, kubeconfig: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            kubeconfig: kubeconfig.into(),
            env: BTreeMap::new(),
        }
    }

    /// Environment overrides attached to every invocation.
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn kubeconfig(&self) -> &str {
        &self.kubeconfig
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    fn base(&self) -> Vec<Token> {
        words(&[&self.executable, "--kubeconfig", &self.kubeconfig]).collect()
    }

    fn finish(&self, tokens: Vec<Token>) -> Invocation {
        Invocation::new(tokens, self.env.clone())
    }

    /// `version -o json`
    pub fn version(&self) -> Invocation {
        let mut cmd = self.base();
        cmd.extend(words(&["version", "-o", "json"]));
        self.finish(cmd)
    }

    /// Arbitrary arguments after the kubeconfig prefix.
    pub fn raw<S: AsRef<str>>(&self, args: &[S]) -> Invocation {
        let mut cmd = self.base();
        cmd.extend(args.iter().map(|a| Token::from(a.as_ref())));
        self.finish(cmd)
    }

    /// `[-n ns] get <type> <name> -o json`
    pub fn get(&self, kind: &str, namespace: &str, name: &str) -> Invocation {
        let mut cmd = self.base();
        push_namespace(&mut cmd, &Namespace::from(namespace));
        cmd.extend(words(&["get", kind, name]));
        cmd.extend(words(&["-o", "json"]));
        self.finish(cmd)
    }

    /// `[--all-namespaces | -n ns] get <type> [--selector ...] -o json`
    pub fn get_many(&self, kind: &str, namespace: &Namespace, labels: &Labels) -> Invocation {
        let mut cmd = self.base();
        push_namespace(&mut cmd, namespace);
        cmd.extend(words(&["get", kind]));
        push_selector(&mut cmd, labels);
        cmd.extend(words(&["-o", "json"]));
        self.finish(cmd)
    }

    /// `[-n ns] delete <type> <name>`
    pub fn delete(&self, kind: &str, namespace: &str, name: &str) -> Invocation {
        let mut cmd = self.base();
        push_namespace(&mut cmd, &Namespace::from(namespace));
        cmd.extend(words(&["delete", kind, name]));
        self.finish(cmd)
    }

    /// `[--all-namespaces | -n ns] delete <type> [--selector ...]`
    pub fn delete_many(&self, kind: &str, namespace: &Namespace, labels: &Labels) -> Invocation {
        let mut cmd = self.base();
        push_namespace(&mut cmd, namespace);
        cmd.extend(words(&["delete", kind]));
        push_selector(&mut cmd, labels);
        self.finish(cmd)
    }

    /// `[-n ns] patch <type> <name> -p <data> --type <patch_type>`
    pub fn patch(
        &self,
        kind: &str,
        namespace: &str,
        name: &str,
        data: &str,
        patch_type: PatchType,
    ) -> Invocation {
        let mut cmd = self.base();
        push_namespace(&mut cmd, &Namespace::from(namespace));
        cmd.extend(words(&["patch", kind, name]));
        cmd.extend([Token::from("-p"), Token::Escaped(data.to_string())]);
        cmd.extend(words(&["--type", patch_type.as_str()]));
        self.finish(cmd)
    }

    /// `[-n ns] annotate [--overwrite] <type> <name> 'k'='v'...`
    pub fn annotate(
        &self,
        kind: &str,
        namespace: &str,
        name: &str,
        annotations: &Labels,
        overwrite: bool,
    ) -> Invocation {
        let mut cmd = self.base();
        push_namespace(&mut cmd, &Namespace::from(namespace));
        cmd.push("annotate".into());
        if overwrite {
            cmd.push("--overwrite".into());
        }
        cmd.extend(words(&[kind, name]));
        cmd.extend(annotations.iter().map(|(key, value)| Token::Annotation {
            key: key.clone(),
            value: value.clone(),
        }));
        self.finish(cmd)
    }

    /// `apply --validate [--dry-run=client] -f -`, manifest on stdin.
    pub fn apply(&self, dry_run: bool) -> Invocation {
        self.apply_source("-", dry_run)
    }

    /// `apply --validate [--dry-run=client] -f <uri>`
    pub fn apply_uri(&self, uri: &str, dry_run: bool) -> Invocation {
        self.apply_source(uri, dry_run)
    }

    fn apply_source(&self, source: &str, dry_run: bool) -> Invocation {
        let mut cmd = self.base();
        cmd.extend(words(&["apply", "--validate"]));
        if dry_run {
            cmd.push("--dry-run=client".into());
        }
        cmd.extend(words(&["-f", source]));
        self.finish(cmd)
    }

    /// `[-n ns] exec [-it] [-c container] <pod> -- <cmd...> [> out_file]`
    pub fn exec(&self, request: &ExecRequest) -> Invocation {
        let mut cmd = self.base();
        push_namespace(&mut cmd, &Namespace::from(request.namespace.as_str()));
        cmd.push("exec".into());
        if request.tty {
            cmd.push("-it".into());
        }
        if let Some(container) = &request.container {
            cmd.extend(words(&["-c", container]));
        }
        cmd.extend(words(&[&request.pod, "--"]));
        cmd.extend(request.command.iter().map(|a| Token::from(a.as_str())));
        if let Some(out_file) = &request.out_file {
            cmd.extend([Token::from(">"), Token::Escaped(out_file.clone())]);
        }
        self.finish(cmd)
    }

    /// `[-n ns] logs [-f] --selector k=v,...`
    pub fn logs(&self, namespace: &str, selector: &Labels, follow: bool) -> Invocation {
        let mut cmd = self.base();
        push_namespace(&mut cmd, &Namespace::from(namespace));
        cmd.push("logs".into());
        if follow {
            cmd.push("-f".into());
        }
        cmd.extend([Token::from("--selector"), Token::Literal(selector_string(selector))]);
        self.finish(cmd)
    }

    /// `[-n ns] rollout restart deployment <name>`
    pub fn restart_deployment(&self, namespace: &str, deployment: &str) -> Invocation {
        let mut cmd = self.base();
        push_namespace(&mut cmd, &Namespace::from(namespace));
        cmd.extend(words(&["rollout", "restart", "deployment", deployment]));
        self.finish(cmd)
    }

    /// `config current-context`
    pub fn current_context(&self) -> Invocation {
        let mut cmd = self.base();
        cmd.extend(words(&["config", "current-context"]));
        self.finish(cmd)
    }

    /// `api-resources`
    pub fn api_resources(&self) -> Invocation {
        let mut cmd = self.base();
        cmd.push("api-resources".into());
        self.finish(cmd)
    }
}

fn words<'a>(args: &'a [&'a str]) -> impl Iterator<Item = Token> + 'a {
    args.iter().map(|a| Token::from(*a))
}

fn push_namespace(cmd: &mut Vec<Token>, namespace: &Namespace) {
    match namespace {
        Namespace::All => cmd.push("--all-namespaces".into()),
        Namespace::Named(ns) => cmd.extend(words(&["-n", ns])),
        Namespace::Default => {}
    }
}

fn push_selector(cmd: &mut Vec<Token>, labels: &Labels) {
    if !labels.is_empty() {
        cmd.extend([Token::from("--selector"), Token::Literal(selector_string(labels))]);
    }
}

/// `k1=v1,k2=v2` in insertion order.
pub fn selector_string(labels: &Labels) -> String {
    labels
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(",")
}
