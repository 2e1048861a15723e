//! Command implementations for kubecli.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every handler returns the process exit code on success;
//! errors carry their own via `KubernetesError::exit_code`.

mod cluster;
mod objects;
mod process;

use crate::cli::{Command, GlobalArgs};
use kubernetes_cli::builder::{Labels, Namespace};
use kubernetes_cli::config::{Config, PathResolver};
use kubernetes_cli::exit_codes;
use kubernetes_cli::{KubernetesCli, KubernetesError, Result};
use serde::Serialize;
use std::io::Write;
use tracing::debug;

/// Load the config file (if any) and layer command-line overrides on top.
pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    let config = match &global.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let config = config.with_overrides(global.executable.clone(), global.kubeconfig.clone());
    config.validate()?;
    Ok(config)
}

/// Dispatch a command to its implementation.
pub fn dispatch(config: &Config, command: Command) -> Result<i32> {
    let cli = config.client_builder(&PathResolver::from_env()).build();
    debug!(
        executable = cli.executable(),
        kubeconfig = cli.kubeconfig_path(),
        "client ready"
    );
    run(&cli, command)
}

fn run(cli: &KubernetesCli, command: Command) -> Result<i32> {
    let mut session = cli.session();
    let session = &mut session;

    match command {
        Command::Version => cluster::cmd_version(session),
        Command::Get(args) => objects::cmd_get(session, args),
        Command::List(args) => objects::cmd_list(session, args),
        Command::Delete(args) => objects::cmd_delete(session, args),
        Command::DeleteAll(args) => objects::cmd_delete_all(session, args),
        Command::Patch(args) => objects::cmd_patch(session, args),
        Command::Annotate(args) => objects::cmd_annotate(session, args),
        Command::Apply(args) => objects::cmd_apply(session, args),
        Command::ApplyUri(args) => objects::cmd_apply_uri(session, args),
        Command::Exec(args) => process::cmd_exec(session, args),
        Command::System(args) => process::cmd_system(session, args),
        Command::Logs(args) => process::cmd_logs(session, args),
        Command::Run(args) => process::cmd_run(session, args),
        Command::Restart(args) => cluster::cmd_restart(session, args),
        Command::CurrentContext => cluster::cmd_current_context(session),
        Command::ApiResources => cluster::cmd_api_resources(session),
    }
}

/// Pretty-print a JSON value to stdout.
fn print_json<T: Serialize>(value: &T) -> Result<i32> {
    let text = serde_json::to_string_pretty(value).map_err(|e| KubernetesError::Io {
        context: "failed to render JSON".to_string(),
        source: e.into(),
    })?;
    print_text(&text)
}

fn print_text(text: &str) -> Result<i32> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", text.trim_end()).map_err(|e| KubernetesError::Io {
        context: "failed to write to stdout".to_string(),
        source: e,
    })?;
    Ok(exit_codes::SUCCESS)
}

fn to_labels(pairs: Vec<(String, String)>) -> Labels {
    pairs.into_iter().collect()
}

fn to_namespace(namespace: Option<String>, all_namespaces: bool) -> Namespace {
    if all_namespaces {
        Namespace::All
    } else {
        Namespace::from(namespace.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_namespaces_wins_over_missing_namespace() {
        assert_eq!(to_namespace(None, true), Namespace::All);
        assert_eq!(to_namespace(None, false), Namespace::Default);
        assert_eq!(
            to_namespace(Some("web".to_string()), false),
            Namespace::Named("web".to_string())
        );
    }

    #[test]
    fn labels_keep_command_line_order() {
        let labels = to_labels(vec![
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
        ]);
        let keys: Vec<_> = labels.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn command_line_overrides_config_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("kubecli.yaml");
        std::fs::write(&path, "executable: /a/kubectl\nkubeconfig: /a/kc\n").unwrap();

        let global = GlobalArgs {
            config: Some(path),
            kubeconfig: Some("/b/kc".to_string()),
            executable: None,
        };
        let config = load_config(&global).unwrap();
        assert_eq!(config.executable.as_deref(), Some("/a/kubectl"));
        assert_eq!(config.kubeconfig.as_deref(), Some("/b/kc"));
    }

    #[test]
    fn empty_override_fails_validation() {
        let global = GlobalArgs {
            executable: Some(String::new()),
            ..GlobalArgs::default()
        };
        let err = load_config(&global).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }
}
