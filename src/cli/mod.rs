//! CLI argument parsing for kubecli.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use kubernetes_cli::builder::PatchType;
use std::path::PathBuf;

/// kubecli: typed front-end over the kubectl binary.
///
/// Every subcommand runs `kubectl --kubeconfig <path> ...` and reports
/// failures with a dedicated exit code:
/// 1 usage/config, 2 kubectl failure, 3 unparseable output, 4 process error.
#[derive(Parser, Debug)]
#[command(name = "kubecli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// YAML config file (executable, kubeconfig, env, log_filter).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Kubeconfig to pass to kubectl. Overrides the config file.
    #[arg(long, global = true)]
    pub kubeconfig: Option<String>,

    /// kubectl-compatible binary. Overrides the config file.
    #[arg(long, global = true)]
    pub executable: Option<String>,
}

/// Available commands for kubecli.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print client and server version info as JSON.
    Version,

    /// Print one object as JSON.
    Get(GetArgs),

    /// Print every matching object as a JSON array.
    List(SelectArgs),

    /// Delete one object.
    Delete(GetArgs),

    /// Delete every matching object.
    DeleteAll(SelectArgs),

    /// Patch one object.
    Patch(PatchArgs),

    /// Set annotations on one object.
    Annotate(AnnotateArgs),

    /// Apply a manifest file by piping it to `kubectl apply -f -`.
    Apply(ApplyArgs),

    /// Apply a local path or URL with `kubectl apply -f <uri>`.
    ApplyUri(ApplyUriArgs),

    /// Replace this process with `kubectl exec` (interactive).
    Exec(ExecArgs),

    /// Run `kubectl exec` to completion and exit with its status.
    System(ExecArgs),

    /// Replace this process with `kubectl logs` for matching pods.
    Logs(LogsArgs),

    /// Restart a deployment with `kubectl rollout restart`.
    Restart(RestartArgs),

    /// Print the kubeconfig's current context.
    CurrentContext,

    /// Print the `kubectl api-resources` table.
    ApiResources,

    /// Replace this process with kubectl and arbitrary arguments.
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Resource type, e.g. `ConfigMap`.
    pub kind: String,

    pub name: String,

    #[arg(short, long, default_value = "")]
    pub namespace: String,
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    pub kind: String,

    #[arg(short, long, conflicts_with = "all_namespaces")]
    pub namespace: Option<String>,

    /// Select across every namespace.
    #[arg(short = 'A', long)]
    pub all_namespaces: bool,

    /// Label selector entry; repeat for more.
    #[arg(short, long = "label", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub labels: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct PatchArgs {
    pub kind: String,

    pub name: String,

    /// Patch document.
    pub patch: String,

    #[arg(short, long, default_value = "")]
    pub namespace: String,

    /// Patch strategy: json, merge or strategic.
    #[arg(long = "type", default_value = "merge", value_parser = parse_patch_type)]
    pub patch_type: PatchType,
}

#[derive(Args, Debug)]
pub struct AnnotateArgs {
    pub kind: String,

    pub name: String,

    /// Annotations to set.
    #[arg(required = true, value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub annotations: Vec<(String, String)>,

    #[arg(short, long, default_value = "")]
    pub namespace: String,

    /// Refuse to change annotations that already have a value.
    #[arg(long)]
    pub no_overwrite: bool,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Manifest file with a single YAML document.
    pub file: PathBuf,

    /// Validate on the client without persisting.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ApplyUriArgs {
    pub uri: String,

    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ExecArgs {
    pub pod: String,

    #[arg(short, long, default_value = "")]
    pub namespace: String,

    #[arg(short, long)]
    pub container: Option<String>,

    /// Do not allocate a terminal (omit `-it`).
    #[arg(long)]
    pub no_tty: bool,

    /// Redirect the command's stdout to a local file.
    #[arg(long, value_name = "PATH")]
    pub out_file: Option<String>,

    /// Command to run in the pod.
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

#[derive(Args, Debug)]
pub struct LogsArgs {
    #[arg(short, long, default_value = "")]
    pub namespace: String,

    #[arg(short, long = "label", required = true, value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub labels: Vec<(String, String)>,

    /// Print what is there and exit instead of following.
    #[arg(long)]
    pub no_follow: bool,
}

#[derive(Args, Debug)]
pub struct RestartArgs {
    pub deployment: String,

    #[arg(short, long, default_value = "")]
    pub namespace: String,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Arguments passed to kubectl after `--kubeconfig <path>`.
    #[arg(last = true, required = true)]
    pub args: Vec<String>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

fn parse_patch_type(s: &str) -> Result<PatchType, String> {
    PatchType::from_str(s)
        .ok_or_else(|| format!("unknown patch type '{}' (expected json, merge or strategic)", s))
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_version() {
        let cli = Cli::try_parse_from(["kubecli", "version"]).unwrap();
        assert!(matches!(cli.command, Command::Version));
        assert!(cli.global.kubeconfig.is_none());
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "kubecli",
            "current-context",
            "--kubeconfig",
            "/tmp/kc",
            "--executable",
            "/opt/kubectl",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::CurrentContext));
        assert_eq!(cli.global.kubeconfig.as_deref(), Some("/tmp/kc"));
        assert_eq!(cli.global.executable.as_deref(), Some("/opt/kubectl"));
    }

    #[test]
    fn parse_list_with_labels() {
        let cli = Cli::try_parse_from([
            "kubecli", "list", "Pod", "-n", "web", "--label", "app=web", "-l", "tier=front",
        ])
        .unwrap();
        if let Command::List(args) = cli.command {
            assert_eq!(args.kind, "Pod");
            assert_eq!(args.namespace.as_deref(), Some("web"));
            assert_eq!(
                args.labels,
                vec![
                    ("app".to_string(), "web".to_string()),
                    ("tier".to_string(), "front".to_string())
                ]
            );
        } else {
            panic!("Expected List command");
        }
    }

    #[test]
    fn list_namespace_conflicts_with_all_namespaces() {
        let result = Cli::try_parse_from(["kubecli", "list", "Pod", "-n", "web", "-A"]);
        assert!(result.is_err());
    }

    #[test]
    fn label_without_equals_is_rejected() {
        let result = Cli::try_parse_from(["kubecli", "list", "Pod", "--label", "app"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_patch_defaults_to_merge() {
        let cli =
            Cli::try_parse_from(["kubecli", "patch", "Deployment", "web", r#"{"spec":{}}"#])
                .unwrap();
        if let Command::Patch(args) = cli.command {
            assert_eq!(args.patch_type, PatchType::Merge);
            assert_eq!(args.namespace, "");
        } else {
            panic!("Expected Patch command");
        }
    }

    #[test]
    fn parse_patch_type_json() {
        let cli = Cli::try_parse_from([
            "kubecli", "patch", "Deployment", "web", "[]", "--type", "json",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Patch(PatchArgs {
                patch_type: PatchType::Json,
                ..
            })
        ));
        assert!(Cli::try_parse_from(["kubecli", "patch", "D", "w", "[]", "--type", "bogus"]).is_err());
    }

    #[test]
    fn parse_exec_trailing_command() {
        let cli = Cli::try_parse_from([
            "kubecli", "exec", "web-0", "-n", "prod", "--no-tty", "--", "ls", "-la",
        ])
        .unwrap();
        if let Command::Exec(args) = cli.command {
            assert_eq!(args.pod, "web-0");
            assert_eq!(args.namespace, "prod");
            assert!(args.no_tty);
            assert_eq!(args.command, vec!["ls", "-la"]);
        } else {
            panic!("Expected Exec command");
        }
    }

    #[test]
    fn parse_annotate() {
        let cli = Cli::try_parse_from([
            "kubecli",
            "annotate",
            "ConfigMap",
            "test-config",
            "foo=bar",
        ])
        .unwrap();
        if let Command::Annotate(args) = cli.command {
            // Overwriting is the default; only --no-overwrite turns it off.
            assert!(!args.no_overwrite);
            assert_eq!(args.annotations, vec![("foo".to_string(), "bar".to_string())]);
        } else {
            panic!("Expected Annotate command");
        }
    }

    #[test]
    fn parse_annotate_no_overwrite() {
        let cli = Cli::try_parse_from([
            "kubecli",
            "annotate",
            "ConfigMap",
            "test-config",
            "foo=baz",
            "--no-overwrite",
        ])
        .unwrap();
        if let Command::Annotate(args) = cli.command {
            assert!(args.no_overwrite);
        } else {
            panic!("Expected Annotate command");
        }
        let old_flag = ["kubecli", "annotate", "D", "w", "a=b", "--overwrite"];
        assert!(Cli::try_parse_from(old_flag).is_err());
    }

    #[test]
    fn parse_run_passthrough() {
        let cli = Cli::try_parse_from(["kubecli", "run", "--", "get", "pods", "-w"]).unwrap();
        if let Command::Run(args) = cli.command {
            assert_eq!(args.args, vec!["get", "pods", "-w"]);
        } else {
            panic!("Expected Run command");
        }
    }
}
