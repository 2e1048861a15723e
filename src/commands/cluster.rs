//! Cluster-level commands: version, context, API discovery, restarts.

use super::{print_json, print_text};
use crate::cli::RestartArgs;
use kubernetes_cli::exit_codes;
use kubernetes_cli::{Result, Session};

pub fn cmd_version(session: &mut Session<'_>) -> Result<i32> {
    let version = session.version()?;
    print_json(&version)
}

pub fn cmd_current_context(session: &mut Session<'_>) -> Result<i32> {
    let context = session.current_context()?;
    print_text(&context)
}

pub fn cmd_api_resources(session: &mut Session<'_>) -> Result<i32> {
    let table = session.api_resources()?;
    print_text(&table)
}

pub fn cmd_restart(session: &mut Session<'_>, args: RestartArgs) -> Result<i32> {
    session.restart_deployment(&args.namespace, &args.deployment)?;
    Ok(exit_codes::SUCCESS)
}
