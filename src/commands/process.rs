//! Commands that hand the terminal to kubectl.
//!
//! `exec`, `logs` and `run` replace this process and only return on failure
//! to start kubectl. `system` waits and forwards the child's exit code.

use crate::cli::{ExecArgs, LogsArgs, RunArgs};
use kubernetes_cli::builder::ExecRequest;
use kubernetes_cli::exit_codes;
use kubernetes_cli::{Result, Session};

fn exec_request(args: ExecArgs) -> ExecRequest {
    let mut request = ExecRequest::new(args.namespace, args.pod, args.command).tty(!args.no_tty);
    if let Some(container) = args.container {
        request = request.container(container);
    }
    if let Some(path) = args.out_file {
        request = request.out_file(path);
    }
    request
}

pub fn cmd_exec(session: &mut Session<'_>, args: ExecArgs) -> Result<i32> {
    match session.exec_cmd(&exec_request(args))? {}
}

pub fn cmd_system(session: &mut Session<'_>, args: ExecArgs) -> Result<i32> {
    let status = session.system_cmd(&exec_request(args))?;
    Ok(status.code().unwrap_or(exit_codes::KUBECTL_FAILURE))
}

pub fn cmd_logs(session: &mut Session<'_>, args: LogsArgs) -> Result<i32> {
    let selector = super::to_labels(args.labels);
    match session.logtail(&args.namespace, &selector, !args.no_follow)? {}
}

pub fn cmd_run(session: &mut Session<'_>, args: RunArgs) -> Result<i32> {
    match session.run_cmd(args.args.as_slice())? {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_request_maps_flags() {
        let request = exec_request(ExecArgs {
            pod: "web-0".to_string(),
            namespace: "prod".to_string(),
            container: Some("app".to_string()),
            no_tty: true,
            out_file: Some("/tmp/dump.sql".to_string()),
            command: vec!["pg_dump".to_string()],
        });

        assert_eq!(request.namespace, "prod");
        assert!(!request.tty);
        assert_eq!(request.container.as_deref(), Some("app"));
        assert_eq!(request.out_file.as_deref(), Some("/tmp/dump.sql"));
        assert_eq!(request.command, vec!["pg_dump"]);
    }
}
