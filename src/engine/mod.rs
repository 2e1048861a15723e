//! Subprocess execution for kubectl invocations.
//!
//! Every invocation goes through the platform shell as a single command
//! line. There are four ways to run one:
//!
//! - [`Engine::replace`]: the current process becomes the child. Used for
//!   interactive commands. After-hooks never fire on this path because
//!   nothing is left to call them.
//! - [`Engine::run`]: wait for the child, streaming its output to the
//!   context's sinks.
//! - [`Engine::capture`]: like `run`, but stdout is collected and returned
//!   instead of forwarded. Stderr is still forwarded.
//! - [`Engine::run_with_input`]: like `run`, but the caller writes to the
//!   child's stdin first.
//!
//! The three synchronous modes record the exit status on the
//! [`ExecContext`] before after-hooks run.

mod relay;
mod status;


pub use status::{ExecutionOutcome, LastStatus};

use crate::error::{KubernetesError, Result};
use crate::hooks::Hooks;
use crate::invocation::Invocation;
use crate::sink::Sinks;
use std::convert::Infallible;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;

/// Per-caller state: where output goes and how the last command ended.
#[derive(Debug, Clone, Default)]
pub struct ExecContext {
    sinks: Sinks,
    last_status: Option<LastStatus>,
}

impl ExecContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sinks(&self) -> &Sinks {
        &self.sinks
    }

    /// Install new sinks, returning the ones they replace.
    pub fn replace_sinks(&mut self, sinks: Sinks) -> Sinks {
        std::mem::replace(&mut self.sinks, sinks)
    }

    /// `None` until an invocation from this context has completed.
    pub fn last_status(&self) -> Option<LastStatus> {
        self.last_status
    }
}

/// Runs invocations and notifies hooks.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    hooks: Hooks,
}

impl Engine {
    pub fn new(hooks: Hooks) -> Self {
        Self { hooks }
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Replace the current process with the invocation.
    ///
    /// Returns only if the replacement could not happen. Where the platform
    /// has no `exec`, the child is run with inherited stdio and this process
    /// exits with the child's code.
    pub fn replace(&self, invocation: &Invocation) -> Result<Infallible> {
        self.hooks.run_before(invocation);
        debug!(command = %invocation, mode = "replace", "running kubectl");
        replace_process(invocation)
    }

    /// Run to completion, relaying output to the context's sinks.
    pub fn run(&self, invocation: &Invocation, ctx: &mut ExecContext) -> Result<LastStatus> {
        self.hooks.run_before(invocation);

        if ctx.sinks.is_process_default() {
            debug!(command = %invocation, mode = "inherit", "running kubectl");
            let status = shell_command(invocation)
                .status()
                .map_err(|e| spawn_error(invocation, e))?;
            return Ok(self.record(invocation, ctx, status.into()));
        }

        debug!(command = %invocation, mode = "relay", "running kubectl");
        let outcome = self.relayed(invocation, ctx, false, None)?;
        Ok(outcome.status)
    }

    /// Run to completion and return stdout. Stderr goes to the context's sink.
    pub fn capture(
        &self,
        invocation: &Invocation,
        ctx: &mut ExecContext,
    ) -> Result<ExecutionOutcome> {
        self.hooks.run_before(invocation);
        debug!(command = %invocation, mode = "capture", "running kubectl");
        self.relayed(invocation, ctx, true, None)
    }

    /// Run to completion, handing the child's stdin to `input` first.
    ///
    /// Stdin is closed once `input` returns, which signals end-of-input.
    pub fn run_with_input<F>(
        &self,
        invocation: &Invocation,
        ctx: &mut ExecContext,
        input: F,
    ) -> Result<LastStatus>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        self.hooks.run_before(invocation);
        debug!(command = %invocation, mode = "piped", "running kubectl");
        let outcome = self.relayed(invocation, ctx, false, Some(Box::new(input)))?;
        Ok(outcome.status)
    }

    fn relayed<'i>(
        &self,
        invocation: &Invocation,
        ctx: &mut ExecContext,
        capture: bool,
        input: Option<Box<dyn FnOnce(&mut dyn Write) -> io::Result<()> + 'i>>,
    ) -> Result<ExecutionOutcome> {
        let mut child = shell_command(invocation)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(invocation, e))?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let sinks = ctx.sinks.clone();

        thread::scope(|scope| {
            let out_sink = sinks.stdout.clone();
            let out_relay = scope.spawn(move || {
                let pipe = stdout?;
                if capture {
                    Some(relay::collect(pipe))
                } else {
                    relay::forward(pipe, &out_sink);
                    None
                }
            });

            let err_sink = sinks.stderr.clone();
            let err_relay = scope.spawn(move || {
                if let Some(pipe) = stderr {
                    relay::forward(pipe, &err_sink);
                }
            });

            let mut stdin = stdin;
            let write_result = match (input, stdin.as_mut()) {
                (Some(input), Some(pipe)) => input(&mut *pipe).and_then(|()| pipe.flush()),
                _ => Ok(()),
            };
            drop(stdin);

            let status: LastStatus = child
                .wait()
                .map_err(|e| KubernetesError::Io {
                    context: format!("failed to wait for '{}'", invocation),
                    source: e,
                })?
                .into();
            self.record(invocation, ctx, status);

            let captured = out_relay.join().ok().flatten();
            let _ = err_relay.join();

            // A child that bails out early closes its stdin; its exit status
            // is the better explanation than the broken pipe.
            if let Err(e) = write_result {
                if status.success() {
                    return Err(KubernetesError::Io {
                        context: format!("failed to write input to '{}'", invocation),
                        source: e,
                    });
                }
                debug!(error = %e, "kubectl closed stdin early");
            }

            Ok(ExecutionOutcome {
                status,
                stdout: captured,
            })
        })
    }

    fn record(
        &self,
        invocation: &Invocation,
        ctx: &mut ExecContext,
        status: LastStatus,
    ) -> LastStatus {
        debug!(command = %invocation, status = %status, "kubectl finished");
        ctx.last_status = Some(status);
        self.hooks.run_after(invocation, &status);
        status
    }
}

fn shell_command(invocation: &Invocation) -> Command {
    #[cfg(windows)]
    let mut command = {
        let mut command = Command::new("cmd");
        command.arg("/C").arg(invocation.command_line());
        command
    };
    #[cfg(not(windows))]
    let mut command = {
        let mut command = Command::new("sh");
        command.arg("-c").arg(invocation.command_line());
        command
    };

    command.envs(invocation.env());
    command
}

fn spawn_error(invocation: &Invocation, source: io::Error) -> KubernetesError {
    KubernetesError::Spawn {
        command: invocation.command_line(),
        source,
    }
}

#[cfg(unix)]
fn replace_process(invocation: &Invocation) -> Result<Infallible> {
    use std::os::unix::process::CommandExt;

    let err = shell_command(invocation).exec();
    Err(spawn_error(invocation, err))
}

#[cfg(not(unix))]
fn replace_process(invocation: &Invocation) -> Result<Infallible> {
    let status = shell_command(invocation)
        .status()
        .map_err(|e| spawn_error(invocation, e))?;
    std::process::exit(status.code().unwrap_or(1))
}
