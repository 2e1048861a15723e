//! kubecli: typed front-end over the kubectl binary.
//!
//! This is the main entry point for the `kubecli` CLI. It parses arguments,
//! loads configuration, installs logging, dispatches to the appropriate
//! command handler, and handles errors with proper exit codes.

mod cli;
mod commands;

use cli::Cli;
use kubernetes_cli::config::DEFAULT_LOG_FILTER;
use kubernetes_cli::exit_codes;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured log filter.
const LOG_ENV: &str = "KUBECLI_LOG";

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Codes that do not fit a process exit byte are reported as kubectl failures.
fn exit_byte(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(exit_codes::KUBECTL_FAILURE as u8)
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let result = match commands::load_config(&cli.global) {
        Ok(config) => {
            init_logging(&config.log_filter);
            commands::dispatch(&config, cli.command)
        }
        Err(err) => {
            init_logging(DEFAULT_LOG_FILTER);
            Err(err)
        }
    };

    match result {
        Ok(code) => ExitCode::from(exit_byte(code)),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_outside_a_byte_are_not_success() {
        assert_eq!(exit_byte(0), 0);
        assert_eq!(exit_byte(255), 255);
        assert_eq!(exit_byte(256), exit_codes::KUBECTL_FAILURE as u8);
        assert_eq!(exit_byte(-1), exit_codes::KUBECTL_FAILURE as u8);
    }
}
