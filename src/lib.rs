//! Core library entry for the `header-remap` CLI.
//!
//! Scans two header trees for class, struct and macro declarations, pairs
//! headers that declare the same names, and rewrites quoted includes in a
//! module to point at the paired headers.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod pipeline;
pub mod ports;
pub mod rewrite;
pub mod scan;
pub mod snapshot;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    init_tracing(&cli.log_level);
    commands::dispatch(&cli.command)
}

/// Install a stderr subscriber filtered by `directive`.
///
/// An unparsable directive falls back to `warn`. A second call is a no-op.
fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["header-remap", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_reports_missing_scan_root() {
        let err = run(["header-remap", "scan", "/definitely/not/a/header/tree"]).unwrap_err();
        assert!(err.contains("ROOT does not exist"));
    }

    #[test]
    fn init_tracing_tolerates_bad_directive_and_repeat_calls() {
        super::init_tracing("not a [valid directive");
        super::init_tracing("debug");
    }
}
