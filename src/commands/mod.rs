//! Command dispatch and handlers.

pub mod convert;
pub mod matches;
pub mod scan;

use std::env;
use std::path::{Path, PathBuf};

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::context::ServiceContext;

/// Environment variable naming a directory to record filesystem cassettes into.
pub const RECORD_ENV: &str = "HEADER_REMAP_RECORD";

/// Dispatch a parsed command to its handler.
///
/// When `HEADER_REMAP_RECORD` is set to a directory path, every filesystem
/// interaction is recorded to a cassette in a timestamped subdirectory.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let base =
        env::current_dir().map_err(|e| format!("failed to get current directory: {e}"))?;

    let (ctx, session) = if let Ok(path) = env::var(RECORD_ENV) {
        let (ctx, session) = ServiceContext::recording_at(&PathBuf::from(path))?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(), None)
    };

    let result = dispatch_with_context(command, &ctx, &base);

    // Drop context first to release Arc references
    drop(ctx);
    conclude(result, session)
}

/// Dispatch a command with the given service context and base directory.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    base: &Path,
) -> Result<(), String> {
    match command {
        Command::Scan { root, output, exclude } => scan::run(ctx, base, root, output, exclude),
        Command::Match { source, target, output, struct_policy } => {
            matches::run(ctx, base, source, target, output, *struct_policy)
        }
        Command::Convert(args) => convert::run(ctx, base, args),
    }
}

/// Finish recording after the command completes, even on error.
///
/// A command failure is reported ahead of a recording failure.
fn conclude(result: Result<(), String>, session: Option<RecordingSession>) -> Result<(), String> {
    let Some(session) = session else {
        return result;
    };
    let finished = finish_recording(session);
    result.and(finished)
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
