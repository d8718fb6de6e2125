//! `header-remap match` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::matcher::{cross_map, StructPolicy};
use crate::snapshot;

/// Execute the `match` command.
///
/// Loads both snapshots (paths relative to `base`), cross-maps them and
/// writes the match table to `output`.
///
/// # Errors
///
/// Returns an error string if a snapshot cannot be read or parsed, or the
/// match table cannot be written.
pub fn run(
    ctx: &ServiceContext,
    base: &Path,
    source: &Path,
    target: &Path,
    output: &Path,
    policy: StructPolicy,
) -> Result<(), String> {
    let source = snapshot::load_mapping(ctx, &base.join(source)).map_err(|e| e.to_string())?;
    let target = snapshot::load_mapping(ctx, &base.join(target)).map_err(|e| e.to_string())?;

    let table = cross_map(&source, &target, policy);
    let output = base.join(output);
    snapshot::save_matches(ctx, &output, &table).map_err(|e| e.to_string())?;

    println!(
        "Matched {} of {} source headers ({} target links, struct policy {policy})",
        table.len(),
        source.len(),
        table.pair_count(),
    );
    println!("Written to {}", output.display());
    Ok(())
}
