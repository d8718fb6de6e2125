//! `header-remap convert` command.

use std::path::Path;

use crate::cli::ConvertArgs;
use crate::commands::scan::scan_config;
use crate::config::{ResolvedRoots, RewriteConfig};
use crate::context::ServiceContext;
use crate::extract::LexicalExtractor;
use crate::pipeline::{self, ConvertOptions, ConvertOutcome, SourceUniverse};

/// Execute the `convert` command.
///
/// All directory and file arguments are resolved against `base` once, up
/// front; a missing root aborts before any scanning.
///
/// # Errors
///
/// Returns an error string if a root is missing, a snapshot cannot be loaded,
/// or any read or write fails.
pub fn run(ctx: &ServiceContext, base: &Path, args: &ConvertArgs) -> Result<(), String> {
    let roots = ResolvedRoots::resolve(
        &*ctx.fs,
        base,
        &args.module_dir,
        &args.bindings_dir,
        args.engine_dir.as_deref(),
    )
    .map_err(|e| e.to_string())?;

    let source =
        SourceUniverse::for_roots(&roots, args.source_mapping.as_ref().map(|p| base.join(p)));
    let options = ConvertOptions {
        scan: scan_config(&args.exclude),
        rewrite: RewriteConfig::default(),
        policy: args.struct_policy,
        matches_output: Some(base.join(&args.matches_output)),
        dry_run: args.dry_run,
    };

    let outcome = pipeline::convert(
        ctx,
        &roots.module,
        &roots.bindings,
        &source,
        &LexicalExtractor,
        &options,
    )
    .map_err(|e| e.to_string())?;

    print_summary(&outcome, &roots.module);
    Ok(())
}

fn print_summary(outcome: &ConvertOutcome, module: &Path) {
    println!(
        "Matched {} of {} engine headers against {} binding headers",
        outcome.matches.len(),
        outcome.source_headers,
        outcome.target_headers,
    );

    let changed: Vec<_> = outcome.plan.changed().collect();
    if outcome.committed {
        println!("Rewrote {} of {} files", changed.len(), outcome.plan.files.len());
    } else {
        println!("Dry run: would rewrite {} of {} files:", changed.len(), outcome.plan.files.len());
        for file in changed {
            let shown = file.path.strip_prefix(module).unwrap_or(&file.path);
            println!("  {} ({})", shown.display(), file.replaced.join(", "));
        }
    }
}
