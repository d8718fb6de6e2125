//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_MAPPING_FILE, DEFAULT_MATCHES_FILE};
use crate::matcher::StructPolicy;

/// Top-level CLI parser for `header-remap`.
#[derive(Debug, Parser)]
#[command(
    name = "header-remap",
    version,
    about = "Map header declarations across two header trees and rewrite includes to match"
)]
pub struct Cli {
    /// Log filter (trace, debug, info, warn, error, or an `EnvFilter` directive).
    #[arg(long, global = true, env = "HEADER_REMAP_LOG", default_value = "warn")]
    pub log_level: String,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan a header tree and write its declaration mapping as JSON.
    Scan {
        /// Root of the header tree.
        root: PathBuf,
        /// Snapshot file to write.
        #[arg(short, long, default_value = DEFAULT_MAPPING_FILE)]
        output: PathBuf,
        /// Directory name to skip at any depth; replaces the default list.
        #[arg(long = "exclude", value_name = "NAME")]
        exclude: Vec<String>,
    },
    /// Cross-map two declaration snapshots and write the match table.
    Match {
        /// Snapshot of the headers being migrated away from.
        source: PathBuf,
        /// Snapshot of the headers being migrated to.
        target: PathBuf,
        /// Match table file to write.
        #[arg(short, long, default_value = DEFAULT_MATCHES_FILE)]
        output: PathBuf,
        /// Which target list source struct names are compared against.
        #[arg(long, default_value_t = StructPolicy::default())]
        struct_policy: StructPolicy,
    },
    /// Run the whole pipeline and rewrite a module's includes.
    Convert(ConvertArgs),
}

/// Arguments of the `convert` subcommand.
#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Tree whose `#include "..."` directives are rewritten.
    pub module_dir: PathBuf,
    /// Binding header tree to redirect includes to.
    pub bindings_dir: PathBuf,
    /// Engine header tree to scan; when omitted a snapshot is loaded instead.
    pub engine_dir: Option<PathBuf>,
    /// Engine snapshot to load when ENGINE_DIR is omitted
    /// [default: BINDINGS_DIR/output_header_mapping.json].
    #[arg(long, value_name = "FILE", conflicts_with = "engine_dir")]
    pub source_mapping: Option<PathBuf>,
    /// Match table file to write.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_MATCHES_FILE)]
    pub matches_output: PathBuf,
    /// Report the files that would change without writing them.
    #[arg(long)]
    pub dry_run: bool,
    /// Which target list source struct names are compared against.
    #[arg(long, default_value_t = StructPolicy::default())]
    pub struct_policy: StructPolicy,
    /// Directory name to skip at any depth while scanning; replaces the default list.
    #[arg(long = "exclude", value_name = "NAME")]
    pub exclude: Vec<String>,
}
