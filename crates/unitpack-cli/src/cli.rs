//! CLI argument definitions for unitpack.
//!
//! Uses `clap` derive macros. Each command corresponds to a handler in the
//! [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use unitpack_core::packaging::UnitKind;

#[derive(Parser, Debug)]
#[command(
    name = "unitpack",
    version,
    about = "Decide what an integration packaging unit bundles",
    long_about = "unitpack replays a dependency resolver's event trace into a graph, cuts away \
                  what shared libraries already supply, and reports which artifacts a \
                  component, service unit, shared library or service assembly must bundle."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read configuration from this file instead of ~/.unitpack/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the files a unit bundles
    Plan {
        /// Resolution trace (JSON)
        trace: PathBuf,
        /// Package as this unit kind instead of the trace's
        #[arg(long)]
        unit: Option<UnitKind>,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display the dependency graph
    Tree {
        /// Resolution trace (JSON)
        trace: PathBuf,
        /// Maximum depth
        #[arg(long)]
        depth: Option<u32>,
        /// Show the graph after shared-library exclusion and pruning
        #[arg(long)]
        pruned: bool,
        /// Unit kind to prune for (with --pruned)
        #[arg(long)]
        unit: Option<UnitKind>,
        /// Explain why a dependency is included
        #[arg(long)]
        why: Option<String>,
        /// Show version conflicts
        #[arg(long)]
        conflicts: bool,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
