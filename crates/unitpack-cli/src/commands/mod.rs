//! Command dispatch and handler modules.

mod plan;
mod tree;

use miette::Result;
use unitpack_core::config::GlobalConfig;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => GlobalConfig::load_from(path)?,
        None => GlobalConfig::load()?,
    };

    match cli.command {
        Command::Plan { trace, unit, json } => plan::exec(&trace, &config, unit, json),
        Command::Tree {
            trace,
            depth,
            pruned,
            unit,
            why,
            conflicts,
        } => tree::exec(&trace, &config, depth, pruned, unit, why, conflicts),
    }
}
