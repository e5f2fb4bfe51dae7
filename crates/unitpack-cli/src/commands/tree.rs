//! Handler for `unitpack tree`.

use std::path::Path;

use miette::Result;
use unitpack_core::config::GlobalConfig;
use unitpack_core::packaging::UnitKind;
use unitpack_ops::ops_tree::{self, TreeOptions};

pub fn exec(
    trace: &Path,
    config: &GlobalConfig,
    depth: Option<u32>,
    pruned: bool,
    unit: Option<UnitKind>,
    why: Option<String>,
    conflicts: bool,
) -> Result<()> {
    let opts = TreeOptions {
        depth: depth.map(|d| d as usize),
        pruned,
        unit,
        why,
        conflicts,
    };

    ops_tree::tree(trace, config, &opts)
}
