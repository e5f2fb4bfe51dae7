//! Operation: display the dependency graph of a trace.

use std::path::Path;

use unitpack_core::config::GlobalConfig;
use unitpack_core::packaging::UnitKind;
use unitpack_core::trace::ResolutionTrace;
use unitpack_resolver::builder::GraphBuilder;
use unitpack_util::errors::PackResult;

use crate::ops_plan;

/// Options for `unitpack tree`.
#[derive(Default)]
pub struct TreeOptions {
    /// Maximum tree depth to display.
    pub depth: Option<usize>,
    /// Show the graph after the unit's exclusions and pruning.
    pub pruned: bool,
    /// Unit kind to prune for, overriding the trace.
    pub unit: Option<UnitKind>,
    /// Show the path from the root to a specific dependency.
    pub why: Option<String>,
    /// Show the version conflicts mediated while building the graph.
    pub conflicts: bool,
}

/// Display the dependency graph recorded in a trace file.
pub fn tree(trace_path: &Path, config: &GlobalConfig, opts: &TreeOptions) -> PackResult<()> {
    let trace = ResolutionTrace::from_path(trace_path)?;
    print!("{}", render(&trace, config, opts)?);
    Ok(())
}

/// Render the requested view of the graph.
pub fn render(
    trace: &ResolutionTrace,
    config: &GlobalConfig,
    opts: &TreeOptions,
) -> PackResult<String> {
    let (graph, conflicts) = if opts.pruned {
        let prepared = ops_plan::prepare(trace, config, opts.unit.unwrap_or(trace.unit))?;
        (prepared.graph, prepared.conflicts)
    } else {
        let result = GraphBuilder::from_events(&trace.events)?;
        (result.graph, result.conflicts)
    };

    if let Some(ref target) = opts.why {
        let mut output = String::new();
        match graph.find_path(target) {
            Some(path) => {
                output.push_str(&format!("Path to {target}:\n"));
                for (i, node) in path.iter().enumerate() {
                    let indent = "  ".repeat(i);
                    output.push_str(&format!("{indent}{node}\n"));
                }
            }
            None => output.push_str(&format!("Dependency '{target}' not found in the graph.\n")),
        }
        return Ok(output);
    }

    if opts.conflicts {
        let mut output = conflicts.to_string();
        if !output.ends_with('\n') {
            output.push('\n');
        }
        return Ok(output);
    }

    let output = graph.print_tree(opts.depth);
    if output.is_empty() {
        return Ok("No dependencies.\n".to_string());
    }
    Ok(output)
}
