//! Handler for `unitpack plan`.

use std::path::Path;

use miette::Result;
use unitpack_core::config::GlobalConfig;
use unitpack_core::packaging::UnitKind;
use unitpack_ops::ops_plan::{self, PlanOptions};
use unitpack_util::errors::PackError;

pub fn exec(trace: &Path, config: &GlobalConfig, unit: Option<UnitKind>, json: bool) -> Result<()> {
    let opts = PlanOptions { unit };
    let plan = ops_plan::plan_from_path(trace, config, &opts)?;

    if json {
        let out = serde_json::to_string_pretty(&plan).map_err(|e| PackError::Generic {
            message: format!("Failed to serialize plan: {e}"),
        })?;
        println!("{out}");
    } else {
        print!("{plan}");
    }
    Ok(())
}
