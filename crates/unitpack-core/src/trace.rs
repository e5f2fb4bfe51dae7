use serde::{Deserialize, Serialize};
use std::path::Path;

use unitpack_util::errors::PackError;

use crate::artifact::Artifact;
use crate::listener::ResolutionEvent;
use crate::packaging::{PackagingKind, UnitKind};

/// Everything the external resolver hands over for one packaging-unit build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionTrace {
    /// The project being packaged.
    pub project: Artifact,
    #[serde(default)]
    pub unit: UnitKind,
    /// The project's flat dependency list, in declaration order.
    #[serde(default)]
    pub dependencies: Vec<DeclaredDependency>,
    /// Listener events in the order the resolver emitted them.
    #[serde(default)]
    pub events: Vec<ResolutionEvent>,
}

/// A dependency from the project's flat dependency list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclaredDependency {
    #[serde(flatten)]
    pub artifact: Artifact,
    /// Packaging of the dependency's own project, when the project model could be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging: Option<PackagingKind>,
    /// Declared by the project itself rather than pulled in transitively.
    #[serde(default)]
    pub direct: bool,
}

impl ResolutionTrace {
    /// Load and parse a trace file from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PackError::Trace {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        let trace = Self::parse_json(&content)?;
        tracing::debug!(
            "Loaded trace for {} ({} dependencies, {} events)",
            trace.project,
            trace.dependencies.len(),
            trace.events.len()
        );
        Ok(trace)
    }

    pub fn parse_json(content: &str) -> miette::Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            PackError::Trace {
                message: format!("Failed to parse trace: {e}"),
            }
            .into()
        })
    }

    /// Serialize the trace to pretty-printed JSON.
    pub fn to_string_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
