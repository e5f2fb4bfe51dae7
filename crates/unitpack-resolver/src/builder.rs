//! Builds the [`DependencyGraph`] from the resolver's listener events.

use petgraph::graph::NodeIndex;
use tracing::debug;
use unitpack_core::artifact::{Artifact, Scope};
use unitpack_core::listener::{replay, ManagedOverride, ResolutionEvent, ResolutionListener};
use unitpack_util::errors::{PackError, PackResult};

use crate::conflict::{ConflictReason, ConflictReport, VersionConflict};
use crate::graph::DependencyGraph;

/// The output of graph construction.
pub struct ResolutionResult {
    pub graph: DependencyGraph,
    pub conflicts: ConflictReport,
}

/// A [`ResolutionListener`] that assembles the dependency graph in a single
/// pass over the events.
#[derive(Default)]
pub struct GraphBuilder {
    graph: DependencyGraph,
    /// Nodes whose children are currently being processed, innermost last.
    stack: Vec<NodeIndex>,
    conflicts: ConflictReport,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a recorded event stream.
    pub fn from_events(events: &[ResolutionEvent]) -> PackResult<ResolutionResult> {
        let mut builder = Self::new();
        replay(events, &mut builder)?;
        builder.finish()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Finish the run. Fails if any `start_process_children` was never closed.
    pub fn finish(self) -> PackResult<ResolutionResult> {
        if let Some(&open) = self.stack.last() {
            return Err(PackError::GraphConsistency {
                message: format!(
                    "event stream ended with {} unclosed node(s), innermost {}",
                    self.stack.len(),
                    self.graph.node(open)
                ),
            }
            .into());
        }
        Ok(ResolutionResult {
            graph: self.graph,
            conflicts: self.conflicts,
        })
    }

    fn existing(&self, artifact: &Artifact, event: &str) -> PackResult<NodeIndex> {
        self.graph.find(&artifact.conflict_id()).ok_or_else(|| {
            PackError::GraphConsistency {
                message: format!("{event} for {artifact}, which was never included"),
            }
            .into()
        })
    }
}

impl ResolutionListener for GraphBuilder {
    fn test_artifact(&mut self, artifact: &Artifact) {
        debug!("testArtifact: {artifact}");
    }

    fn start_process_children(&mut self, artifact: &Artifact) -> PackResult<()> {
        debug!("startProcessChildren: {artifact}");
        let node = self.existing(artifact, "startProcessChildren")?;
        if self.stack.is_empty() && self.graph.root().is_none() {
            self.graph.set_root(node);
        }
        self.stack.push(node);
        Ok(())
    }

    fn end_process_children(&mut self, artifact: &Artifact) -> PackResult<()> {
        debug!("endProcessChildren: {artifact}");
        let Some(open) = self.stack.pop() else {
            return Err(PackError::GraphConsistency {
                message: format!("endProcessChildren for {artifact} with no open node"),
            }
            .into());
        };
        let open_artifact = self.graph.node(open);
        if open_artifact.conflict_id() != artifact.conflict_id() {
            return Err(PackError::GraphConsistency {
                message: format!(
                    "endProcessChildren for {artifact} but the open node is {open_artifact}"
                ),
            }
            .into());
        }
        Ok(())
    }

    fn include_artifact(&mut self, artifact: &Artifact) {
        debug!("includeArtifact: {artifact}");
        let node = self.graph.upsert(artifact.clone());
        if let Some(&parent) = self.stack.last() {
            self.graph.link(parent, node);
        }
    }

    fn omit_for_nearer(&mut self, omitted: &Artifact, kept: &Artifact) -> PackResult<()> {
        debug!("omitForNearer: omitted={omitted}, kept={kept}");
        if omitted.conflict_id() != kept.conflict_id() {
            return Err(PackError::InvariantViolation {
                message: format!(
                    "omitForNearer between different dependencies: {} and {}",
                    omitted.conflict_id(),
                    kept.conflict_id()
                ),
            }
            .into());
        }
        let node = self.existing(omitted, "omitForNearer")?;
        if omitted.version != kept.version {
            self.conflicts.add(VersionConflict {
                id: kept.conflict_id(),
                requested: omitted.version.clone(),
                resolved: kept.version.clone(),
                reason: ConflictReason::NearestWins,
            });
        }
        *self.graph.node_mut(node) = kept.clone();
        Ok(())
    }

    fn omit_for_cycle(&mut self, artifact: &Artifact) {
        debug!("omitForCycle: {artifact}");
    }

    fn update_scope(&mut self, artifact: &Artifact, scope: Scope) -> PackResult<()> {
        debug!("updateScope: {artifact} -> {scope}");
        let node = self.existing(artifact, "updateScope")?;
        self.graph.node_mut(node).scope = scope;
        Ok(())
    }

    fn manage_artifact(&mut self, artifact: &Artifact, replacement: &ManagedOverride) {
        debug!("manageArtifact: artifact={artifact}, replacement={replacement:?}");
        let Some(node) = self.graph.find(&artifact.conflict_id()) else {
            return;
        };
        let current = self.graph.node_mut(node);
        if let Some(version) = &replacement.version {
            if *version != current.version {
                let requested = std::mem::replace(&mut current.version, version.clone());
                self.conflicts.add(VersionConflict {
                    id: artifact.conflict_id(),
                    requested,
                    resolved: version.clone(),
                    reason: ConflictReason::Managed,
                });
            }
        }
        if let Some(scope) = replacement.scope {
            current.scope = scope;
        }
    }

    fn update_scope_current_pom(&mut self, artifact: &Artifact, scope: &str) {
        debug!("updateScopeCurrentPom: {artifact} ({scope})");
    }

    fn select_version_from_range(&mut self, artifact: &Artifact) {
        debug!("selectVersionFromRange: {artifact}");
    }

    fn restrict_range(&mut self, artifact: &Artifact, replacement: &Artifact, range: &str) {
        debug!("restrictRange: {artifact} -> {replacement} in {range}");
    }
}
