//! Operation: decide which artifacts a packaging unit bundles.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};
use unitpack_core::artifact::Artifact;
use unitpack_core::config::GlobalConfig;
use unitpack_core::packaging::{PackagingCandidate, PackagingKind, UnitKind};
use unitpack_core::trace::{DeclaredDependency, ResolutionTrace};
use unitpack_resolver::builder::GraphBuilder;
use unitpack_resolver::conflict::ConflictReport;
use unitpack_resolver::graph::DependencyGraph;
use unitpack_resolver::mutate::ExcludeSet;
use unitpack_resolver::retain::retain_artifacts;
use unitpack_util::errors::PackResult;

/// Options for `unitpack plan`.
#[derive(Default)]
pub struct PlanOptions {
    /// Package as this unit kind instead of the one recorded in the trace.
    pub unit: Option<UnitKind>,
}

/// One file placed into the unit's archive.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedEntry {
    pub artifact: Artifact,
    pub kind: PackagingKind,
    /// Path inside the archive.
    pub path: String,
}

/// A candidate packaged at its declared version although the graph resolved another.
#[derive(Debug, Clone, Serialize)]
pub struct Mismatch {
    pub declared: Artifact,
    pub resolved: Artifact,
}

/// What goes into one packaging unit.
#[derive(Debug, Serialize)]
pub struct PackagePlan {
    pub unit: UnitKind,
    pub project: Artifact,
    pub bundled: Vec<PlannedEntry>,
    /// Shared libraries the unit references; supplied at runtime, never bundled.
    pub shared_libraries: Vec<Artifact>,
    /// Service units of a service assembly, in declaration order.
    pub service_units: Vec<PlannedEntry>,
    pub mismatches: Vec<Mismatch>,
    /// Candidates with no counterpart in the pruned graph.
    pub dropped: Vec<Artifact>,
}

/// The graph of a run after exclusion and pruning, with the inputs the
/// retention step needs.
pub struct PreparedGraph {
    pub unit: UnitKind,
    pub graph: DependencyGraph,
    pub conflicts: ConflictReport,
    pub candidates: Vec<PackagingCandidate>,
    pub shared_libraries: Vec<Artifact>,
    pub service_units: Vec<Artifact>,
}

/// Load a trace and plan its unit.
pub fn plan_from_path(
    trace_path: &Path,
    config: &GlobalConfig,
    opts: &PlanOptions,
) -> PackResult<PackagePlan> {
    let trace = ResolutionTrace::from_path(trace_path)?;
    plan(&trace, config, opts)
}

/// Compute the package plan for a resolution trace.
pub fn plan(
    trace: &ResolutionTrace,
    config: &GlobalConfig,
    opts: &PlanOptions,
) -> PackResult<PackagePlan> {
    let unit = opts.unit.unwrap_or(trace.unit);
    let prepared = prepare(trace, config, unit)?;
    let lib_dir = &config.packaging.lib_dir;

    let mut bundled = Vec::new();
    if unit != UnitKind::ServiceAssembly {
        bundled.push(PlannedEntry {
            artifact: trace.project.clone(),
            kind: PackagingKind::Jar,
            path: format!("{lib_dir}/{}-{}.jar", trace.project.name, trace.project.version),
        });
    }

    let retention = retain_artifacts(
        &prepared.candidates,
        &prepared.graph,
        config.retain.classifier,
    );
    for candidate in &retention.retained {
        info!("Including: {}", candidate.artifact);
        bundled.push(PlannedEntry {
            artifact: candidate.artifact.clone(),
            kind: candidate.kind.clone(),
            path: format!("{lib_dir}/{}", candidate.artifact.file_name()),
        });
    }

    let service_units = prepared
        .service_units
        .iter()
        .map(|su| PlannedEntry {
            artifact: su.clone(),
            kind: PackagingKind::ServiceUnit,
            path: su.clone().with_type("zip").file_name(),
        })
        .collect();

    Ok(PackagePlan {
        unit,
        project: trace.project.clone(),
        bundled,
        shared_libraries: prepared.shared_libraries,
        service_units,
        mismatches: retention
            .mismatches
            .into_iter()
            .map(|m| Mismatch {
                declared: m.declared,
                resolved: m.resolved,
            })
            .collect(),
        dropped: retention.dropped.into_iter().map(|c| c.artifact).collect(),
    })
}

/// Build the graph for `trace`, exclude shared-library branches as `unit`
/// requires, and prune it.
pub fn prepare(
    trace: &ResolutionTrace,
    config: &GlobalConfig,
    unit: UnitKind,
) -> PackResult<PreparedGraph> {
    let result = GraphBuilder::from_events(&trace.events)?;
    let mut graph = result.graph;

    let direct: HashSet<_> = match graph.root() {
        Some(root) => graph
            .children(root)
            .into_iter()
            .map(|idx| graph.node(idx).conflict_id())
            .collect(),
        None => HashSet::new(),
    };

    let mut candidates = Vec::new();
    let mut shared_libraries = Vec::new();
    let mut service_units = Vec::new();
    let mut excludes = ExcludeSet::new();
    let mut protected = Vec::new();

    for dep in trace.dependencies.iter().filter(|d| is_runtime_eligible(d)) {
        let Some(kind) = packaging_of(dep, config) else {
            continue;
        };
        let artifact = &dep.artifact;
        let is_direct = dep.direct || direct.contains(&artifact.conflict_id());

        match (unit, &kind) {
            (UnitKind::Component | UnitKind::ServiceUnit, PackagingKind::SharedLibrary) => {
                if let Some(node) = graph.find(&artifact.conflict_id()) {
                    graph.exclude_branch(node, &mut excludes);
                }
                shared_libraries.push(artifact.clone());
            }
            (UnitKind::Component | UnitKind::ServiceUnit, k)
                if k.is_library() || *k == PackagingKind::Component =>
            {
                if is_direct {
                    protected.push(artifact.conflict_id());
                }
                candidates.push(PackagingCandidate::new(artifact.clone(), kind.clone()));
            }
            (UnitKind::SharedLibrary, k) if k.is_library() => {
                candidates.push(PackagingCandidate::new(artifact.clone(), kind.clone()));
            }
            (UnitKind::ServiceAssembly, PackagingKind::ServiceUnit) if is_direct => {
                service_units.push(artifact.clone());
            }
            _ => debug!("Not packaging {artifact} ({kind}) into a {unit}"),
        }
    }

    // A direct declaration wins over a shared library that also supplies it.
    for id in &protected {
        if let Some(node) = graph.find(id) {
            let artifact = graph.node(node);
            if excludes.remove(artifact) {
                debug!("Keeping {artifact}: declared directly");
            }
        }
    }

    if let Some(root) = graph.root() {
        graph.prune_tree(root, &excludes);
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        debug!("Dependency graph\n{}", graph.print_tree(None));
    }

    Ok(PreparedGraph {
        unit,
        graph,
        conflicts: result.conflicts,
        candidates,
        shared_libraries,
        service_units,
    })
}

/// Runtime-scoped, non-optional dependencies; the only ones worth packaging.
fn is_runtime_eligible(dep: &DeclaredDependency) -> bool {
    !dep.artifact.optional && dep.artifact.scope.is_runtime_classpath()
}

fn packaging_of(dep: &DeclaredDependency, config: &GlobalConfig) -> Option<PackagingKind> {
    if let Some(kind) = &dep.packaging {
        return Some(kind.clone());
    }
    let artifact_type = &dep.artifact.artifact_type;
    if config.packaging.assume_jar_when_unknown {
        warn!(
            "Unable to determine packaging for dependency {}, assuming {artifact_type}",
            dep.artifact.name
        );
        Some(PackagingKind::parse(artifact_type))
    } else {
        warn!(
            "Unable to determine packaging for dependency {}, skipping it",
            dep.artifact.name
        );
        None
    }
}

impl fmt::Display for PackagePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Packaging {} {}", self.unit, self.project)?;
        for entry in &self.bundled {
            writeln!(f, "  {}", entry.path)?;
        }
        if !self.shared_libraries.is_empty() {
            writeln!(f, "Shared libraries (supplied at runtime):")?;
            for sl in &self.shared_libraries {
                writeln!(f, "  {sl}")?;
            }
        }
        if !self.service_units.is_empty() {
            writeln!(f, "Service units:")?;
            for su in &self.service_units {
                writeln!(f, "  {}", su.path)?;
            }
        }
        for m in &self.mismatches {
            writeln!(
                f,
                "warning: {} declared at {} but the graph resolved {}; packaging {}",
                m.declared.conflict_id(),
                m.declared.version,
                m.resolved.version,
                m.declared.version
            )?;
        }
        Ok(())
    }
}
