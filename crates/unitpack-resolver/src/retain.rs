//! Reconciliation of packaging candidates against the pruned graph.
//!
//! Packaging-kind decisions come from project metadata the graph never sees,
//! so the final set is the candidates that still have a reachable
//! counterpart, not the graph's own artifacts.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, warn};
use unitpack_core::artifact::Artifact;
use unitpack_core::config::ClassifierPolicy;
use unitpack_core::packaging::PackagingCandidate;

use crate::graph::DependencyGraph;

/// A candidate whose declared version differs from the version the graph resolved.
/// The declared version is the one that gets packaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMismatch {
    pub declared: Artifact,
    pub resolved: Artifact,
}

impl fmt::Display for VersionMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Resolved artifact {} has a different version from that in dependency management {}, overriding dependency management",
            self.declared, self.resolved
        )
    }
}

/// The outcome of [`retain_artifacts`].
#[derive(Debug, Default)]
pub struct Retention {
    /// Accepted candidates, duplicate-free, in candidate order.
    pub retained: Vec<PackagingCandidate>,
    pub mismatches: Vec<VersionMismatch>,
    /// Candidates with no reachable counterpart.
    pub dropped: Vec<PackagingCandidate>,
}

impl Retention {
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.retained.iter().map(|c| &c.artifact)
    }
}

fn matches(reachable: &Artifact, candidate: &Artifact, policy: ClassifierPolicy) -> bool {
    reachable.same_package(candidate)
        && (policy == ClassifierPolicy::Ignore || reachable.classifier == candidate.classifier)
}

fn dedup_key(a: &Artifact, policy: ClassifierPolicy) -> (String, String, String, Option<String>) {
    let classifier = match policy {
        ClassifierPolicy::Ignore => None,
        ClassifierPolicy::Match => a.classifier.clone(),
    };
    (
        a.group.clone(),
        a.name.clone(),
        a.artifact_type.clone(),
        classifier,
    )
}

/// Keep the candidates that are still reachable from the graph's root.
///
/// Matching is version-independent. A match at a different version still
/// accepts the candidate and records a [`VersionMismatch`]; a candidate with
/// no match is dropped without complaint, since that is what pruning is for.
pub fn retain_artifacts(
    candidates: &[PackagingCandidate],
    graph: &DependencyGraph,
    policy: ClassifierPolicy,
) -> Retention {
    let reachable = graph.reachable_from_root();
    let mut retention = Retention::default();
    let mut seen = HashSet::new();

    for candidate in candidates {
        let declared = &candidate.artifact;
        let found: Vec<&Artifact> = reachable
            .iter()
            .copied()
            .filter(|r| matches(r, declared, policy))
            .collect();

        if found.is_empty() {
            debug!("Dropping {declared}: not reachable after pruning");
            retention.dropped.push(candidate.clone());
            continue;
        }

        if !seen.insert(dedup_key(declared, policy)) {
            debug!("Skipping duplicate candidate {declared}");
            continue;
        }

        if !found.iter().any(|r| r.version == declared.version) {
            let mismatch = VersionMismatch {
                declared: declared.clone(),
                resolved: found[0].clone(),
            };
            warn!("{mismatch}");
            retention.mismatches.push(mismatch);
        }
        retention.retained.push(candidate.clone());
    }

    retention
}
