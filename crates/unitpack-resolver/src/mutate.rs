//! Exclusion marking and pruning of branches that must not be bundled.
//!
//! Pruning edits the children sets in place and cannot be undone. Finish
//! collecting exclusions before calling [`DependencyGraph::prune_tree`].

use std::collections::HashSet;

use petgraph::graph::NodeIndex;
use tracing::debug;
use unitpack_core::artifact::{Artifact, Coordinate};

use crate::graph::DependencyGraph;

/// Artifacts, by exact coordinate, whose edges are cut during pruning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeSet {
    coordinates: HashSet<Coordinate>,
}

impl ExcludeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the artifact was already excluded.
    pub fn insert(&mut self, artifact: &Artifact) -> bool {
        self.coordinates.insert(artifact.coordinate())
    }

    pub fn remove(&mut self, artifact: &Artifact) -> bool {
        self.coordinates.remove(&artifact.coordinate())
    }

    pub fn contains(&self, artifact: &Artifact) -> bool {
        self.coordinates.contains(&artifact.coordinate())
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

}

/// Whether an edge into `child` must never produce bundled output.
fn must_prune(child: &Artifact, excludes: &ExcludeSet) -> bool {
    child.optional || !child.scope.is_runtime_classpath() || excludes.contains(child)
}

impl DependencyGraph {
    /// Add `node` and everything currently below it to `excludes`.
    pub fn exclude_branch(&self, node: NodeIndex, excludes: &mut ExcludeSet) {
        let mut visited = HashSet::new();
        let mut stack = vec![node];
        while let Some(idx) = stack.pop() {
            if !visited.insert(idx) {
                continue;
            }
            excludes.insert(self.node(idx));
            stack.extend(self.children(idx));
        }
    }

    /// Cut every edge below `node` that leads to an optional artifact, an
    /// artifact outside the compile/runtime scopes, or an excluded artifact.
    /// Surviving children are pruned recursively.
    pub fn prune_tree(&mut self, node: NodeIndex, excludes: &ExcludeSet) {
        let mut visited = HashSet::new();
        let mut stack = vec![node];
        while let Some(idx) = stack.pop() {
            if !visited.insert(idx) {
                continue;
            }
            for child in self.children(idx) {
                if must_prune(self.node(child), excludes) {
                    debug!("Pruning {} from {}", self.node(child), self.node(idx));
                    self.unlink(idx, child);
                } else if !visited.contains(&child) {
                    stack.push(child);
                }
            }
        }
    }

    /// Detach `node` from every parent. Its own children are kept.
    pub fn remove_branch(&mut self, node: NodeIndex) {
        for parent in self.parents(node) {
            self.unlink(parent, node);
        }
    }

    /// Drop every child edge of `node`.
    pub fn remove_children(&mut self, node: NodeIndex) {
        for child in self.children(node) {
            self.unlink(node, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unitpack_core::artifact::Scope;

    fn make_node(group: &str, name: &str, version: &str) -> Artifact {
        Artifact::new(group, name, version)
    }

    fn snapshot(g: &DependencyGraph) -> Vec<(String, Vec<String>)> {
        let mut out: Vec<(String, Vec<String>)> = g
            .all_nodes()
            .iter()
            .map(|a| {
                let idx = g.find(&a.conflict_id()).unwrap();
                let mut children: Vec<String> = g
                    .children(idx)
                    .into_iter()
                    .map(|c| g.node(c).to_string())
                    .collect();
                children.sort();
                (a.to_string(), children)
            })
            .collect();
        out.sort();
        out
    }

    /// root -> a -> b -> c, root -> opt (optional), root -> t (test), a -> p (provided)
    fn sample() -> (DependencyGraph, [NodeIndex; 7]) {
        let mut g = DependencyGraph::new();
        let root = g.upsert(make_node("com.example", "app", "1.0"));
        g.set_root(root);
        let a = g.upsert(make_node("org.a", "a", "1.0"));
        let b = g.upsert(make_node("org.b", "b", "1.0").with_scope(Scope::Runtime));
        let c = g.upsert(make_node("org.c", "c", "1.0"));
        let opt = g.upsert(make_node("opt", "bar", "2.0").with_optional(true));
        let t = g.upsert(make_node("org.t", "t", "1.0").with_scope(Scope::Test));
        let p = g.upsert(make_node("org.p", "p", "1.0").with_scope(Scope::Provided));
        g.link(root, a);
        g.link(a, b);
        g.link(b, c);
        g.link(root, opt);
        g.link(root, t);
        g.link(a, p);
        (g, [root, a, b, c, opt, t, p])
    }

    #[test]
    fn exclude_branch_covers_every_descendant() {
        let (g, [_, a, b, c, _, _, p]) = sample();
        let mut excludes = ExcludeSet::new();
        g.exclude_branch(a, &mut excludes);
        for idx in [a, b, c, p] {
            assert!(excludes.contains(g.node(idx)));
        }
        assert_eq!(excludes.len(), 4);
    }

    #[test]
    fn exclude_branch_follows_live_children() {
        let (mut g, [_, a, b, c, _, _, _]) = sample();
        g.unlink(b, c);
        let mut excludes = ExcludeSet::new();
        g.exclude_branch(a, &mut excludes);
        assert!(excludes.contains(g.node(b)));
        assert!(!excludes.contains(g.node(c)));
    }

    #[test]
    fn exclude_branch_terminates_on_cycles() {
        let (mut g, [_, a, _, c, _, _, _]) = sample();
        g.link(c, a);
        let mut excludes = ExcludeSet::new();
        g.exclude_branch(a, &mut excludes);
        assert_eq!(excludes.len(), 4);
    }

    #[test]
    fn prune_removes_optional_and_out_of_scope_edges() {
        let (mut g, [root, a, b, c, opt, t, p]) = sample();
        g.prune_tree(root, &ExcludeSet::new());
        assert_eq!(g.children(root), vec![a]);
        assert_eq!(g.children(a), vec![b]);
        assert_eq!(g.children(b), vec![c]);
        let reachable: Vec<&Artifact> = g.reachable_from_root();
        for idx in [opt, t, p] {
            assert!(!reachable.contains(&g.node(idx)));
        }
    }

    #[test]
    fn prune_cuts_excluded_artifacts() {
        let (mut g, [root, a, b, _, _, _, _]) = sample();
        let mut excludes = ExcludeSet::new();
        excludes.insert(g.node(b));
        g.prune_tree(root, &excludes);
        assert!(g.children(a).is_empty());
        assert_eq!(g.reachable_from_root().len(), 2);
    }

    #[test]
    fn prune_is_monotone_and_idempotent() {
        let (mut g, [root, ..]) = sample();
        let before: Vec<usize> = g
            .all_nodes()
            .iter()
            .map(|a| g.children(g.find(&a.conflict_id()).unwrap()).len())
            .collect();
        let mut excludes = ExcludeSet::new();
        excludes.insert(&make_node("org.c", "c", "1.0"));

        g.prune_tree(root, &excludes);
        let after: Vec<usize> = g
            .all_nodes()
            .iter()
            .map(|a| g.children(g.find(&a.conflict_id()).unwrap()).len())
            .collect();
        assert!(before.iter().zip(&after).all(|(b, a)| a <= b));

        let once = snapshot(&g);
        g.prune_tree(root, &excludes);
        assert_eq!(snapshot(&g), once);
    }

    #[test]
    fn exclusion_matches_exact_version_only() {
        let (mut g, [root, a, _, _, _, _, _]) = sample();
        let mut excludes = ExcludeSet::new();
        excludes.insert(&make_node("org.a", "a", "9.9"));
        g.prune_tree(root, &excludes);
        assert_eq!(g.children(root), vec![a]);
    }

    #[test]
    fn remove_branch_detaches_from_all_parents() {
        let (mut g, [root, a, b, c, _, _, _]) = sample();
        g.link(root, c);
        g.remove_branch(c);
        assert!(g.parents(c).is_empty());
        assert!(!g.children(b).contains(&c));
        assert!(!g.children(root).contains(&c));
        assert!(g.children(a).contains(&b));
        // Detaching twice is harmless.
        g.remove_branch(c);
    }

    #[test]
    fn remove_children_clears_only_outgoing_edges() {
        let (mut g, [root, a, b, _, _, _, _]) = sample();
        g.remove_children(a);
        assert!(g.children(a).is_empty());
        assert!(g.parents(b).is_empty());
        assert!(g.children(root).contains(&a));
    }
}
