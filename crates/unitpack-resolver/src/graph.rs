//! Dependency graph keyed by conflict identity.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use unitpack_core::artifact::{Artifact, ConflictId, Scope};

/// The dependency graph of one packaging run, backed by petgraph.
///
/// Each [`ConflictId`] owns exactly one node for the lifetime of the graph.
/// A node's artifact is a single slot that mediation and dependency
/// management rewrite in place, so every parent sees the update.
pub struct DependencyGraph {
    graph: DiGraph<Artifact, ()>,
    index: HashMap<ConflictId, NodeIndex>,
    root: Option<NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
            root: None,
        }
    }

    /// Store `artifact` in the node for its conflict identity, creating the node if needed.
    pub fn upsert(&mut self, artifact: Artifact) -> NodeIndex {
        let key = artifact.conflict_id();
        if let Some(&idx) = self.index.get(&key) {
            self.graph[idx] = artifact;
            return idx;
        }
        let idx = self.graph.add_node(artifact);
        self.index.insert(key, idx);
        idx
    }

    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    pub fn set_root(&mut self, idx: NodeIndex) {
        self.root = Some(idx);
    }

    /// Link `parent -> child`. Children form a set, so relinking is a no-op.
    pub fn link(&mut self, parent: NodeIndex, child: NodeIndex) {
        if self.graph.find_edge(parent, child).is_none() {
            self.graph.add_edge(parent, child, ());
        }
    }

    /// Remove the `parent -> child` edge. Returns `false` if there was none.
    pub fn unlink(&mut self, parent: NodeIndex, child: NodeIndex) -> bool {
        match self.graph.find_edge(parent, child) {
            Some(edge) => {
                self.graph.remove_edge(edge);
                true
            }
            None => false,
        }
    }

    /// Look up the node for a conflict identity.
    pub fn find(&self, key: &ConflictId) -> Option<NodeIndex> {
        self.index.get(key).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &Artifact {
        &self.graph[idx]
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> &mut Artifact {
        &mut self.graph[idx]
    }

    /// Current children of a node, in the order they were linked.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        children.reverse();
        children
    }

    /// Current parents of a node.
    pub fn parents(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut parents: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .collect();
        parents.reverse();
        parents
    }

    /// Every artifact reachable from `from` through the current children
    /// sets, each collected once, in depth-first pre-order.
    pub fn reachable(&self, from: NodeIndex) -> Vec<&Artifact> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![from];
        while let Some(idx) = stack.pop() {
            if !visited.insert(idx) {
                continue;
            }
            out.push(&self.graph[idx]);
            for child in self.children(idx).into_iter().rev() {
                if !visited.contains(&child) {
                    stack.push(child);
                }
            }
        }
        out
    }

    /// Artifacts reachable from the root; empty when no root was ever set.
    pub fn reachable_from_root(&self) -> Vec<&Artifact> {
        match self.root {
            Some(root) => self.reachable(root),
            None => Vec::new(),
        }
    }

    /// All nodes in the registry, including ones no longer reachable.
    pub fn all_nodes(&self) -> Vec<&Artifact> {
        self.graph.node_indices().map(|idx| &self.graph[idx]).collect()
    }

    /// Print the graph below the root, grouping the root's children by scope.
    pub fn print_tree(&self, max_depth: Option<usize>) -> String {
        let mut output = String::new();
        let root = match self.root {
            Some(r) => r,
            None => return output,
        };

        output.push_str(&format!("{}\n", self.graph[root]));

        let deps = self.children(root);
        let sections: Vec<(Scope, Vec<NodeIndex>)> = [
            Scope::Compile,
            Scope::Runtime,
            Scope::Provided,
            Scope::System,
            Scope::Test,
        ]
        .into_iter()
        .map(|scope| {
            let members = deps
                .iter()
                .copied()
                .filter(|&idx| self.graph[idx].scope == scope)
                .collect::<Vec<_>>();
            (scope, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect();

        let show_headers =
            sections.len() > 1 || sections.iter().any(|(s, _)| *s != Scope::Compile);
        let mut visited = HashSet::new();
        visited.insert(root);

        let total_sections = sections.len();
        for (n, (scope, members)) in sections.iter().enumerate() {
            if show_headers {
                output.push_str(&format!("[{scope}]\n"));
            }
            let is_last_section = n + 1 == total_sections;
            let count = members.len();
            for (i, idx) in members.iter().enumerate() {
                let is_last = i == count - 1 && is_last_section;
                self.print_subtree(&mut output, *idx, "", is_last, 1, max_depth, &mut visited);
            }
        }

        output
    }

    #[allow(clippy::too_many_arguments)]
    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        depth: usize,
        max_depth: Option<usize>,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let node = &self.graph[idx];
        let marker = if node.optional { " (optional)" } else { "" };
        output.push_str(&format!("{prefix}{connector}{node}{marker}\n"));

        if let Some(max) = max_depth {
            if depth >= max {
                return;
            }
        }

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let deps = self.children(idx);
        let count = deps.len();
        for (i, child) in deps.iter().enumerate() {
            self.print_subtree(
                output,
                *child,
                &child_prefix,
                i == count - 1,
                depth + 1,
                max_depth,
                visited,
            );
        }

        visited.remove(&idx);
    }

    /// Find the path from the root to a dependency.
    ///
    /// Accepts either `group:name` or just `name`.
    pub fn find_path(&self, target_key: &str) -> Option<Vec<&Artifact>> {
        let root = self.root?;
        let target = self.resolve_key(target_key)?;
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        if self.dfs_path(root, target, &mut path, &mut visited) {
            Some(path.iter().map(|&idx| &self.graph[idx]).collect())
        } else {
            None
        }
    }

    /// Resolve a user-provided key to a node index.
    ///
    /// Tries `group:name` first, then falls back to matching by name alone.
    /// Candidates are scanned in `ConflictId` order so the pick is stable.
    fn resolve_key(&self, key: &str) -> Option<NodeIndex> {
        let mut ids: Vec<(&ConflictId, &NodeIndex)> = self.index.iter().collect();
        ids.sort();
        let mut by_name = None;
        for (id, &idx) in ids {
            if format!("{}:{}", id.group, id.name) == key {
                return Some(idx);
            }
            if by_name.is_none() && id.name == key {
                by_name = Some(idx);
            }
        }
        by_name
    }

    fn dfs_path(
        &self,
        current: NodeIndex,
        target: NodeIndex,
        path: &mut Vec<NodeIndex>,
        visited: &mut HashSet<NodeIndex>,
    ) -> bool {
        path.push(current);
        if current == target {
            return true;
        }
        if !visited.insert(current) {
            path.pop();
            return false;
        }
        for child in self.children(current) {
            if self.dfs_path(child, target, path, visited) {
                return true;
            }
        }
        path.pop();
        false
    }

    /// Number of nodes in the registry, root included.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
