//! Record of the version decisions the resolver made while building the graph.

use std::fmt;

use unitpack_core::artifact::ConflictId;

/// Why a node's version was rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// A declaration nearer to the root won.
    NearestWins,
    /// A dependency-management entry overrode the declared version.
    Managed,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::NearestWins => f.write_str("nearest wins"),
            ConflictReason::Managed => f.write_str("dependency management"),
        }
    }
}

/// A report of all version conflicts mediated during graph construction.
#[derive(Debug, Default)]
pub struct ConflictReport {
    pub conflicts: Vec<VersionConflict>,
}

/// A single dependency whose requested version lost to another one.
#[derive(Debug, Clone)]
pub struct VersionConflict {
    pub id: ConflictId,
    pub requested: String,
    pub resolved: String,
    pub reason: ConflictReason,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, conflict: VersionConflict) {
        self.conflicts.push(conflict);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conflicts.is_empty() {
            return write!(f, "No version conflicts.");
        }
        writeln!(f, "Version conflicts ({}):", self.conflicts.len())?;
        for c in &self.conflicts {
            writeln!(
                f,
                "  {} requested {} but resolved {} ({})",
                c.id, c.requested, c.resolved, c.reason
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {} ({})",
            self.id, self.requested, self.resolved, self.reason
        )
    }
}
