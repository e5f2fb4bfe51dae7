//! Packaging graph engine: builds the dependency graph from resolver events
//! with nearest-wins mediation and dependency-management overrides, prunes
//! branches that must not be bundled, and reconciles packaging candidates
//! against what remains reachable.

pub mod builder;
pub mod conflict;
pub mod graph;
pub mod mutate;
pub mod retain;
