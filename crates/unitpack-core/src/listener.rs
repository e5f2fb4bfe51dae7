//! The event contract between the external dependency resolver and unitpack.
//!
//! A resolver walks the dependency tree depth-first and reports what it does
//! through these callbacks, strictly in emission order. Implementors must
//! not reorder or look ahead.

use serde::{Deserialize, Serialize};
use unitpack_util::errors::PackResult;

use crate::artifact::{Artifact, Scope};

/// A dependency-management entry overriding a transitively declared artifact.
///
/// Only the fields that are set take effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedOverride {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub scope: Option<Scope>,
}

/// Callbacks fired by a dependency resolver while it collects a project's graph.
pub trait ResolutionListener {
    fn test_artifact(&mut self, _artifact: &Artifact) {}

    fn start_process_children(&mut self, artifact: &Artifact) -> PackResult<()>;

    fn end_process_children(&mut self, artifact: &Artifact) -> PackResult<()>;

    fn include_artifact(&mut self, artifact: &Artifact);

    /// `omitted` lost to `kept`, a declaration of the same dependency nearer to the root.
    fn omit_for_nearer(&mut self, omitted: &Artifact, kept: &Artifact) -> PackResult<()>;

    fn omit_for_cycle(&mut self, _artifact: &Artifact) {}

    fn update_scope(&mut self, artifact: &Artifact, scope: Scope) -> PackResult<()>;

    fn manage_artifact(&mut self, artifact: &Artifact, replacement: &ManagedOverride);

    fn update_scope_current_pom(&mut self, _artifact: &Artifact, _scope: &str) {}

    fn select_version_from_range(&mut self, _artifact: &Artifact) {}

    fn restrict_range(&mut self, _artifact: &Artifact, _replacement: &Artifact, _range: &str) {}
}

/// One recorded listener callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ResolutionEvent {
    TestArtifact {
        artifact: Artifact,
    },
    StartProcessChildren {
        artifact: Artifact,
    },
    EndProcessChildren {
        artifact: Artifact,
    },
    IncludeArtifact {
        artifact: Artifact,
    },
    OmitForNearer {
        omitted: Artifact,
        kept: Artifact,
    },
    OmitForCycle {
        artifact: Artifact,
    },
    UpdateScope {
        artifact: Artifact,
        scope: Scope,
    },
    ManageArtifact {
        artifact: Artifact,
        replacement: ManagedOverride,
    },
    UpdateScopeCurrentPom {
        artifact: Artifact,
        scope: String,
    },
    SelectVersionFromRange {
        artifact: Artifact,
    },
    RestrictRange {
        artifact: Artifact,
        replacement: Artifact,
        range: String,
    },
}

impl ResolutionEvent {
    /// Deliver this event to `listener`.
    pub fn dispatch<L: ResolutionListener + ?Sized>(&self, listener: &mut L) -> PackResult<()> {
        match self {
            ResolutionEvent::TestArtifact { artifact } => listener.test_artifact(artifact),
            ResolutionEvent::StartProcessChildren { artifact } => {
                listener.start_process_children(artifact)?
            }
            ResolutionEvent::EndProcessChildren { artifact } => {
                listener.end_process_children(artifact)?
            }
            ResolutionEvent::IncludeArtifact { artifact } => listener.include_artifact(artifact),
            ResolutionEvent::OmitForNearer { omitted, kept } => {
                listener.omit_for_nearer(omitted, kept)?
            }
            ResolutionEvent::OmitForCycle { artifact } => listener.omit_for_cycle(artifact),
            ResolutionEvent::UpdateScope { artifact, scope } => {
                listener.update_scope(artifact, *scope)?
            }
            ResolutionEvent::ManageArtifact {
                artifact,
                replacement,
            } => listener.manage_artifact(artifact, replacement),
            ResolutionEvent::UpdateScopeCurrentPom { artifact, scope } => {
                listener.update_scope_current_pom(artifact, scope)
            }
            ResolutionEvent::SelectVersionFromRange { artifact } => {
                listener.select_version_from_range(artifact)
            }
            ResolutionEvent::RestrictRange {
                artifact,
                replacement,
                range,
            } => listener.restrict_range(artifact, replacement, range),
        }
        Ok(())
    }
}

/// Replay a recorded event stream into `listener`, stopping at the first fatal error.
pub fn replay<L: ResolutionListener + ?Sized>(
    events: &[ResolutionEvent],
    listener: &mut L,
) -> PackResult<()> {
    for event in events {
        event.dispatch(listener)?;
    }
    Ok(())
}
