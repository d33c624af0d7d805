//! MeshFlattenError: Unified error type for mesh-flatten public APIs
//!
//! Every fallible operation in the crate reports through [`MeshFlattenError`].
//! Face creation has its own narrower [`FaceCreateError`] because callers
//! routinely recover from one of its variants ([`FaceCreateError::Exists`]).

use thiserror::Error;

use crate::topology::handle::{FaceId, VertexId};

/// Coarse classification used by operator-facing reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The selection or the settings cannot be processed; nothing was mutated.
    UserSelection,
    /// The selection's boundary could not be turned into a usable loop.
    Topology,
    /// The single replacement face could not be created.
    Rebuild,
    /// A stale handle, stale lookup or corrupt topology was observed.
    Internal,
}

/// Unified error type for mesh-flatten operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshFlattenError {
    /// No face carries the selection flag.
    #[error("select a region of faces before running")]
    NoFacesSelected,
    /// The selected faces reference fewer than three distinct vertices.
    #[error("selection has {0} vertices, at least 3 are required")]
    TooFewVertices(usize),
    /// Active-face plane mode without a valid, selected active face.
    #[error("active face is missing or not part of the selection")]
    InvalidActiveFace,
    /// A setting lies outside its accepted range.
    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
    /// Several faces are selected but none of their edges is a boundary edge.
    #[error("selection has no open boundary (closed surface?)")]
    NoBoundary,
    /// Boundary edges exist but none of them close into a loop.
    #[error("boundary edges do not form a closed loop")]
    NoClosedLoop,
    /// Welding removed every selected face.
    #[error("selection became empty after welding")]
    SelectionLost,
    /// The chosen loop lost vertices during cleanup.
    #[error("boundary loop has {0} vertices after cleanup, at least 3 are required")]
    LoopTooShort(usize),
    /// The replacement face was rejected.
    #[error("could not create a single face: {0}")]
    RebuildFailed(FaceCreateError),
    /// A selected edge is shared by more than two faces.
    #[error("non-manifold edge {edge} has {faces} incident faces")]
    NonManifoldEdge { edge: String, faces: usize },
    /// A handle referred to an element that has been removed.
    #[error("stale {kind} handle {handle}")]
    StaleHandle { kind: &'static str, handle: String },
    /// A lookup snapshot was used after the mesh changed structurally.
    #[error("lookup built at epoch {built} used at epoch {current}")]
    StaleLookup { built: u64, current: u64 },
    /// Internal incidence tables disagree with each other.
    #[error("corrupt topology: {0}")]
    CorruptTopology(String),
    /// Generator input does not describe a valid mesh.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

impl MeshFlattenError {
    /// Classify the error for reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MeshFlattenError::NoFacesSelected
            | MeshFlattenError::TooFewVertices(_)
            | MeshFlattenError::InvalidActiveFace
            | MeshFlattenError::InvalidSetting { .. } => ErrorKind::UserSelection,
            MeshFlattenError::NoBoundary
            | MeshFlattenError::NoClosedLoop
            | MeshFlattenError::SelectionLost
            | MeshFlattenError::LoopTooShort(_)
            | MeshFlattenError::NonManifoldEdge { .. } => ErrorKind::Topology,
            MeshFlattenError::RebuildFailed(_) => ErrorKind::Rebuild,
            MeshFlattenError::StaleHandle { .. }
            | MeshFlattenError::StaleLookup { .. }
            | MeshFlattenError::CorruptTopology(_)
            | MeshFlattenError::InvalidGeometry(_) => ErrorKind::Internal,
        }
    }
}

/// Reasons a polygon cannot be created from a vertex cycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FaceCreateError {
    #[error("a face needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("vertex {0} appears twice in the cycle")]
    DuplicateVertex(VertexId),
    #[error("vertex {0} is no longer valid")]
    StaleVertex(VertexId),
    /// A face over the same (unordered) vertex set is already present.
    #[error("face {0} already uses these vertices")]
    Exists(FaceId),
    #[error("edge {0}-{1} already has two faces")]
    NonManifoldEdge(VertexId, VertexId),
    #[error("cycle is self-intersecting")]
    SelfIntersecting,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_taxonomy() {
        assert_eq!(MeshFlattenError::NoFacesSelected.kind(), ErrorKind::UserSelection);
        assert_eq!(MeshFlattenError::NoClosedLoop.kind(), ErrorKind::Topology);
        assert_eq!(
            MeshFlattenError::RebuildFailed(FaceCreateError::SelfIntersecting).kind(),
            ErrorKind::Rebuild
        );
        assert_eq!(
            MeshFlattenError::StaleLookup { built: 1, current: 2 }.kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn messages_are_operator_facing() {
        let err = MeshFlattenError::TooFewVertices(2);
        assert_eq!(err.to_string(), "selection has 2 vertices, at least 3 are required");
        let err = MeshFlattenError::RebuildFailed(FaceCreateError::SelfIntersecting);
        assert_eq!(err.to_string(), "could not create a single face: cycle is self-intersecting");
    }
}
