//! Top-level module for mesh topology.
//!
//! This module provides the in-memory mesh the pipeline edits:
//! - Generation-tagged handles for vertices, edges and faces
//! - The `EditMesh` element tables and their mutation primitives
//! - Edit sessions bracketing one operation
//! - Validation of incidence invariants and non-manifold edges

pub(crate) mod arena;
pub mod handle;
pub mod mesh;
pub mod session;
pub mod validation;

pub use handle::{EdgeId, FaceId, VertexId};
pub use mesh::{Edge, EditMesh, Face, Vertex};
pub use session::EditSession;
