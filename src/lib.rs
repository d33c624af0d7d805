#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-flatten
//!
//! mesh-flatten takes a connected, possibly non-planar patch of selected
//! polygon faces and replaces it with one flat polygon covering the patch's
//! outer boundary. Interior vertices, edges and faces are discarded.
//!
//! ## Pipeline
//! 1. harvest the selected faces and their vertices,
//! 2. estimate a reference plane (best fit, active face or area-weighted average),
//! 3. project the selected vertices onto it,
//! 4. optionally merge near-duplicate vertices,
//! 5. walk the selection's boundary edges into closed loops,
//! 6. keep the largest loop and fill the holes the others bound,
//! 7. optionally dissolve collinear boundary vertices,
//! 8. delete the selection and create one face from the loop,
//! 9. select the new face and fix its orientation.
//!
//! ## Usage
//! ```
//! use mesh_flatten::prelude::*;
//! use mesh_flatten::mesh_generation::quad_grid;
//!
//! let grid = quad_grid(3, 3, 1.0);
//! let mut mesh = grid.mesh;
//! for &f in &grid.faces {
//!     mesh.set_face_select(f, true).unwrap();
//! }
//! let report = planarize_selection(&mut mesh, &PlanarizeSettings::default());
//! assert!(report.is_finished());
//! assert_eq!(mesh.face_count(), 1);
//! ```
//!
//! ## Invariant checking
//! [`EditSession::commit`](topology::session::EditSession::commit) validates
//! mesh incidence in debug builds, or always with the `strict-invariants` /
//! `check-invariants` features.
//!
//! ## Logging
//! The crate logs through the [`log`] facade and never installs a logger.

pub mod algs;
pub mod config;
pub mod debug_invariants;
pub mod geometry;
pub mod mesh_error;
pub mod mesh_generation;
pub mod planarize;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::config::{PlanarizeSettings, PlaneMode};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::plane::{Plane, best_fit_plane};
    pub use crate::mesh_error::{ErrorKind, FaceCreateError, MeshFlattenError};
    pub use crate::planarize::{
        OperatorStatus, PlanarizeOutcome, PlanarizePreview, PlanarizeReport, Stage,
        planarize_selection, preview, try_planarize_selection,
    };
    pub use crate::topology::handle::{EdgeId, FaceId, VertexId};
    pub use crate::topology::mesh::EditMesh;
    pub use crate::topology::session::EditSession;
}
