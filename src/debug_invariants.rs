//! Incidence invariant checks.
//!
//! [`EditMesh`](crate::topology::mesh::EditMesh) implements
//! [`DebugInvariants`] through
//! [`validate_mesh_topology`](crate::topology::validation::validate_mesh_topology):
//! - every face has at least three distinct vertices and one edge per side,
//!   each joining the side's two vertices and listing the face back;
//! - every edge joins two different live vertices that list it, is the one
//!   the edge lookup returns for its vertex pair, and only lists faces that
//!   use it;
//! - every vertex only lists live edges that touch it.
//!
//! [`EditSession::commit`](crate::topology::session::EditSession::commit)
//! runs the check in debug builds and with the `strict-invariants` or
//! `check-invariants` feature.

use crate::mesh_error::MeshFlattenError;

/// Structures whose internal cross-references can be verified.
pub trait DebugInvariants {
    /// Panic on a broken invariant when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// The first broken invariant as [`MeshFlattenError::CorruptTopology`].
    fn validate_invariants(&self) -> Result<(), MeshFlattenError>;
}

/// Panic with the error of `$expr` when invariant checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_generation::quad_grid;

    #[test]
    fn grid_passes_every_check() {
        let grid = quad_grid(2, 2, 1.0);
        grid.mesh.validate_invariants().unwrap();
        grid.mesh.debug_assert_invariants();
    }

    #[test]
    fn edits_keep_the_mesh_consistent() {
        let grid = quad_grid(2, 2, 1.0);
        let mut mesh = grid.mesh;
        mesh.flip_face(grid.faces[0]).unwrap();
        mesh.merge_vertex(grid.vertices[1], grid.vertices[0]).unwrap();
        mesh.remove_vertex(grid.vertices[8]).unwrap();
        assert_eq!(mesh.face_count(), 3);
        mesh.validate_invariants().unwrap();
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "[invariants] edit check")]
    fn macro_panics_on_error() {
        let broken: Result<(), MeshFlattenError> =
            Err(MeshFlattenError::CorruptTopology("dangling edge".into()));
        crate::debug_invariants!(broken, "edit check");
    }
}
