//! Boundary classification utilities.
//!
//! These helpers classify the edges of a face set as boundary or interior
//! based on how many faces of the set use them.

use hashbrown::HashSet;

use crate::mesh_error::MeshFlattenError;
use crate::topology::handle::{EdgeId, FaceId};
use crate::topology::mesh::EditMesh;

/// Classified boundary/interior edge sets, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundaryClassification {
    pub boundary: Vec<EdgeId>,
    pub interior: Vec<EdgeId>,
}

/// Classify edges of `faces` by the number of member faces linked to them.
///
/// Edges with **exactly one** member face are boundary; edges with two or
/// more are interior. Stale faces are skipped.
pub fn classify_boundary_edges(
    mesh: &EditMesh,
    faces: &[FaceId],
) -> Result<BoundaryClassification, MeshFlattenError> {
    let members: HashSet<FaceId> = faces.iter().copied().collect();
    let mut seen = HashSet::new();
    let mut boundary = Vec::new();
    let mut interior = Vec::new();

    for &f in faces {
        let Ok(face) = mesh.face(f) else {
            continue;
        };
        for &e in face.edges() {
            if !seen.insert(e) {
                continue;
            }
            let linked = mesh
                .edge(e)?
                .faces()
                .iter()
                .filter(|g| members.contains(*g))
                .count();
            if linked == 1 {
                boundary.push(e);
            } else {
                interior.push(e);
            }
        }
    }

    Ok(BoundaryClassification { boundary, interior })
}

/// Boundary edges of `faces` (see [`classify_boundary_edges`]).
pub fn boundary_edges(mesh: &EditMesh, faces: &[FaceId]) -> Result<Vec<EdgeId>, MeshFlattenError> {
    classify_boundary_edges(mesh, faces).map(|c| c.boundary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_generation::quad_grid;

    #[test]
    fn grid_boundary_and_interior() {
        let grid = quad_grid(2, 2, 1.0);
        let c = classify_boundary_edges(&grid.mesh, &grid.faces).unwrap();
        assert_eq!(c.boundary.len(), 8);
        assert_eq!(c.interior.len(), 4);
    }

    #[test]
    fn partial_selection_counts_only_members() {
        let grid = quad_grid(2, 1, 1.0);
        // One quad of two: the shared edge is a boundary of the subset.
        let c = classify_boundary_edges(&grid.mesh, &grid.faces[..1]).unwrap();
        assert_eq!(c.boundary.len(), 4);
        assert!(c.interior.is_empty());
    }
}
