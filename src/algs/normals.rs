//! Face orientation.
//!
//! Two faces sharing an edge are consistently wound when they walk that edge
//! in opposite directions. [`recalc_face_normals`] flips a face when most of
//! its neighbours disagree with it.

use crate::mesh_error::MeshFlattenError;
use crate::topology::handle::FaceId;
use crate::topology::mesh::EditMesh;

/// Re-orient each face of `faces` by majority vote over its edge neighbours.
///
/// Faces without neighbours, or with a tie, keep their winding. Returns the
/// number of faces flipped.
pub fn recalc_face_normals(mesh: &mut EditMesh, faces: &[FaceId]) -> Result<usize, MeshFlattenError> {
    let mut flipped = 0;
    for &f in faces {
        if !mesh.is_face_valid(f) {
            continue;
        }
        let (agree, disagree) = neighbour_votes(mesh, f)?;
        if disagree > agree {
            mesh.flip_face(f)?;
            flipped += 1;
        }
    }
    if flipped > 0 {
        log::debug!("recalc normals: flipped {flipped} faces");
    }
    Ok(flipped)
}

/// `(consistent, inconsistent)` neighbour counts for `f`.
fn neighbour_votes(mesh: &EditMesh, f: FaceId) -> Result<(usize, usize), MeshFlattenError> {
    let face = mesh.face(f)?;
    let (mut agree, mut disagree) = (0, 0);
    let n = face.len();
    for (i, &e) in face.edges().iter().enumerate() {
        let (a, b) = (face.verts()[i], face.verts()[(i + 1) % n]);
        for &g in mesh.edge(e)?.faces() {
            if g == f {
                continue;
            }
            if mesh.face(g)?.has_directed_edge(a, b) {
                disagree += 1;
            } else {
                agree += 1;
            }
        }
    }
    Ok((agree, disagree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_generation::quad_grid;

    #[test]
    fn flipped_face_is_restored() {
        let grid = quad_grid(3, 1, 1.0);
        let mut mesh = grid.mesh;
        let middle = grid.faces[1];
        mesh.flip_face(middle).unwrap();
        assert_eq!(mesh.face_normal(middle).unwrap()[2], -1.0);

        assert_eq!(recalc_face_normals(&mut mesh, &[middle]).unwrap(), 1);
        assert_eq!(mesh.face_normal(middle).unwrap()[2], 1.0);
        assert_eq!(recalc_face_normals(&mut mesh, &grid.faces).unwrap(), 0);
    }

    #[test]
    fn isolated_face_is_left_alone() {
        let grid = quad_grid(1, 1, 1.0);
        let mut mesh = grid.mesh;
        mesh.flip_face(grid.faces[0]).unwrap();
        assert_eq!(recalc_face_normals(&mut mesh, &grid.faces).unwrap(), 0);
        assert_eq!(mesh.face_normal(grid.faces[0]).unwrap()[2], -1.0);
    }
}
