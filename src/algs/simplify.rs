//! Collinear boundary simplification.

use crate::algs::dissolve::{DissolveReport, dissolve_vertices};
use crate::geometry::metrics::{EPS, angle_between, norm, sub};
use crate::mesh_error::MeshFlattenError;
use crate::topology::handle::VertexId;
use crate::topology::mesh::EditMesh;

/// Vertices of the cyclic `verts` whose turn angle is within `tolerance`
/// (radians) of a straight line.
///
/// Inactive for `tolerance <= 0` or loops shorter than four vertices.
/// Stale vertices, vertices next to a zero-length edge and vertices that
/// belong to an unselected face are never returned.
pub fn collinear_vertices(mesh: &EditMesh, verts: &[VertexId], tolerance: f64) -> Vec<VertexId> {
    let n = verts.len();
    if !(tolerance > 0.0) || n < 4 {
        return Vec::new();
    }

    let mut marked = Vec::new();
    for i in 0..n {
        let (prev, v, next) = (verts[(i + n - 1) % n], verts[i], verts[(i + 1) % n]);
        let (Ok(p), Ok(c), Ok(q)) = (mesh.co(prev), mesh.co(v), mesh.co(next)) else {
            continue;
        };
        let a = sub(p, c);
        let b = sub(q, c);
        if norm(a) < EPS || norm(b) < EPS {
            continue;
        }
        if (std::f64::consts::PI - angle_between(a, b)).abs() > tolerance {
            continue;
        }
        let all_selected = mesh.vertex_faces(v).is_ok_and(|faces| {
            faces
                .iter()
                .all(|&f| mesh.face(f).is_ok_and(|face| face.select))
        });
        if all_selected {
            marked.push(v);
        }
    }
    marked
}

/// Dissolve the collinear vertices of the boundary loop `verts`.
pub fn dissolve_collinear_boundary(
    mesh: &mut EditMesh,
    verts: &[VertexId],
    tolerance: f64,
) -> Result<DissolveReport, MeshFlattenError> {
    let marked = collinear_vertices(mesh, verts, tolerance);
    if marked.is_empty() {
        return Ok(DissolveReport::default());
    }
    log::debug!("simplify: dissolving {} collinear boundary vertices", marked.len());
    dissolve_vertices(mesh, &marked)
}
