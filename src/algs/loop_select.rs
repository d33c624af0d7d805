//! Choosing one loop among several.
//!
//! Loops are compared by the absolute shoelace area of their projection into
//! the plane's `(u, v)` basis. Boundary edges that do not belong to the kept
//! loop are deleted with their faces, which fills the holes they enclosed.

use hashbrown::HashSet;

use crate::algs::delete::delete_edges;
use crate::geometry::metrics::signed_area_2d;
use crate::geometry::plane::Plane;
use crate::mesh_error::MeshFlattenError;
use crate::topology::handle::{EdgeId, VertexId};
use crate::topology::mesh::EditMesh;

/// Signed area of `verts` projected into `plane`'s basis. Stale vertices are skipped.
pub fn loop_signed_area(mesh: &EditMesh, verts: &[VertexId], plane: &Plane) -> f64 {
    let basis = plane.basis();
    let local: Vec<[f64; 2]> = verts
        .iter()
        .filter_map(|&v| mesh.co(v).ok())
        .map(|p| plane.to_local(p, basis))
        .collect();
    signed_area_2d(&local)
}

/// Absolute projected area of a loop.
pub fn loop_area(mesh: &EditMesh, verts: &[VertexId], plane: &Plane) -> f64 {
    loop_signed_area(mesh, verts, plane).abs()
}

/// Index of the loop to keep: the largest by projected area when
/// `keep_largest` is set (first wins on ties), otherwise the first loop.
pub fn choose_loop(
    mesh: &EditMesh,
    loops: &[Vec<VertexId>],
    plane: &Plane,
    keep_largest: bool,
) -> Option<usize> {
    if loops.is_empty() {
        return None;
    }
    if !keep_largest || loops.len() == 1 {
        return Some(0);
    }
    let mut best = 0;
    let mut best_area = f64::NEG_INFINITY;
    for (i, verts) in loops.iter().enumerate() {
        let area = loop_area(mesh, verts, plane);
        if area > best_area {
            best = i;
            best_area = area;
        }
    }
    Some(best)
}

/// Delete every edge of `boundary` that does not have both endpoints on `keep`.
///
/// Returns the number of edges deleted.
pub fn discard_minor_loops(
    mesh: &mut EditMesh,
    boundary: &[EdgeId],
    keep: &[VertexId],
) -> Result<usize, MeshFlattenError> {
    let kept: HashSet<VertexId> = keep.iter().copied().collect();
    let doomed: Vec<EdgeId> = boundary
        .iter()
        .copied()
        .filter(|&e| {
            mesh.edge(e)
                .is_ok_and(|edge| !edge.verts().iter().all(|v| kept.contains(v)))
        })
        .collect();
    if doomed.is_empty() {
        return Ok(0);
    }
    log::debug!("discarding {} boundary edges of minor loops", doomed.len());
    delete_edges(mesh, &doomed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::boundary::boundary_edges;
    use crate::algs::loops::edges_to_loops;
    use crate::mesh_generation::quad_grid;

    #[test]
    fn largest_loop_wins() {
        let grid = quad_grid(3, 3, 1.0);
        let mut mesh = grid.mesh;
        // Punch the centre quad out of the selection to get a hole.
        let faces: Vec<_> = grid
            .faces
            .iter()
            .copied()
            .enumerate()
            .filter(|&(i, _)| i != 4)
            .map(|(_, f)| f)
            .collect();
        let boundary = boundary_edges(&mesh, &faces).unwrap();
        let loops = edges_to_loops(&mesh, &boundary);
        assert_eq!(loops.len(), 2);

        let plane = Plane::fallback([0.0; 3]);
        let chosen = choose_loop(&mesh, &loops, &plane, true).unwrap();
        assert!((loop_area(&mesh, &loops[chosen], &plane) - 9.0).abs() < 1e-12);
        assert_eq!(choose_loop(&mesh, &loops, &plane, false), Some(0));

        // Dropping the hole's edges takes the centre quad and the four ring
        // quads using those edges; only the corners survive.
        let removed = discard_minor_loops(&mut mesh, &boundary, &loops[chosen]).unwrap();
        assert_eq!(removed, 4);
        assert_eq!(mesh.face_count(), 4);
        assert!(!mesh.is_face_valid(grid.faces[4]));
    }

    #[test]
    fn no_loops_no_choice() {
        let mesh = EditMesh::new();
        assert_eq!(choose_loop(&mesh, &[], &Plane::fallback([0.0; 3]), true), None);
    }
}
