//! Orthogonal projection of vertices onto a plane.

use crate::geometry::plane::Plane;
use crate::mesh_error::MeshFlattenError;
use crate::topology::handle::VertexId;
use crate::topology::mesh::EditMesh;

/// Move every valid vertex of `verts` onto `plane`; returns how many moved.
pub fn project_vertices(
    mesh: &mut EditMesh,
    verts: &[VertexId],
    plane: &Plane,
) -> Result<usize, MeshFlattenError> {
    let mut moved = 0;
    for &v in verts {
        let Ok(co) = mesh.co(v) else {
            log::trace!("project: skipping stale vertex {v}");
            continue;
        };
        mesh.set_co(v, plane.project(co))?;
        moved += 1;
    }
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertices_land_on_plane() {
        let mut mesh = EditMesh::new();
        let a = mesh.add_vertex([0.0, 0.0, 1.0]);
        let b = mesh.add_vertex([3.0, -2.0, -4.0]);
        let gone = mesh.add_vertex([1.0, 1.0, 1.0]);
        mesh.remove_vertex(gone).unwrap();

        let plane = Plane::new([0.0, 0.0, 0.5], [0.0, 0.0, 2.0]);
        assert_eq!(project_vertices(&mut mesh, &[a, b, gone], &plane).unwrap(), 2);
        assert_eq!(mesh.co(a).unwrap(), [0.0, 0.0, 0.5]);
        assert_eq!(mesh.co(b).unwrap(), [3.0, -2.0, 0.5]);
    }
}
