//! Element-context deletion.
//!
//! Deleting an element that is already gone is a no-op, logged at trace level.
//! Every function returns how many of the requested elements it removed.

use hashbrown::HashSet;

use crate::mesh_error::MeshFlattenError;
use crate::topology::handle::{EdgeId, FaceId, VertexId};
use crate::topology::mesh::EditMesh;

/// Remove faces only; their edges and vertices stay.
pub fn delete_faces(mesh: &mut EditMesh, faces: &[FaceId]) -> Result<usize, MeshFlattenError> {
    let mut removed = 0;
    for &f in faces {
        if !mesh.is_face_valid(f) {
            log::trace!("delete_faces: {f} already removed");
            continue;
        }
        mesh.remove_face(f)?;
        removed += 1;
    }
    Ok(removed)
}

/// Remove edges, every face using them and endpoints left without edges.
pub fn delete_edges(mesh: &mut EditMesh, edges: &[EdgeId]) -> Result<usize, MeshFlattenError> {
    let mut removed = 0;
    let mut endpoints = HashSet::new();
    for &e in edges {
        let Ok(edge) = mesh.edge(e) else {
            log::trace!("delete_edges: {e} already removed");
            continue;
        };
        endpoints.extend(edge.verts());
        mesh.remove_edge(e)?;
        removed += 1;
    }
    for v in endpoints {
        if mesh.vertex(v).is_ok_and(|vert| vert.edges().is_empty()) {
            mesh.remove_vertex(v)?;
        }
    }
    Ok(removed)
}

/// Remove vertices together with their edges and faces.
pub fn delete_vertices(
    mesh: &mut EditMesh,
    verts: &[VertexId],
) -> Result<usize, MeshFlattenError> {
    let mut removed = 0;
    for &v in verts {
        if !mesh.is_vertex_valid(v) {
            log::trace!("delete_vertices: {v} already removed");
            continue;
        }
        mesh.remove_vertex(v)?;
        removed += 1;
    }
    Ok(removed)
}
