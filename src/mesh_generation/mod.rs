//! Structured mesh generators.
//!
//! Grids are laid out row-major: vertex `(i, j)` has index `j * (nx + 1) + i`
//! and face `(i, j)` has index `j * nx + i`. Faces are wound counter-clockwise
//! seen from `+z`.

use crate::mesh_error::MeshFlattenError;
use crate::topology::handle::{FaceId, VertexId};
use crate::topology::mesh::EditMesh;

/// Output from a mesh generator, with handles in generation order.
#[derive(Clone, Debug)]
pub struct GeneratedMesh {
    pub mesh: EditMesh,
    pub vertices: Vec<VertexId>,
    pub faces: Vec<FaceId>,
}

fn invalid_geometry(message: impl Into<String>) -> MeshFlattenError {
    MeshFlattenError::InvalidGeometry(message.into())
}

/// Generate a flat `nx`×`ny` grid of square quads with edge length `spacing`.
pub fn quad_grid(nx: usize, ny: usize, spacing: f64) -> GeneratedMesh {
    quad_grid_with_heights(nx, ny, spacing, |_, _| 0.0)
}

/// Generate an `nx`×`ny` quad grid whose vertex heights are `height(x, y)`.
pub fn quad_grid_with_heights(
    nx: usize,
    ny: usize,
    spacing: f64,
    height: impl Fn(f64, f64) -> f64,
) -> GeneratedMesh {
    let mut mesh = EditMesh::new();
    let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            let (x, y) = (i as f64 * spacing, j as f64 * spacing);
            vertices.push(mesh.add_vertex([x, y, height(x, y)]));
        }
    }

    let row = nx + 1;
    let mut faces = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let quad = [
                vertices[j * row + i],
                vertices[j * row + i + 1],
                vertices[(j + 1) * row + i + 1],
                vertices[(j + 1) * row + i],
            ];
            // Grid quads have distinct vertices and at most two faces per edge.
            if let Ok(f) = mesh.add_face(&quad) {
                faces.push(f);
            }
        }
    }

    GeneratedMesh {
        mesh,
        vertices,
        faces,
    }
}

/// Build a mesh from a polygon soup: `polygons` index into `points`.
pub fn from_polygons(
    points: &[[f64; 3]],
    polygons: &[Vec<usize>],
) -> Result<GeneratedMesh, MeshFlattenError> {
    let mut mesh = EditMesh::new();
    let vertices: Vec<VertexId> = points.iter().map(|&co| mesh.add_vertex(co)).collect();

    let mut faces = Vec::with_capacity(polygons.len());
    for (poly_idx, polygon) in polygons.iter().enumerate() {
        let mut cycle = Vec::with_capacity(polygon.len());
        for &vidx in polygon {
            let v = *vertices.get(vidx).ok_or_else(|| {
                invalid_geometry(format!("polygon {poly_idx} references missing vertex {vidx}"))
            })?;
            cycle.push(v);
        }
        let f = mesh
            .add_face(&cycle)
            .map_err(|err| invalid_geometry(format!("polygon {poly_idx}: {err}")))?;
        faces.push(f);
    }

    Ok(GeneratedMesh {
        mesh,
        vertices,
        faces,
    })
}
