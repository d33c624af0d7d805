//! Reference plane of a face selection, per [`PlaneMode`].

use crate::algs::selection::Selection;
use crate::config::PlaneMode;
use crate::geometry::metrics::centroid;
use crate::geometry::plane::{Plane, average_normal, best_fit_plane};
use crate::mesh_error::MeshFlattenError;
use crate::topology::mesh::EditMesh;

/// Area-weighted average normal of the selected faces.
pub fn selection_average_normal(
    mesh: &EditMesh,
    selection: &Selection,
) -> Result<[f64; 3], MeshFlattenError> {
    let mut weighted = Vec::with_capacity(selection.faces.len());
    for &f in &selection.faces {
        if !mesh.is_face_valid(f) {
            continue;
        }
        weighted.push((mesh.face_normal(f)?, mesh.face_area(f)?));
    }
    Ok(average_normal(weighted))
}

/// Compute the plane the selection is flattened onto.
///
/// `ActiveFace` fails with [`MeshFlattenError::InvalidActiveFace`] when no
/// valid active face is part of the selection.
pub fn estimate_plane(
    mesh: &EditMesh,
    selection: &Selection,
    mode: PlaneMode,
) -> Result<Plane, MeshFlattenError> {
    match mode {
        PlaneMode::BestFit => Ok(best_fit_plane(&selection.positions(mesh))),
        PlaneMode::ActiveFace => {
            let active = mesh
                .active_face()
                .filter(|&f| selection.contains_face(f))
                .ok_or(MeshFlattenError::InvalidActiveFace)?;
            Ok(Plane::new(
                mesh.face_center_median(active)?,
                mesh.face_normal(active)?,
            ))
        }
        PlaneMode::Average => Ok(Plane::new(
            centroid(&selection.positions(mesh)),
            selection_average_normal(mesh, selection)?,
        )),
    }
}
