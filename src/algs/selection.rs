//! Selection snapshots.
//!
//! A [`Selection`] records the selected faces, their distinct vertices and
//! the mesh epoch it was harvested at. Structural edits invalidate it; call
//! [`Selection::ensure_current`] before trusting it again, or re-harvest.

use itertools::Itertools;

use crate::mesh_error::MeshFlattenError;
use crate::topology::handle::{FaceId, VertexId};
use crate::topology::mesh::EditMesh;

/// Selected faces and their vertex set at one epoch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Selected faces in arena order.
    pub faces: Vec<FaceId>,
    /// Distinct vertices of `faces`, in first-seen face order.
    pub verts: Vec<VertexId>,
    epoch: u64,
}

impl Selection {
    /// Gathers the selected faces of `mesh`. May be empty.
    pub fn harvest(mesh: &EditMesh) -> Self {
        let faces = mesh.selected_faces();
        let verts = faces
            .iter()
            .filter_map(|&f| mesh.face(f).ok())
            .flat_map(|face| face.verts().iter().copied())
            .unique()
            .collect();
        Self {
            faces,
            verts,
            epoch: mesh.epoch(),
        }
    }

    /// Harvest and reject selections the pipeline cannot work on.
    pub fn harvest_checked(mesh: &EditMesh) -> Result<Self, MeshFlattenError> {
        let selection = Self::harvest(mesh);
        if selection.faces.is_empty() {
            return Err(MeshFlattenError::NoFacesSelected);
        }
        if selection.verts.len() < 3 {
            return Err(MeshFlattenError::TooFewVertices(selection.verts.len()));
        }
        Ok(selection)
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Epoch the snapshot was taken at.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_current(&self, mesh: &EditMesh) -> bool {
        self.epoch == mesh.epoch()
    }

    pub fn ensure_current(&self, mesh: &EditMesh) -> Result<(), MeshFlattenError> {
        if self.is_current(mesh) {
            Ok(())
        } else {
            Err(MeshFlattenError::StaleLookup {
                built: self.epoch,
                current: mesh.epoch(),
            })
        }
    }

    /// Current positions of the still-valid selected vertices.
    pub fn positions(&self, mesh: &EditMesh) -> Vec<[f64; 3]> {
        self.verts.iter().filter_map(|&v| mesh.co(v).ok()).collect()
    }

    pub fn contains_face(&self, f: FaceId) -> bool {
        self.faces.contains(&f)
    }
}
