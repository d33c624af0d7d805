//! Topology validation helpers.
//!
//! [`validate_mesh_topology`] checks that the incidence tables of an
//! [`EditMesh`] agree with each other; it backs the mesh's
//! [`DebugInvariants`] implementation. [`validate_non_manifold_edges`] counts
//! incident faces per edge of a face set, the way the pipeline screens a
//! selection before walking its boundary.

use hashbrown::HashSet;
use itertools::Itertools;

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshFlattenError;
use crate::topology::handle::FaceId;
use crate::topology::mesh::EditMesh;

/// Behavior for non-manifold detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonManifoldHandling {
    /// Skip non-manifold detection.
    Ignore,
    /// Log a warning on non-manifold entities.
    Warn,
    /// Return an error on non-manifold entities.
    Error,
}

fn corrupt(message: String) -> MeshFlattenError {
    MeshFlattenError::CorruptTopology(message)
}

/// Check face/edge/vertex incidence symmetry and the edge lookup table.
pub fn validate_mesh_topology(mesh: &EditMesh) -> Result<(), MeshFlattenError> {
    for (f, face) in mesh.faces() {
        if face.len() < 3 {
            return Err(corrupt(format!("face {f} has {} vertices", face.len())));
        }
        if face.edges().len() != face.len() {
            return Err(corrupt(format!(
                "face {f} has {} vertices but {} edges",
                face.len(),
                face.edges().len()
            )));
        }
        if !face.verts().iter().all_unique() {
            return Err(corrupt(format!("face {f} repeats a vertex")));
        }
        for (i, (&a, &b)) in face.verts().iter().circular_tuple_windows().enumerate() {
            let e = face.edges()[i];
            let edge = mesh
                .edge(e)
                .map_err(|_| corrupt(format!("face {f} references stale edge {e}")))?;
            if !(edge.contains(a) && edge.contains(b)) {
                return Err(corrupt(format!("face {f} edge {e} does not join {a}-{b}")));
            }
            if !edge.faces().contains(&f) {
                return Err(corrupt(format!("edge {e} does not list face {f}")));
            }
        }
    }

    for (e, edge) in mesh.edges() {
        let [a, b] = edge.verts();
        if a == b {
            return Err(corrupt(format!("edge {e} is a self-loop on {a}")));
        }
        for v in [a, b] {
            let vert = mesh
                .vertex(v)
                .map_err(|_| corrupt(format!("edge {e} references stale vertex {v}")))?;
            if !vert.edges().contains(&e) {
                return Err(corrupt(format!("vertex {v} does not list edge {e}")));
            }
        }
        if mesh.edge_between(a, b) != Some(e) {
            return Err(corrupt(format!("edge lookup for {a}-{b} does not resolve to {e}")));
        }
        for &f in edge.faces() {
            let face = mesh
                .face(f)
                .map_err(|_| corrupt(format!("edge {e} references stale face {f}")))?;
            if !face.edges().contains(&e) {
                return Err(corrupt(format!("face {f} does not list edge {e}")));
            }
        }
    }

    for (v, vert) in mesh.vertices() {
        for &e in vert.edges() {
            let edge = mesh
                .edge(e)
                .map_err(|_| corrupt(format!("vertex {v} references stale edge {e}")))?;
            if !edge.contains(v) {
                return Err(corrupt(format!("vertex {v} lists foreign edge {e}")));
            }
        }
    }

    Ok(())
}

/// Detect edges of `faces` that are shared by more than two faces of the set.
///
/// Returns the number of non-manifold edges found (always 0 with `Ignore`).
pub fn validate_non_manifold_edges(
    mesh: &EditMesh,
    faces: &[FaceId],
    handling: NonManifoldHandling,
) -> Result<usize, MeshFlattenError> {
    if handling == NonManifoldHandling::Ignore {
        return Ok(0);
    }

    let members: HashSet<FaceId> = faces.iter().copied().collect();
    let mut seen = HashSet::new();
    let mut found = 0;
    for &f in faces {
        for &e in mesh.face(f)?.edges() {
            if !seen.insert(e) {
                continue;
            }
            let count = mesh
                .edge(e)?
                .faces()
                .iter()
                .filter(|face| members.contains(*face))
                .count();
            if count > 2 {
                found += 1;
                match handling {
                    NonManifoldHandling::Warn => {
                        log::warn!("Non-manifold edge detected: edge={e} incident_faces={count}");
                    }
                    NonManifoldHandling::Error => {
                        return Err(MeshFlattenError::NonManifoldEdge {
                            edge: e.to_string(),
                            faces: count,
                        });
                    }
                    NonManifoldHandling::Ignore => {}
                }
            }
        }
    }
    Ok(found)
}

impl DebugInvariants for EditMesh {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "EditMesh");
    }

    fn validate_invariants(&self) -> Result<(), MeshFlattenError> {
        validate_mesh_topology(self)
    }
}
