//! `EditMesh`: an in-memory polygon mesh with stable, generation-tagged handles.
//!
//! The mesh stores three arenas (vertices, edges, faces) and keeps the
//! incidence relations symmetric at all times:
//! - a vertex lists every edge ending at it,
//! - an edge lists every face whose cycle walks over it,
//! - a face lists its vertices in cyclic order and the edge joining each
//!   vertex to its successor (`edges[i]` joins `verts[i]` and `verts[i + 1]`).
//!
//! Removing an element cascades upward (a vertex takes its edges, an edge
//! takes its faces) but never downward: removing a face leaves its edges and
//! vertices in place, exactly like the host meshes this crate is modelled on.
//! Every structural mutation bumps [`EditMesh::epoch`] so lookup snapshots can
//! detect that they were built against an older topology.

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;

use crate::geometry::metrics::{centroid, newell_vector, normalize, norm};
use crate::geometry::plane::FALLBACK_NORMAL;
use crate::mesh_error::{FaceCreateError, MeshFlattenError};
use crate::topology::arena::Arena;
use crate::topology::handle::{EdgeId, FaceId, VertexId};

/// A mesh vertex.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub co: [f64; 3],
    pub select: bool,
    edges: Vec<EdgeId>,
}

impl Vertex {
    /// Edges ending at this vertex.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }
}

/// An unordered vertex pair.
#[derive(Clone, Debug)]
pub struct Edge {
    verts: [VertexId; 2],
    faces: Vec<FaceId>,
    pub select: bool,
}

impl Edge {
    pub fn verts(&self) -> [VertexId; 2] {
        self.verts
    }

    /// Faces whose cycle uses this edge ("linked faces").
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    /// The endpoint opposite to `v`, if `v` is an endpoint.
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        match self.verts {
            [a, b] if a == v => Some(b),
            [a, b] if b == v => Some(a),
            _ => None,
        }
    }

    pub fn contains(&self, v: VertexId) -> bool {
        self.verts[0] == v || self.verts[1] == v
    }
}

/// A polygon face.
#[derive(Clone, Debug)]
pub struct Face {
    verts: Vec<VertexId>,
    edges: Vec<EdgeId>,
    pub select: bool,
}

impl Face {
    /// Vertices in cyclic order.
    pub fn verts(&self) -> &[VertexId] {
        &self.verts
    }

    /// `edges()[i]` joins `verts()[i]` and `verts()[(i + 1) % len]`.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.verts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    /// Whether the cycle walks from `a` directly to `b`.
    pub fn has_directed_edge(&self, a: VertexId, b: VertexId) -> bool {
        self.verts
            .iter()
            .circular_tuple_windows()
            .any(|(&x, &y)| x == a && y == b)
    }
}

#[inline]
fn edge_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// In-memory polygon mesh. See the module docs for the incidence model.
#[derive(Clone, Debug, Default)]
pub struct EditMesh {
    verts: Arena<Vertex>,
    edges: Arena<Edge>,
    faces: Arena<Face>,
    edge_lookup: HashMap<(VertexId, VertexId), EdgeId>,
    active_face: Option<FaceId>,
    epoch: u64,
    revision: u64,
}

impl EditMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Counters
    // ---------------------------------------------------------------------

    pub fn vertex_count(&self) -> usize {
        self.verts.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of structural mutations applied so far.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of committed edit sessions.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn bump_revision(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }

    // ---------------------------------------------------------------------
    // Validity and access
    // ---------------------------------------------------------------------

    pub fn is_vertex_valid(&self, v: VertexId) -> bool {
        self.verts.contains(v.raw())
    }

    pub fn is_edge_valid(&self, e: EdgeId) -> bool {
        self.edges.contains(e.raw())
    }

    pub fn is_face_valid(&self, f: FaceId) -> bool {
        self.faces.contains(f.raw())
    }

    pub fn vertex(&self, v: VertexId) -> Result<&Vertex, MeshFlattenError> {
        self.verts.get(v.raw()).ok_or_else(|| v.stale())
    }

    pub fn edge(&self, e: EdgeId) -> Result<&Edge, MeshFlattenError> {
        self.edges.get(e.raw()).ok_or_else(|| e.stale())
    }

    pub fn face(&self, f: FaceId) -> Result<&Face, MeshFlattenError> {
        self.faces.get(f.raw()).ok_or_else(|| f.stale())
    }

    /// Position of `v`.
    pub fn co(&self, v: VertexId) -> Result<[f64; 3], MeshFlattenError> {
        self.vertex(v).map(|vert| vert.co)
    }

    /// Moves `v` to `co`. Positions are not structural; the epoch is unchanged.
    pub fn set_co(&mut self, v: VertexId, co: [f64; 3]) -> Result<(), MeshFlattenError> {
        let vert = self.verts.get_mut(v.raw()).ok_or_else(|| v.stale())?;
        vert.co = co;
        Ok(())
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.verts
            .iter()
            .map(|(raw, vert)| (VertexId::from_raw(raw), vert))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .map(|(raw, edge)| (EdgeId::from_raw(raw), edge))
    }

    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> + '_ {
        self.faces
            .iter()
            .map(|(raw, face)| (FaceId::from_raw(raw), face))
    }

    /// The edge joining `a` and `b`, in either direction.
    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_lookup.get(&edge_key(a, b)).copied()
    }

    /// Faces using `v`, each listed once, in edge order.
    pub fn vertex_faces(&self, v: VertexId) -> Result<Vec<FaceId>, MeshFlattenError> {
        let vert = self.vertex(v)?;
        Ok(vert
            .edges
            .iter()
            .filter_map(|&e| self.edges.get(e.raw()))
            .flat_map(|edge| edge.faces.iter().copied())
            .unique()
            .collect())
    }

    /// Positions of the face's vertices in cyclic order.
    pub fn face_positions(&self, f: FaceId) -> Result<Vec<[f64; 3]>, MeshFlattenError> {
        self.face(f)?.verts.iter().map(|&v| self.co(v)).collect()
    }

    /// Unit normal (Newell), [`FALLBACK_NORMAL`] for zero-area faces.
    pub fn face_normal(&self, f: FaceId) -> Result<[f64; 3], MeshFlattenError> {
        let points = self.face_positions(f)?;
        Ok(normalize(newell_vector(&points)).unwrap_or(FALLBACK_NORMAL))
    }

    pub fn face_area(&self, f: FaceId) -> Result<f64, MeshFlattenError> {
        let points = self.face_positions(f)?;
        Ok(0.5 * norm(newell_vector(&points)))
    }

    /// Arithmetic mean of the face's vertex positions.
    pub fn face_center_median(&self, f: FaceId) -> Result<[f64; 3], MeshFlattenError> {
        Ok(centroid(&self.face_positions(f)?))
    }

    /// A face whose vertex set equals `verts` (order and rotation ignored).
    pub fn find_face(&self, verts: &[VertexId]) -> Option<FaceId> {
        let wanted: HashSet<VertexId> = verts.iter().copied().collect();
        let first = self.verts.get(verts.first()?.raw())?;
        first
            .edges
            .iter()
            .filter_map(|&e| self.edges.get(e.raw()))
            .flat_map(|edge| edge.faces.iter().copied())
            .find(|&f| {
                self.faces.get(f.raw()).is_some_and(|face| {
                    face.verts.len() == wanted.len()
                        && face.verts.iter().all(|v| wanted.contains(v))
                })
            })
    }

    // ---------------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------------

    pub fn add_vertex(&mut self, co: [f64; 3]) -> VertexId {
        let v = VertexId::from_raw(self.verts.insert(Vertex {
            co,
            select: false,
            edges: Vec::new(),
        }));
        self.epoch += 1;
        v
    }

    /// Returns the edge joining `a` and `b`, creating it when missing.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> Result<EdgeId, MeshFlattenError> {
        if !self.is_vertex_valid(a) {
            return Err(a.stale());
        }
        if !self.is_vertex_valid(b) {
            return Err(b.stale());
        }
        if a == b {
            return Err(MeshFlattenError::CorruptTopology(format!(
                "edge would join vertex {a} to itself"
            )));
        }
        Ok(self.ensure_edge(a, b))
    }

    /// Caller guarantees `a != b` and both vertices are valid.
    fn ensure_edge(&mut self, a: VertexId, b: VertexId) -> EdgeId {
        if let Some(e) = self.edge_between(a, b) {
            return e;
        }
        let e = EdgeId::from_raw(self.edges.insert(Edge {
            verts: [a, b],
            faces: Vec::new(),
            select: false,
        }));
        for v in [a, b] {
            if let Some(vert) = self.verts.get_mut(v.raw()) {
                vert.edges.push(e);
            }
        }
        self.edge_lookup.insert(edge_key(a, b), e);
        self.epoch += 1;
        e
    }

    /// Creates a polygon over `verts` in the given cyclic order.
    ///
    /// Missing edges are created. Fails without mutating when the cycle has
    /// fewer than three vertices, repeats or references a stale vertex, when a
    /// face over the same vertex set exists ([`FaceCreateError::Exists`]
    /// carries it), or when one of its edges already has two faces.
    pub fn add_face(&mut self, verts: &[VertexId]) -> Result<FaceId, FaceCreateError> {
        if verts.len() < 3 {
            return Err(FaceCreateError::TooFewVertices(verts.len()));
        }
        let mut seen = HashSet::with_capacity(verts.len());
        for &v in verts {
            if !self.is_vertex_valid(v) {
                return Err(FaceCreateError::StaleVertex(v));
            }
            if !seen.insert(v) {
                return Err(FaceCreateError::DuplicateVertex(v));
            }
        }
        if let Some(existing) = self.find_face(verts) {
            return Err(FaceCreateError::Exists(existing));
        }
        for (&a, &b) in verts.iter().circular_tuple_windows() {
            let saturated = self
                .edge_between(a, b)
                .and_then(|e| self.edges.get(e.raw()))
                .is_some_and(|edge| edge.faces.len() >= 2);
            if saturated {
                return Err(FaceCreateError::NonManifoldEdge(a, b));
            }
        }

        let f = FaceId::from_raw(self.faces.insert(Face {
            verts: verts.to_vec(),
            edges: Vec::with_capacity(verts.len()),
            select: false,
        }));
        let mut face_edges = Vec::with_capacity(verts.len());
        for (&a, &b) in verts.iter().circular_tuple_windows() {
            let e = self.ensure_edge(a, b);
            if let Some(edge) = self.edges.get_mut(e.raw()) {
                edge.faces.push(f);
            }
            face_edges.push(e);
        }
        if let Some(face) = self.faces.get_mut(f.raw()) {
            face.edges = face_edges;
        }
        self.epoch += 1;
        Ok(f)
    }

    // ---------------------------------------------------------------------
    // Removal
    // ---------------------------------------------------------------------

    /// Removes the face only; its edges and vertices stay.
    pub fn remove_face(&mut self, f: FaceId) -> Result<(), MeshFlattenError> {
        let face = self.faces.remove(f.raw()).ok_or_else(|| f.stale())?;
        for e in face.edges {
            if let Some(edge) = self.edges.get_mut(e.raw()) {
                edge.faces.retain(|&x| x != f);
            }
        }
        if self.active_face == Some(f) {
            self.active_face = None;
        }
        self.epoch += 1;
        Ok(())
    }

    /// Removes the edge together with every face using it.
    pub fn remove_edge(&mut self, e: EdgeId) -> Result<(), MeshFlattenError> {
        let faces = self.edge(e)?.faces.clone();
        for f in faces {
            self.remove_face(f)?;
        }
        let edge = self.edges.remove(e.raw()).ok_or_else(|| e.stale())?;
        for v in edge.verts {
            if let Some(vert) = self.verts.get_mut(v.raw()) {
                vert.edges.retain(|&x| x != e);
            }
        }
        self.edge_lookup.remove(&edge_key(edge.verts[0], edge.verts[1]));
        self.epoch += 1;
        Ok(())
    }

    /// Removes the vertex together with its edges and their faces.
    pub fn remove_vertex(&mut self, v: VertexId) -> Result<(), MeshFlattenError> {
        let edges = self.vertex(v)?.edges.clone();
        for e in edges {
            self.remove_edge(e)?;
        }
        self.verts.remove(v.raw()).ok_or_else(|| v.stale())?;
        self.epoch += 1;
        Ok(())
    }

    /// Replaces `source` by `target` everywhere and removes `source`.
    ///
    /// Faces around `source` are rebuilt over `target`; faces collapsing to
    /// fewer than three distinct vertices are dropped, faces becoming
    /// duplicates of an existing face merge into it. Selection and the active
    /// face carry over. Wire edges of `source` are re-attached to `target`.
    pub fn merge_vertex(&mut self, source: VertexId, target: VertexId) -> Result<(), MeshFlattenError> {
        if source == target {
            return Ok(());
        }
        if !self.is_vertex_valid(target) {
            return Err(target.stale());
        }

        struct Rebuilt {
            verts: Vec<VertexId>,
            select: bool,
            active: bool,
        }

        let mut rebuilt = Vec::new();
        for f in self.vertex_faces(source)? {
            let face = self.face(f)?;
            let mut verts: Vec<VertexId> = face
                .verts
                .iter()
                .map(|&v| if v == source { target } else { v })
                .collect();
            verts.dedup();
            if verts.len() > 1 && verts.first() == verts.last() {
                verts.pop();
            }
            rebuilt.push(Rebuilt {
                verts,
                select: face.select,
                active: self.active_face == Some(f),
            });
        }

        let mut wire_neighbours = Vec::new();
        for &e in &self.vertex(source)?.edges {
            let edge = self.edge(e)?;
            if edge.faces.is_empty() {
                wire_neighbours.extend(edge.other(source));
            }
        }

        self.remove_vertex(source)?;

        for face in rebuilt {
            let f = match self.add_face(&face.verts) {
                Ok(f) | Err(FaceCreateError::Exists(f)) => f,
                Err(err) => {
                    log::debug!("merge {source} -> {target}: dropping face: {err}");
                    continue;
                }
            };
            if face.select {
                self.set_face_select(f, true)?;
            }
            if face.active {
                self.active_face = Some(f);
            }
        }
        for other in wire_neighbours {
            if other != target && self.is_vertex_valid(other) {
                self.add_edge(target, other)?;
            }
        }
        Ok(())
    }

    /// Reverses the winding of `f`.
    pub fn flip_face(&mut self, f: FaceId) -> Result<(), MeshFlattenError> {
        let face = self.faces.get_mut(f.raw()).ok_or_else(|| f.stale())?;
        let n = face.verts.len();
        face.verts.reverse();
        // Reversed edge i joins old verts n-1-i and n-2-i, i.e. old edge n-2-i;
        // the closing edge stays last.
        face.edges[..n - 1].reverse();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Sets the face flag; selecting also flushes to the face's vertices and edges.
    pub fn set_face_select(&mut self, f: FaceId, select: bool) -> Result<(), MeshFlattenError> {
        let face = self.faces.get_mut(f.raw()).ok_or_else(|| f.stale())?;
        face.select = select;
        if !select {
            return Ok(());
        }
        let (verts, edges) = (face.verts.clone(), face.edges.clone());
        for v in verts {
            if let Some(vert) = self.verts.get_mut(v.raw()) {
                vert.select = true;
            }
        }
        for e in edges {
            if let Some(edge) = self.edges.get_mut(e.raw()) {
                edge.select = true;
            }
        }
        Ok(())
    }

    /// Sets the edge flag and flushes a selection to both endpoints.
    pub fn set_edge_select(&mut self, e: EdgeId, select: bool) -> Result<(), MeshFlattenError> {
        let edge = self.edges.get_mut(e.raw()).ok_or_else(|| e.stale())?;
        edge.select = select;
        if select {
            for v in edge.verts {
                if let Some(vert) = self.verts.get_mut(v.raw()) {
                    vert.select = true;
                }
            }
        }
        Ok(())
    }

    pub fn set_vertex_select(&mut self, v: VertexId, select: bool) -> Result<(), MeshFlattenError> {
        let vert = self.verts.get_mut(v.raw()).ok_or_else(|| v.stale())?;
        vert.select = select;
        Ok(())
    }

    /// Clears every selection flag.
    pub fn deselect_all(&mut self) {
        for (_, vert) in self.verts.iter_mut() {
            vert.select = false;
        }
        for (_, edge) in self.edges.iter_mut() {
            edge.select = false;
        }
        for (_, face) in self.faces.iter_mut() {
            face.select = false;
        }
    }

    /// Selected faces in arena order.
    pub fn selected_faces(&self) -> Vec<FaceId> {
        self.faces()
            .filter(|(_, face)| face.select)
            .map(|(f, _)| f)
            .collect()
    }

    /// The active face, if one is set and still valid.
    pub fn active_face(&self) -> Option<FaceId> {
        self.active_face.filter(|&f| self.is_face_valid(f))
    }

    pub fn set_active_face(&mut self, f: Option<FaceId>) -> Result<(), MeshFlattenError> {
        if let Some(face) = f {
            if !self.is_face_valid(face) {
                return Err(face.stale());
            }
        }
        self.active_face = f;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_pair() -> (EditMesh, Vec<VertexId>, FaceId, FaceId) {
        let mut mesh = EditMesh::new();
        let v: Vec<_> = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [2.0, 1.0, 0.0],
        ]
        .into_iter()
        .map(|co| mesh.add_vertex(co))
        .collect();
        let f0 = mesh.add_face(&[v[0], v[1], v[4], v[3]]).unwrap();
        let f1 = mesh.add_face(&[v[1], v[2], v[5], v[4]]).unwrap();
        (mesh, v, f0, f1)
    }

    #[test]
    fn faces_share_edges() {
        let (mesh, v, f0, f1) = quad_pair();
        assert_eq!(mesh.edge_count(), 7);
        let shared = mesh.edge_between(v[4], v[1]).unwrap();
        assert_eq!(mesh.edge(shared).unwrap().faces(), &[f0, f1]);
        let face = mesh.face(f0).unwrap();
        assert_eq!(face.edges()[1], shared);
        assert!(face.has_directed_edge(v[1], v[4]));
        assert!(!face.has_directed_edge(v[4], v[1]));
    }

    #[test]
    fn add_face_rejections() {
        let (mut mesh, v, f0, _) = quad_pair();
        assert_eq!(
            mesh.add_face(&[v[3], v[0], v[1], v[4]]),
            Err(FaceCreateError::Exists(f0))
        );
        assert_eq!(mesh.add_face(&[v[0], v[1]]), Err(FaceCreateError::TooFewVertices(2)));
        assert_eq!(
            mesh.add_face(&[v[0], v[1], v[0]]),
            Err(FaceCreateError::DuplicateVertex(v[0]))
        );
        let extra = mesh.add_vertex([1.0, 0.5, 1.0]);
        assert_eq!(
            mesh.add_face(&[v[1], v[4], extra]),
            Err(FaceCreateError::NonManifoldEdge(v[1], v[4]))
        );
    }

    #[test]
    fn removal_cascades_upward_only() {
        let (mut mesh, v, f0, f1) = quad_pair();
        mesh.remove_face(f0).unwrap();
        assert_eq!(mesh.edge_count(), 7);
        assert_eq!(mesh.vertex_count(), 6);
        assert!(mesh.remove_face(f0).is_err());

        mesh.remove_vertex(v[4]).unwrap();
        assert!(!mesh.is_face_valid(f1));
        assert!(!mesh.is_vertex_valid(v[4]));
        assert_eq!(mesh.edge_count(), 4);
        assert!(matches!(mesh.co(v[4]), Err(MeshFlattenError::StaleHandle { .. })));
    }

    #[test]
    fn epoch_tracks_structure_not_positions() {
        let (mut mesh, v, _, _) = quad_pair();
        let before = mesh.epoch();
        mesh.set_co(v[0], [0.0, 0.0, 1.0]).unwrap();
        assert_eq!(mesh.epoch(), before);
        mesh.add_vertex([5.0, 5.0, 5.0]);
        assert!(mesh.epoch() > before);
    }

    #[test]
    fn merge_collapses_shared_edge() {
        let (mut mesh, v, f0, _) = quad_pair();
        mesh.set_face_select(f0, true).unwrap();
        mesh.set_active_face(Some(f0)).unwrap();
        // Collapse the shared edge 1-4: the left quad becomes a triangle.
        mesh.merge_vertex(v[4], v[1]).unwrap();
        assert!(!mesh.is_vertex_valid(v[4]));
        assert_eq!(mesh.face_count(), 2);
        let active = mesh.active_face().unwrap();
        assert_eq!(mesh.face(active).unwrap().len(), 3);
        assert!(mesh.face(active).unwrap().select);
    }

    #[test]
    fn flip_keeps_edge_alignment() {
        let (mut mesh, _, f0, _) = quad_pair();
        let before = mesh.face_normal(f0).unwrap();
        mesh.flip_face(f0).unwrap();
        let face = mesh.face(f0).unwrap();
        for (i, (&a, &b)) in face.verts().iter().circular_tuple_windows().enumerate() {
            assert_eq!(mesh.edge_between(a, b), Some(face.edges()[i]));
        }
        let after = mesh.face_normal(f0).unwrap();
        assert_eq!(after[2], -before[2]);
    }

    #[test]
    fn face_metrics() {
        let (mesh, _, f0, _) = quad_pair();
        assert!((mesh.face_area(f0).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(mesh.face_center_median(f0).unwrap(), [0.5, 0.5, 0.0]);
        assert_eq!(mesh.face_normal(f0).unwrap(), [0.0, 0.0, 1.0]);
    }
}
