//! Merge-by-distance.
//!
//! Vertices are bucketed in a uniform grid whose cell size equals the merge
//! distance, so any partner lies in the 3x3x3 block of cells around a vertex.
//! The first vertex of a cluster (in input order) is kept and keeps its
//! position; later vertices within `distance` of it are merged into it.

use hashbrown::{HashMap, HashSet};

use crate::geometry::metrics::{norm, sub};
use crate::mesh_error::MeshFlattenError;
use crate::topology::handle::VertexId;
use crate::topology::mesh::EditMesh;

/// Outcome of [`merge_by_distance`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeldReport {
    /// `(merged, kept)` pairs; every `merged` handle is now stale.
    pub merged: Vec<(VertexId, VertexId)>,
}

impl WeldReport {
    pub fn merged_count(&self) -> usize {
        self.merged.len()
    }
}

/// Uniform grid of kept vertices.
struct WeldGrid {
    cells: HashMap<(i64, i64, i64), Vec<(usize, VertexId, [f64; 3])>>,
    cell_size: f64,
}

impl WeldGrid {
    fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            cell_size,
        }
    }

    #[inline]
    fn cell_coords(&self, p: [f64; 3]) -> (i64, i64, i64) {
        let discretize = |x: f64| (x / self.cell_size).floor() as i64;
        (discretize(p[0]), discretize(p[1]), discretize(p[2]))
    }

    /// The earliest kept vertex within `tolerance` of `p`.
    fn find(&self, p: [f64; 3], tolerance: f64) -> Option<VertexId> {
        let (cx, cy, cz) = self.cell_coords(p);
        let mut best: Option<(usize, VertexId)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(pts) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &(rank, v, q) in pts {
                        if norm(sub(p, q)) <= tolerance && best.is_none_or(|(r, _)| rank < r) {
                            best = Some((rank, v));
                        }
                    }
                }
            }
        }
        best.map(|(_, v)| v)
    }

    fn insert(&mut self, rank: usize, v: VertexId, p: [f64; 3]) {
        self.cells
            .entry(self.cell_coords(p))
            .or_default()
            .push((rank, v, p));
    }
}

/// Merge vertices of `verts` lying within `distance` of each other.
///
/// Stale handles are ignored. A non-positive distance merges nothing.
pub fn merge_by_distance(
    mesh: &mut EditMesh,
    verts: &[VertexId],
    distance: f64,
) -> Result<WeldReport, MeshFlattenError> {
    let mut report = WeldReport::default();
    if !(distance > 0.0) {
        return Ok(report);
    }

    let mut grid = WeldGrid::new(distance);
    let mut seen = HashSet::new();
    for (rank, &v) in verts.iter().enumerate() {
        let Ok(p) = mesh.co(v) else {
            continue;
        };
        if !seen.insert(v) {
            continue;
        }
        match grid.find(p, distance) {
            Some(kept) => report.merged.push((v, kept)),
            None => grid.insert(rank, v, p),
        }
    }

    for &(source, target) in &report.merged {
        mesh.merge_vertex(source, target)?;
    }
    if !report.merged.is_empty() {
        log::debug!("merge by distance: {} vertices merged", report.merged.len());
    }
    Ok(report)
}
