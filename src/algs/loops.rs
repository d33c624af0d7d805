//! Boundary loop walker.
//!
//! Partitions an unordered edge set into closed, ordered vertex cycles.
//! Adjacency is built once per call; edges are consumed through a bitmap so
//! each edge belongs to at most one loop. Seeds are taken in edge order,
//! which makes the output deterministic for a given input order.

use std::hash::Hash;

use hashbrown::HashMap;

use crate::topology::handle::{EdgeId, VertexId};
use crate::topology::mesh::EditMesh;

/// Partition `edges` into closed loops.
///
/// From each unconsumed seed edge the walk follows the first neighbour that
/// is not the predecessor. Reaching the seed's start vertex closes the loop.
/// A consumed connecting edge at a vertex with more than two neighbours makes
/// the walk try the remaining neighbours (neither predecessor nor start) in
/// adjacency order. Walks that exceed `edges.len() + 1` steps are discarded;
/// a walk is kept when it has at least three vertices and its last vertex is
/// adjacent to its first.
pub fn walk_loops<V>(edges: &[(V, V)]) -> Vec<Vec<V>>
where
    V: Copy + Eq + Hash,
{
    let mut adjacency: HashMap<V, Vec<(V, usize)>> = HashMap::new();
    for (i, &(a, b)) in edges.iter().enumerate() {
        adjacency.entry(a).or_default().push((b, i));
        adjacency.entry(b).or_default().push((a, i));
    }

    let step_cap = edges.len() + 1;
    let mut consumed = vec![false; edges.len()];
    let mut loops = Vec::new();

    for seed in 0..edges.len() {
        if consumed[seed] {
            continue;
        }
        consumed[seed] = true;
        let (start, first) = edges[seed];
        let mut path = vec![start, first];
        let (mut prev, mut cur) = (start, first);
        let mut closed = false;
        let mut steps = 0;

        while !closed {
            steps += 1;
            if steps > step_cap {
                break;
            }
            let Some(neighbours) = adjacency.get(&cur) else {
                break;
            };
            let preferred = if neighbours.len() == 1 {
                neighbours.first()
            } else {
                neighbours.iter().find(|(n, _)| *n != prev)
            };
            let Some(&(next, e)) = preferred else {
                break;
            };

            if next == start {
                consumed[e] = true;
                closed = true;
                continue;
            }

            let step = if !consumed[e] {
                Some((next, e))
            } else if neighbours.len() > 2 {
                neighbours
                    .iter()
                    .copied()
                    .find(|&(n, i)| n != prev && n != start && !consumed[i])
            } else {
                None
            };
            let Some((next, e)) = step else {
                break;
            };
            consumed[e] = true;
            path.push(next);
            prev = cur;
            cur = next;
        }

        if steps > step_cap {
            continue;
        }
        let touches_start = || {
            path.last()
                .and_then(|last| adjacency.get(last))
                .is_some_and(|ns| ns.iter().any(|(n, _)| *n == start))
        };
        if path.len() >= 3 && (closed || touches_start()) {
            loops.push(path);
        }
    }

    loops
}

/// Walk the mesh edges `edges` into vertex loops, skipping stale edges and
/// edges with a stale endpoint.
pub fn edges_to_loops(mesh: &EditMesh, edges: &[EdgeId]) -> Vec<Vec<VertexId>> {
    let pairs: Vec<(VertexId, VertexId)> = edges
        .iter()
        .filter_map(|&e| mesh.edge(e).ok())
        .map(|edge| edge.verts())
        .filter(|&[a, b]| mesh.is_vertex_valid(a) && mesh.is_vertex_valid(b))
        .map(|[a, b]| (a, b))
        .collect();
    walk_loops(&pairs)
}
