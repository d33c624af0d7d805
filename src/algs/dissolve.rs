//! Vertex dissolve.
//!
//! Removes vertices while keeping the region covered by their faces:
//! - an **interior** vertex (every edge has two faces) takes its fan with it;
//!   the fan is replaced by one face bounded by the fan's rim.
//! - a **boundary** vertex (exactly two edges with one face) is cut out of
//!   its faces; the wedge between its two boundary neighbours and its inner
//!   neighbours is covered by one new polygon. With a single face around the
//!   vertex, the vertex is simply dropped from that face.
//!
//! The covered region changes only by the triangle `prev, v, next` at a
//! boundary vertex, which is empty when the three are collinear. Vertices
//! whose fan is not a single disk or half-disk, or whose replacement would
//! collide with existing faces, are skipped and reported.

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;

use crate::algs::boundary::boundary_edges;
use crate::algs::loops::edges_to_loops;
use crate::mesh_error::{FaceCreateError, MeshFlattenError};
use crate::topology::handle::{EdgeId, FaceId, VertexId};
use crate::topology::mesh::EditMesh;

/// Outcome of [`dissolve_vertices`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DissolveReport {
    pub dissolved: Vec<VertexId>,
    pub skipped: Vec<VertexId>,
}

/// A replacement face to create once the fan is gone.
struct NewFace {
    verts: Vec<VertexId>,
    select: bool,
    active: bool,
}

/// Everything needed to dissolve one vertex.
struct Plan {
    fan: Vec<FaceId>,
    faces: Vec<NewFace>,
}

/// Dissolve each vertex of `verts` in turn. Stale handles are skipped silently.
pub fn dissolve_vertices(
    mesh: &mut EditMesh,
    verts: &[VertexId],
) -> Result<DissolveReport, MeshFlattenError> {
    let mut report = DissolveReport::default();
    for &v in verts {
        if !mesh.is_vertex_valid(v) {
            log::trace!("dissolve: {v} already removed");
            continue;
        }
        match plan_dissolve(mesh, v)? {
            Some(plan) => {
                apply(mesh, v, plan)?;
                report.dissolved.push(v);
            }
            None => {
                log::warn!("dissolve: skipping vertex {v}, its faces cannot be joined");
                report.skipped.push(v);
            }
        }
    }
    Ok(report)
}

fn plan_dissolve(mesh: &EditMesh, v: VertexId) -> Result<Option<Plan>, MeshFlattenError> {
    let vert = mesh.vertex(v)?;
    let mut rims = Vec::new();
    for &e in vert.edges() {
        match mesh.edge(e)?.faces().len() {
            1 => rims.push(e),
            2 => {}
            _ => return Ok(None),
        }
    }
    let plan = match rims.len() {
        0 => plan_interior(mesh, v)?,
        2 => plan_boundary(mesh, v, rims[0])?,
        _ => None,
    };
    Ok(plan.filter(|plan| replacement_fits(mesh, plan)))
}

/// Fan faces of a boundary vertex in order, starting at the face on `start`,
/// plus the rim vertices `[prev, inner.., next]`.
fn ordered_fan(
    mesh: &EditMesh,
    v: VertexId,
    start: EdgeId,
) -> Result<Option<(Vec<FaceId>, Vec<VertexId>)>, MeshFlattenError> {
    let edge_total = mesh.vertex(v)?.edges().len();
    let start_edge = mesh.edge(start)?;
    let Some(first) = start_edge.other(v) else {
        return Ok(None);
    };
    let mut rim = vec![first];
    let mut fan = Vec::new();
    let mut face = start_edge.faces()[0];

    loop {
        if fan.len() > edge_total {
            return Ok(None);
        }
        fan.push(face);
        let cycle = mesh.face(face)?.verts();
        let Some(i) = cycle.iter().position(|&x| x == v) else {
            return Ok(None);
        };
        let n = cycle.len();
        let (before, after) = (cycle[(i + n - 1) % n], cycle[(i + 1) % n]);
        let last = rim[rim.len() - 1];
        let next = if before == last {
            after
        } else if after == last {
            before
        } else {
            return Ok(None);
        };
        rim.push(next);
        let Some(e) = mesh.edge_between(v, next) else {
            return Ok(None);
        };
        let linked = mesh.edge(e)?.faces();
        match linked {
            [_] => break,
            [a, b] => face = if *a == face { *b } else { *a },
            _ => return Ok(None),
        }
    }

    if rim.len() != edge_total || !fan.iter().all_unique() {
        return Ok(None);
    }
    Ok(Some((fan, rim)))
}

fn plan_boundary(
    mesh: &EditMesh,
    v: VertexId,
    start: EdgeId,
) -> Result<Option<Plan>, MeshFlattenError> {
    let Some((fan, rim)) = ordered_fan(mesh, v, start)? else {
        return Ok(None);
    };
    let active = mesh.active_face().filter(|f| fan.contains(f));

    if let [only] = fan[..] {
        let face = mesh.face(only)?;
        if face.len() < 4 {
            return Ok(None);
        }
        let verts = face.verts().iter().copied().filter(|&x| x != v).collect();
        return Ok(Some(Plan {
            faces: vec![NewFace {
                verts,
                select: face.select,
                active: active.is_some(),
            }],
            fan,
        }));
    }

    let mut faces = Vec::with_capacity(fan.len() + 1);
    let mut active_kept = false;
    let mut all_selected = true;
    for &f in &fan {
        let face = mesh.face(f)?;
        all_selected &= face.select;
        if face.len() >= 4 {
            let is_active = active == Some(f);
            active_kept |= is_active;
            faces.push(NewFace {
                verts: face.verts().iter().copied().filter(|&x| x != v).collect(),
                select: face.select,
                active: is_active,
            });
        }
    }

    // rim = [prev, inner.., next]; the wedge runs prev -> next -> inner (reversed).
    let (prev, rest) = rim.split_first().ok_or_else(|| v.stale())?;
    let (next, inner) = rest.split_last().ok_or_else(|| v.stale())?;
    let mut wedge = vec![*prev, *next];
    wedge.extend(inner.iter().rev().copied());
    if !mesh.face(fan[0])?.has_directed_edge(*prev, v) {
        wedge.reverse();
    }
    faces.push(NewFace {
        verts: wedge,
        select: all_selected,
        active: active.is_some() && !active_kept,
    });
    Ok(Some(Plan { fan, faces }))
}

fn plan_interior(mesh: &EditMesh, v: VertexId) -> Result<Option<Plan>, MeshFlattenError> {
    let fan = mesh.vertex_faces(v)?;
    if fan.is_empty() {
        return Ok(None);
    }
    let rim_edges = boundary_edges(mesh, &fan)?;
    let mut loops = edges_to_loops(mesh, &rim_edges);
    if loops.len() != 1 {
        return Ok(None);
    }
    let mut rim = loops.remove(0);
    if rim.contains(&v) {
        return Ok(None);
    }
    let forward = rim.iter().circular_tuple_windows().any(|(&a, &b)| {
        fan.iter()
            .filter_map(|&f| mesh.face(f).ok())
            .any(|face| face.has_directed_edge(a, b))
    });
    if !forward {
        rim.reverse();
    }
    let mut select = true;
    for &f in &fan {
        select &= mesh.face(f)?.select;
    }
    let active = mesh.active_face().is_some_and(|f| fan.contains(&f));
    Ok(Some(Plan {
        fan,
        faces: vec![NewFace {
            verts: rim,
            select,
            active,
        }],
    }))
}

/// Whether the replacement faces can be created once the fan is removed.
fn replacement_fits(mesh: &EditMesh, plan: &Plan) -> bool {
    let fan: HashSet<FaceId> = plan.fan.iter().copied().collect();
    let mut uses: HashMap<(VertexId, VertexId), usize> = HashMap::new();
    let mut sets: Vec<Vec<VertexId>> = Vec::with_capacity(plan.faces.len());

    for new in &plan.faces {
        if new.verts.len() < 3 || !new.verts.iter().all_unique() {
            return false;
        }
        if mesh.find_face(&new.verts).is_some_and(|f| !fan.contains(&f)) {
            return false;
        }
        let sorted: Vec<VertexId> = new.verts.iter().copied().sorted().collect();
        if sets.contains(&sorted) {
            return false;
        }
        sets.push(sorted);

        for (&a, &b) in new.verts.iter().circular_tuple_windows() {
            let key = if a <= b { (a, b) } else { (b, a) };
            let count = uses.entry(key).or_insert_with(|| {
                mesh.edge_between(a, b)
                    .and_then(|e| mesh.edge(e).ok())
                    .map_or(0, |edge| edge.faces().iter().filter(|f| !fan.contains(*f)).count())
            });
            *count += 1;
            if *count > 2 {
                return false;
            }
        }
    }
    true
}

fn apply(mesh: &mut EditMesh, v: VertexId, plan: Plan) -> Result<(), MeshFlattenError> {
    for &f in &plan.fan {
        mesh.remove_face(f)?;
    }
    mesh.remove_vertex(v)?;
    for new in plan.faces {
        let f = match mesh.add_face(&new.verts) {
            Ok(f) | Err(FaceCreateError::Exists(f)) => f,
            Err(err) => return Err(MeshFlattenError::RebuildFailed(err)),
        };
        if new.select {
            mesh.set_face_select(f, true)?;
        }
        if new.active {
            mesh.set_active_face(Some(f))?;
        }
    }
    Ok(())
}
