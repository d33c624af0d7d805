//! Planarize a face selection and rebuild it as a single polygon.
//!
//! The pipeline runs inside one [`EditSession`] and walks the [`Stage`]s in
//! order; optional stages may be skipped. A single selected face that the
//! weld and simplification stages leave alone is finalized right after them
//! and keeps its handle; otherwise it is rebuilt like any selection. A failing
//! stage cancels the run. Nothing is rolled back: vertices that were already
//! projected, welded or deleted stay that way, and the report says so.

use hashbrown::HashSet;
use itertools::Itertools;

use crate::algs::boundary::boundary_edges;
use crate::algs::delete::{delete_faces, delete_vertices};
use crate::algs::loop_select::{choose_loop, discard_minor_loops, loop_area};
use crate::algs::loops::edges_to_loops;
use crate::algs::normals::recalc_face_normals;
use crate::algs::plane_estimate::{estimate_plane, selection_average_normal};
use crate::algs::project::project_vertices;
use crate::algs::selection::Selection;
use crate::algs::simplify::{collinear_vertices, dissolve_collinear_boundary};
use crate::algs::weld::merge_by_distance;
use crate::config::PlanarizeSettings;
use crate::geometry::metrics::{dot, newell_vector, polygon_self_intersects_2d};
use crate::geometry::plane::Plane;
use crate::mesh_error::{FaceCreateError, MeshFlattenError};
use crate::topology::handle::{EdgeId, FaceId, VertexId};
use crate::topology::mesh::EditMesh;
use crate::topology::session::EditSession;
use crate::topology::validation::{NonManifoldHandling, validate_non_manifold_edges};

/// Pipeline stages, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    SelectionValidated,
    PlaneComputed,
    Projected,
    Welded,
    BoundaryExtracted,
    LoopChosen,
    Simplified,
    FacesRemoved,
    InteriorVertsRemoved,
    FaceCreated,
    Finalized,
}

impl Stage {
    /// Whether the pipeline may move from `from` (`None` before the first
    /// stage) to `to`.
    pub fn can_follow(from: Option<Stage>, to: Stage) -> bool {
        use Stage::*;
        match from {
            None => to == SelectionValidated,
            Some(from) => matches!(
                (from, to),
                (SelectionValidated, PlaneComputed)
                    | (PlaneComputed, Projected)
                    | (Projected, Welded | BoundaryExtracted | Finalized)
                    | (Welded, BoundaryExtracted | Finalized)
                    | (BoundaryExtracted, LoopChosen)
                    | (LoopChosen, Simplified | FacesRemoved)
                    | (Simplified, FacesRemoved)
                    | (FacesRemoved, InteriorVertsRemoved)
                    | (InteriorVertsRemoved, FaceCreated)
                    | (FaceCreated, Finalized)
            ),
        }
    }
}

/// Operator result status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatorStatus {
    Finished,
    Cancelled,
}

/// What a successful run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanarizeOutcome {
    /// The face now covering the former selection.
    pub face: FaceId,
    pub plane: Plane,
    /// Vertices of `face`.
    pub loop_len: usize,
    /// Selected faces removed by the rebuild (0 for a single face).
    pub removed_faces: usize,
    /// Interior vertices removed by the rebuild.
    pub removed_vertices: usize,
    /// Vertices merged by the weld stage.
    pub welded: usize,
    /// Boundary vertices dissolved by the simplifier.
    pub simplified: usize,
}

/// Operator-facing report of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanarizeReport {
    pub status: OperatorStatus,
    pub message: String,
    pub face: Option<FaceId>,
    pub plane: Option<Plane>,
    /// Last stage reached; `None` when the selection was rejected.
    pub stage: Option<Stage>,
    /// Whether the mesh was modified, including by a cancelled run.
    pub mutated: bool,
    pub error: Option<MeshFlattenError>,
}

impl PlanarizeReport {
    pub fn is_finished(&self) -> bool {
        self.status == OperatorStatus::Finished
    }
}

/// Read-only look at what [`planarize_selection`] would work with.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanarizePreview {
    pub plane: Plane,
    /// Closed boundary loops of the selection in discovery order.
    pub loops: Vec<Vec<VertexId>>,
    /// Projected area of each loop.
    pub loop_areas: Vec<f64>,
    /// Index into `loops` of the loop that would be kept.
    pub chosen: Option<usize>,
    /// Selected vertices not on the chosen loop. Ignores welding.
    pub interior_vertices: usize,
}

struct Pipeline<'m> {
    session: EditSession<'m>,
    stage: Option<Stage>,
    plane: Option<Plane>,
    mutated: bool,
}

impl<'m> Pipeline<'m> {
    fn new(mesh: &'m mut EditMesh) -> Self {
        Self {
            session: EditSession::begin(mesh),
            stage: None,
            plane: None,
            mutated: false,
        }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(
            Stage::can_follow(self.stage, next),
            "illegal stage transition {:?} -> {next:?}",
            self.stage
        );
        log::debug!("planarize: {:?} -> {next:?}", self.stage);
        self.stage = Some(next);
    }

    /// Commit when the run changed anything; an untouched mesh keeps its revision.
    fn close(self) {
        if self.mutated {
            self.session.commit();
        }
    }
}

/// "Planarize and Rebuild Selection as One Face".
///
/// Never fails: errors are folded into a [`OperatorStatus::Cancelled`] report.
pub fn planarize_selection(mesh: &mut EditMesh, settings: &PlanarizeSettings) -> PlanarizeReport {
    let mut pipeline = Pipeline::new(mesh);
    let result = run(&mut pipeline, settings);
    let (stage, plane, mutated) = (pipeline.stage, pipeline.plane, pipeline.mutated);
    pipeline.close();

    match result {
        Ok(outcome) => {
            let message = if outcome.removed_faces == 0 {
                format!("flattened face with {} vertices", outcome.loop_len)
            } else {
                format!(
                    "rebuilt {} faces as one face with {} vertices",
                    outcome.removed_faces, outcome.loop_len
                )
            };
            log::info!("planarize: {message}");
            PlanarizeReport {
                status: OperatorStatus::Finished,
                message,
                face: Some(outcome.face),
                plane: Some(outcome.plane),
                stage,
                mutated,
                error: None,
            }
        }
        Err(err) => {
            log::debug!("planarize cancelled after {stage:?}: {err}");
            PlanarizeReport {
                status: OperatorStatus::Cancelled,
                message: err.to_string(),
                face: None,
                plane,
                stage,
                mutated,
                error: Some(err),
            }
        }
    }
}

/// Like [`planarize_selection`], returning the outcome or the error.
pub fn try_planarize_selection(
    mesh: &mut EditMesh,
    settings: &PlanarizeSettings,
) -> Result<PlanarizeOutcome, MeshFlattenError> {
    let mut pipeline = Pipeline::new(mesh);
    let result = run(&mut pipeline, settings);
    pipeline.close();
    result
}

/// Compute plane, loops and the loop choice without touching the mesh.
pub fn preview(
    mesh: &EditMesh,
    settings: &PlanarizeSettings,
) -> Result<PlanarizePreview, MeshFlattenError> {
    settings.validate()?;
    let selection = Selection::harvest_checked(mesh)?;
    let boundary = boundary_edges(mesh, &selection.faces)?;
    if boundary.is_empty() && selection.faces.len() > 1 {
        return Err(MeshFlattenError::NoBoundary);
    }
    let plane = estimate_plane(mesh, &selection, settings.plane_mode)?;
    let loops = edges_to_loops(mesh, &boundary);
    let loop_areas = loops.iter().map(|lp| loop_area(mesh, lp, &plane)).collect();
    let chosen = choose_loop(mesh, &loops, &plane, settings.keep_largest_loop);
    let interior_vertices = chosen.map_or(0, |i| {
        let on_loop: HashSet<VertexId> = loops[i].iter().copied().collect();
        selection
            .verts
            .iter()
            .filter(|v| !on_loop.contains(*v))
            .count()
    });
    Ok(PlanarizePreview {
        plane,
        loops,
        loop_areas,
        chosen,
        interior_vertices,
    })
}

fn run(p: &mut Pipeline<'_>, settings: &PlanarizeSettings) -> Result<PlanarizeOutcome, MeshFlattenError> {
    settings.validate()?;
    let selection = Selection::harvest_checked(&p.session)?;
    validate_non_manifold_edges(&p.session, &selection.faces, NonManifoldHandling::Warn)?;
    if selection.faces.len() > 1 && boundary_edges(&p.session, &selection.faces)?.is_empty() {
        return Err(MeshFlattenError::NoBoundary);
    }
    p.advance(Stage::SelectionValidated);

    let plane = estimate_plane(&p.session, &selection, settings.plane_mode)?;
    let winding_hint = selection_average_normal(&p.session, &selection)?;
    p.plane = Some(plane);
    p.advance(Stage::PlaneComputed);

    selection.ensure_current(&p.session)?;
    project_vertices(&mut p.session, &selection.verts, &plane)?;
    p.mutated = true;
    p.advance(Stage::Projected);

    let mut selection = selection;
    let mut welded = 0;
    if settings.weld_enabled() {
        welded = merge_by_distance(&mut p.session, &selection.verts, settings.weld_distance)?
            .merged_count();
        selection = Selection::harvest(&p.session);
        if selection.is_empty() {
            return Err(MeshFlattenError::SelectionLost);
        }
        p.advance(Stage::Welded);
    }

    // A lone face that neither weld nor simplification would touch keeps its handle.
    if let [face] = selection.faces[..] {
        let untouched = welded == 0
            && (!settings.simplify_enabled()
                || collinear_vertices(
                    &p.session,
                    p.session.face(face)?.verts(),
                    settings.simplify_angle_rad(),
                )
                .is_empty());
        if untouched {
            finalize(p, face, settings)?;
            return Ok(PlanarizeOutcome {
                face,
                plane,
                loop_len: p.session.face(face)?.len(),
                removed_faces: 0,
                removed_vertices: 0,
                welded: 0,
                simplified: 0,
            });
        }
    }

    let boundary = boundary_edges(&p.session, &selection.faces)?;
    let mut loops = edges_to_loops(&p.session, &boundary);
    if loops.is_empty() {
        return Err(MeshFlattenError::NoClosedLoop);
    }
    p.advance(Stage::BoundaryExtracted);

    let chosen = choose_loop(&p.session, &loops, &plane, settings.keep_largest_loop)
        .ok_or(MeshFlattenError::NoClosedLoop)?;
    let several = loops.len() > 1;
    let mut boundary_loop = loops.swap_remove(chosen);
    if settings.keep_largest_loop && several {
        discard_minor_loops(&mut p.session, &boundary, &boundary_loop)?;
    }
    p.advance(Stage::LoopChosen);

    let mut simplified = 0;
    if settings.simplify_enabled() {
        simplified = dissolve_collinear_boundary(
            &mut p.session,
            &boundary_loop,
            settings.simplify_angle_rad(),
        )?
        .dissolved
        .len();
        boundary_loop = rederive_loop(&p.session, &boundary_loop, &plane, settings)?;
        p.advance(Stage::Simplified);
    }

    let doomed_faces = p.session.selected_faces();
    let mut doomed_edges: Vec<EdgeId> = Vec::new();
    for &f in &doomed_faces {
        doomed_edges.extend_from_slice(p.session.face(f)?.edges());
    }
    let removed_faces = delete_faces(&mut p.session, &doomed_faces)?;
    p.advance(Stage::FacesRemoved);

    let on_loop: HashSet<VertexId> = boundary_loop
        .iter()
        .copied()
        .filter(|&v| p.session.is_vertex_valid(v))
        .collect();
    let interior: Vec<VertexId> = selection
        .verts
        .iter()
        .copied()
        .filter(|&v| p.session.is_vertex_valid(v) && !on_loop.contains(&v))
        .collect();
    let removed_vertices = delete_vertices(&mut p.session, &interior)?;
    purge_wire_edges(&mut p.session, &doomed_edges, &boundary_loop)?;
    p.advance(Stage::InteriorVertsRemoved);

    let mut cycle: Vec<VertexId> = boundary_loop
        .into_iter()
        .filter(|&v| p.session.is_vertex_valid(v))
        .collect();
    if cycle.len() < 3 {
        return Err(MeshFlattenError::LoopTooShort(cycle.len()));
    }
    let positions = cycle
        .iter()
        .map(|&v| p.session.co(v))
        .collect::<Result<Vec<_>, _>>()?;
    if dot(newell_vector(&positions), winding_hint) < 0.0 {
        cycle.reverse();
    }

    let face = create_face(p, &cycle, &plane)?;
    p.advance(Stage::FaceCreated);

    finalize(p, face, settings)?;
    Ok(PlanarizeOutcome {
        face,
        plane,
        loop_len: cycle.len(),
        removed_faces,
        removed_vertices,
        welded,
        simplified,
    })
}

/// Loop after simplification.
///
/// The boundary is walked again and disambiguated; the result is accepted
/// when it runs over exactly the surviving vertices of `previous`. Otherwise
/// (no loop, or deleted hole faces splitting the selection) the surviving
/// vertices of `previous` are used in their original order.
fn rederive_loop(
    mesh: &EditMesh,
    previous: &[VertexId],
    plane: &Plane,
    settings: &PlanarizeSettings,
) -> Result<Vec<VertexId>, MeshFlattenError> {
    let survivors: Vec<VertexId> = previous
        .iter()
        .copied()
        .filter(|&v| mesh.is_vertex_valid(v))
        .collect();
    let boundary = boundary_edges(mesh, &mesh.selected_faces())?;
    let mut loops = edges_to_loops(mesh, &boundary);
    let Some(i) = choose_loop(mesh, &loops, plane, settings.keep_largest_loop) else {
        return Ok(survivors);
    };
    let candidate = loops.swap_remove(i);
    let same = candidate.len() == survivors.len()
        && candidate.iter().sorted().eq(survivors.iter().sorted());
    if same {
        Ok(candidate)
    } else {
        log::debug!(
            "simplify: re-extracted loop ({} verts) differs from simplified loop ({} verts)",
            candidate.len(),
            survivors.len()
        );
        Ok(survivors)
    }
}

/// Remove face-less edges left by the deleted faces, except edges of the loop.
fn purge_wire_edges(
    mesh: &mut EditMesh,
    candidates: &[EdgeId],
    boundary_loop: &[VertexId],
) -> Result<usize, MeshFlattenError> {
    let loop_edges: HashSet<EdgeId> = boundary_loop
        .iter()
        .circular_tuple_windows()
        .filter_map(|(&a, &b)| mesh.edge_between(a, b))
        .collect();
    let wire: Vec<EdgeId> = candidates
        .iter()
        .copied()
        .unique()
        .filter(|e| !loop_edges.contains(e))
        .filter(|&e| mesh.edge(e).is_ok_and(|edge| edge.faces().is_empty()))
        .collect();
    for &e in &wire {
        mesh.remove_edge(e)?;
    }
    if !wire.is_empty() {
        log::debug!("rebuild: purged {} wire edges", wire.len());
    }
    Ok(wire.len())
}

/// Create the replacement face, reusing an identical existing one.
fn create_face(
    p: &mut Pipeline<'_>,
    cycle: &[VertexId],
    plane: &Plane,
) -> Result<FaceId, MeshFlattenError> {
    let basis = plane.basis();
    let local = cycle
        .iter()
        .map(|&v| p.session.co(v).map(|co| plane.to_local(co, basis)))
        .collect::<Result<Vec<_>, _>>()?;
    let created = if polygon_self_intersects_2d(&local) {
        Err(FaceCreateError::SelfIntersecting)
    } else {
        p.session.add_face(cycle)
    };
    match created {
        Ok(face) => Ok(face),
        Err(FaceCreateError::Exists(face)) => {
            log::debug!("rebuild: reusing existing face {face}");
            Ok(face)
        }
        Err(err) => {
            p.session.deselect_all();
            Err(MeshFlattenError::RebuildFailed(err))
        }
    }
}

fn finalize(
    p: &mut Pipeline<'_>,
    face: FaceId,
    settings: &PlanarizeSettings,
) -> Result<(), MeshFlattenError> {
    p.session.deselect_all();
    p.session.set_face_select(face, true)?;
    p.session.set_active_face(Some(face))?;
    if settings.recalc_normals {
        recalc_face_normals(&mut p.session, &[face])?;
    }
    p.advance(Stage::Finalized);
    Ok(())
}
