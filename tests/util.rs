#![allow(dead_code)]
use mesh_flatten::config::PlanarizeSettings;
use mesh_flatten::geometry::metrics::{newell_vector, norm};
use mesh_flatten::mesh_generation::{GeneratedMesh, quad_grid};
use mesh_flatten::topology::{EditMesh, FaceId};

/// Select every face in `faces`.
pub fn select_faces(mesh: &mut EditMesh, faces: &[FaceId]) {
    for &f in faces {
        mesh.set_face_select(f, true).unwrap();
    }
}

/// An `nx`×`ny` unit grid with every face selected.
pub fn selected_grid(nx: usize, ny: usize) -> GeneratedMesh {
    let mut grid = quad_grid(nx, ny, 1.0);
    select_faces(&mut grid.mesh, &grid.faces);
    grid
}

/// Defaults with weld and simplification switched off.
pub fn plain_settings() -> PlanarizeSettings {
    PlanarizeSettings {
        weld_boundary: false,
        simplify_boundary: false,
        ..Default::default()
    }
}

/// Area of a (planar) face via Newell's vector.
pub fn face_area(mesh: &EditMesh, f: FaceId) -> f64 {
    0.5 * norm(newell_vector(&mesh.face_positions(f).unwrap()))
}

/// Snapshot of every vertex position in arena order.
pub fn positions(mesh: &EditMesh) -> Vec<[f64; 3]> {
    mesh.vertices().map(|(_, v)| v.co).collect()
}

/// Assert vec is a permutation of another vec (order-agnostic).
pub fn assert_permutation<T: Ord + Copy + std::fmt::Debug>(got: &[T], want: &[T]) {
    let mut a = got.to_vec();
    a.sort_unstable();
    let mut b = want.to_vec();
    b.sort_unstable();
    assert_eq!(a, b, "not a permutation\n got={:?}\nwant={:?}", got, want);
}
