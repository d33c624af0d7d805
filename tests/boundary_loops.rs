mod util;

use mesh_flatten::algs::{boundary_edges, classify_boundary_edges, edges_to_loops, walk_loops};
use mesh_flatten::mesh_generation::{from_polygons, quad_grid};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use util::assert_permutation;

#[test]
fn disjoint_triangles_give_two_loops() {
    let soup = from_polygons(
        &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [5.0, 0.0, 0.0],
            [6.0, 0.0, 0.0],
            [5.0, 1.0, 0.0],
        ],
        &[vec![0, 1, 2], vec![3, 4, 5]],
    )
    .unwrap();
    let edges = boundary_edges(&soup.mesh, &soup.faces).unwrap();
    assert_eq!(edges.len(), 6);

    let loops = edges_to_loops(&soup.mesh, &edges);
    assert_eq!(loops.len(), 2);
    assert_permutation(&loops[0], &soup.vertices[..3]);
    assert_permutation(&loops[1], &soup.vertices[3..]);
}

#[test]
fn bowtie_is_split_at_the_pinch() {
    let soup = from_polygons(
        &[
            [0.0, 0.0, 0.0],
            [1.0, -1.0, 0.0],
            [1.0, 0.0, 0.0],
            [2.0, 1.0, 0.0],
            [2.0, -1.0, 0.0],
        ],
        &[vec![0, 1, 2], vec![2, 3, 4]],
    )
    .unwrap();
    let v = &soup.vertices;
    let loops = edges_to_loops(&soup.mesh, &boundary_edges(&soup.mesh, &soup.faces).unwrap());
    assert_eq!(loops.len(), 2);
    assert_permutation(&loops[0], &[v[0], v[1], v[2]]);
    assert_permutation(&loops[1], &[v[2], v[3], v[4]]);
}

#[test]
fn ring_of_faces_has_outer_and_inner_loop() {
    let grid = quad_grid(3, 3, 1.0);
    let ring: Vec<_> = grid
        .faces
        .iter()
        .enumerate()
        .filter_map(|(i, &f)| (i != 4).then_some(f))
        .collect();
    let c = classify_boundary_edges(&grid.mesh, &ring).unwrap();
    assert_eq!(c.boundary.len(), 16);
    assert_eq!(c.interior.len(), 8);

    let mut lengths: Vec<_> = edges_to_loops(&grid.mesh, &c.boundary)
        .iter()
        .map(Vec::len)
        .collect();
    lengths.sort_unstable();
    assert_eq!(lengths, vec![4, 12]);
}

#[test]
fn consecutive_loop_vertices_share_an_edge() {
    let grid = quad_grid(4, 2, 0.5);
    let edges = boundary_edges(&grid.mesh, &grid.faces).unwrap();
    let loops = edges_to_loops(&grid.mesh, &edges);
    assert_eq!(loops.len(), 1);
    let lp = &loops[0];
    assert_eq!(lp.len(), 12);
    for i in 0..lp.len() {
        let e = grid.mesh.edge_between(lp[i], lp[(i + 1) % lp.len()]);
        assert!(e.is_some_and(|e| edges.contains(&e)));
    }
}

proptest! {
    #[test]
    fn shuffled_cycle_is_recovered(n in 3usize..64, seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut edges: Vec<(usize, usize)> = (0..n)
            .map(|i| {
                let (a, b) = (i, (i + 1) % n);
                if rng.r#gen::<bool>() { (a, b) } else { (b, a) }
            })
            .collect();
        edges.shuffle(&mut rng);

        let loops = walk_loops(&edges);
        prop_assert_eq!(loops.len(), 1);
        let lp = &loops[0];
        prop_assert_eq!(lp.len(), n);
        for i in 0..n {
            let (a, b) = (lp[i], lp[(i + 1) % n]);
            prop_assert!((a + 1) % n == b || (b + 1) % n == a);
        }
    }
}
