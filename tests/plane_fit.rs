use mesh_flatten::geometry::metrics::{add, centroid, cross, norm, normalize, plane_basis, scale};
use mesh_flatten::geometry::plane::{FALLBACK_NORMAL, Plane, best_fit_plane};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn noisy_plane_points(normal: [f64; 3], noise: f64, n: usize, seed: u64) -> Vec<[f64; 3]> {
    let (u, v) = plane_basis(normal);
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let s: f64 = rng.gen_range(-5.0..5.0);
            let t: f64 = rng.gen_range(-5.0..5.0);
            let h: f64 = rng.gen_range(-noise..=noise);
            add(add(scale(u, s), scale(v, t)), scale(normal, h))
        })
        .collect()
}

proptest! {
    #[test]
    fn projected_points_are_coplanar(
        nx in -1.0f64..1.0,
        ny in -1.0f64..1.0,
        nz in 0.1f64..1.0,
        n in 4usize..80,
        seed in any::<u64>(),
    ) {
        let normal = normalize([nx, ny, nz]).unwrap();
        let points = noisy_plane_points(normal, 0.05, n, seed);
        let plane = best_fit_plane(&points);

        prop_assert!((norm(plane.normal) - 1.0).abs() < 1e-12);
        for p in &points {
            let q = plane.project(*p);
            prop_assert!(plane.signed_distance(q).abs() < 1e-9);
        }
    }

    #[test]
    fn exact_plane_is_recovered(
        nx in -1.0f64..1.0,
        ny in -1.0f64..1.0,
        nz in 0.1f64..1.0,
        seed in any::<u64>(),
    ) {
        let normal = normalize([nx, ny, nz]).unwrap();
        let points = noisy_plane_points(normal, 0.0, 24, seed);
        let plane = best_fit_plane(&points);
        prop_assert!(norm(cross(plane.normal, normal)) < 1e-6);
    }
}

#[test]
fn collinear_points_fall_back_to_up() {
    let points = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [3.0, 3.0, 3.0]];
    let plane = best_fit_plane(&points);
    assert_eq!(plane.normal, FALLBACK_NORMAL);
    let c = centroid(&points);
    for k in 0..3 {
        assert!((plane.origin[k] - c[k]).abs() < 1e-12);
    }
}

#[test]
fn too_few_points_fall_back_to_up() {
    assert_eq!(best_fit_plane(&[]), Plane::fallback([0.0; 3]));
    let plane = best_fit_plane(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    assert_eq!(plane.normal, FALLBACK_NORMAL);
    assert_eq!(plane.origin, [1.0, 2.0, 3.0]);
}

#[test]
fn plane_serializes_as_plain_arrays() {
    let plane = Plane::new([1.0, 0.0, 0.0], [0.0, 0.0, 2.0]);
    let json = serde_json::to_value(plane).unwrap();
    assert_eq!(json["normal"], serde_json::json!([0.0, 0.0, 1.0]));
    let back: Plane = serde_json::from_value(json).unwrap();
    assert_eq!(back, plane);
}
