//! Reference planes and best-fit plane estimation.
//!
//! The best-fit normal is the eigenvector of the point covariance matrix with
//! the smallest eigenvalue. It is found by inverse power iteration on the
//! regularized covariance, solving one dense 3×3 system per step with
//! Gaussian elimination and partial pivoting. Degenerate inputs (fewer than
//! three points, coincident or collinear points, a singular system) fall back
//! to the upward normal `(0, 0, 1)` instead of failing.

use crate::geometry::metrics::{
    EPS, add, centroid, dot, norm, normalize, plane_basis, scale, sub,
};

/// Normal used whenever the geometry does not determine one.
pub const FALLBACK_NORMAL: [f64; 3] = [0.0, 0.0, 1.0];

/// Pivots below this magnitude mark a system as singular.
pub const PIVOT_EPS: f64 = 1e-14;

/// Fixed budget of inverse-iteration steps.
pub const INVERSE_ITERATIONS: usize = 24;

/// A plane through `origin` with unit `normal`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Plane {
    pub origin: [f64; 3],
    pub normal: [f64; 3],
}

impl Plane {
    /// Plane through `origin`; `normal` is normalized, a zero normal becomes
    /// [`FALLBACK_NORMAL`].
    pub fn new(origin: [f64; 3], normal: [f64; 3]) -> Self {
        Self {
            origin,
            normal: normalize(normal).unwrap_or(FALLBACK_NORMAL),
        }
    }

    /// Horizontal plane through `origin`.
    pub fn fallback(origin: [f64; 3]) -> Self {
        Self {
            origin,
            normal: FALLBACK_NORMAL,
        }
    }

    /// Signed distance of `p` along the normal.
    #[inline]
    pub fn signed_distance(&self, p: [f64; 3]) -> f64 {
        dot(sub(p, self.origin), self.normal)
    }

    /// Orthogonal projection `p - n·((p - origin)·n)`.
    #[inline]
    pub fn project(&self, p: [f64; 3]) -> [f64; 3] {
        sub(p, scale(self.normal, self.signed_distance(p)))
    }

    /// Orthonormal in-plane axes, see [`plane_basis`].
    pub fn basis(&self) -> ([f64; 3], [f64; 3]) {
        plane_basis(self.normal)
    }

    /// Plane-local 2D coordinates of `p` in the given basis.
    #[inline]
    pub fn to_local(&self, p: [f64; 3], basis: ([f64; 3], [f64; 3])) -> [f64; 2] {
        let d = sub(p, self.origin);
        [dot(d, basis.0), dot(d, basis.1)]
    }
}

/// Solve `a·x = b` by Gaussian elimination with partial pivoting.
///
/// Returns `None` when a pivot's magnitude falls below [`PIVOT_EPS`].
pub fn solve_3x3(a: [[f64; 3]; 3], b: [f64; 3]) -> Option<[f64; 3]> {
    let mut m = [
        [a[0][0], a[0][1], a[0][2], b[0]],
        [a[1][0], a[1][1], a[1][2], b[1]],
        [a[2][0], a[2][1], a[2][2], b[2]],
    ];

    for i in 0..3 {
        let mut pivot = i;
        let mut max = m[i][i].abs();
        for (r, row) in m.iter().enumerate().skip(i + 1) {
            if row[i].abs() > max {
                max = row[i].abs();
                pivot = r;
            }
        }
        if max < PIVOT_EPS {
            return None;
        }
        m.swap(i, pivot);

        let piv = m[i][i];
        for r in (i + 1)..3 {
            let f = m[r][i] / piv;
            m[r][i] = 0.0;
            for c in (i + 1)..4 {
                m[r][c] -= f * m[i][c];
            }
        }
    }

    let mut x = [0.0; 3];
    for i in (0..3).rev() {
        let mut s = m[i][3];
        for j in (i + 1)..3 {
            s -= m[i][j] * x[j];
        }
        x[i] = s / m[i][i];
    }
    Some(x)
}

/// Symmetric covariance of the points around `c`.
fn covariance(points: &[[f64; 3]], c: [f64; 3]) -> [[f64; 3]; 3] {
    let (mut xx, mut xy, mut xz, mut yy, mut yz, mut zz) = (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    for &p in points {
        let r = sub(p, c);
        xx += r[0] * r[0];
        xy += r[0] * r[1];
        xz += r[0] * r[2];
        yy += r[1] * r[1];
        yz += r[1] * r[2];
        zz += r[2] * r[2];
    }
    [[xx, xy, xz], [xy, yy, yz], [xz, yz, zz]]
}

/// Least-squares plane through the points.
///
/// See the module docs for the algorithm and its fallbacks. The sign of the
/// returned normal is arbitrary.
pub fn best_fit_plane(points: &[[f64; 3]]) -> Plane {
    if points.len() < 3 {
        let origin = points.first().copied().unwrap_or([0.0; 3]);
        log::debug!("best-fit plane: {} points, using fallback normal", points.len());
        return Plane::fallback(origin);
    }

    let c = centroid(points);
    let cov = covariance(points, c);
    let trace = cov[0][0] + cov[1][1] + cov[2][2];

    // Sum of principal 2x2 minors ~ λ1λ2 once λ3 vanishes; it is zero exactly
    // when at most one eigenvalue is non-zero (coincident or collinear points).
    let minors = cov[0][0] * cov[1][1] - cov[0][1] * cov[0][1] + cov[0][0] * cov[2][2]
        - cov[0][2] * cov[0][2]
        + cov[1][1] * cov[2][2]
        - cov[1][2] * cov[1][2];
    if trace <= EPS || minors <= EPS * trace * trace {
        log::debug!("best-fit plane: rank-deficient covariance, using fallback normal");
        return Plane::fallback(c);
    }

    let eps = EPS * (trace + 1.0);
    let mut a = cov;
    for (i, row) in a.iter_mut().enumerate() {
        row[i] += eps;
    }

    let mut x = normalize([1.0, 0.3, 0.2]).unwrap_or(FALLBACK_NORMAL);
    for _ in 0..INVERSE_ITERATIONS {
        let Some(y) = solve_3x3(a, x) else {
            log::debug!("best-fit plane: singular system, using fallback normal");
            return Plane::fallback(c);
        };
        let len = norm(y);
        if len < PIVOT_EPS {
            break;
        }
        x = scale(y, 1.0 / len);
    }

    Plane::new(c, x)
}

/// Area-weighted average of face normals.
///
/// Each item is `(unit normal, area)`. Falls back to [`FALLBACK_NORMAL`] when
/// the normals cancel out.
pub fn average_normal<I>(weighted: I) -> [f64; 3]
where
    I: IntoIterator<Item = ([f64; 3], f64)>,
{
    let sum = weighted
        .into_iter()
        .fold([0.0; 3], |acc, (n, area)| add(acc, scale(n, area)));
    normalize(sum).unwrap_or_else(|| {
        log::debug!("average normal: normals cancel out, using fallback normal");
        FALLBACK_NORMAL
    })
}
