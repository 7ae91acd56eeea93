//! Utilities for testing rotation and transform code.
//!
//! This module is public so the test suites of every crate in the workspace
//! can share it, but it is not intended for production use. It provides random
//! rotations, points and transforms (generated independently of the rotation
//! algebra under test, through nalgebra) and central-difference Jacobians.

use crate::{rows_from_mat3, Point3, Real, Rodrigues, RotMat, RtMat, RtVec, Vec3};
use nalgebra::Rotation3;
use rand::Rng;

/// Uniformly distributed unit vector.
pub fn random_unit_vector<R: Rng>(rng: &mut R) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        let n = v.norm();
        if n > 1e-3 && n <= 1.0 {
            return v / n;
        }
    }
}

/// Rodrigues vector with a random axis and an angle drawn uniformly from
/// `[min_angle, max_angle)`.
pub fn random_rodrigues<R: Rng>(rng: &mut R, min_angle: Real, max_angle: Real) -> Rodrigues {
    let axis = random_unit_vector(rng);
    let angle = rng.random_range(min_angle..max_angle);
    let r = axis * angle;
    [r.x, r.y, r.z]
}

/// Rotation matrix with a random axis and an angle in `[0.1, 3.0)` radians,
/// built by nalgebra.
pub fn random_rot_mat<R: Rng>(rng: &mut R) -> RotMat {
    let r = random_rodrigues(rng, 0.1, 3.0);
    let rot = Rotation3::new(Vec3::new(r[0], r[1], r[2]));
    rows_from_mat3(rot.matrix())
}

/// Point with coordinates uniform in `[-scale, scale)`.
pub fn random_point<R: Rng>(rng: &mut R, scale: Real) -> Point3 {
    std::array::from_fn(|_| rng.random_range(-scale..scale))
}

/// Random augmented transform.
pub fn random_rt_mat<R: Rng>(rng: &mut R) -> RtMat {
    let rot = random_rot_mat(rng);
    let t = random_point(rng, 2.0);
    [rot[0], rot[1], rot[2], t]
}

/// Random compact transform with a rotation angle in `[0.1, 3.0)`.
pub fn random_rt_vec<R: Rng>(rng: &mut R) -> RtVec {
    let r = random_rodrigues(rng, 0.1, 3.0);
    let t = random_point(rng, 2.0);
    [r[0], r[1], r[2], t[0], t[1], t[2]]
}

/// Central-difference Jacobian of `f` at `x` with step `h`.
///
/// Row `i`, column `j` approximates `∂f_i / ∂x_j`.
pub fn numeric_jacobian<const I: usize, const O: usize>(
    f: impl Fn(&[Real; I]) -> [Real; O],
    x: &[Real; I],
    h: Real,
) -> [[Real; I]; O] {
    let mut jac = [[0.0; I]; O];
    for j in 0..I {
        let mut xp = *x;
        let mut xm = *x;
        xp[j] += h;
        xm[j] -= h;
        let fp = f(&xp);
        let fm = f(&xm);
        for i in 0..O {
            jac[i][j] = (fp[i] - fm[i]) / (2.0 * h);
        }
    }
    jac
}

/// Largest absolute element-wise difference. A NaN on either side makes the
/// result NaN, so `max_abs_diff(..) < tol` fails for it.
///
/// # Panics
/// Panics if the slices have different lengths.
pub fn max_abs_diff(a: &[Real], b: &[Real]) -> Real {
    assert_eq!(a.len(), b.len(), "length mismatch");
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, |m, d| if d.is_nan() || d > m { d } else { m })
}
