//! Rigid transforms in augmented (`RtMat`) and compact (`RtVec`) form.
//!
//! Both forms map a point `x` to `R x + t`. Composition follows function
//! composition: `compose(a, b)` applies `b` first.

use crate::rotation::{
    identity_rot_mat, mat_from_rodrigues, rodrigues_from_mat, rotate_point_mat,
    rotate_point_rodrigues,
};
use poseutils_core::{Jac3x3, Jac3x9, Point3, RotMat, RtMat, RtVec};

fn rot_of(rt: &RtMat) -> RotMat {
    [rt[0], rt[1], rt[2]]
}

fn rt_mat(rot: &RotMat, t: &Point3) -> RtMat {
    [rot[0], rot[1], rot[2], *t]
}

fn add(a: &Point3, b: &Point3) -> Point3 {
    std::array::from_fn(|i| a[i] + b[i])
}

fn set_identity(j: Option<&mut Jac3x3>) {
    if let Some(j) = j {
        *j = identity_rot_mat();
    }
}

/// Identity transform in augmented form: `R = I`, `t = 0`.
pub fn identity_rt_mat() -> RtMat {
    rt_mat(&identity_rot_mat(), &[0.0; 3])
}

/// Identity transform in compact form: all zeros.
pub fn identity_rt_vec() -> RtVec {
    [0.0; 6]
}

/// Apply an augmented transform: `R x + t`.
///
/// `j_rot` is taken with respect to `R` flattened row-major; `j_t` is always
/// the identity.
pub fn transform_point_rt_mat(
    rt: &RtMat,
    x: &Point3,
    j_rot: Option<&mut Jac3x9>,
    j_t: Option<&mut Jac3x3>,
    j_x: Option<&mut Jac3x3>,
) -> Point3 {
    set_identity(j_t);
    add(&rotate_point_mat(&rot_of(rt), x, j_rot, j_x), &rt[3])
}

/// Apply a compact transform: `rotate(r, x) + t`.
///
/// # Example
/// ```
/// use poseutils::transform_point_rt_vec;
///
/// let half_turn_z = [0.0, 0.0, std::f64::consts::PI, 1.0, 2.0, 3.0];
/// let y = transform_point_rt_vec(&half_turn_z, &[1.0, 0.0, 0.0], None, None, None);
/// assert!((y[0] - 0.0).abs() < 1e-12);
/// assert!((y[1] - 2.0).abs() < 1e-12);
/// ```
pub fn transform_point_rt_vec(
    rt: &RtVec,
    x: &Point3,
    j_r: Option<&mut Jac3x3>,
    j_t: Option<&mut Jac3x3>,
    j_x: Option<&mut Jac3x3>,
) -> Point3 {
    let r = [rt[0], rt[1], rt[2]];
    let t = [rt[3], rt[4], rt[5]];
    set_identity(j_t);
    add(&rotate_point_rodrigues(&r, x, j_r, j_x), &t)
}

/// Augmented to compact form; the rotation goes through [`rodrigues_from_mat`].
pub fn rt_vec_from_rt_mat(rt: &RtMat) -> RtVec {
    let r = rodrigues_from_mat(&rot_of(rt), None);
    let t = rt[3];
    [r[0], r[1], r[2], t[0], t[1], t[2]]
}

/// Compact to augmented form; the rotation goes through [`mat_from_rodrigues`].
pub fn rt_mat_from_rt_vec(rt: &RtVec) -> RtMat {
    let rot = mat_from_rodrigues(&[rt[0], rt[1], rt[2]], None);
    rt_mat(&rot, &[rt[3], rt[4], rt[5]])
}

/// Inverse transform: `R' = Rᵀ`, `t' = -Rᵀ t`.
pub fn invert_rt_mat(rt: &RtMat) -> RtMat {
    let rot_t: RotMat = std::array::from_fn(|i| std::array::from_fn(|j| rt[j][i]));
    let t = rotate_point_mat(&rot_t, &rt[3], None, None).map(|v| -v);
    rt_mat(&rot_t, &t)
}

/// Inverse transform: `r' = -r`, `t' = -rotate(-r, t)`.
pub fn invert_rt_vec(rt: &RtVec) -> RtVec {
    let r_inv = [-rt[0], -rt[1], -rt[2]];
    let t = rotate_point_rodrigues(&r_inv, &[rt[3], rt[4], rt[5]], None, None);
    [r_inv[0], r_inv[1], r_inv[2], -t[0], -t[1], -t[2]]
}

/// `rt0 ∘ rt1`: `R = R0 R1`, `t = R0 t1 + t0`.
pub fn compose_rt_mat(rt0: &RtMat, rt1: &RtMat) -> RtMat {
    let rot0 = rot_of(rt0);
    let rot: RotMat = std::array::from_fn(|i| {
        std::array::from_fn(|j| (0..3).map(|k| rot0[i][k] * rt1[k][j]).sum())
    });
    let t = add(&rotate_point_mat(&rot0, &rt1[3], None, None), &rt0[3]);
    rt_mat(&rot, &t)
}

/// `rt0 ∘ rt1`, evaluated through the augmented form.
pub fn compose_rt_vec(rt0: &RtVec, rt1: &RtVec) -> RtVec {
    rt_vec_from_rt_mat(&compose_rt_mat(
        &rt_mat_from_rt_vec(rt0),
        &rt_mat_from_rt_vec(rt1),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use poseutils_core::test_utils::{
        max_abs_diff, numeric_jacobian, random_point, random_rt_mat, random_rt_vec,
    };
    use poseutils_core::{flatten_rows, rows_from_flat, Real};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn identities_do_nothing() {
        let x = [1.0, -2.0, 0.5];
        assert_eq!(transform_point_rt_mat(&identity_rt_mat(), &x, None, None, None), x);
        assert_eq!(transform_point_rt_vec(&identity_rt_vec(), &x, None, None, None), x);
        assert_eq!(rt_vec_from_rt_mat(&identity_rt_mat()), identity_rt_vec());
        assert_eq!(rt_mat_from_rt_vec(&identity_rt_vec()), identity_rt_mat());
    }

    #[test]
    fn translation_only() {
        let rt = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0];
        let mut j_t = [[0.0; 3]; 3];
        let mut j_x = [[0.0; 3]; 3];
        let y = transform_point_rt_vec(&rt, &[1.0, 1.0, 1.0], None, Some(&mut j_t), Some(&mut j_x));
        assert_eq!(y, [2.0, 3.0, 4.0]);
        assert_eq!(j_t, identity_rot_mat());
        assert_eq!(j_x, identity_rot_mat());
        assert_eq!(invert_rt_vec(&rt), [0.0, 0.0, 0.0, -1.0, -2.0, -3.0]);
    }

    #[test]
    fn quarter_turn_composition() {
        // 90° about z, then shift by (1, 0, 0).
        let rot_z = [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        let a = rt_mat(&rot_z, &[0.0; 3]);
        let b = rt_mat(&identity_rot_mat(), &[1.0, 0.0, 0.0]);
        let ab = compose_rt_mat(&a, &b);
        let y = transform_point_rt_mat(&ab, &[0.0, 0.0, 0.0], None, None, None);
        assert_eq!(y, [0.0, 1.0, 0.0]);
        let ba = compose_rt_mat(&b, &a);
        let y = transform_point_rt_mat(&ba, &[1.0, 0.0, 0.0], None, None, None);
        assert_eq!(y, [1.0, 1.0, 0.0]);
    }

    #[test]
    fn inverse_undoes_transform() {
        let mut rng = StdRng::seed_from_u64(31);
        for _ in 0..20 {
            let x = random_point(&mut rng, 4.0);

            let rt = random_rt_mat(&mut rng);
            let y = transform_point_rt_mat(&rt, &x, None, None, None);
            let back = transform_point_rt_mat(&invert_rt_mat(&rt), &y, None, None, None);
            assert!(max_abs_diff(&back, &x) < 1e-13);

            let rt = random_rt_vec(&mut rng);
            let y = transform_point_rt_vec(&rt, &x, None, None, None);
            let back = transform_point_rt_vec(&invert_rt_vec(&rt), &y, None, None, None);
            assert!(max_abs_diff(&back, &x) < 1e-13);
        }
    }

    #[test]
    fn compact_and_augmented_forms_agree() {
        let mut rng = StdRng::seed_from_u64(32);
        for _ in 0..20 {
            let a = random_rt_vec(&mut rng);
            let b = random_rt_vec(&mut rng);
            let x = random_point(&mut rng, 3.0);

            let via_vec = transform_point_rt_vec(&compose_rt_vec(&a, &b), &x, None, None, None);
            let via_mat = transform_point_rt_mat(
                &compose_rt_mat(&rt_mat_from_rt_vec(&a), &rt_mat_from_rt_vec(&b)),
                &x,
                None,
                None,
                None,
            );
            let sequential = transform_point_rt_vec(
                &a,
                &transform_point_rt_vec(&b, &x, None, None, None),
                None,
                None,
                None,
            );
            assert!(max_abs_diff(&via_vec, &via_mat) < 1e-12);
            assert!(max_abs_diff(&via_vec, &sequential) < 1e-12);

            let inv_vec = rt_mat_from_rt_vec(&invert_rt_vec(&a));
            let inv_mat = invert_rt_mat(&rt_mat_from_rt_vec(&a));
            assert!(max_abs_diff(inv_vec.as_flattened(), inv_mat.as_flattened()) < 1e-13);
        }
    }

    #[test]
    fn rt_mat_jacobians_match_finite_differences() {
        let mut rng = StdRng::seed_from_u64(33);
        let rt = random_rt_mat(&mut rng);
        let x = random_point(&mut rng, 2.0);
        let mut j_rot = [[0.0; 9]; 3];
        let mut j_t = [[0.0; 3]; 3];
        let mut j_x = [[0.0; 3]; 3];
        transform_point_rt_mat(&rt, &x, Some(&mut j_rot), Some(&mut j_t), Some(&mut j_x));

        let fd_rot = numeric_jacobian(
            |flat| {
                let rot = rows_from_flat(flat);
                transform_point_rt_mat(&rt_mat(&rot, &rt[3]), &x, None, None, None)
            },
            &flatten_rows(&rot_of(&rt)),
            1e-6,
        );
        let fd_x = numeric_jacobian(|x| transform_point_rt_mat(&rt, x, None, None, None), &x, 1e-6);
        assert!(max_abs_diff(j_rot.as_flattened(), fd_rot.as_flattened()) < 1e-8);
        assert!(max_abs_diff(j_x.as_flattened(), fd_x.as_flattened()) < 1e-8);
        assert_eq!(j_t, identity_rot_mat());
    }

    #[test]
    fn rt_vec_jacobians_match_finite_differences() {
        let mut rng = StdRng::seed_from_u64(34);
        for _ in 0..10 {
            let rt = random_rt_vec(&mut rng);
            let x = random_point(&mut rng, 2.0);
            let mut j_r = [[0.0; 3]; 3];
            let mut j_t = [[0.0; 3]; 3];
            let mut j_x = [[0.0; 3]; 3];
            transform_point_rt_vec(&rt, &x, Some(&mut j_r), Some(&mut j_t), Some(&mut j_x));

            let fd_rt = numeric_jacobian(
                |rt| transform_point_rt_vec(rt, &x, None, None, None),
                &rt,
                1e-6,
            );
            for i in 0..3 {
                for k in 0..3 {
                    let (dr, dt) = (fd_rt[i][k], fd_rt[i][3 + k]);
                    assert!((j_r[i][k] - dr).abs() < 1e-6, "J_r[{i}][{k}]: {} vs {dr}", j_r[i][k]);
                    assert!((j_t[i][k] - dt).abs() < 1e-8, "J_t[{i}][{k}]: {} vs {dt}", j_t[i][k]);
                }
            }
            let fd_x =
                numeric_jacobian(|x| transform_point_rt_vec(&rt, x, None, None, None), &x, 1e-6);
            let err: Real = max_abs_diff(j_x.as_flattened(), fd_x.as_flattened());
            assert!(err < 1e-6, "J_x deviates by {err:e}");
        }
    }
}
