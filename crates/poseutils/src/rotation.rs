//! Rotation algebra over Rodrigues vectors and rotation matrices.
//!
//! Every formula is written once, generically over the derivative width `N`
//! of [`Jet`]. The public entry points look at which Jacobians the caller
//! asked for, pick the width (0 for value-only calls), seed the inputs and
//! extract the requested blocks. Skipping a Jacobian never changes the value
//! and never pays for that derivative.
//!
//! With `θ = |r|` the Rodrigues formula reads
//!
//! ```text
//! rotate(r, x) = x cos θ + (r × x) sin θ / θ + r (r · x) (1 - cos θ) / θ²
//! R(r)         = cos θ I + (sin θ / θ) [r]ₓ + ((1 - cos θ) / θ²) r rᵀ
//! ```
//!
//! Near θ = 0 the three coefficients are replaced by their Taylor series.

use log::trace;
use poseutils_core::{
    flatten_rows, rows_from_flat, Jac3x3, Jac3x9, Jac9x3, Jet, JetVec, Point3, Real, Rodrigues,
    RotMat,
};

/// Squared rotation angle below which the Rodrigues coefficients use their
/// Taylor series.
pub const SMALL_ANGLE_TH2: Real = 1e-10;

/// Rotation angle at or below which the matrix → Rodrigues conversion uses
/// its θ → 0 limit.
pub const SMALL_ANGLE_TH: Real = 1e-10;

pub(crate) fn dot<const N: usize>(a: &JetVec<N, 3>, b: &JetVec<N, 3>) -> Jet<N> {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub(crate) fn cross<const N: usize>(a: &JetVec<N, 3>, b: &JetVec<N, 3>) -> JetVec<N, 3> {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
    .into()
}

/// `(cos θ, sin θ / θ, (1 - cos θ) / θ²)` as functions of `θ²`.
#[derive(Debug, Clone, Copy)]
struct RodriguesCoeffs<const N: usize> {
    cos: Jet<N>,
    sinc: Jet<N>,
    versc: Jet<N>,
}

fn rodrigues_coeffs_series<const N: usize>(th2: Jet<N>) -> RodriguesCoeffs<N> {
    // Truncated after the θ² term; the dropped terms are O(θ⁴). Dropping the
    // θ² terms too gives the first-order form x + r × x + r (r · x) / 2, which
    // differs by under 1e-10 |x| here but has a Jacobian jump at the threshold.
    RodriguesCoeffs {
        cos: 1.0 - th2 / 2.0,
        sinc: 1.0 - th2 / 6.0,
        versc: 0.5 - th2 / 24.0,
    }
}

fn rodrigues_coeffs_exact<const N: usize>(th2: Jet<N>) -> RodriguesCoeffs<N> {
    let th = th2.sqrt();
    let (s, c) = th.sin_cos();
    RodriguesCoeffs {
        cos: c,
        sinc: s / th,
        versc: (1.0 - c) / th2,
    }
}

fn rodrigues_coeffs<const N: usize>(th2: Jet<N>) -> RodriguesCoeffs<N> {
    if th2.val < SMALL_ANGLE_TH2 {
        trace!("rodrigues: small-angle series, th2 = {:e}", th2.val);
        rodrigues_coeffs_series(th2)
    } else {
        rodrigues_coeffs_exact(th2)
    }
}

fn rotate_with_coeffs<const N: usize>(
    r: &JetVec<N, 3>,
    x: &JetVec<N, 3>,
    k: RodriguesCoeffs<N>,
) -> JetVec<N, 3> {
    let cross = cross(r, x);
    let inner = dot(r, x);
    JetVec {
        v: std::array::from_fn(|i| x[i] * k.cos + cross[i] * k.sinc + r[i] * inner * k.versc),
    }
}

/// Rotate `x` by the Rodrigues vector `r`.
pub(crate) fn rotate_point_r_core<const N: usize>(
    r: &JetVec<N, 3>,
    x: &JetVec<N, 3>,
) -> JetVec<N, 3> {
    rotate_with_coeffs(r, x, rodrigues_coeffs(dot(r, r)))
}

/// Row-major rotation matrix of the Rodrigues vector `r`.
///
/// Column `j` equals `rotate_point_r_core(r, e_j)`.
pub(crate) fn mat_from_rodrigues_core<const N: usize>(r: &JetVec<N, 3>) -> JetVec<N, 9> {
    let k = rodrigues_coeffs(dot(r, r));
    let skew = |i: usize, j: usize| match (i, j) {
        (0, 1) => -r[2],
        (0, 2) => r[1],
        (1, 0) => r[2],
        (1, 2) => -r[0],
        (2, 0) => -r[1],
        (2, 1) => r[0],
        _ => Jet::constant(0.0),
    };
    JetVec {
        v: std::array::from_fn(|idx| {
            let (i, j) = (idx / 3, idx % 3);
            let outer = r[i] * r[j] * k.versc;
            if i == j {
                outer + k.cos
            } else {
                outer + skew(i, j) * k.sinc
            }
        }),
    }
}

/// Rodrigues vector of the row-major rotation matrix `rot`.
pub(crate) fn rodrigues_from_mat_core<const N: usize>(rot: &JetVec<N, 9>) -> JetVec<N, 3> {
    let tr = rot[0] + rot[4] + rot[8];
    let costh = (tr - 1.0) / 2.0;
    let th = costh.acos();
    let axis: JetVec<N, 3> = [rot[7] - rot[5], rot[2] - rot[6], rot[3] - rot[1]].into();

    // `th` is NaN when rounding pushes cos θ just above 1; that lands in the
    // limit branch too.
    if th.val > SMALL_ANGLE_TH {
        let scale = th / dot(&axis, &axis).sqrt();
        JetVec {
            v: axis.v.map(|a| a * scale),
        }
    } else {
        // axis = 2 sin θ · n, and θ / (2 sin θ) → 1/2
        trace!("rodrigues_from_mat: small-angle limit, th = {:e}", th.val);
        JetVec {
            v: axis.v.map(|a| a / 2.0),
        }
    }
}

/// Identity rotation matrix.
pub fn identity_rot_mat() -> RotMat {
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
}

/// Identity rotation as a Rodrigues vector.
pub fn identity_rodrigues() -> Rodrigues {
    [0.0; 3]
}

/// Rotate a point by a rotation matrix: `R x`.
///
/// `j_rot` receives `∂(R x)/∂R` with `R` flattened row-major, `j_x` receives
/// `∂(R x)/∂x = R`.
pub fn rotate_point_mat(
    rot: &RotMat,
    x: &Point3,
    j_rot: Option<&mut Jac3x9>,
    j_x: Option<&mut Jac3x3>,
) -> Point3 {
    if let Some(j_rot) = j_rot {
        *j_rot = [[0.0; 9]; 3];
        for (i, row) in j_rot.iter_mut().enumerate() {
            row[3 * i..3 * i + 3].copy_from_slice(x);
        }
    }
    if let Some(j_x) = j_x {
        *j_x = *rot;
    }
    std::array::from_fn(|i| rot[i][0] * x[0] + rot[i][1] * x[1] + rot[i][2] * x[2])
}

/// Rotate a point by a Rodrigues vector.
///
/// `j_r` receives `∂x_out/∂r`, `j_x` receives `∂x_out/∂x`. Either may be
/// `None`.
///
/// # Example
/// ```
/// use poseutils::rotate_point_rodrigues;
///
/// let quarter_turn_z = [0.0, 0.0, std::f64::consts::FRAC_PI_2];
/// let mut j_r = [[0.0; 3]; 3];
/// let x = rotate_point_rodrigues(&quarter_turn_z, &[1.0, 0.0, 0.0], Some(&mut j_r), None);
/// assert!((x[1] - 1.0).abs() < 1e-12);
/// ```
pub fn rotate_point_rodrigues(
    r: &Rodrigues,
    x: &Point3,
    j_r: Option<&mut Jac3x3>,
    j_x: Option<&mut Jac3x3>,
) -> Point3 {
    match (j_r, j_x) {
        (None, None) => {
            rotate_point_r_core::<0>(&JetVec::constants(r), &JetVec::constants(x)).values()
        }
        (Some(j_r), None) => {
            let out = rotate_point_r_core::<3>(&JetVec::variables(r, 0), &JetVec::constants(x));
            *j_r = out.jacobian(0);
            out.values()
        }
        (None, Some(j_x)) => {
            let out = rotate_point_r_core::<3>(&JetVec::constants(r), &JetVec::variables(x, 0));
            *j_x = out.jacobian(0);
            out.values()
        }
        (Some(j_r), Some(j_x)) => {
            let out = rotate_point_r_core::<6>(&JetVec::variables(r, 0), &JetVec::variables(x, 3));
            *j_r = out.jacobian(0);
            *j_x = out.jacobian(3);
            out.values()
        }
    }
}

/// Convert a rotation matrix to a Rodrigues vector.
///
/// `j` receives `∂r/∂R` as a 3×9 block with `R` flattened row-major. The input
/// is assumed orthonormal; this is not checked.
///
/// # Notes
/// An exact half-turn (θ = π) yields NaN: the antisymmetric part of `R`
/// vanishes there, so the axis cannot be recovered from it.
pub fn rodrigues_from_mat(rot: &RotMat, j: Option<&mut Jac3x9>) -> Rodrigues {
    let flat = flatten_rows(rot);
    match j {
        None => rodrigues_from_mat_core::<0>(&JetVec::constants(&flat)).values(),
        Some(j) => {
            let out = rodrigues_from_mat_core::<9>(&JetVec::variables(&flat, 0));
            *j = out.jacobian(0);
            out.values()
        }
    }
}

/// Convert a Rodrigues vector to a rotation matrix.
///
/// `j` receives `∂R/∂r` as a 9×3 block, row `3 i + k` holding the derivative
/// of `R[i][k]`.
pub fn mat_from_rodrigues(r: &Rodrigues, j: Option<&mut Jac9x3>) -> RotMat {
    match j {
        None => rows_from_flat(&mat_from_rodrigues_core::<0>(&JetVec::constants(r)).values()),
        Some(j) => {
            let out = mat_from_rodrigues_core::<3>(&JetVec::variables(r, 0));
            *j = out.jacobian(0);
            rows_from_flat(&out.values())
        }
    }
}
