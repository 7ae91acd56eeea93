//! Least-squares rigid alignment of corresponding 3D points or directions.
//!
//! Given pairs `(a_i, b_i)`, finds the rotation `R` and translation `t`
//! minimizing `Σ |a_i - (R b_i + t)|²` (Kabsch). The result maps the `b`
//! frame into the `a` frame.

use log::debug;
use poseutils_core::{rows_from_mat3, Mat3, Point3, Real, RtMat, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by [`align_procrustes`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProcrustesError {
    /// The two point sets are not paired one to one.
    #[error("point sets have different lengths ({a} vs {b})")]
    LengthMismatch { a: usize, b: usize },
    /// Too few pairs to fix the transform for the chosen [`AlignMode`].
    #[error("need at least {needed} correspondences, got {got}")]
    NotEnoughPoints { needed: usize, got: usize },
    /// nalgebra's SVD did not return `U` or `Vᵀ`.
    #[error("SVD failed to produce singular vectors")]
    SvdFailed,
}

/// What the inputs represent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignMode {
    /// Positions: solve for rotation and translation.
    #[default]
    Points,
    /// Free directions: rotation only, `t = 0`, no centering.
    Vectors,
}

impl AlignMode {
    fn min_pairs(self) -> usize {
        match self {
            AlignMode::Points => 3,
            AlignMode::Vectors => 2,
        }
    }
}

fn to_vec3(p: &Point3) -> Vec3 {
    Vec3::new(p[0], p[1], p[2])
}

fn centroid(pts: &[Point3]) -> Vec3 {
    pts.iter().map(to_vec3).sum::<Vec3>() / pts.len() as Real
}

/// Find the rigid transform that best maps `b` onto `a`.
///
/// # Example
/// ```
/// use poseutils::{align_procrustes, transform_point_rt_mat, AlignMode};
///
/// let b = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// let a = b.map(|p| [p[0] + 1.0, p[1], p[2] - 2.0]);
/// let rt = align_procrustes(&a, &b, AlignMode::Points).unwrap();
/// let y = transform_point_rt_mat(&rt, &b[1], None, None, None);
/// assert!((y[0] - 2.0).abs() < 1e-12 && (y[2] + 2.0).abs() < 1e-12);
/// ```
pub fn align_procrustes(
    a: &[Point3],
    b: &[Point3],
    mode: AlignMode,
) -> Result<RtMat, ProcrustesError> {
    if a.len() != b.len() {
        return Err(ProcrustesError::LengthMismatch {
            a: a.len(),
            b: b.len(),
        });
    }
    let needed = mode.min_pairs();
    if a.len() < needed {
        return Err(ProcrustesError::NotEnoughPoints {
            needed,
            got: a.len(),
        });
    }

    let (c_a, c_b) = match mode {
        AlignMode::Points => (centroid(a), centroid(b)),
        AlignMode::Vectors => (Vec3::zeros(), Vec3::zeros()),
    };

    let mut h = Mat3::zeros();
    for (pa, pb) in a.iter().zip(b.iter()) {
        h += (to_vec3(pa) - c_a) * (to_vec3(pb) - c_b).transpose();
    }

    let svd = h.svd(true, true);
    let mut u = svd.u.ok_or(ProcrustesError::SvdFailed)?;
    let v_t = svd.v_t.ok_or(ProcrustesError::SvdFailed)?;
    let mut rot = u * v_t;
    if rot.determinant() < 0.0 {
        // Flip the least significant direction to get a proper rotation.
        let weakest = svd.singular_values.imin();
        debug!(
            "procrustes: reflection fixed along singular direction {weakest} (sigma = {:e})",
            svd.singular_values[weakest]
        );
        u.column_mut(weakest).neg_mut();
        rot = u * v_t;
    }

    let t = c_a - rot * c_b;
    let rt = {
        let rows = rows_from_mat3(&rot);
        [rows[0], rows[1], rows[2], [t.x, t.y, t.z]]
    };

    let sq: Real = a
        .iter()
        .zip(b.iter())
        .map(|(pa, pb)| (to_vec3(pa) - (rot * to_vec3(pb) + t)).norm_squared())
        .sum();
    debug!(
        "procrustes ({mode:?}): {} pairs, rms residual {:e}",
        a.len(),
        (sq / a.len() as Real).sqrt()
    );
    Ok(rt)
}
