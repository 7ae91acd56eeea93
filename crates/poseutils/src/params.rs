//! Conversions between pose buffers and nalgebra types.

use anyhow::{ensure, Result};
use nalgebra::{DVector, DVectorView, Rotation3, Translation3, UnitQuaternion};
use poseutils_core::{mat3_from_rows, rows_from_mat3, Iso3, RtMat, RtVec, Vec3};

/// Flatten a compact transform into a 6D parameter vector `[rx, ry, rz, tx, ty, tz]`.
pub fn rt_vec_to_dvec(rt: &RtVec) -> DVector<f64> {
    DVector::from_column_slice(rt)
}

/// Read a compact transform back from a 6D parameter vector.
pub fn rt_vec_from_dvec(v: DVectorView<'_, f64>) -> Result<RtVec> {
    ensure!(
        v.len() == 6,
        "expected rt vector of length 6, got {}",
        v.len()
    );
    Ok(std::array::from_fn(|i| v[i]))
}

/// Augmented transform to `Iso3`. The rotation block is assumed orthonormal.
pub fn iso3_from_rt_mat(rt: &RtMat) -> Iso3 {
    let rot = Rotation3::from_matrix_unchecked(mat3_from_rows(&[rt[0], rt[1], rt[2]]));
    let t = rt[3];
    Iso3::from_parts(
        Translation3::new(t[0], t[1], t[2]),
        UnitQuaternion::from_rotation_matrix(&rot),
    )
}

/// `Iso3` to augmented form.
pub fn rt_mat_from_iso3(pose: &Iso3) -> RtMat {
    let rows = rows_from_mat3(pose.rotation.to_rotation_matrix().matrix());
    let t = pose.translation.vector;
    [rows[0], rows[1], rows[2], [t.x, t.y, t.z]]
}

/// Compact transform to `Iso3`; `r` is used as nalgebra's scaled axis.
pub fn iso3_from_rt_vec(rt: &RtVec) -> Iso3 {
    Iso3::new(
        Vec3::new(rt[3], rt[4], rt[5]),
        Vec3::new(rt[0], rt[1], rt[2]),
    )
}

/// `Iso3` to compact form; the rotation angle lands in `[0, π]`.
pub fn rt_vec_from_iso3(pose: &Iso3) -> RtVec {
    let r = pose.rotation.scaled_axis();
    let t = pose.translation.vector;
    [r.x, r.y, r.z, t.x, t.y, t.z]
}
