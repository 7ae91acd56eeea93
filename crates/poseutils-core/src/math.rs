//! Scalar and buffer type definitions.
//!
//! All buffers are row-major. Rotation matrices are stored as `[[Real; 3]; 3]`
//! (row `i` is `R[i]`), transforms in the augmented form keep the translation
//! as the fourth row.

use nalgebra::{Isometry3, Matrix3, Vector3};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;
/// 3D rigid transform (SE(3)) using [`Real`].
pub type Iso3 = Isometry3<Real>;

/// A point (or free vector) in 3D.
pub type Point3 = [Real; 3];
/// Row-major 3×3 rotation matrix.
pub type RotMat = [[Real; 3]; 3];
/// Rodrigues (axis-angle) vector: direction is the axis, norm the angle in radians.
pub type Rodrigues = [Real; 3];
/// Augmented transform: rows 0..3 are `R`, row 3 is `t`. Maps `x` to `R x + t`.
pub type RtMat = [[Real; 3]; 4];
/// Compact transform `[r, t]`. Maps `x` to `R(r) x + t`.
pub type RtVec = [Real; 6];

/// Jacobian of a 3-vector with respect to a 3-vector.
pub type Jac3x3 = [[Real; 3]; 3];
/// Jacobian of a 3-vector with respect to a row-major flattened 3×3 matrix.
pub type Jac3x9 = [[Real; 9]; 3];
/// Jacobian of a row-major flattened 3×3 matrix with respect to a 3-vector.
pub type Jac9x3 = [[Real; 3]; 9];

/// Flatten a row-major 3×3 matrix into `[R00, R01, R02, R10, ..., R22]`.
pub fn flatten_rows(m: &RotMat) -> [Real; 9] {
    std::array::from_fn(|i| m[i / 3][i % 3])
}

/// Inverse of [`flatten_rows`].
pub fn rows_from_flat(v: &[Real; 9]) -> RotMat {
    std::array::from_fn(|i| std::array::from_fn(|j| v[3 * i + j]))
}

/// Convert a row-major buffer into an nalgebra matrix.
pub fn mat3_from_rows(m: &RotMat) -> Mat3 {
    Mat3::from_fn(|i, j| m[i][j])
}

/// Convert an nalgebra matrix into a row-major buffer.
pub fn rows_from_mat3(m: &Mat3) -> RotMat {
    std::array::from_fn(|i| std::array::from_fn(|j| m[(i, j)]))
}
