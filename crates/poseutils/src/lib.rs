//! Rigid-body pose utilities with analytic Jacobians.
//!
//! Rotations are handled as Rodrigues vectors ([`Rodrigues`]) or row-major
//! matrices ([`RotMat`]); transforms as augmented `[R; t]` blocks ([`RtMat`])
//! or compact `[r, t]` vectors ([`RtVec`]). Every differentiable entry point
//! takes one `Option<&mut Jac…>` per input: pass `None` for Jacobians you do
//! not need and the computation runs at the matching derivative width.
//!
//! ```
//! use poseutils::{compose_rt_vec, invert_rt_vec, transform_point_rt_vec};
//!
//! let pose = [0.1, -0.4, 0.25, 1.0, 0.0, -2.0];
//! let x = [0.5, 1.5, -0.5];
//! let mut j_r = [[0.0; 3]; 3];
//! let y = transform_point_rt_vec(&pose, &x, Some(&mut j_r), None, None);
//!
//! let back = transform_point_rt_vec(&invert_rt_vec(&pose), &y, None, None, None);
//! assert!((back[0] - x[0]).abs() < 1e-12);
//!
//! let twice = compose_rt_vec(&pose, &pose);
//! assert!((twice[0] - 0.2).abs() < 1e-12);
//! ```
//!
//! Matrix → Rodrigues conversion is also available over strided buffers
//! ([`rodrigues_from_mat_strided`]) for data living inside larger arrays.

pub mod params;
mod procrustes;
mod rotation;
mod strided;
mod transform;

pub use procrustes::*;
pub use rotation::*;
pub use strided::*;
pub use transform::*;

pub use poseutils_core::{
    Jac3x3, Jac3x9, Jac9x3, LayoutError, Point3, Real, Rodrigues, RotMat, RtMat, RtVec,
};
