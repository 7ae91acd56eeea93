//! Matrix → Rodrigues conversion over caller-owned strided buffers.
//!
//! Callers that keep rotations inside larger arrays (batches of poses,
//! transposed storage, sub-blocks of augmented transforms) hand in flat
//! buffers plus byte strides. A non-positive stride means "dense row-major" for
//! that axis.

use crate::rotation::rodrigues_from_mat_core;
use poseutils_core::{JetVec, Layout, LayoutError, Real, StridedView, StridedViewMut};

/// Convert a rotation matrix to a Rodrigues vector through strided views.
///
/// `rot` must have shape (3, 3) and `r_out` shape (3). When given, `j_out`
/// must have shape (3, 3, 3) and receives `J[i][j][k] = ∂r_i/∂R[j][k]`.
/// Shapes are checked before anything is written.
pub fn rodrigues_from_mat_view(
    r_out: &mut StridedViewMut<'_, 1>,
    j_out: Option<&mut StridedViewMut<'_, 3>>,
    rot: &StridedView<'_, 2>,
) -> Result<(), LayoutError> {
    rot.layout().expect_shape([3, 3])?;
    r_out.layout().expect_shape([3])?;
    match j_out {
        None => {
            let mut rot_g = JetVec::<0, 9>::default();
            for row in 0..3 {
                rot_g.init_vars(&rot.row(row), 3 * row, None);
            }
            rodrigues_from_mat_core(&rot_g).extract_value(r_out);
        }
        Some(j_out) => {
            j_out.layout().expect_shape([3, 3, 3])?;
            let mut rot_g = JetVec::<9, 9>::default();
            for row in 0..3 {
                rot_g.init_vars(&rot.row(row), 3 * row, Some(3 * row));
            }
            let r = rodrigues_from_mat_core(&rot_g);
            r.extract_value(r_out);
            // Slots 3j..3j+3 hold the derivatives with respect to row j of R,
            // which is the slab J[:, j, :].
            for j in 0..3 {
                r.extract_grad(&mut j_out.select_axis1(j), 0, 3 * j);
            }
        }
    }
    Ok(())
}

/// Convert a rotation matrix to a Rodrigues vector, with explicit byte strides
/// for every buffer.
///
/// - `r_out`: 3 elements, `r_stride` bytes apart.
/// - `j_out`: optional (3, 3, 3) Jacobian buffer with its three byte strides.
/// - `rot`: (3, 3) matrix with row and column byte strides.
///
/// Non-positive strides select the dense row-major default for that axis
/// (r: 8; J: 72, 24, 8; R: 24, 8). All layouts are validated before any
/// output is written.
///
/// # Example
/// ```
/// use poseutils::rodrigues_from_mat_strided;
///
/// // Column-major identity, Rodrigues vector written every other element.
/// let rot = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
/// let mut r = [9.0; 6];
/// rodrigues_from_mat_strided(&mut r, 16, None, &rot, [8, 24]).unwrap();
/// assert_eq!(r, [0.0, 9.0, 0.0, 9.0, 0.0, 9.0]);
/// ```
pub fn rodrigues_from_mat_strided(
    r_out: &mut [Real],
    r_stride: isize,
    j_out: Option<(&mut [Real], [isize; 3])>,
    rot: &[Real],
    rot_strides: [isize; 2],
) -> Result<(), LayoutError> {
    let rot = StridedView::new(rot, Layout::from_byte_strides([3, 3], rot_strides)?)?;
    let mut r_view = StridedViewMut::new(r_out, Layout::from_byte_strides([3], [r_stride])?)?;
    match j_out {
        None => rodrigues_from_mat_view(&mut r_view, None, &rot),
        Some((j, j_strides)) => {
            let mut j_view =
                StridedViewMut::new(j, Layout::from_byte_strides([3, 3, 3], j_strides)?)?;
            rodrigues_from_mat_view(&mut r_view, Some(&mut j_view), &rot)
        }
    }
}
