//! Strided views over flat `Real` buffers.
//!
//! A [`Layout`] maps a logical `D`-dimensional index to an offset in a flat
//! buffer through per-axis element strides. Layouts are usually built from
//! byte strides handed in by a caller that owns a larger array; a
//! non-positive byte stride selects the dense row-major stride for that axis.
//!
//! Views validate once, on construction, that every addressable element lies
//! inside the buffer. Element access after that only panics on out-of-range
//! logical indices.

use crate::Real;
use log::trace;
use thiserror::Error;

const ELEM_BYTES: usize = std::mem::size_of::<Real>();

/// Errors raised while building a strided view.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// A byte stride is not a whole number of elements.
    #[error("stride of {stride} bytes on axis {axis} is not a multiple of the element size")]
    MisalignedStride { axis: usize, stride: isize },
    /// The logical shape of a view does not match what the operation needs.
    #[error("axis {axis} has extent {got}, expected {expected}")]
    ShapeMismatch {
        axis: usize,
        expected: usize,
        got: usize,
    },
    /// The buffer ends before the last element addressed by the layout.
    #[error("buffer holds {len} elements but the layout addresses {required}")]
    BufferTooShort { len: usize, required: usize },
}

/// Shape and element strides of a `D`-dimensional array in a flat buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout<const D: usize> {
    shape: [usize; D],
    strides: [usize; D],
}

impl<const D: usize> Layout<D> {
    /// Contiguous row-major layout: the last axis has stride 1.
    pub fn dense(shape: [usize; D]) -> Self {
        let mut strides = [1; D];
        for axis in (0..D.saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1] * shape[axis + 1];
        }
        Self { shape, strides }
    }

    /// Layout with explicit element strides.
    pub fn with_strides(shape: [usize; D], strides: [usize; D]) -> Self {
        Self { shape, strides }
    }

    /// Layout from byte strides. Axes with a non-positive stride get the dense
    /// row-major stride.
    pub fn from_byte_strides(
        shape: [usize; D],
        byte_strides: [isize; D],
    ) -> Result<Self, LayoutError> {
        let mut strides = Self::dense(shape).strides;
        for (axis, &stride) in byte_strides.iter().enumerate() {
            if stride <= 0 {
                trace!("axis {axis}: stride {stride} selects dense stride {}", strides[axis]);
                continue;
            }
            let bytes = stride.unsigned_abs();
            if bytes % ELEM_BYTES != 0 {
                return Err(LayoutError::MisalignedStride { axis, stride });
            }
            strides[axis] = bytes / ELEM_BYTES;
        }
        Ok(Self { shape, strides })
    }

    pub fn shape(&self) -> [usize; D] {
        self.shape
    }

    pub fn strides(&self) -> [usize; D] {
        self.strides
    }

    /// Flat offset of a logical index.
    ///
    /// # Panics
    /// Panics if any index component is out of range for its axis.
    #[inline]
    pub fn offset(&self, index: [usize; D]) -> usize {
        let mut offset = 0;
        for axis in 0..D {
            assert!(
                index[axis] < self.shape[axis],
                "index {} out of range for axis {axis} of extent {}",
                index[axis],
                self.shape[axis]
            );
            offset += index[axis] * self.strides[axis];
        }
        offset
    }

    /// Minimum buffer length that holds every element of the layout.
    pub fn required_len(&self) -> usize {
        if self.shape.iter().any(|&n| n == 0) {
            return 0;
        }
        1 + self
            .shape
            .iter()
            .zip(self.strides.iter())
            .map(|(&n, &s)| (n - 1) * s)
            .sum::<usize>()
    }

    /// Check that the layout has exactly the given shape.
    pub fn expect_shape(&self, shape: [usize; D]) -> Result<(), LayoutError> {
        for axis in 0..D {
            if self.shape[axis] != shape[axis] {
                return Err(LayoutError::ShapeMismatch {
                    axis,
                    expected: shape[axis],
                    got: self.shape[axis],
                });
            }
        }
        Ok(())
    }

    fn check_len(&self, len: usize) -> Result<(), LayoutError> {
        let required = self.required_len();
        if len < required {
            return Err(LayoutError::BufferTooShort { len, required });
        }
        Ok(())
    }
}

/// Offset of element `i` along the leading axis, clamped so that slicing an
/// empty view never goes past the end of its buffer.
fn leading_offset(len: usize, i: usize, stride: usize) -> usize {
    (i * stride).min(len)
}

/// Read-only strided view.
#[derive(Debug, Clone, Copy)]
pub struct StridedView<'a, const D: usize> {
    data: &'a [Real],
    layout: Layout<D>,
}

impl<'a, const D: usize> StridedView<'a, D> {
    pub fn new(data: &'a [Real], layout: Layout<D>) -> Result<Self, LayoutError> {
        layout.check_len(data.len())?;
        Ok(Self { data, layout })
    }

    /// Dense row-major view of `data`.
    pub fn dense(data: &'a [Real], shape: [usize; D]) -> Result<Self, LayoutError> {
        Self::new(data, Layout::dense(shape))
    }

    pub fn layout(&self) -> &Layout<D> {
        &self.layout
    }

    #[inline]
    pub fn get(&self, index: [usize; D]) -> Real {
        self.data[self.layout.offset(index)]
    }
}

impl<'a> StridedView<'a, 2> {
    /// Row `i` as a 1-D view.
    pub fn row(&self, i: usize) -> StridedView<'a, 1> {
        let [rows, cols] = self.layout.shape;
        let [s0, s1] = self.layout.strides;
        assert!(i < rows, "row {i} out of range for {rows} rows");
        let start = leading_offset(self.data.len(), i, s0);
        StridedView {
            data: &self.data[start..],
            layout: Layout::with_strides([cols], [s1]),
        }
    }
}

/// Mutable strided view.
#[derive(Debug)]
pub struct StridedViewMut<'a, const D: usize> {
    data: &'a mut [Real],
    layout: Layout<D>,
}

impl<'a, const D: usize> StridedViewMut<'a, D> {
    pub fn new(data: &'a mut [Real], layout: Layout<D>) -> Result<Self, LayoutError> {
        layout.check_len(data.len())?;
        Ok(Self { data, layout })
    }

    /// Dense row-major view of `data`.
    pub fn dense(data: &'a mut [Real], shape: [usize; D]) -> Result<Self, LayoutError> {
        Self::new(data, Layout::dense(shape))
    }

    pub fn layout(&self) -> &Layout<D> {
        &self.layout
    }

    #[inline]
    pub fn get(&self, index: [usize; D]) -> Real {
        self.data[self.layout.offset(index)]
    }

    #[inline]
    pub fn set(&mut self, index: [usize; D], value: Real) {
        let offset = self.layout.offset(index);
        self.data[offset] = value;
    }
}

impl StridedViewMut<'_, 3> {
    /// The 2-D slab `[:, j, :]`, spanning axes 0 and 2.
    pub fn select_axis1(&mut self, j: usize) -> StridedViewMut<'_, 2> {
        let [n0, n1, n2] = self.layout.shape;
        let [s0, s1, s2] = self.layout.strides;
        assert!(j < n1, "index {j} out of range for axis 1 of extent {n1}");
        let start = leading_offset(self.data.len(), j, s1);
        StridedViewMut {
            data: &mut self.data[start..],
            layout: Layout::with_strides([n0, n2], [s0, s2]),
        }
    }
}
