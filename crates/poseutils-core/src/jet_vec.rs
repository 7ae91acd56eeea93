//! Fixed-size vectors of [`Jet`]s.
//!
//! [`JetVec<N, M>`] groups `M` jets that share one `N`-wide derivative space.
//! Inputs are seeded either as independent variables (each element owns one
//! derivative slot) or as constants; after the computation the values and any
//! contiguous range of derivative slots are extracted into caller buffers,
//! optionally through strided views.

use crate::{Jet, Real, StridedView, StridedViewMut};
use std::ops::{Index, IndexMut};

/// `M` jets with derivatives over a shared `N`-slot space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JetVec<const N: usize, const M: usize> {
    pub v: [Jet<N>; M],
}

impl<const N: usize, const M: usize> Default for JetVec<N, M> {
    fn default() -> Self {
        Self {
            v: [Jet::default(); M],
        }
    }
}

impl<const N: usize, const M: usize> From<[Jet<N>; M]> for JetVec<N, M> {
    fn from(v: [Jet<N>; M]) -> Self {
        Self { v }
    }
}

impl<const N: usize, const M: usize> Index<usize> for JetVec<N, M> {
    type Output = Jet<N>;
    fn index(&self, i: usize) -> &Jet<N> {
        &self.v[i]
    }
}

impl<const N: usize, const M: usize> IndexMut<usize> for JetVec<N, M> {
    fn index_mut(&mut self, i: usize) -> &mut Jet<N> {
        &mut self.v[i]
    }
}

impl<const N: usize, const M: usize> JetVec<N, M> {
    /// Load values with zero derivatives.
    pub fn constants(values: &[Real; M]) -> Self {
        Self {
            v: values.map(Jet::constant),
        }
    }

    /// Load values as independent variables: element `i` gets a unit
    /// derivative in slot `first_slot + i`.
    ///
    /// # Panics
    /// Panics if `first_slot + M > N`.
    pub fn variables(values: &[Real; M], first_slot: usize) -> Self {
        Self {
            v: std::array::from_fn(|i| Jet::variable(values[i], first_slot + i)),
        }
    }

    /// [`JetVec::variables`] when `first_slot` is given, [`JetVec::constants`]
    /// otherwise.
    pub fn seeded(values: &[Real; M], first_slot: Option<usize>) -> Self {
        match first_slot {
            Some(slot) => Self::variables(values, slot),
            None => Self::constants(values),
        }
    }

    /// Load a strided source into `v[first_elem..first_elem + src.len]`.
    ///
    /// With `first_slot = Some(s)` element `k` of the source becomes a
    /// variable in slot `s + k`; with `None` the elements are constants.
    ///
    /// # Panics
    /// Panics if `first_elem + src.len > M`, or if `first_slot + src.len > N`
    /// when a slot is given.
    pub fn init_vars(
        &mut self,
        src: &StridedView<'_, 1>,
        first_elem: usize,
        first_slot: Option<usize>,
    ) {
        let [len] = src.layout().shape();
        for k in 0..len {
            let val = src.get([k]);
            self.v[first_elem + k] = match first_slot {
                Some(slot) => Jet::variable(val, slot + k),
                None => Jet::constant(val),
            };
        }
    }

    /// Values of all elements.
    pub fn values(&self) -> [Real; M] {
        self.v.map(|j| j.val)
    }

    /// Write the values into a strided 1-D view of extent `M`.
    pub fn extract_value(&self, out: &mut StridedViewMut<'_, 1>) {
        let [len] = out.layout().shape();
        debug_assert_eq!(len, M);
        for (i, jet) in self.v.iter().enumerate().take(len) {
            out.set([i], jet.val);
        }
    }

    /// Derivative slots `first_slot..first_slot + C` of every element, as an
    /// `M × C` row-major block.
    ///
    /// # Panics
    /// Panics if `first_slot + C > N`.
    pub fn jacobian<const C: usize>(&self, first_slot: usize) -> [[Real; C]; M] {
        self.v
            .map(|jet| std::array::from_fn(|j| jet.grad[first_slot + j]))
    }

    /// Scatter a gradient block into a strided 2-D view.
    ///
    /// `out[(i, j)]` receives the derivative of element `first_elem + i` in
    /// slot `first_slot + j`; the view's shape selects how many rows and
    /// columns are written.
    ///
    /// # Panics
    /// Panics if `first_elem + rows > M` or `first_slot + cols > N`.
    pub fn extract_grad(
        &self,
        out: &mut StridedViewMut<'_, 2>,
        first_elem: usize,
        first_slot: usize,
    ) {
        let [rows, cols] = out.layout().shape();
        for i in 0..rows {
            let jet = &self.v[first_elem + i];
            for j in 0..cols {
                out.set([i, j], jet.grad[first_slot + j]);
            }
        }
    }
}
