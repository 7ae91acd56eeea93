//! Core types and the autodiff kernel for `poseutils`.
//!
//! This crate contains:
//! - scalar and buffer type aliases (`Real`, `RotMat`, `RtMat`, `RtVec`, ...),
//! - a forward-mode gradient-carrying scalar ([`Jet`]) and its fixed-size
//!   vector adapter ([`JetVec`]),
//! - a strided buffer adapter ([`Layout`], [`StridedView`], [`StridedViewMut`])
//!   for reading and writing views into caller-owned, non-contiguous memory.
//!
//! The derivative width of a [`Jet`] is a const generic. A width of zero turns
//! every derivative loop into a no-op after monomorphization, so the same
//! formula serves the value-only path at the cost of plain `f64` arithmetic.

/// Forward-mode gradient-carrying scalar.
pub mod jet;
/// Fixed-size vectors of jets: seeding and extraction.
pub mod jet_vec;
/// Strided views over flat buffers.
pub mod layout;
/// Scalar and buffer type aliases.
pub mod math;
/// Helpers shared by the test suites.
pub mod test_utils;

pub use jet::*;
pub use jet_vec::*;
pub use layout::*;
pub use math::*;
