//! Gradient-carrying scalar.
//!
//! A [`Jet<N>`] is a value together with its partial derivatives with respect
//! to `N` independent variables. Arithmetic and the few transcendental
//! functions the rotation algebra needs propagate the derivatives via the
//! chain rule.
//!
//! All operands of one expression share the same `N`; this is enforced by the
//! type system. With `N = 0` the gradient is a zero-sized array and the
//! derivative bookkeeping compiles away.

use crate::Real;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A value and its gradient with respect to `N` independent variables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jet<const N: usize> {
    /// The function value.
    pub val: Real,
    /// Partial derivatives, one slot per independent variable.
    pub grad: [Real; N],
}

impl<const N: usize> Default for Jet<N> {
    fn default() -> Self {
        Self::constant(0.0)
    }
}

impl<const N: usize> From<Real> for Jet<N> {
    fn from(val: Real) -> Self {
        Self::constant(val)
    }
}

impl<const N: usize> Jet<N> {
    /// A constant: zero derivative in every slot.
    #[inline]
    pub fn constant(val: Real) -> Self {
        Self {
            val,
            grad: [0.0; N],
        }
    }

    /// An independent variable with a unit derivative in `slot`.
    ///
    /// # Panics
    /// Panics if `slot >= N`.
    #[inline]
    pub fn variable(val: Real, slot: usize) -> Self {
        let mut grad = [0.0; N];
        grad[slot] = 1.0;
        Self { val, grad }
    }

    /// Apply a scalar function with value `val` and derivative `dfdx` at
    /// `self.val`.
    #[inline]
    fn chain(self, val: Real, dfdx: Real) -> Self {
        Self {
            val,
            grad: self.grad.map(|g| g * dfdx),
        }
    }

    /// Square root. The derivative is infinite at zero.
    #[inline]
    pub fn sqrt(self) -> Self {
        // (√f)' = f' / (2√f)
        let s = self.val.sqrt();
        self.chain(s, 0.5 / s)
    }

    /// Sine.
    #[inline]
    pub fn sin(self) -> Self {
        let (s, c) = self.val.sin_cos();
        self.chain(s, c)
    }

    /// Cosine.
    #[inline]
    pub fn cos(self) -> Self {
        let (s, c) = self.val.sin_cos();
        self.chain(c, -s)
    }

    /// Sine and cosine of the same angle, sharing one evaluation.
    #[inline]
    pub fn sin_cos(self) -> (Self, Self) {
        let (s, c) = self.val.sin_cos();
        (self.chain(s, c), self.chain(c, -s))
    }

    /// Arc cosine. The derivative is infinite at ±1 and NaN outside [-1, 1].
    #[inline]
    pub fn acos(self) -> Self {
        // acos'(x) = -1 / sqrt(1 - x²)
        let d = -1.0 / (1.0 - self.val * self.val).sqrt();
        self.chain(self.val.acos(), d)
    }
}

#[inline]
fn zip<const N: usize>(a: &[Real; N], b: &[Real; N], f: impl Fn(Real, Real) -> Real) -> [Real; N] {
    std::array::from_fn(|i| f(a[i], b[i]))
}

impl<const N: usize> Add for Jet<N> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            val: self.val + rhs.val,
            grad: zip(&self.grad, &rhs.grad, |a, b| a + b),
        }
    }
}

impl<const N: usize> Sub for Jet<N> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            val: self.val - rhs.val,
            grad: zip(&self.grad, &rhs.grad, |a, b| a - b),
        }
    }
}

impl<const N: usize> Mul for Jet<N> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        // (f g)' = f' g + f g'
        Self {
            val: self.val * rhs.val,
            grad: zip(&self.grad, &rhs.grad, |a, b| a * rhs.val + self.val * b),
        }
    }
}

impl<const N: usize> Div for Jet<N> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        // (f / g)' = (f' - (f / g) g') / g
        let q = self.val / rhs.val;
        Self {
            val: q,
            grad: zip(&self.grad, &rhs.grad, |a, b| (a - q * b) / rhs.val),
        }
    }
}

impl<const N: usize> Neg for Jet<N> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self {
            val: -self.val,
            grad: self.grad.map(|g| -g),
        }
    }
}

impl<const N: usize> Add<Real> for Jet<N> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Real) -> Self {
        Self {
            val: self.val + rhs,
            grad: self.grad,
        }
    }
}

impl<const N: usize> Sub<Real> for Jet<N> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Real) -> Self {
        Self {
            val: self.val - rhs,
            grad: self.grad,
        }
    }
}

impl<const N: usize> Mul<Real> for Jet<N> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Real) -> Self {
        self.chain(self.val * rhs, rhs)
    }
}

impl<const N: usize> Div<Real> for Jet<N> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Real) -> Self {
        self.chain(self.val / rhs, 1.0 / rhs)
    }
}

impl<const N: usize> Add<Jet<N>> for Real {
    type Output = Jet<N>;
    #[inline]
    fn add(self, rhs: Jet<N>) -> Jet<N> {
        rhs + self
    }
}

impl<const N: usize> Sub<Jet<N>> for Real {
    type Output = Jet<N>;
    #[inline]
    fn sub(self, rhs: Jet<N>) -> Jet<N> {
        Jet {
            val: self - rhs.val,
            grad: rhs.grad.map(|g| -g),
        }
    }
}

impl<const N: usize> Mul<Jet<N>> for Real {
    type Output = Jet<N>;
    #[inline]
    fn mul(self, rhs: Jet<N>) -> Jet<N> {
        rhs * self
    }
}

impl<const N: usize> Div<Jet<N>> for Real {
    type Output = Jet<N>;
    #[inline]
    fn div(self, rhs: Jet<N>) -> Jet<N> {
        // (c / g)' = -c g' / g²
        let q = self / rhs.val;
        rhs.chain(q, -q / rhs.val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Real, b: Real, tol: Real) {
        assert!((a - b).abs() <= tol, "expected {b}, got {a} (tol {tol})");
    }

    #[test]
    fn product_rule() {
        let a = Jet::<2>::variable(3.0, 0);
        let b = Jet::<2>::variable(-2.0, 1);
        let p = a * b;
        assert_eq!(p.val, -6.0);
        assert_eq!(p.grad, [-2.0, 3.0]);
    }

    #[test]
    fn quotient_rule() {
        let a = Jet::<2>::variable(3.0, 0);
        let b = Jet::<2>::variable(2.0, 1);
        let q = a / b;
        approx_eq(q.val, 1.5, 1e-15);
        approx_eq(q.grad[0], 0.5, 1e-15);
        approx_eq(q.grad[1], -0.75, 1e-15);

        let r = 1.0 / b;
        approx_eq(r.grad[1], -0.25, 1e-15);
        assert_eq!(r.grad[0], 0.0);
    }

    #[test]
    fn mixed_scalar_operands_do_not_touch_gradient_direction() {
        let x = Jet::<1>::variable(0.5, 0);
        let y = 2.0 - x * 4.0 + 1.0;
        approx_eq(y.val, 1.0, 1e-15);
        approx_eq(y.grad[0], -4.0, 1e-15);
        let z = (x + 1.0) / 2.0;
        approx_eq(z.grad[0], 0.5, 1e-15);
        let w = -(x - 3.0);
        approx_eq(w.val, 2.5, 1e-15);
        approx_eq(w.grad[0], -1.0, 1e-15);
    }

    #[test]
    fn transcendental_derivatives() {
        let x0: Real = 0.3;
        let x = Jet::<1>::variable(x0, 0);

        let s = x.sqrt();
        approx_eq(s.grad[0], 0.5 / x0.sqrt(), 1e-14);

        let (sin, cos) = x.sin_cos();
        approx_eq(sin.val, x0.sin(), 1e-15);
        approx_eq(sin.grad[0], x0.cos(), 1e-15);
        approx_eq(cos.grad[0], -x0.sin(), 1e-15);
        assert_eq!(sin, x.sin());
        assert_eq!(cos, x.cos());

        let a = x.acos();
        approx_eq(a.val, x0.acos(), 1e-15);
        approx_eq(a.grad[0], -1.0 / (1.0 - x0 * x0).sqrt(), 1e-14);
    }

    #[test]
    fn chain_rule_composes() {
        // f(x) = sqrt(sin(x)^2 + 1), f'(x) = sin(x) cos(x) / f(x)
        let x0: Real = 1.1;
        let x = Jet::<1>::variable(x0, 0);
        let s = x.sin();
        let f = (s * s + 1.0).sqrt();
        let expected = x0.sin() * x0.cos() / (x0.sin().powi(2) + 1.0).sqrt();
        approx_eq(f.grad[0], expected, 1e-14);
    }

    #[test]
    fn zero_width_is_plain_arithmetic() {
        let a = Jet::<0>::constant(2.0);
        let b = Jet::<0>::from(0.5);
        let c = (a * b + a / b - 1.0).sqrt();
        approx_eq(c.val, (1.0f64 + 4.0 - 1.0).sqrt(), 1e-15);
        assert_eq!(std::mem::size_of::<Jet<0>>(), std::mem::size_of::<Real>());
    }

    #[test]
    fn singular_derivatives_are_not_finite() {
        let z = Jet::<1>::variable(0.0, 0).sqrt();
        assert_eq!(z.val, 0.0);
        assert!(!z.grad[0].is_finite());

        let one = Jet::<1>::variable(1.0, 0).acos();
        assert_eq!(one.val, 0.0);
        assert!(!one.grad[0].is_finite());
    }
}
