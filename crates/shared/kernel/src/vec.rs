//! Fixed-dimension `f64` vectors used for positions, forces and displacements.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<const D: usize>(pub [f64; D]);

impl<const D: usize> Default for Vector<D> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const D: usize> Vector<D> {
    #[must_use]
    pub const fn new(data: [f64; D]) -> Self {
        Self(data)
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self([0.; D])
    }

    /// Every component set to `value`.
    #[must_use]
    pub const fn splat(value: f64) -> Self {
        Self([value; D])
    }

    /// Builds a vector from a slice of exactly `D` components.
    #[must_use]
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        <[f64; D]>::try_from(values).ok().map(Self)
    }

    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    #[must_use]
    pub fn norm_squared(&self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|x| x.is_finite())
    }

    #[must_use]
    pub const fn as_array(&self) -> &[f64; D] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }

    #[must_use]
    pub fn map(self, f: impl FnMut(f64) -> f64) -> Self {
        Self(self.0.map(f))
    }
}

impl<const D: usize> From<[f64; D]> for Vector<D> {
    fn from(data: [f64; D]) -> Self {
        Self(data)
    }
}

impl<const D: usize> From<Vector<D>> for [f64; D] {
    fn from(v: Vector<D>) -> Self {
        v.0
    }
}

impl<const D: usize> Index<usize> for Vector<D> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<const D: usize> IndexMut<usize> for Vector<D> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<const D: usize> AddAssign for Vector<D> {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
    }
}

impl<const D: usize> SubAssign for Vector<D> {
    fn sub_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a -= b;
        }
    }
}

impl<const D: usize> MulAssign<f64> for Vector<D> {
    fn mul_assign(&mut self, rhs: f64) {
        for a in &mut self.0 {
            *a *= rhs;
        }
    }
}

impl<const D: usize> DivAssign<f64> for Vector<D> {
    fn div_assign(&mut self, rhs: f64) {
        for a in &mut self.0 {
            *a /= rhs;
        }
    }
}

impl<const D: usize> Add for Vector<D> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<const D: usize> Sub for Vector<D> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<const D: usize> Mul<f64> for Vector<D> {
    type Output = Self;

    fn mul(mut self, rhs: f64) -> Self {
        self *= rhs;
        self
    }
}

impl<const D: usize> Mul<Vector<D>> for f64 {
    type Output = Vector<D>;

    fn mul(self, rhs: Vector<D>) -> Vector<D> {
        rhs * self
    }
}

impl<const D: usize> Div<f64> for Vector<D> {
    type Output = Self;

    fn div(mut self, rhs: f64) -> Self {
        self /= rhs;
        self
    }
}

impl<const D: usize> Neg for Vector<D> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|x| -x)
    }
}

impl<const D: usize> fmt::Display for Vector<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, x) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{x}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_arithmetic() {
        let a = Vector::new([1., 2., 3.]);
        let b = Vector::new([0.5, -1., 2.]);
        assert_eq!(a + b, Vector::new([1.5, 1., 5.]));
        assert_eq!(a - b, Vector::new([0.5, 3., 1.]));
        assert_eq!(2. * a, a * 2.);
        assert_eq!(a / 2., Vector::new([0.5, 1., 1.5]));
        assert_eq!(-a, Vector::new([-1., -2., -3.]));
        assert!((a.dot(&b) - 4.5).abs() < 1e-12);
        assert!((Vector::new([3., 4.]).norm() - 5.).abs() < 1e-12);
    }

    #[test]
    fn test_display_and_slices() {
        assert_eq!(Vector::new([1., 2.5]).to_string(), "(1, 2.5)");
        assert_eq!(Vector::<2>::from_slice(&[1., 2.]), Some(Vector::new([1., 2.])));
        assert_eq!(Vector::<3>::from_slice(&[1., 2.]), None);
        assert!(!Vector::new([f64::INFINITY, 0.]).is_finite());
    }

    proptest! {
        #[test]
        fn prop_norm_squared_is_self_dot(x in prop::array::uniform3(-1e3_f64..1e3)) {
            let v = Vector::new(x);
            prop_assert!((v.norm_squared() - v.dot(&v)).abs() <= 1e-9 * (1. + v.norm_squared()));
        }
    }
}
