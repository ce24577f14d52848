/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::ops::{Add, Sub, Neg, Mul, Div};
use std::ops::{AddAssign, SubAssign, MulAssign, DivAssign};

use crate::{V3, M3, M33};
use crate::{vee, mat};

/// Element types supported by the operator impls.
///
/// Only implemented for the primitive types the workspace actually needs.
pub trait Scalar
    : Copy + Default + PartialEq
    + Add<Output = Self> + Sub<Output = Self>
    + Mul<Output = Self> + Neg<Output = Self>
{}

impl Scalar for i32 {}
impl Scalar for f64 {}

// ---------------------------------------------------------------------------
// vector-vector ops

impl<X: Scalar> Add for V3<X> {
    type Output = V3<X>;

    #[inline]
    fn add(self, other: V3<X>) -> V3<X>
    { vee::from_fn(|k| self[k] + other[k]) }
}

impl<'a, X: Scalar> Add<&'a V3<X>> for V3<X> {
    type Output = V3<X>;

    #[inline]
    fn add(self, other: &'a V3<X>) -> V3<X>
    { self + *other }
}

impl<X: Scalar> Sub for V3<X> {
    type Output = V3<X>;

    #[inline]
    fn sub(self, other: V3<X>) -> V3<X>
    { vee::from_fn(|k| self[k] - other[k]) }
}

impl<'a, X: Scalar> Sub<&'a V3<X>> for V3<X> {
    type Output = V3<X>;

    #[inline]
    fn sub(self, other: &'a V3<X>) -> V3<X>
    { self - *other }
}

impl<X: Scalar> Neg for V3<X> {
    type Output = V3<X>;

    #[inline]
    fn neg(self) -> V3<X>
    { vee::from_fn(|k| -self[k]) }
}

impl<X: Scalar> AddAssign for V3<X> {
    #[inline]
    fn add_assign(&mut self, other: V3<X>)
    { *self = *self + other; }
}

impl<'a, X: Scalar> AddAssign<&'a V3<X>> for V3<X> {
    #[inline]
    fn add_assign(&mut self, other: &'a V3<X>)
    { *self = *self + *other; }
}

impl<X: Scalar> SubAssign for V3<X> {
    #[inline]
    fn sub_assign(&mut self, other: V3<X>)
    { *self = *self - other; }
}

// ---------------------------------------------------------------------------
// vector-scalar ops

impl<X: Scalar> Mul<X> for V3<X> {
    type Output = V3<X>;

    #[inline]
    fn mul(self, scalar: X) -> V3<X>
    { vee::from_fn(|k| self[k] * scalar) }
}

// NOTE: the orphan rules prevent a generic impl "for X", so scalar-first
//       multiplication is only available for f64.
impl Mul<V3<f64>> for f64 {
    type Output = V3<f64>;

    #[inline]
    fn mul(self, vector: V3<f64>) -> V3<f64>
    { vector * self }
}

impl Div<f64> for V3<f64> {
    type Output = V3<f64>;

    #[inline]
    fn div(self, scalar: f64) -> V3<f64>
    { vee::from_fn(|k| self[k] / scalar) }
}

impl<X: Scalar> MulAssign<X> for V3<X> {
    #[inline]
    fn mul_assign(&mut self, scalar: X)
    { *self = *self * scalar; }
}

impl DivAssign<f64> for V3<f64> {
    #[inline]
    fn div_assign(&mut self, scalar: f64)
    { *self = *self / scalar; }
}

// ---------------------------------------------------------------------------
// matrix-matrix ops

impl<X: Scalar> Add for M33<X> {
    type Output = M33<X>;

    #[inline]
    fn add(self, other: M33<X>) -> M33<X>
    { M3([self[0] + other[0], self[1] + other[1], self[2] + other[2]]) }
}

impl<X: Scalar> Sub for M33<X> {
    type Output = M33<X>;

    #[inline]
    fn sub(self, other: M33<X>) -> M33<X>
    { M3([self[0] - other[0], self[1] - other[1], self[2] - other[2]]) }
}

impl<X: Scalar> Neg for M33<X> {
    type Output = M33<X>;

    #[inline]
    fn neg(self) -> M33<X>
    { M3([-self[0], -self[1], -self[2]]) }
}

impl<X: Scalar> Mul<X> for M33<X> {
    type Output = M33<X>;

    #[inline]
    fn mul(self, scalar: X) -> M33<X>
    { M3([self[0] * scalar, self[1] * scalar, self[2] * scalar]) }
}

impl<'a, 'b, X: Scalar> Mul<&'b M33<X>> for &'a M33<X> {
    type Output = M33<X>;

    #[inline]
    fn mul(self, other: &'b M33<X>) -> M33<X>
    { mat::from_fn(|r, c| (0..3).fold(X::default(), |acc, k| acc + self[r][k] * other[k][c])) }
}

impl<X: Scalar> Mul<M33<X>> for M33<X> {
    type Output = M33<X>;

    #[inline]
    fn mul(self, other: M33<X>) -> M33<X>
    { &self * &other }
}

// ---------------------------------------------------------------------------
// matrix-vector ops

/// Row vector times matrix.  This is the natural way to transform row-based data.
impl<'b, X: Scalar> Mul<&'b M33<X>> for V3<X> {
    type Output = V3<X>;

    #[inline]
    fn mul(self, m: &'b M33<X>) -> V3<X>
    { vee::from_fn(|c| (0..3).fold(X::default(), |acc, r| acc + self[r] * m[r][c])) }
}

/// Matrix times column vector.  Used for spatial operators.
impl<'a, X: Scalar> Mul<V3<X>> for &'a M33<X> {
    type Output = V3<X>;

    #[inline]
    fn mul(self, v: V3<X>) -> V3<X>
    { vee::from_fn(|r| (0..3).fold(X::default(), |acc, c| acc + self[r][c] * v[c])) }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn row_and_column_products_disagree_for_asymmetric() {
        let m = M3([V3([0, -1, 0]), V3([1, 0, 0]), V3([0, 0, 1])]);
        let v = V3([1, 2, 3]);
        assert_eq!(&m * v, V3([-2, 1, 3]));
        assert_eq!(v * &m, V3([2, -1, 3]));
        assert_eq!(v * &m, &m.t() * v);
    }

    #[test]
    fn matrix_product_associates_with_vectors() {
        let a = M3([V3([1., 2., 0.]), V3([0., 1., 4.]), V3([3., 0., 1.])]);
        let b = M3([V3([0., 1., 1.]), V3([2., 0., 1.]), V3([1., 1., 0.])]);
        let v = V3([0.5, -1.0, 2.0]);
        assert_eq!((v * &a) * &b, v * &(&a * &b));
        assert_eq!(&a * (&b * v), &(&a * &b) * v);
    }
}
