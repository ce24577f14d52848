/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{V3, M3, M33};
use crate::ops::Scalar;

/// Construct a vector from a function on indices.
#[inline(always)]
pub fn from_fn<X, F>(mut f: F) -> V3<X>
where F: FnMut(usize) -> X,
{ V3([f(0), f(1), f(2)]) }

impl<X> V3<X> {
    /// Apply a function to each element.
    #[inline]
    pub fn map<B, F>(self, mut f: F) -> V3<B>
    where F: FnMut(X) -> B,
    {
        let V3([a, b, c]) = self;
        V3([f(a), f(b), f(c)])
    }

    /// Apply a fallible function to each element.
    #[inline]
    pub fn try_map<B, E, F>(self, mut f: F) -> Result<V3<B>, E>
    where F: FnMut(X) -> Result<B, E>,
    {
        let V3([a, b, c]) = self;
        Ok(V3([f(a)?, f(b)?, f(c)?]))
    }
}

impl<X: Scalar> V3<X> {
    #[inline]
    pub fn zero() -> Self
    { V3([X::default(); 3]) }

    #[inline]
    pub fn dot(&self, other: &V3<X>) -> X
    { dot(self, other) }

    #[inline]
    pub fn sqnorm(&self) -> X
    { dot(self, self) }
}

impl V3<f64> {
    #[inline]
    pub fn norm(&self) -> f64
    { self.sqnorm().sqrt() }

    /// Normalize the vector.  The result is NaN for a zero vector.
    #[inline]
    pub fn unit(&self) -> V3<f64>
    { *self / self.norm() }

    /// Largest absolute value of any element.
    #[inline]
    pub fn max_abs(&self) -> f64
    { self.iter().fold(0.0, |acc, x| f64::max(acc, x.abs())) }

    #[inline]
    pub fn is_finite(&self) -> bool
    { self.iter().all(|x| x.is_finite()) }
}

#[inline]
pub fn dot<X: Scalar>(a: &V3<X>, b: &V3<X>) -> X
{ a[0] * b[0] + a[1] * b[1] + a[2] * b[2] }

/// Outer product `a b^T`.
#[inline]
pub fn outer<X: Scalar>(a: &V3<X>, b: &V3<X>) -> M33<X>
{ M3([*b * a[0], *b * a[1], *b * a[2]]) }
