/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{V3, M3, M33};
use crate::ops::Scalar;

/// Construct a matrix from a function on `(row, col)`.
#[inline(always)]
pub fn from_fn<X, F>(mut f: F) -> M33<X>
where F: FnMut(usize, usize) -> X,
{
    M3([
        V3([f(0, 0), f(0, 1), f(0, 2)]),
        V3([f(1, 0), f(1, 1), f(1, 2)]),
        V3([f(2, 0), f(2, 1), f(2, 2)]),
    ])
}

#[inline(always)]
pub fn from_array<X>(arr: [[X; 3]; 3]) -> M33<X>
{
    let [a, b, c] = arr;
    M3([V3(a), V3(b), V3(c)])
}

#[inline]
pub fn eye<X: Scalar + From<i8>>() -> M33<X>
{ from_fn(|r, c| X::from(if r == c { 1 } else { 0 })) }

impl<X> M33<X> {
    #[inline]
    pub fn map<B, F>(self, mut f: F) -> M33<B>
    where F: FnMut(X) -> B,
    {
        let M3([a, b, c]) = self;
        M3([a.map(&mut f), b.map(&mut f), c.map(&mut f)])
    }

    #[inline]
    pub fn into_array(self) -> [[X; 3]; 3]
    {
        let M3([V3(a), V3(b), V3(c)]) = self;
        [a, b, c]
    }
}

impl<X: Scalar> M33<X> {
    /// Transpose.
    #[inline]
    pub fn t(&self) -> M33<X>
    { from_fn(|r, c| self[c][r]) }

    #[inline]
    pub fn det(&self) -> X
    {
        let m = self;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Transpose of the cofactor matrix.  `m * m.adjugate() == det(m) * eye`.
    #[inline]
    pub fn adjugate(&self) -> M33<X>
    {
        let m = self;
        let cof = |r: usize, c: usize| {
            let (r1, r2) = ((r + 1) % 3, (r + 2) % 3);
            let (c1, c2) = ((c + 1) % 3, (c + 2) % 3);
            m[r1][c1] * m[r2][c2] - m[r1][c2] * m[r2][c1]
        };
        from_fn(|r, c| cof(c, r))
    }
}

impl M33<f64> {
    #[inline]
    pub fn inv(&self) -> M33<f64>
    { inv(self) }

    /// Largest absolute value of any element.
    #[inline]
    pub fn max_abs(&self) -> f64
    { self.iter().fold(0.0, |acc, row| f64::max(acc, row.max_abs())) }
}

/// Matrix inverse.  Produces non-finite values for singular matrices.
#[inline]
pub fn inv(m: &M33<f64>) -> M33<f64>
{
    let det = m.det();
    m.adjugate().map(|x| x / det)
}
