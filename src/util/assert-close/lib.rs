/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;
use fc4fit_array_types::{V3, M3};
use ndarray::{ArrayBase, Data, Dimension};

pub const DEFAULT_NONZERO_TOL: f64 = 1e-9;

#[macro_export]
macro_rules! assert_close {
    ($($t:tt)*) => {$crate::assert_close_impl!{@parsing [$($t)*] [[@rel $crate::DEFAULT_NONZERO_TOL] [@abs 0.0]]}};
}

#[macro_export]
macro_rules! debug_assert_close {
    ($($t:tt)*) => {{
        #[cfg(debug_assertions)] {
            $crate::assert_close!{$($t)*}
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! assert_close_impl {
    (@parsing [rel=$tol:expr, $($rest:tt)*] [$($assignment:tt)*]) => {
        $crate::assert_close_impl!(@parsing [$($rest)*] [$($assignment)* [@rel $tol]]);
    };
    (@parsing [abs=$tol:expr, $($rest:tt)*] [$($assignment:tt)*]) => {
        $crate::assert_close_impl!(@parsing [$($rest)*] [$($assignment)* [@abs $tol]]);
    };
    (@parsing [$a:expr, $b:expr $(,)*] $assignments:tt) => {
        $crate::assert_close_impl!(@expand $assignments [@comp $a, $b] [@fmt "not nearly equal!"])
    };
    (@parsing [$a:expr, $b:expr, $($fmt:tt)+] $assignments:tt) => {
        $crate::assert_close_impl!(@expand $assignments [@comp $a, $b] [@fmt $($fmt)+])
    };
    (@expand [$($assignment:tt)*] [@comp $a:expr, $b:expr] [@fmt $($fmt:tt)+] ) => {
        #[allow(unused_mut)]
        #[allow(unused_assignments)]
        {
            let a = $a;
            let b = $b;

            let mut abs;
            let mut rel;
            $(
                $crate::assert_close_impl!{@stmt::assign [abs, rel] $assignment}
            )*

            if let Err(e) = $crate::CheckClose::check_close(&a, &b, $crate::Tolerances { abs, rel }) {
                panic!(
                "{} (tolerances: rel={}, abs={})\n{}",
                 format!($($fmt)*), rel, abs, e);
            }
        }
    };
    (@stmt::assign [$abs:ident, $rel:ident] [@abs $tol:expr]) => { $abs = $tol; };
    (@stmt::assign [$abs:ident, $rel:ident] [@rel $tol:expr]) => { $rel = $tol; };
}

#[doc(hidden)]
#[allow(non_snake_case)]
#[inline]
pub fn __is_close(a: f64, b: f64, Tolerances { abs, rel }: Tolerances) -> bool {
    // Implementation from Python 3.5.
    // https://hg.python.org/cpython/file/tip/Modules/mathmodule.c#l1993
    assert!(rel >= 0.0);
    assert!(abs >= 0.0);

    // catch infinities of same sign
    if a == b { return true; }

    // catch infinities of opposite sign, avoiding infinite relative tolerance
    if a.is_infinite() || b.is_infinite() { return false; }

    // case for general values and NaN.
    (a - b).abs() <= abs.max(rel * a.abs()).max(rel * b.abs())
}

#[derive(Debug, Copy, Clone)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

/// The first pair of elements found to differ, with its position in the data.
#[derive(Debug, Clone, thiserror::Error)]
pub struct CheckCloseError {
    pub values: (f64, f64),
    /// Flat index of the failing element, counting from the front of the data.
    pub index: usize,
    pub tol: Tolerances,
}

impl fmt::Display for CheckCloseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (left, right) = self.values;
        write!(f, "failed at flat index {}:
  left: {:?}
 right: {:?}
   tol: {:?}", self.index, left, right, self.tol)
    }
}

pub trait CheckClose<Rhs: ?Sized = Self> {
    /// Test that all values of self and other are close.
    fn check_close(&self, other: &Rhs, tol: Tolerances) -> Result<(), CheckCloseError>
    { self.check_close_from(other, tol, 0).map(|_| ()) }

    /// Recursive form of `check_close`.  Returns the number of scalars compared,
    /// so that containers can report a flat index on failure.
    fn check_close_from(&self, other: &Rhs, tol: Tolerances, start: usize) -> Result<usize, CheckCloseError>;
}

impl CheckClose for f64 {
    #[inline]
    fn check_close_from(&self, other: &Self, tol: Tolerances, start: usize) -> Result<usize, CheckCloseError>
    {
        match __is_close(*self, *other, tol) {
            true => Ok(1),
            false => Err(CheckCloseError { values: (*self, *other), index: start, tol }),
        }
    }
}

impl<'a, T: ?Sized + CheckClose> CheckClose for &'a T {
    fn check_close_from(&self, other: &Self, tol: Tolerances, start: usize) -> Result<usize, CheckCloseError>
    { CheckClose::check_close_from(*self, *other, tol, start) }
}

impl<T: CheckClose> CheckClose for [T] {
    fn check_close_from(&self, other: &Self, tol: Tolerances, start: usize) -> Result<usize, CheckCloseError>
    {
        assert_eq!(self.len(), other.len(), "lengths differ");
        let mut count = 0;
        for (a, b) in self.iter().zip(other) {
            count += a.check_close_from(b, tol, start + count)?;
        }
        Ok(count)
    }
}

impl<T: CheckClose> CheckClose for Vec<T> {
    fn check_close_from(&self, other: &Self, tol: Tolerances, start: usize) -> Result<usize, CheckCloseError>
    { self[..].check_close_from(&other[..], tol, start) }
}

impl<T: CheckClose, const N: usize> CheckClose for [T; N] {
    fn check_close_from(&self, other: &Self, tol: Tolerances, start: usize) -> Result<usize, CheckCloseError>
    { self[..].check_close_from(&other[..], tol, start) }
}

impl<T: CheckClose> CheckClose for V3<T> {
    fn check_close_from(&self, other: &Self, tol: Tolerances, start: usize) -> Result<usize, CheckCloseError>
    { self.0.check_close_from(&other.0, tol, start) }
}

impl<T: CheckClose> CheckClose for M3<T> {
    fn check_close_from(&self, other: &Self, tol: Tolerances, start: usize) -> Result<usize, CheckCloseError>
    { self.0.check_close_from(&other.0, tol, start) }
}

/// Arrays of any dimension, compared in logical (row-major) order.
impl<S, D> CheckClose for ArrayBase<S, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    fn check_close_from(&self, other: &Self, tol: Tolerances, start: usize) -> Result<usize, CheckCloseError>
    {
        assert_eq!(self.shape(), other.shape(), "shapes differ");
        let mut count = 0;
        for (a, b) in self.iter().zip(other.iter()) {
            count += a.check_close_from(b, tol, start + count)?;
        }
        Ok(count)
    }
}
