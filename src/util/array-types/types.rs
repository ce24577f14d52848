/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;
use std::ops::{Deref, DerefMut};

/// A 3-dimensional vector with operations for linear algebra.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct V3<X = f64>(pub [X; 3]);

/// A linear algebra dense matrix with 3 rows.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct M3<V>(pub [V; 3]);

/// A square dense 3x3 matrix.
pub type M33<X = f64> = M3<V3<X>>;

pub type Iter<'a, X> = std::slice::Iter<'a, X>;
pub type IterMut<'a, X> = std::slice::IterMut<'a, X>;

// Both types behave generally like their backing array type.
macro_rules! impl_array_like {
    ($Cn:ident) => {
        impl<T> Deref for $Cn<T> {
            type Target = [T; 3];

            #[inline(always)]
            fn deref(&self) -> &Self::Target
            { &self.0 }
        }

        impl<T> DerefMut for $Cn<T> {
            #[inline(always)]
            fn deref_mut(&mut self) -> &mut Self::Target
            { &mut self.0 }
        }

        impl<'a, T> IntoIterator for &'a $Cn<T> {
            type Item = &'a T;
            type IntoIter = Iter<'a, T>;

            #[inline(always)]
            fn into_iter(self) -> Self::IntoIter
            { self.0.iter() }
        }

        impl<'a, T> IntoIterator for &'a mut $Cn<T> {
            type Item = &'a mut T;
            type IntoIter = IterMut<'a, T>;

            #[inline(always)]
            fn into_iter(self) -> Self::IntoIter
            { self.0.iter_mut() }
        }

        // forward the debug impl without a surrounding "V3(...)", so that
        // debug output of nested data is valid JSON and Python
        impl<T: fmt::Debug> fmt::Debug for $Cn<T> {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
            { fmt::Debug::fmt(&self.0, f) }
        }
    };
}

impl_array_like!(V3);
impl_array_like!(M3);
