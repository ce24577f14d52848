/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Fixed-size `V3` and `M33` types.
//!
//! Like the rest of the workspace these are *row-centric*: a list of vectors
//! is a matrix whose rows are the vectors, and `v * &m` is the natural way to
//! apply a matrix to data.  Spatial operators (rotations) are the exception;
//! for those, `&m * v` is provided with its conventional column meaning.

pub use self::types::*;
mod types;

mod ops;
mod methods_v;
mod methods_m;

/// Functions for constructing vectors.
pub mod vee {
    pub use crate::methods_v::from_fn;
}

/// Functions for constructing matrices.
pub mod mat {
    pub use crate::methods_m::{from_array, from_fn, eye};
}

pub use crate::methods_m::inv;
pub use crate::methods_v::{dot, outer};
