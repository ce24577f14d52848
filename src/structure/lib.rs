/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Periodic structures, and the symmetry operations that act on them.
//!
//! Discovering a spacegroup is somebody else's job.  This crate takes the
//! operations as given and answers questions about them: which atoms they
//! permute into which, which of them fix a site or a bond, and which of
//! those additionally leave a displacement direction alone.

#[macro_use] extern crate log;

pub use crate::lattice::Lattice;
pub use crate::coords::Coords;
pub use crate::symmops::{FracRot, FracOp};
pub use crate::perm::{Perm, Permute, BadPermError};
pub use crate::find_perm::PositionMatchError;
pub use crate::symmetry::Symmetry;

mod lattice;
mod coords;
mod symmops;
mod perm;
mod symmetry;

pub mod find_perm;
pub mod group;
