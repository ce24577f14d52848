/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Fitting of fourth-order force constants from a sparse set of
//! triple-displacement force calculations.
//!
//! The dataset is expanded into a dense grid of samples with the help of the
//! crystal symmetry, and a linear least squares problem is then solved for
//! every `(first, second, third)` atom triple.  Quartet force constants of
//! first atoms that were never displaced are filled in by symmetry at the end.

#[macro_use]
extern crate log;

#[macro_use]
mod errors;
pub use crate::errors::{FitError, FitResult, ReconstructionLevel};

pub use crate::dataset::{DisplacementDataset, FirstAtomEntry, SecondAtomEntry, ThirdAtomEntry};
pub mod dataset;

pub use crate::symmetry::{SymmetryProvider, OperationSet, build_symmetry};
pub mod symmetry;

pub use crate::reconstruct::{Sample, SampleGrid, SampleReconstructor};
pub mod reconstruct;

pub use crate::table::DisplacementTable;
mod table;

pub mod basis;

pub use crate::design::{DesignMatrixBuilder, FirstAtomContext, NestedBuilder, FlatBuilder};
pub mod design;

pub use crate::solve::BatchedSolver;
mod solve;

pub use crate::extract::{TensorExtractor, ExtractedBlocks};
mod extract;

pub use crate::store::{TensorStore, FitOutput};
mod store;

pub use crate::distribute::{Fc4Distributor, SpaceGroupDistributor};
mod distribute;

pub use crate::fit::Fc4Fit;
mod fit;
