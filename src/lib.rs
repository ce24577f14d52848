/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Fitting of fourth-order interatomic force constants.
//!
//! This crate gathers the public API of the workspace.  See [`Fc4Fit`] for
//! the entry point, and [`GlobalLogger`] for log setup.

pub use fc4fit_fc4::{
    Fc4Fit, FitOutput, FitError, FitResult, ReconstructionLevel,
    DisplacementDataset, FirstAtomEntry, SecondAtomEntry, ThirdAtomEntry,
    SymmetryProvider, build_symmetry,
    Fc4Distributor, SpaceGroupDistributor,
};
pub use fc4fit_fc4 as fc4;

pub use fc4fit_structure::{Coords, Lattice, FracRot, FracOp, Symmetry};
pub use fc4fit_array_types::{V3, M33};

pub use fc4fit_config::{Settings, ValidatedSettings, Backend, Threading, YamlRead, ValidationError};

pub use crate::logging::{GlobalLogger, LoggingError, ColorizedLevel};
mod logging;
