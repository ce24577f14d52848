/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::fmt;

pub type FitResult<T> = Result<T, FitError>;

/// Which level of the sample grid a reconstruction failed at.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReconstructionLevel {
    /// A second atom had no data, and no operation of the reduced site
    /// symmetry of the first atom maps it onto one that does.
    SecondAtom,
    /// A third atom had no data under this second atom, and no operation of
    /// the reduced bond symmetry maps it onto one that does.
    ThirdAtom { second: usize },
}

impl fmt::Display for ReconstructionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ReconstructionLevel::SecondAtom => write!(f, "second atom"),
            ReconstructionLevel::ThirdAtom { second } => write!(f, "third atom (with second atom {})", second),
        }
    }
}

/// Everything that can go wrong during a fit.
///
/// None of these are transient; there are no retries, and no partial output
/// is made available after an error.
#[derive(Debug, thiserror::Error)]
pub enum FitError {
    #[error("\
        cannot reconstruct samples for {level} {missing} of first atom {first}: \
        no symmetry operation maps it onto an atom with data. \
        The displacement dataset does not cover this structure's symmetry.\
    ")]
    Reconstruction {
        first: usize,
        missing: usize,
        level: ReconstructionLevel,
    },

    #[error("generalized inverse failed for atoms ({first}, {second}, {third}): {reason}")]
    Solve {
        first: usize,
        second: usize,
        third: usize,
        reason: String,
    },

    #[error("bad configuration: {0}")]
    Configuration(String),

    #[error("symmetry operations are inconsistent with the structure")]
    Symmetry(#[from] fc4fit_structure::PositionMatchError),
}

macro_rules! config_error {
    ($($fmt:tt)+) => { $crate::errors::FitError::Configuration(format!($($fmt)+)) };
}
