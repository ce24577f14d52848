/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::errors::{FitError, FitResult};

use fc4fit_config::Backend;
use fc4fit_linalg::{CMatrix, PseudoInverse, PerMatrix, Batched, PinvOptions};
use ndarray::Array2;

/// Generalized inverses of the design matrices of one second atom, and the
/// solution of each system against its forces.
pub struct BatchedSolver {
    pinv: Box<dyn PseudoInverse>,
}

impl BatchedSolver {
    pub fn new(backend: Backend, options: PinvOptions, parallel: bool) -> Self
    {
        let pinv: Box<dyn PseudoInverse> = match backend {
            Backend::Generic => Box::new(PerMatrix { options }),
            Backend::Accelerated => Box::new(Batched { options, parallel }),
        };
        BatchedSolver { pinv }
    }

    pub fn with_strategy(pinv: Box<dyn PseudoInverse>) -> Self
    { BatchedSolver { pinv } }

    /// Invert the design matrices of every third atom under `(first, second)`.
    ///
    /// `designs[k]` is the design matrix of third atom `k`.
    pub fn inverses(&self, first: usize, second: usize, designs: &[CMatrix]) -> FitResult<Vec<CMatrix>>
    {
        self.pinv.pseudoinverses(designs).map_err(|e| FitError::Solve {
            first,
            second,
            third: e.index,
            reason: e.source.to_string(),
        })
    }

    /// Coefficients for every fourth atom, `-(inverse . forces)`.
    ///
    /// The result has one row per design matrix column, and the same columns
    /// as `forces`.
    pub fn solve(&self, inverse: &CMatrix, forces: &CMatrix) -> Array2<f64>
    {
        let mut out = fc4fit_linalg::dot(&**inverse, &**forces);
        out.mapv_inplace(|x| -x);
        out
    }
}
