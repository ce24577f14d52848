/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::basis::{NUM_COLUMNS, FC2_COLUMNS, FC3_COLUMNS, FC4_COLUMNS};

use ndarray::{Array2, Array3, Array4, Array5};

/// Force constant blocks solved for one `(first, second, third)` triple,
/// with the fourth atom as the leading axis.
///
/// Cartesian axes are ordered as displacement legs (first, second, third)
/// followed by the force component.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedBlocks {
    /// `(N, 3, 3)`: third atom displacement, force.
    pub fc2: Array3<f64>,
    /// `(N, 3, 3, 3)`: second and third atom displacements, force.
    pub fc3: Array4<f64>,
    /// `(N, 3, 3, 3, 3)`: all three displacements, force.
    pub fc4: Array5<f64>,
}

/// Slices the coefficient matrix produced by the solver into tensor blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TensorExtractor;

impl TensorExtractor {
    /// # Panics
    ///
    /// Panics unless `solution` is `NUM_COLUMNS x 3N`.
    pub fn extract(&self, solution: &Array2<f64>) -> ExtractedBlocks
    {
        assert_eq!(solution.nrows(), NUM_COLUMNS, "wrong number of coefficients");
        assert_eq!(solution.ncols() % 3, 0, "force columns must come in triples");
        let n = solution.ncols() / 3;

        let fc2 = Array3::from_shape_fn((n, 3, 3), |(l, a, d)| {
            solution[[FC2_COLUMNS.start + a, 3 * l + d]]
        });
        let fc3 = Array4::from_shape_fn((n, 3, 3, 3), |(l, a, b, d)| {
            solution[[FC3_COLUMNS.start + 3 * a + b, 3 * l + d]]
        });
        let fc4 = Array5::from_shape_fn((n, 3, 3, 3, 3), |(l, a, b, c, d)| {
            solution[[FC4_COLUMNS.start + 9 * a + 3 * b + c, 3 * l + d]]
        });
        ExtractedBlocks { fc2, fc3, fc4 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_come_from_their_columns() {
        let n = 2;
        // encode (row, column) into each value
        let solution = Array2::from_shape_fn((NUM_COLUMNS, 3 * n), |(r, c)| (1000 * r + c) as f64);
        let blocks = TensorExtractor.extract(&solution);

        assert_eq!(blocks.fc2.shape(), &[2, 3, 3]);
        assert_eq!(blocks.fc3.shape(), &[2, 3, 3, 3]);
        assert_eq!(blocks.fc4.shape(), &[2, 3, 3, 3, 3]);

        assert_eq!(blocks.fc2[[1, 2, 0]], (1000 * 9 + 3) as f64);
        assert_eq!(blocks.fc3[[0, 1, 2, 1]], (1000 * (46 + 5) + 1) as f64);
        assert_eq!(blocks.fc4[[1, 0, 0, 0, 2]], (1000 * 172 + 5) as f64);
        assert_eq!(blocks.fc4[[0, 2, 2, 2, 0]], (1000 * 198) as f64);
    }
}
