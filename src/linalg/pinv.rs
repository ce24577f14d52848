/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Moore–Penrose pseudoinverses, singly and in batches.

use crate::CMatrix;

use nalgebra::{DMatrix, DVector, SVD};
use rayon_cond::CondIterator;

/// Controls the singular value decomposition behind [`pseudoinverse`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinvOptions {
    /// Singular values at or below `rcond * max(singular values)` are treated as zero.
    pub rcond: f64,
    /// Iteration limit for the SVD.  Zero means no limit.
    pub max_iterations: usize,
}

impl Default for PinvOptions {
    fn default() -> Self
    { PinvOptions { rcond: 1e-13, max_iterations: 0 } }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PinvError {
    #[error("SVD did not converge for a {rows}x{cols} matrix")]
    NoConvergence { rows: usize, cols: usize },
    #[error("non-finite value encountered in a {rows}x{cols} matrix")]
    NonFinite { rows: usize, cols: usize },
}

/// Compute the Moore–Penrose pseudoinverse of an `m x n` matrix, which is `n x m`.
pub fn pseudoinverse(mat: &CMatrix, options: PinvOptions) -> Result<CMatrix, PinvError>
{ pseudoinverse_of_row_major(mat.nrows(), mat.ncols(), mat.c_order_data(), options) }

fn pseudoinverse_of_row_major(
    rows: usize,
    cols: usize,
    data: &[f64],
    options: PinvOptions,
) -> Result<CMatrix, PinvError>
{Ok({
    debug_assert_eq!(data.len(), rows * cols);
    if data.iter().any(|x| !x.is_finite()) {
        return Err(PinvError::NonFinite { rows, cols });
    }

    // nalgebra is not fond of empty matrices, and the answer is trivial
    if rows == 0 || cols == 0 {
        return Ok(CMatrix::zeros(cols, rows));
    }

    let matrix = DMatrix::from_row_slice(rows, cols, data);
    let svd = SVD::try_new(matrix, true, true, f64::EPSILON, options.max_iterations)
        .ok_or(PinvError::NoConvergence { rows, cols })?;

    let u = svd.u.as_ref().expect("(BUG) U was requested");
    let v_t = svd.v_t.as_ref().expect("(BUG) V^T was requested");
    let s = &svd.singular_values;

    let cutoff = options.rcond * s.max();
    let s_inv = DVector::from_iterator(s.len(), s.iter().map(|&x| match x > cutoff {
        true => 1.0 / x,
        false => 0.0,
    }));

    // V S^+ U^T
    let mut v_scaled = v_t.transpose();
    for (mut col, &factor) in v_scaled.column_iter_mut().zip(s_inv.iter()) {
        col *= factor;
    }
    let pinv = v_scaled * u.transpose();

    let mut out = Vec::with_capacity(rows * cols);
    for r in 0..cols {
        out.extend(pinv.row(r).iter().cloned());
    }
    if out.iter().any(|x| !x.is_finite()) {
        return Err(PinvError::NonFinite { rows, cols });
    }
    CMatrix::from_row_major(cols, rows, out)
})}

/// Failure to invert one member of a batch.
#[derive(Debug, Clone, thiserror::Error)]
#[error("pseudoinverse failed for matrix {index} of the batch: {source}")]
pub struct BatchPinvError {
    /// Position of the failing matrix in the input.
    pub index: usize,
    pub source: PinvError,
}

/// A strategy for inverting many matrices at once.
///
/// Every implementation must produce the same result as calling
/// [`pseudoinverse`] on each matrix in turn.
pub trait PseudoInverse: Send + Sync {
    fn pseudoinverses(&self, matrices: &[CMatrix]) -> Result<Vec<CMatrix>, BatchPinvError>;
}

/// Inverts each matrix independently, in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerMatrix {
    pub options: PinvOptions,
}

impl PseudoInverse for PerMatrix {
    fn pseudoinverses(&self, matrices: &[CMatrix]) -> Result<Vec<CMatrix>, BatchPinvError>
    {
        matrices.iter().enumerate()
            .map(|(index, m)| {
                pseudoinverse(m, self.options)
                    .map_err(|source| BatchPinvError { index, source })
            })
            .collect()
    }
}

/// Packs a batch of matrices sharing a column count into one padded
/// buffer (one row of `max_rows * cols` values per matrix) and inverts
/// the packed rows, optionally on the rayon thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct Batched {
    pub options: PinvOptions,
    pub parallel: bool,
}

impl PseudoInverse for Batched {
    fn pseudoinverses(&self, matrices: &[CMatrix]) -> Result<Vec<CMatrix>, BatchPinvError>
    {Ok({
        if matrices.is_empty() {
            return Ok(vec![]);
        }
        let cols = matrices[0].ncols();
        assert!(
            matrices.iter().all(|m| m.ncols() == cols),
            "batched pseudoinverse requires a common column count",
        );

        let row_nums = matrices.iter().map(|m| m.nrows()).collect::<Vec<_>>();
        let max_rows = row_nums.iter().cloned().max().unwrap_or(0);
        let stride = max_rows * cols;
        trace!("packing {} matrices into a {}x{} buffer", matrices.len(), matrices.len(), stride);

        let mut packed = vec![0.0; matrices.len() * stride];
        for (m, dest) in matrices.iter().zip(packed.chunks_mut(stride.max(1))) {
            let data = m.c_order_data();
            dest[..data.len()].copy_from_slice(data);
        }

        let packed = &packed;
        let row_nums = &row_nums;
        let options = self.options;
        CondIterator::new(0..matrices.len(), self.parallel)
            .map(|index| {
                let rows = row_nums[index];
                let start = index * stride;
                let data = &packed[start..start + rows * cols];
                pseudoinverse_of_row_major(rows, cols, data, options)
                    .map_err(|source| BatchPinvError { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?
    })}
}
