/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Column layout of the design matrix.
//!
//! Each row expands a displacement triple `(u1, u2, u3)` (already rotated) as
//!
//! ```text
//!   [ -1 | u1 u2 u3 | 6 pair outer products (9 each) | 10 triplet outer products (27 each) ]
//! ```
//!
//! for `1 + 9 + 54 + 270 = 334` columns.  Outer products are flattened with
//! the first vector's index outermost.

use std::ops::Range;

use fc4fit_array_types::V3;

pub const NUM_COLUMNS: usize = 1 + 3 * 3 + PAIRS.len() * 9 + TRIPLETS.len() * 27;

pub const BIAS_COLUMN: usize = 0;
pub const LINEAR_START: usize = 1;
pub const PAIR_START: usize = LINEAR_START + 9;
pub const TRIPLET_START: usize = PAIR_START + PAIRS.len() * 9;

/// Unordered pairs of displacement vectors, in column order.
pub const PAIRS: [(usize, usize); 6] = [
    (0, 0), (0, 1), (0, 2),
    (1, 1), (1, 2),
    (2, 2),
];

/// Unordered triples of displacement vectors, in column order.
pub const TRIPLETS: [(usize, usize, usize); 10] = [
    (0, 0, 0), (0, 0, 1), (0, 0, 2), (0, 1, 1), (0, 1, 2), (0, 2, 2),
    (1, 1, 1), (1, 1, 2), (1, 2, 2),
    (2, 2, 2),
];

/// Columns of `u3`, whose coefficients form the pair force constants.
pub const FC2_COLUMNS: Range<usize> = 7..10;
/// Columns of `u2 (x) u3`, whose coefficients form the triplet force constants.
pub const FC3_COLUMNS: Range<usize> = 46..55;
/// Columns of `u1 (x) u2 (x) u3`, whose coefficients form the quartet force constants.
pub const FC4_COLUMNS: Range<usize> = 172..199;

/// Write the expansion of one displacement triple into `out`.
///
/// # Panics
///
/// Panics if `out.len() != NUM_COLUMNS`.
pub fn expand_row(u: &[V3; 3], out: &mut [f64])
{
    assert_eq!(out.len(), NUM_COLUMNS);

    out[BIAS_COLUMN] = -1.0;

    let (linear, rest) = out[LINEAR_START..].split_at_mut(9);
    for (dest, v) in linear.chunks_mut(3).zip(u) {
        dest.copy_from_slice(&v.0);
    }

    let (pairs, triplets) = rest.split_at_mut(PAIRS.len() * 9);
    for (dest, &(a, b)) in pairs.chunks_mut(9).zip(&PAIRS) {
        for i in 0..3 {
            for j in 0..3 {
                dest[3 * i + j] = u[a][i] * u[b][j];
            }
        }
    }

    for (dest, &(a, b, c)) in triplets.chunks_mut(27).zip(&TRIPLETS) {
        for i in 0..3 {
            for j in 0..3 {
                let ab = u[a][i] * u[b][j];
                for k in 0..3 {
                    dest[9 * i + 3 * j + k] = ab * u[c][k];
                }
            }
        }
    }
}
