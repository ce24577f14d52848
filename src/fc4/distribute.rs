/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Filling in the quartet force constants of first atoms that were not displaced.

use crate::errors::FitResult;
use crate::symmetry::SymmetryProvider;

use fc4fit_array_types::M33;
use ndarray::{ArrayD, Axis};
use rayon_cond::CondIterator;

/// Propagates the quartet tensor from the displaced first atoms onto all
/// other first atoms.
pub trait Fc4Distributor: Send + Sync {
    /// `fc4` has shape `(N, N, N, N, 3, 3, 3, 3)`, with meaningful data in
    /// the planes `fc4[i0]` for each `i0` in `sampled`.  All other planes are
    /// overwritten.
    fn distribute(
        &self,
        fc4: &mut ArrayD<f64>,
        sampled: &[usize],
        symmetry: &dyn SymmetryProvider,
    ) -> FitResult<()>;
}

/// Distribution through the operations of the full spacegroup.
///
/// Each remaining atom `i` is assigned the first operation `g` (searching
/// sampled atoms in order, then operations in order) with `g(i) = i0`
/// sampled, and receives
///
/// ```text
/// fc4[i, j, k, l]_{abcd} = S_pa S_qb S_rc S_sd fc4[i0, g(j), g(k), g(l)]_{pqrs}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceGroupDistributor {
    pub parallel: bool,
}

impl Fc4Distributor for SpaceGroupDistributor {
    fn distribute(
        &self,
        fc4: &mut ArrayD<f64>,
        sampled: &[usize],
        symmetry: &dyn SymmetryProvider,
    ) -> FitResult<()>
    {
        let n = symmetry.num_atoms();
        assert_eq!(fc4.shape(), &[n, n, n, n, 3, 3, 3, 3][..], "quartet tensor has the wrong shape");

        let ops = symmetry.full_operations();
        let mut plan = vec![];
        for atom in (0..n).filter(|atom| !sampled.contains(atom)) {
            let found = sampled.iter()
                .flat_map(|&i0| ops.iter().map(move |&op| (i0, op)))
                .find(|&(i0, op)| symmetry.atom_map(op)[i0] == atom);
            match found {
                Some((i0, op)) => plan.push((atom, i0, op)),
                None => return Err(config_error!(
                    "no symmetry operation maps atom {} onto a displaced first atom (displaced: {:?})",
                    atom, sampled,
                )),
            }
        }
        info!("Distributing quartet force constants from {} atoms onto {} atoms", sampled.len(), plan.len());

        let source = fc4.view();
        let planes = CondIterator::new(plan, self.parallel)
            .map(|(atom, i0, op)| {
                trace!("atom {} from atom {} through operation {}", atom, i0, op);
                let rot = symmetry.cart_rot(op);
                let rot_map = symmetry.atom_map(op);
                let mut fwd = vec![0; n];
                for (x, &from) in rot_map.iter().enumerate() {
                    fwd[from] = x;
                }

                let mut plane = Vec::with_capacity(n * n * n * 81);
                let mut block = [0.0; 81];
                for j in 0..n {
                    for k in 0..n {
                        for l in 0..n {
                            let src = crate::store::quartet_block(source.view(), [i0, fwd[j], fwd[k], fwd[l]]);
                            for (dest, &x) in block.iter_mut().zip(src.iter()) {
                                *dest = x;
                            }
                            plane.extend_from_slice(&transpose_rotate_rank4(&block, &rot));
                        }
                    }
                }
                (atom, plane)
            })
            .collect::<Vec<_>>();

        for (atom, plane) in planes {
            for (dest, x) in fc4.index_axis_mut(Axis(0), atom).iter_mut().zip(plane) {
                *dest = x;
            }
        }
        Ok(())
    }
}

/// `out_{abcd} = sum_{pqrs} R_pa R_qb R_rc R_sd in_{pqrs}` on a flattened
/// `3x3x3x3` block.
pub(crate) fn transpose_rotate_rank4(block: &[f64; 81], rot: &M33) -> [f64; 81]
{
    let mut cur = *block;
    for &stride in &[27, 9, 3, 1] {
        let mut next = [0.0; 81];
        for (index, dest) in next.iter_mut().enumerate() {
            let a = (index / stride) % 3;
            let base = index - a * stride;
            *dest = (0..3).map(|p| rot[p][a] * cur[base + p * stride]).sum::<f64>();
        }
        cur = next;
    }
    cur
}
