/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{Coords, FracOp, Perm, PositionMatchError};
use crate::find_perm;

use fc4fit_array_types::{V3, M33};

/// A structure together with a set of its spacegroup operations.
///
/// Atom maps and cartesian rotations of every operation are computed up front.
/// Subsets of operations (site symmetries and the like) are represented as
/// lists of indices into [`Symmetry::operations`].
#[derive(Debug, Clone)]
pub struct Symmetry {
    coords: Coords,
    ops: Vec<FracOp>,
    tol: f64,
    atom_maps: Vec<Perm>,
    cart_rots: Vec<M33>,
}

impl Symmetry {
    /// Fails if any of the operations is not a symmetry of `coords`
    /// within `tol` (a cartesian distance).
    pub fn new(coords: Coords, ops: Vec<FracOp>, tol: f64) -> Result<Self, PositionMatchError>
    {Ok({
        let atom_maps = find_perm::atom_maps(&coords, &ops, tol)?;
        let cart_rots = ops.iter().map(|op| op.cart_rot(coords.lattice())).collect();
        debug!("computed atom maps for {} operations on {} atoms", ops.len(), coords.num_atoms());
        Symmetry { coords, ops, tol, atom_maps, cart_rots }
    })}

    pub fn coords(&self) -> &Coords
    { &self.coords }

    pub fn operations(&self) -> &[FracOp]
    { &self.ops }

    pub fn num_operations(&self) -> usize
    { self.ops.len() }

    pub fn tolerance(&self) -> f64
    { self.tol }

    /// `atom_map(op)[j] == i` when operation `op` carries atom `i` onto atom `j`.
    pub fn atom_map(&self, op: usize) -> &Perm
    { &self.atom_maps[op] }

    /// The operation's rotation, acting on cartesian column vectors.
    pub fn cart_rot(&self, op: usize) -> &M33
    { &self.cart_rots[op] }

    pub fn all_operations(&self) -> Vec<usize>
    { (0..self.ops.len()).collect() }

    /// Operations that send `atom` onto an image of itself.
    pub fn site_symmetry(&self, atom: usize) -> Vec<usize>
    { self.restrict(&self.all_operations(), atom) }

    /// The subset of `ops` which additionally fixes `other`.
    ///
    /// `ops` is expected to be (a subgroup of) the site symmetry of `center`,
    /// in which case this is the symmetry of the bond between the two.
    pub fn bond_symmetry(&self, ops: &[usize], center: usize, other: usize) -> Vec<usize>
    {
        debug_assert!(ops.iter().all(|&op| self.atom_maps[op][center] == center));
        self.restrict(ops, other)
    }

    /// The subset of `ops` whose rotations leave a cartesian direction invariant.
    ///
    /// The comparison is done on the fractional form of the vector, elementwise,
    /// using the same tolerance as everything else.
    pub fn reduce_to_direction(&self, ops: &[usize], cart_dir: &V3) -> Vec<usize>
    {
        let frac_dir = cart_dir / self.coords.lattice();
        ops.iter().cloned()
            .filter(|&op| {
                let rotated = self.ops[op].rot().transform_frac(&frac_dir);
                (rotated - frac_dir).iter().all(|x| x.abs() < self.tol)
            })
            .collect()
    }

    fn restrict(&self, ops: &[usize], atom: usize) -> Vec<usize>
    {
        ops.iter().cloned()
            .filter(|&op| self.atom_maps[op][atom] == atom)
            .collect()
    }
}
