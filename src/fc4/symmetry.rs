/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! The interface through which the fit consumes symmetry.

use crate::errors::FitResult;

use fc4fit_array_types::{V3, M33};
use fc4fit_config::Settings;
use fc4fit_structure::{Coords, FracOp, Symmetry};

/// Source of spacegroup information for a supercell.
///
/// Operations are identified by their index in [`full_operations`], and
/// subsets of operations are lists of such indices.
///
/// [`full_operations`]: SymmetryProvider::full_operations
pub trait SymmetryProvider: Sync {
    fn num_atoms(&self) -> usize;

    /// Tolerance used when comparing positions and directions.
    fn tolerance(&self) -> f64;

    /// Every operation of the spacegroup.
    fn full_operations(&self) -> Vec<usize>;

    /// Operations that leave `atom` in place (modulo lattice translations).
    fn site_symmetry(&self, atom: usize) -> Vec<usize>;

    /// The operations of `ops` whose rotations leave a cartesian direction invariant.
    fn reduce_to_direction(&self, ops: &[usize], direction: &V3) -> Vec<usize>;

    /// The operations of `ops` (a site symmetry of `center`) that also leave `other` in place.
    fn bond_symmetry(&self, ops: &[usize], center: usize, other: usize) -> Vec<usize>;

    /// `atom_map(op)[j] == i` when the operation carries atom `i` onto atom `j`.
    fn atom_map(&self, op: usize) -> &[usize];

    /// The operation's rotation, acting on cartesian column vectors.
    fn cart_rot(&self, op: usize) -> M33;
}

impl SymmetryProvider for Symmetry {
    fn num_atoms(&self) -> usize
    { self.coords().num_atoms() }

    fn tolerance(&self) -> f64
    { Symmetry::tolerance(self) }

    fn full_operations(&self) -> Vec<usize>
    { self.all_operations() }

    fn site_symmetry(&self, atom: usize) -> Vec<usize>
    { Symmetry::site_symmetry(self, atom) }

    fn reduce_to_direction(&self, ops: &[usize], direction: &V3) -> Vec<usize>
    { Symmetry::reduce_to_direction(self, ops, direction) }

    fn bond_symmetry(&self, ops: &[usize], center: usize, other: usize) -> Vec<usize>
    { Symmetry::bond_symmetry(self, ops, center, other) }

    fn atom_map(&self, op: usize) -> &[usize]
    { Symmetry::atom_map(self, op).as_slice() }

    fn cart_rot(&self, op: usize) -> M33
    { *Symmetry::cart_rot(self, op) }
}

/// A set of operations, with their atom maps and cartesian rotations gathered
/// in the same order.
#[derive(Debug, Clone)]
pub struct OperationSet<'a> {
    pub ops: Vec<usize>,
    pub atom_maps: Vec<&'a [usize]>,
    pub cart_rots: Vec<M33>,
}

impl<'a> OperationSet<'a> {
    pub fn gather(symmetry: &'a dyn SymmetryProvider, ops: Vec<usize>) -> Self
    {
        let atom_maps = ops.iter().map(|&op| symmetry.atom_map(op)).collect();
        let cart_rots = ops.iter().map(|&op| symmetry.cart_rot(op)).collect();
        OperationSet { ops, atom_maps, cart_rots }
    }

    pub fn len(&self) -> usize
    { self.ops.len() }

    pub fn is_empty(&self) -> bool
    { self.ops.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&'a [usize], &M33)> + '_
    { self.atom_maps.iter().cloned().zip(&self.cart_rots) }
}

/// Build the in-memory symmetry collaborator with the configured tolerance.
pub fn build_symmetry(coords: &Coords, ops: Vec<FracOp>, settings: &Settings) -> FitResult<Symmetry>
{ Ok(Symmetry::new(coords.clone(), ops, settings.symprec)?) }
