/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::Lattice;
use fc4fit_array_types::V3;

/// Atomic positions in a periodic cell, stored fractionally.
///
/// Fractional positions are not required to lie in `[0, 1)`; everything that
/// compares positions does so modulo the lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct Coords {
    lattice: Lattice,
    fracs: Vec<V3>,
}

impl Coords {
    pub fn new(lattice: Lattice, fracs: Vec<V3>) -> Self
    { Coords { lattice, fracs } }

    pub fn from_carts(lattice: Lattice, carts: &[V3]) -> Self
    {
        let fracs = carts.iter().map(|c| c / &lattice).collect();
        Coords { lattice, fracs }
    }

    #[inline]
    pub fn num_atoms(&self) -> usize
    { self.fracs.len() }

    #[inline]
    pub fn lattice(&self) -> &Lattice
    { &self.lattice }

    #[inline]
    pub fn fracs(&self) -> &[V3]
    { &self.fracs }

    pub fn to_carts(&self) -> Vec<V3>
    { self.fracs.iter().map(|f| f * &self.lattice).collect() }

    /// Positions reduced into the `[0, 1)` convention.
    pub fn reduced_fracs(&self) -> Vec<V3>
    { self.fracs.iter().map(|f| f.map(|x| x - x.floor())).collect() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carts_and_fracs() {
        let lattice = Lattice::orthorhombic(2.0, 4.0, 8.0);
        let coords = Coords::from_carts(lattice, &[V3([1.0, 1.0, 1.0]), V3([-1.0, 0.0, 9.0])]);
        assert_eq!(coords.num_atoms(), 2);
        assert_eq!(coords.fracs()[0], V3([0.5, 0.25, 0.125]));
        assert_eq!(coords.reduced_fracs()[1], V3([0.5, 0.0, 0.125]));
        assert_eq!(coords.to_carts()[1], V3([-1.0, 0.0, 9.0]));
    }
}
