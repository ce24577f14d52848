/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

// Helpers shared by the integration tests.
//
// Not every test file uses everything here.
#![allow(dead_code)]

use fc4fit::{
    Coords, Lattice, FracRot, FracOp, Symmetry, V3,
    DisplacementDataset, FirstAtomEntry, SecondAtomEntry, ThirdAtomEntry,
};
use fc4fit_structure::group::generate_finite_group;
use rand::Rng;

pub fn init_logger() {
    // only the first test to get here can install it
    let _ = fc4fit::GlobalLogger::default().verbosity(1).apply();
}

pub fn random_v3(rng: &mut impl Rng, scale: f64) -> V3 {
    V3([
        scale * rng.gen_range(-1.0..1.0),
        scale * rng.gen_range(-1.0..1.0),
        scale * rng.gen_range(-1.0..1.0),
    ])
}

/// `fwd[x]` is the atom that the operation carries `x` onto.
pub fn forward_map(symmetry: &Symmetry, op: usize) -> Vec<usize> {
    let rot_map = symmetry.atom_map(op).as_slice();
    let mut fwd = vec![0; rot_map.len()];
    for (x, &from) in rot_map.iter().enumerate() {
        fwd[from] = x;
    }
    fwd
}

//------------------------------------------------------------------------------
// rocksalt

pub const ROCKSALT_A: f64 = 2.0;

/// Conventional cell of rocksalt (4 cations, then 4 anions), with nearest
/// neighbors at distance 1.
///
/// The operations are the 48 point operations of `m-3m` combined with the 4
/// centering translations of the FCC lattice.
pub fn rocksalt() -> (Coords, Vec<FracOp>) {
    let fracs = vec![
        V3([0.0, 0.0, 0.0]),
        V3([0.0, 0.5, 0.5]),
        V3([0.5, 0.0, 0.5]),
        V3([0.5, 0.5, 0.0]),
        V3([0.5, 0.0, 0.0]),
        V3([0.0, 0.5, 0.0]),
        V3([0.0, 0.0, 0.5]),
        V3([0.5, 0.5, 0.5]),
    ];
    let coords = Coords::new(Lattice::cubic(ROCKSALT_A), fracs);

    let generators = vec![
        FracRot::from(&[[0, -1, 0], [1, 0, 0], [0, 0, 1]]),
        FracRot::from(&[[0, 0, 1], [1, 0, 0], [0, 1, 0]]),
        FracRot::from(&[[-1, 0, 0], [0, -1, 0], [0, 0, -1]]),
    ];
    let rots = generate_finite_group(&generators, |a, b| a.then(b));
    assert_eq!(rots.len(), 48);

    let centerings = [
        V3([0.0, 0.0, 0.0]),
        V3([0.0, 0.5, 0.5]),
        V3([0.5, 0.0, 0.5]),
        V3([0.5, 0.5, 0.0]),
    ];
    let ops = rots.iter()
        .flat_map(|rot| centerings.iter().map(move |t| FracOp::new(rot, t)))
        .collect();
    (coords, ops)
}

//------------------------------------------------------------------------------
// force model

/// Nearest neighbor springs with cubic and quartic anharmonicity, plus a
/// many-body "breathing" term.
///
/// Each bond has energy `k2/2 x^2 + k3/3 x^3 + k4/4 x^4`, where `x` is the
/// change in bond length.  Each atom adds `m3/3 s^3 + m4/4 s^4`, where `s` is
/// the total stretch of its bonds; this couples displacements of up to five
/// distinct atoms.
pub struct BondModel {
    carts: Vec<V3>,
    // (i, j, offset of the image of j, rest length)
    bonds: Vec<(usize, usize, V3, f64)>,
    pub k2: f64,
    pub k3: f64,
    pub k4: f64,
    pub m3: f64,
    pub m4: f64,
}

impl BondModel {
    pub fn nearest_neighbors(coords: &Coords, distance: f64, (k2, k3, k4): (f64, f64, f64)) -> Self {
        let carts = coords.to_carts();
        let lattice = coords.lattice();

        let mut bonds = vec![];
        for i in 0..carts.len() {
            for j in i + 1..carts.len() {
                for a in -1..=1 {
                    for b in -1..=1 {
                        for c in -1..=1 {
                            let image = V3([a as f64, b as f64, c as f64]) * lattice;
                            let length = (carts[j] + image - carts[i]).norm();
                            if (length - distance).abs() < 1e-6 {
                                bonds.push((i, j, image, length));
                            }
                        }
                    }
                }
            }
        }
        BondModel { carts, bonds, k2, k3, k4, m3: 0.0, m4: 0.0 }
    }

    pub fn with_breathing(self, (m3, m4): (f64, f64)) -> Self {
        BondModel { m3, m4, ..self }
    }

    pub fn num_bonds(&self) -> usize { self.bonds.len() }

    /// Forces on every atom with cartesian displacements applied.
    pub fn forces(&self, disps: &[V3]) -> Vec<V3> {
        let geometry = self.bonds.iter().map(|&(i, j, image, rest)| {
            let d = (self.carts[j] + disps[j]) + image - (self.carts[i] + disps[i]);
            let r = d.norm();
            (d, r, r - rest)
        }).collect::<Vec<_>>();

        let mut stretch = vec![0.0; self.carts.len()];
        for (&(i, j, _, _), &(_, _, x)) in self.bonds.iter().zip(&geometry) {
            stretch[i] += x;
            stretch[j] += x;
        }
        // derivative of the breathing energy of each atom
        let breathing = stretch.iter()
            .map(|&s| self.m3 * s * s + self.m4 * s * s * s)
            .collect::<Vec<_>>();

        let mut forces = vec![V3::zero(); self.carts.len()];
        for (&(i, j, _, _), &(d, r, x)) in self.bonds.iter().zip(&geometry) {
            let dphi = self.k2 * x + self.k3 * x * x + self.k4 * x * x * x + breathing[i] + breathing[j];
            let f = d * (dphi / r);
            forces[i] += f;
            forces[j] -= f;
        }
        forces
    }

    /// Forces for the displacements of a sample on atoms `(first, second, third)`.
    ///
    /// Displacements of coinciding atoms add up.
    pub fn sample_forces(&self, atoms: [usize; 3], disps: &[V3; 3]) -> Vec<V3> {
        let mut total = vec![V3::zero(); self.carts.len()];
        for (&atom, &disp) in atoms.iter().zip(disps) {
            total[atom] += disp;
        }
        self.forces(&total)
    }
}

//------------------------------------------------------------------------------
// datasets

/// A dataset that only displaces symmetry-distinct atoms.
///
/// For each first atom, second atoms are chosen greedily in ascending order,
/// skipping those carried onto an already chosen atom by the reduced site
/// symmetry; likewise for third atoms under the reduced bond symmetry.
pub fn sparse_dataset(
    symmetry: &Symmetry,
    model: &BondModel,
    firsts: &[usize],
    disps: [V3; 3],
) -> DisplacementDataset {
    let n = symmetry.coords().num_atoms();
    let choose = |ops: &[usize]| {
        let mut chosen: Vec<usize> = vec![];
        for atom in 0..n {
            if !ops.iter().any(|&op| chosen.contains(&symmetry.atom_map(op)[atom])) {
                chosen.push(atom);
            }
        }
        chosen
    };

    let first_atoms = firsts.iter().map(|&first| {
        let site = symmetry.site_symmetry(first);
        let reduced_site = symmetry.reduce_to_direction(&site, &disps[0]);

        let second_atoms = choose(&reduced_site).into_iter().map(|second| {
            let bond = symmetry.bond_symmetry(&reduced_site, first, second);
            let reduced_bond = symmetry.reduce_to_direction(&bond, &disps[1]);

            let third_atoms = choose(&reduced_bond).into_iter().map(|third| ThirdAtomEntry {
                number: third,
                displacement: disps[2],
                forces: model.sample_forces([first, second, third], &disps),
            }).collect();
            SecondAtomEntry { number: second, displacement: disps[1], third_atoms }
        }).collect();
        FirstAtomEntry { number: first, displacement: disps[0], second_atoms }
    }).collect();

    DisplacementDataset { first_atoms }
}
