/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Filling in the (second atom, third atom) grid of samples for a first atom.
//!
//! The dataset only contains samples for a symmetry-distinct subset of atom
//! pairs.  Everything else is obtained by applying an operation that fixes
//! whatever was already displaced (the first atom and its displacement, and
//! for third atoms also the second atom and its displacement) and that maps
//! the missing atom onto one with data.
//!
//! An operation `g` with cartesian rotation `S` and atom map `rot_map`
//! transforms a sample as `u -> S u` for each displacement it moves, and
//! `f[l] -> S f[rot_map[l]]` for the forces.

use crate::dataset::{FirstAtomEntry, SecondAtomEntry};
use crate::errors::{FitError, FitResult, ReconstructionLevel};
use crate::symmetry::SymmetryProvider;

use fc4fit_array_types::{V3, M33};

/// Three displacements applied together, and the forces they produce.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Cartesian displacements of the first, second, and third atom.
    pub disps: [V3; 3],
    /// Cartesian force on every atom.
    pub forces: Vec<V3>,
}

impl Sample {
    // Apply an operation to displacements `moved..3` and to all forces.
    fn transformed(&self, moved: usize, rot: &M33, rot_map: &[usize]) -> Sample
    {
        let mut disps = self.disps;
        for u in &mut disps[moved..] {
            *u = rot * *u;
        }
        let forces = rot_map.iter().map(|&src| rot * self.forces[src]).collect();
        Sample { disps, forces }
    }
}

/// The dense `N x N` grid of sample lists built from one first atom entry.
#[derive(Debug, Clone)]
pub struct SampleGrid {
    first: usize,
    num_atoms: usize,
    // indexed by `second * num_atoms + third`
    cells: Vec<Vec<Sample>>,
}

impl SampleGrid {
    pub fn first_atom(&self) -> usize
    { self.first }

    pub fn num_atoms(&self) -> usize
    { self.num_atoms }

    pub fn samples(&self, second: usize, third: usize) -> &[Sample]
    { &self.cells[second * self.num_atoms + third] }

    /// Number of `(second, third)` cells holding at least one sample.
    pub fn num_populated(&self) -> usize
    { self.cells.iter().filter(|c| !c.is_empty()).count() }

    pub fn is_complete(&self) -> bool
    { self.num_populated() == self.num_atoms * self.num_atoms }
}

/// Reconstructs complete sample grids from sparse dataset entries.
pub struct SampleReconstructor<'a> {
    symmetry: &'a dyn SymmetryProvider,
}

// One row of the grid: the sample lists of every third atom under a second atom.
type Row = Vec<Vec<Sample>>;

impl<'a> SampleReconstructor<'a> {
    pub fn new(symmetry: &'a dyn SymmetryProvider) -> Self
    { SampleReconstructor { symmetry } }

    /// Build the complete grid for a single first atom entry.
    pub fn reconstruct(&self, entry: &FirstAtomEntry) -> FitResult<SampleGrid>
    {
        let n = self.symmetry.num_atoms();
        let first = entry.number;

        let site = self.symmetry.site_symmetry(first);
        let reduced_site = self.symmetry.reduce_to_direction(&site, &entry.displacement);
        trace!(
            "first atom {}: site symmetry {} ops, reduced {} ops",
            first, site.len(), reduced_site.len(),
        );

        let mut rows: Vec<Option<Row>> = vec![None; n];
        for second in 0..n {
            for second_entry in entry.second_atoms.iter().filter(|e| e.number == second) {
                let row = self.reconstruct_row(entry, second_entry, &reduced_site)?;
                match &mut rows[second] {
                    None => rows[second] = Some(row),
                    Some(existing) => {
                        for (cell, new) in existing.iter_mut().zip(row) {
                            cell.extend(new);
                        }
                    },
                }
            }
        }

        // second atoms without any entry are filled in ascending order,
        // and may be sourced from rows filled earlier in this loop
        for second in 0..n {
            if rows[second].is_some() {
                continue;
            }

            let (rot_map, rot) = reduced_site.iter()
                .map(|&op| (self.symmetry.atom_map(op), op))
                .find(|(rot_map, _)| rows[rot_map[second]].is_some())
                .map(|(rot_map, op)| (rot_map, self.symmetry.cart_rot(op)))
                .ok_or(FitError::Reconstruction {
                    first,
                    missing: second,
                    level: ReconstructionLevel::SecondAtom,
                })?;

            let source = rows[rot_map[second]].as_ref().expect("(BUG) checked above");
            let row = (0..n)
                .map(|third| {
                    source[rot_map[third]].iter()
                        .map(|s| s.transformed(1, &rot, rot_map))
                        .collect()
                })
                .collect();
            rows[second] = Some(row);
        }

        let cells = rows.into_iter()
            .flat_map(|row| row.expect("(BUG) row left unfilled"))
            .collect();
        let grid = SampleGrid { first, num_atoms: n, cells };
        debug_assert!(grid.is_complete());
        Ok(grid)
    }

    /// Build the row of one second atom entry, reconstructing third atoms
    /// that it lacks.
    fn reconstruct_row(
        &self,
        first_entry: &FirstAtomEntry,
        entry: &SecondAtomEntry,
        reduced_site: &[usize],
    ) -> FitResult<Row>
    {
        let n = self.symmetry.num_atoms();
        let first = first_entry.number;
        let second = entry.number;

        let mut row: Row = vec![vec![]; n];
        for third in 0..n {
            for third_entry in entry.third_atoms.iter().filter(|e| e.number == third) {
                row[third].push(Sample {
                    disps: [first_entry.displacement, entry.displacement, third_entry.displacement],
                    forces: third_entry.forces.clone(),
                });
            }
        }

        if row.iter().all(|cell| !cell.is_empty()) {
            return Ok(row);
        }

        let bond = self.symmetry.bond_symmetry(reduced_site, first, second);
        let reduced_bond = self.symmetry.reduce_to_direction(&bond, &entry.displacement);

        for third in 0..n {
            if !row[third].is_empty() {
                continue;
            }

            let (rot_map, rot) = reduced_bond.iter()
                .map(|&op| (self.symmetry.atom_map(op), op))
                .find(|(rot_map, _)| !row[rot_map[third]].is_empty())
                .map(|(rot_map, op)| (rot_map, self.symmetry.cart_rot(op)))
                .ok_or(FitError::Reconstruction {
                    first,
                    missing: third,
                    level: ReconstructionLevel::ThirdAtom { second },
                })?;

            row[third] = row[rot_map[third]].iter()
                .map(|s| s.transformed(2, &rot, rot_map))
                .collect();
        }
        Ok(row)
    }
}
