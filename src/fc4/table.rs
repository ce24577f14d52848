/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::ops::Range;

use crate::reconstruct::SampleGrid;

use fc4fit_array_types::V3;

/// Every sample of a first atom's reconstructed grids, flattened into
/// contiguous buffers.
///
/// Samples of each `(grid, second, third)` cell are stored contiguously, and
/// located through an `(offset, count)` index.
#[derive(Debug, Clone)]
pub struct DisplacementTable {
    num_atoms: usize,
    num_grids: usize,
    disps: Vec<[V3; 3]>,
    // `num_atoms` forces per sample
    forces: Vec<V3>,
    offsets: Vec<usize>,
    counts: Vec<usize>,
    max_count: usize,
}

impl DisplacementTable {
    /// # Panics
    ///
    /// Panics if the grids disagree on the number of atoms.
    pub fn from_grids(grids: &[SampleGrid]) -> Self
    {
        let num_atoms = grids.first().map_or(0, |g| g.num_atoms());
        let num_grids = grids.len();

        let mut disps = vec![];
        let mut forces = vec![];
        let mut offsets = Vec::with_capacity(num_grids * num_atoms * num_atoms);
        let mut counts = Vec::with_capacity(num_grids * num_atoms * num_atoms);
        for grid in grids {
            assert_eq!(grid.num_atoms(), num_atoms, "grids for different structures");
            for second in 0..num_atoms {
                for third in 0..num_atoms {
                    let samples = grid.samples(second, third);
                    offsets.push(disps.len());
                    counts.push(samples.len());
                    for sample in samples {
                        disps.push(sample.disps);
                        forces.extend_from_slice(&sample.forces);
                    }
                }
            }
        }
        let max_count = counts.iter().cloned().max().unwrap_or(0);

        DisplacementTable { num_atoms, num_grids, disps, forces, offsets, counts, max_count }
    }

    pub fn num_atoms(&self) -> usize
    { self.num_atoms }

    pub fn num_grids(&self) -> usize
    { self.num_grids }

    pub fn num_samples(&self) -> usize
    { self.disps.len() }

    /// The largest number of samples in any one cell.
    pub fn max_count(&self) -> usize
    { self.max_count }

    fn cell(&self, grid: usize, second: usize, third: usize) -> usize
    { (grid * self.num_atoms + second) * self.num_atoms + third }

    pub fn offset(&self, grid: usize, second: usize, third: usize) -> usize
    { self.offsets[self.cell(grid, second, third)] }

    pub fn count(&self, grid: usize, second: usize, third: usize) -> usize
    { self.counts[self.cell(grid, second, third)] }

    /// Sample indices belonging to a cell.
    pub fn range(&self, grid: usize, second: usize, third: usize) -> Range<usize>
    {
        let offset = self.offset(grid, second, third);
        offset..offset + self.count(grid, second, third)
    }

    pub fn displacements(&self, samples: Range<usize>) -> &[[V3; 3]]
    { &self.disps[samples] }

    /// Forces on every atom for one sample.
    pub fn forces(&self, sample: usize) -> &[V3]
    {
        let n = self.num_atoms;
        &self.forces[sample * n..(sample + 1) * n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::tiny_dataset;
    use crate::reconstruct::SampleReconstructor;
    use fc4fit_structure::{Coords, FracOp, Lattice, Symmetry};

    #[test]
    fn table_matches_grids() {
        let n = 2;
        let coords = Coords::new(Lattice::eye(), vec![V3([0.0; 3]), V3([0.5, 0.5, 0.5])]);
        let symmetry = Symmetry::new(coords, vec![FracOp::eye()], 1e-6).unwrap();
        // give every entry both second atoms, as there is no symmetry to fill them in
        let mut dataset = tiny_dataset(n);
        for entry in &mut dataset.first_atoms {
            let mut other = entry.second_atoms[0].clone();
            other.number = 1 - other.number;
            entry.second_atoms.push(other);
        }

        let reconstructor = SampleReconstructor::new(&symmetry);
        let grids = dataset.first_atoms.iter()
            .map(|entry| reconstructor.reconstruct(entry).unwrap())
            .collect::<Vec<_>>();
        let table = DisplacementTable::from_grids(&grids);

        assert_eq!(table.num_grids(), grids.len());
        let mut total = 0;
        let mut largest = 0;
        for (g, grid) in grids.iter().enumerate() {
            for j in 0..n {
                for k in 0..n {
                    let samples = grid.samples(j, k);
                    let range = table.range(g, j, k);
                    assert_eq!(range.len(), samples.len());
                    total += samples.len();
                    largest = largest.max(samples.len());

                    for (index, sample) in range.clone().zip(samples) {
                        assert_eq!(table.displacements(index..index + 1)[0], sample.disps);
                        assert_eq!(table.forces(index), &sample.forces[..]);
                    }
                }
            }
        }
        assert_eq!(table.num_samples(), total);
        assert_eq!(table.max_count(), largest);
    }
}
