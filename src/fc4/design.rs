/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Assembly of the least squares system for one `(first, second, third)` triple.
//!
//! For a target pair `(j, k)`, every operation `g` of the first atom's site
//! symmetry contributes the samples stored at `(map_g[j], map_g[k])`, rotated
//! into place.  Row order is grid, then operation, then sample; the force
//! matrix follows the same order.

use crate::basis::{self, NUM_COLUMNS};
use crate::errors::FitResult;
use crate::reconstruct::SampleGrid;
use crate::symmetry::{OperationSet, SymmetryProvider};
use crate::table::DisplacementTable;

use fc4fit_array_types::{V3, M33};
use fc4fit_linalg::CMatrix;

/// Everything known about one first atom once its samples are reconstructed.
pub struct FirstAtomContext<'a> {
    first: usize,
    grids: Vec<SampleGrid>,
    table: DisplacementTable,
    site: OperationSet<'a>,
}

impl<'a> FirstAtomContext<'a> {
    pub fn new(
        symmetry: &'a dyn SymmetryProvider,
        first: usize,
        grids: Vec<SampleGrid>,
    ) -> FitResult<Self>
    {
        let site = symmetry.site_symmetry(first);
        if site.is_empty() {
            return Err(config_error!(
                "site symmetry of atom {} is empty (it should at least contain the identity)",
                first,
            ));
        }
        let site = OperationSet::gather(symmetry, site);
        let table = DisplacementTable::from_grids(&grids);
        Ok(FirstAtomContext { first, grids, table, site })
    }

    pub fn first_atom(&self) -> usize
    { self.first }

    pub fn num_atoms(&self) -> usize
    { self.table.num_atoms() }

    pub fn grids(&self) -> &[SampleGrid]
    { &self.grids }

    pub fn table(&self) -> &DisplacementTable
    { &self.table }

    /// The full site symmetry of the first atom.
    pub fn site_operations(&self) -> &OperationSet<'a>
    { &self.site }

    /// Number of rows in the system for `(second, third)`.
    pub fn num_rows(&self, second: usize, third: usize) -> usize
    {
        let table = &self.table;
        (0..table.num_grids())
            .flat_map(|g| self.site.atom_maps.iter().map(move |map| (g, map)))
            .map(|(g, map)| table.count(g, map[second], map[third]))
            .sum()
    }
}

/// Strategy for assembling design and force matrices.
///
/// All implementations must produce identical matrices.
pub trait DesignMatrixBuilder: Send + Sync {
    /// The `rows x NUM_COLUMNS` design matrix.
    fn design_matrix(&self, ctx: &FirstAtomContext<'_>, second: usize, third: usize) -> CMatrix;

    /// The `rows x 3N` matrix of forces, where column `3 * l + c` holds
    /// cartesian component `c` of the force on atom `l`.
    fn force_matrix(&self, ctx: &FirstAtomContext<'_>, second: usize, third: usize) -> CMatrix;
}

fn rotated(rot: &M33, disps: &[V3; 3]) -> [V3; 3]
{ [rot * disps[0], rot * disps[1], rot * disps[2]] }

/// Walks the reconstructed grids directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedBuilder;

impl DesignMatrixBuilder for NestedBuilder {
    fn design_matrix(&self, ctx: &FirstAtomContext<'_>, second: usize, third: usize) -> CMatrix
    {
        let mut data = vec![];
        let mut row = [0.0; NUM_COLUMNS];
        for grid in ctx.grids() {
            for (map, rot) in ctx.site_operations().iter() {
                for sample in grid.samples(map[second], map[third]) {
                    basis::expand_row(&rotated(rot, &sample.disps), &mut row);
                    data.extend_from_slice(&row);
                }
            }
        }
        CMatrix::from_row_major(data.len() / NUM_COLUMNS, NUM_COLUMNS, data)
    }

    fn force_matrix(&self, ctx: &FirstAtomContext<'_>, second: usize, third: usize) -> CMatrix
    {
        let width = 3 * ctx.num_atoms();
        let mut data = vec![];
        for grid in ctx.grids() {
            for (map, rot) in ctx.site_operations().iter() {
                for sample in grid.samples(map[second], map[third]) {
                    for &src in map {
                        data.extend_from_slice(&(rot * sample.forces[src]).0);
                    }
                }
            }
        }
        CMatrix::from_row_major(data.len() / width.max(1), width, data)
    }
}

/// Works from the flattened [`DisplacementTable`], writing every row of a
/// preallocated buffer in a single pass.
///
/// Rows are still expanded one at a time; the difference from
/// [`NestedBuilder`] is only in how samples are located.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatBuilder;

impl FlatBuilder {
    // (operation index, sample index) of every row, in row order
    fn row_sources(ctx: &FirstAtomContext<'_>, second: usize, third: usize) -> Vec<(usize, usize)>
    {
        let table = ctx.table();
        let maps = &ctx.site_operations().atom_maps;
        // upper bound, so that the cells never need to be counted twice
        let mut sources = Vec::with_capacity(table.num_grids() * maps.len() * table.max_count());
        for g in 0..table.num_grids() {
            for (op, map) in maps.iter().enumerate() {
                let range = table.range(g, map[second], map[third]);
                sources.extend(range.map(|sample| (op, sample)));
            }
        }
        sources
    }
}

impl DesignMatrixBuilder for FlatBuilder {
    fn design_matrix(&self, ctx: &FirstAtomContext<'_>, second: usize, third: usize) -> CMatrix
    {
        let sources = Self::row_sources(ctx, second, third);
        debug_assert_eq!(sources.len(), ctx.num_rows(second, third));
        let table = ctx.table();
        let rots = &ctx.site_operations().cart_rots;

        let mut data = vec![0.0; sources.len() * NUM_COLUMNS];
        for (dest, &(op, sample)) in data.chunks_mut(NUM_COLUMNS).zip(&sources) {
            let disps = &table.displacements(sample..sample + 1)[0];
            basis::expand_row(&rotated(&rots[op], disps), dest);
        }
        CMatrix::from_row_major(sources.len(), NUM_COLUMNS, data)
    }

    fn force_matrix(&self, ctx: &FirstAtomContext<'_>, second: usize, third: usize) -> CMatrix
    {
        let sources = Self::row_sources(ctx, second, third);
        let table = ctx.table();
        let ops = ctx.site_operations();
        let width = 3 * ctx.num_atoms();

        let mut data = vec![0.0; sources.len() * width];
        for (dest, &(op, sample)) in data.chunks_mut(width.max(1)).zip(&sources) {
            let (map, rot) = (ops.atom_maps[op], &ops.cart_rots[op]);
            let forces = table.forces(sample);
            for (dest, &src) in dest.chunks_mut(3).zip(map) {
                dest.copy_from_slice(&(rot * forces[src]).0);
            }
        }
        CMatrix::from_row_major(sources.len(), width, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{FirstAtomEntry, SecondAtomEntry, ThirdAtomEntry};
    use crate::reconstruct::SampleReconstructor;
    use fc4fit_structure::{Coords, FracOp, FracRot, Lattice, Symmetry};
    use fc4fit_assert_close::assert_close;
    use rand::Rng;

    // Three atoms on the x axis of a cubic cell, with the full point group
    // fixing the middle one.
    fn line_structure() -> Symmetry {
        let coords = Coords::new(Lattice::cubic(3.0), vec![
            V3([0.3, 0.0, 0.0]),
            V3([0.0, 0.0, 0.0]),
            V3([0.7, 0.0, 0.0]),
        ]);
        let gens = vec![
            FracRot::from(&[[0, 1, 0], [1, 0, 0], [0, 0, 1]]),
            FracRot::from(&[[0, 0, 1], [1, 0, 0], [0, 1, 0]]),
            FracRot::from(&[[-1, 0, 0], [0, 1, 0], [0, 0, 1]]),
        ];
        let rots = fc4fit_structure::group::generate_finite_group(&gens, |a, b| a.then(b));
        let ops = rots.into_iter()
            .map(FracOp::from)
            .filter(|op| fc4fit_structure::find_perm::atom_map(&coords, op, 1e-6).is_ok())
            .collect();
        Symmetry::new(coords, ops, 1e-6).unwrap()
    }

    fn random_v3(rng: &mut impl Rng) -> V3 {
        V3([rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)])
    }

    fn random_entry(rng: &mut impl Rng, first: usize, n: usize) -> FirstAtomEntry {
        FirstAtomEntry {
            number: first,
            displacement: random_v3(rng),
            second_atoms: (0..n).map(|j| SecondAtomEntry {
                number: j,
                displacement: random_v3(rng),
                third_atoms: (0..n).map(|k| ThirdAtomEntry {
                    number: k,
                    displacement: random_v3(rng),
                    forces: (0..n).map(|_| random_v3(rng)).collect(),
                }).collect(),
            }).collect(),
        }
    }

    fn context(symmetry: &Symmetry) -> FirstAtomContext<'_> {
        let mut rng = rand::thread_rng();
        let reconstructor = SampleReconstructor::new(symmetry);
        let grids = (0..2)
            .map(|_| reconstructor.reconstruct(&random_entry(&mut rng, 1, 3)).unwrap())
            .collect();
        FirstAtomContext::new(symmetry, 1, grids).unwrap()
    }

    #[test]
    fn builders_agree() {
        let symmetry = line_structure();
        let ctx = context(&symmetry);
        assert_eq!(ctx.site_operations().len(), 16);

        for j in 0..3 {
            for k in 0..3 {
                let nested = NestedBuilder.design_matrix(&ctx, j, k);
                let flat = FlatBuilder.design_matrix(&ctx, j, k);
                assert_eq!(nested.nrows(), ctx.num_rows(j, k));
                assert_eq!(nested.ncols(), NUM_COLUMNS);
                assert_eq!(nested, flat);

                let nested = NestedBuilder.force_matrix(&ctx, j, k);
                let flat = FlatBuilder.force_matrix(&ctx, j, k);
                assert_eq!(nested.nrows(), ctx.num_rows(j, k));
                assert_eq!(nested.ncols(), 9);
                assert_eq!(nested, flat);
            }
        }
    }

    #[test]
    fn rows_are_rotated_samples() {
        let symmetry = line_structure();
        let ctx = context(&symmetry);

        // the identity is among the operations, and its rows hold the samples as they are
        let ops = ctx.site_operations();
        let eye = fc4fit_array_types::mat::eye::<f64>();
        let identity = ops.cart_rots.iter().position(|r| (*r - eye).max_abs() < 1e-12).unwrap();
        let sources = FlatBuilder::row_sources(&ctx, 0, 2);
        let design = FlatBuilder.design_matrix(&ctx, 0, 2);
        let forces = FlatBuilder.force_matrix(&ctx, 0, 2);

        let (row, &(_, sample)) = sources.iter().enumerate()
            .find(|(_, src)| src.0 == identity)
            .unwrap();
        let disps = ctx.table().displacements(sample..sample + 1)[0];
        assert_eq!(design[[row, 0]], -1.0);
        assert_close!(abs=1e-12, design[[row, 7]], disps[2][0]);
        assert_close!(abs=1e-12, design[[row, 3]], disps[0][2]);
        assert_close!(abs=1e-12, forces[[row, 3 * 2 + 1]], ctx.table().forces(sample)[2][1]);

        // every operation contributes one row per sample of its source cell
        assert_eq!(design.nrows(), 2 * 16);
    }

    // A lone atom with the full cubic point group.  Exchanged columns (both
    // `xy` and `yx` of `u1 u1`) never differ, so the best possible rank is the
    // number of distinct monomials of degree 3 or less in nine variables.
    #[test]
    fn lone_cubic_atom_has_unique_coefficients() {
        let coords = Coords::new(Lattice::cubic(3.0), vec![V3([0.0, 0.0, 0.0])]);
        let gens = vec![
            FracRot::from(&[[0, 1, 0], [1, 0, 0], [0, 0, 1]]),
            FracRot::from(&[[0, 0, 1], [1, 0, 0], [0, 1, 0]]),
            FracRot::from(&[[-1, 0, 0], [0, 1, 0], [0, 0, 1]]),
        ];
        let ops = fc4fit_structure::group::generate_finite_group(&gens, |a, b| a.then(b))
            .into_iter().map(FracOp::from).collect();
        let symmetry = Symmetry::new(coords, ops, 1e-6).unwrap();
        assert_eq!(symmetry.site_symmetry(0).len(), 48);

        let mut rng = rand::thread_rng();
        let mut entry = || FirstAtomEntry {
            number: 0,
            displacement: random_v3(&mut rng),
            second_atoms: (0..2).map(|_| SecondAtomEntry {
                number: 0,
                displacement: random_v3(&mut rng),
                third_atoms: (0..4).map(|_| ThirdAtomEntry {
                    number: 0,
                    displacement: random_v3(&mut rng),
                    forces: vec![random_v3(&mut rng)],
                }).collect(),
            }).collect(),
        };
        let reconstructor = SampleReconstructor::new(&symmetry);
        let grids = vec![
            reconstructor.reconstruct(&entry()).unwrap(),
            reconstructor.reconstruct(&entry()).unwrap(),
        ];
        let ctx = FirstAtomContext::new(&symmetry, 0, grids).unwrap();

        let design = FlatBuilder.design_matrix(&ctx, 0, 0);
        assert_eq!(design.nrows(), 16 * 48);
        let inverse = fc4fit_linalg::pseudoinverse(&design, Default::default()).unwrap();
        let projector = inverse.dot(&*design);
        assert_close!(abs=1e-6, projector.diag().sum(), 220.0); // 1 + 9 + 45 + 165

        let unique = std::iter::once(basis::BIAS_COLUMN)
            .chain(basis::LINEAR_START..basis::PAIR_START)
            .chain(basis::FC3_COLUMNS)
            .chain(basis::FC4_COLUMNS);
        for c in unique {
            for d in 0..NUM_COLUMNS {
                let expected = if c == d { 1.0 } else { 0.0 };
                assert_close!(abs=1e-8, projector[[c, d]], expected);
            }
        }
    }

    #[test]
    fn empty_site_symmetry_is_rejected() {
        struct NoOps(Symmetry);
        impl SymmetryProvider for NoOps {
            fn num_atoms(&self) -> usize { self.0.coords().num_atoms() }
            fn tolerance(&self) -> f64 { 1e-6 }
            fn full_operations(&self) -> Vec<usize> { vec![] }
            fn site_symmetry(&self, _: usize) -> Vec<usize> { vec![] }
            fn reduce_to_direction(&self, ops: &[usize], _: &V3) -> Vec<usize> { ops.to_vec() }
            fn bond_symmetry(&self, ops: &[usize], _: usize, _: usize) -> Vec<usize> { ops.to_vec() }
            fn atom_map(&self, op: usize) -> &[usize] { self.0.atom_map(op).as_slice() }
            fn cart_rot(&self, op: usize) -> M33 { *self.0.cart_rot(op) }
        }

        let symmetry = NoOps(line_structure());
        match FirstAtomContext::new(&symmetry, 0, vec![]) {
            Err(crate::FitError::Configuration(_)) => {},
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("expected an error"),
        };
    }
}
