/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::dataset::DisplacementDataset;
use crate::design::{DesignMatrixBuilder, FirstAtomContext, FlatBuilder, NestedBuilder};
use crate::distribute::{Fc4Distributor, SpaceGroupDistributor};
use crate::errors::FitResult;
use crate::extract::TensorExtractor;
use crate::reconstruct::SampleReconstructor;
use crate::solve::BatchedSolver;
use crate::store::{FitOutput, TensorStore};
use crate::symmetry::SymmetryProvider;

use fc4fit_config::{Backend, Settings, ValidatedSettings};
use fc4fit_linalg::PinvOptions;
use fc4fit_structure::Coords;
use rayon_cond::CondIterator;

/// A fourth-order force constant fit over one supercell.
///
/// Construction validates the inputs; [`run`] does all of the work and is
/// the only way to obtain results.
///
/// [`run`]: Fc4Fit::run
pub struct Fc4Fit<'a> {
    coords: Coords,
    dataset: DisplacementDataset,
    symmetry: &'a dyn SymmetryProvider,
    settings: Settings,
    distributor: Box<dyn Fc4Distributor + 'a>,
}

impl<'a> Fc4Fit<'a> {
    pub fn new(
        coords: Coords,
        dataset: DisplacementDataset,
        symmetry: &'a dyn SymmetryProvider,
        settings: ValidatedSettings,
    ) -> FitResult<Self>
    {
        let ValidatedSettings(settings) = settings;

        let num_atoms = coords.num_atoms();
        if symmetry.num_atoms() != num_atoms {
            return Err(config_error!(
                "symmetry describes {} atoms, but the structure has {}",
                symmetry.num_atoms(), num_atoms,
            ));
        }
        dataset.validate(num_atoms)?;

        if symmetry.tolerance() != settings.symprec {
            warn!(
                "symmetry was built with tolerance {:e}, but symprec is {:e}",
                symmetry.tolerance(), settings.symprec,
            );
        }

        let distributor = Box::new(SpaceGroupDistributor {
            parallel: settings.threading.is_parallel(),
        });
        Ok(Fc4Fit { coords, dataset, symmetry, settings, distributor })
    }

    /// Replace the strategy used to fill in first atoms that were not displaced.
    pub fn with_distributor(mut self, distributor: Box<dyn Fc4Distributor + 'a>) -> Self
    { self.distributor = distributor; self }

    pub fn coords(&self) -> &Coords
    { &self.coords }

    pub fn dataset(&self) -> &DisplacementDataset
    { &self.dataset }

    pub fn settings(&self) -> &Settings
    { &self.settings }

    /// Reconstruct the sample grids of every dataset entry for one first atom.
    pub fn first_atom_context(&self, first: usize) -> FitResult<FirstAtomContext<'a>>
    {
        let reconstructor = SampleReconstructor::new(self.symmetry);
        let grids = self.dataset.entries_for(first).into_iter()
            .map(|entry| reconstructor.reconstruct(entry))
            .collect::<FitResult<Vec<_>>>()?;
        FirstAtomContext::new(self.symmetry, first, grids)
    }

    pub fn run(&self) -> FitResult<FitOutput>
    {
        let n = self.coords.num_atoms();
        let settings = &self.settings;
        let parallel = settings.threading.is_parallel();

        let builder: Box<dyn DesignMatrixBuilder> = match settings.backend {
            Backend::Generic => Box::new(NestedBuilder),
            Backend::Accelerated => Box::new(FlatBuilder),
        };
        let options = PinvOptions {
            rcond: settings.pinv_rcond,
            max_iterations: settings.svd_max_iterations,
        };
        let solver = BatchedSolver::new(settings.backend, options, parallel);
        let extractor = TensorExtractor;
        let mut store = TensorStore::new(n, settings.consistency_check);

        let sampled = self.dataset.unique_first_atoms();
        for (index, &first) in sampled.iter().enumerate() {
            info!("Fitting first atom {} ({} of {})", first, index + 1, sampled.len());
            let ctx = self.first_atom_context(first)?;
            debug!(
                "first atom {}: {} grids, {} samples, {} site operations",
                first, ctx.grids().len(), ctx.table().num_samples(), ctx.site_operations().len(),
            );

            for second in 0..n {
                debug!("first atom {}, second atom {}", first, second);

                let designs = CondIterator::new(0..n, parallel)
                    .map(|third| builder.design_matrix(&ctx, second, third))
                    .collect::<Vec<_>>();
                for (third, design) in designs.iter().enumerate() {
                    trace!(
                        "design matrix for ({}, {}, {}): {} x {}",
                        first, second, third, design.nrows(), design.ncols(),
                    );
                }

                let inverses = solver.inverses(first, second, &designs)?;
                let blocks = CondIterator::new(0..n, parallel)
                    .map(|third| {
                        let forces = builder.force_matrix(&ctx, second, third);
                        extractor.extract(&solver.solve(&inverses[third], &forces))
                    })
                    .collect::<Vec<_>>();

                for (third, blocks) in blocks.iter().enumerate() {
                    store.deposit(first, second, third, blocks);
                }
            }
        }

        self.distributor.distribute(store.fc4_mut(), &sampled, self.symmetry)?;
        Ok(store.into_output())
    }
}
