/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

// Recovery of known force constants from forces generated by a polynomial model.
//
// There is no symmetry besides the identity, so every first atom is
// displaced and every entry lists every second and third atom.  Each
// displacement triple is random, which gives the design matrices their
// largest possible rank.

mod shared;

use fc4fit::{
    Backend, Coords, Fc4Fit, FitOutput, FracOp, Lattice, Settings, Symmetry, Threading, V3,
    DisplacementDataset, FirstAtomEntry, SecondAtomEntry, ThirdAtomEntry,
};
use fc4fit_array_types::vee;
use fc4fit_assert_close::assert_close;
use ndarray::{Array, Array4, Array6, ArrayD, Dimension, IxDyn, ShapeBuilder};
use rand::Rng;

const NUM_ATOMS: usize = 2;
const ENTRIES_PER_ATOM: usize = 260;

fn random_array<D, Sh>(rng: &mut impl Rng, shape: Sh) -> Array<f64, D>
where D: Dimension, Sh: ShapeBuilder<Dim = D>,
{ Array::from_shape_fn(shape, |_| rng.gen_range(-1.0..1.0)) }

/// Forces are `-(L u1 + P u3 + T u2 u3 + Q u1 u2 u3)`, with the tensors
/// indexed like the fit output.
struct PolynomialModel {
    // [first, fourth, a, d]
    linear: Array4<f64>,
    // [third, fourth, a, d]
    fc2: Array4<f64>,
    // [second, third, fourth, a, b, d]
    fc3: Array6<f64>,
    // [first, second, third, fourth, a, b, c, d]
    fc4: ArrayD<f64>,
}

impl PolynomialModel {
    fn random(rng: &mut impl Rng, n: usize) -> Self {
        PolynomialModel {
            linear: random_array(rng, (n, n, 3, 3)),
            fc2: random_array(rng, (n, n, 3, 3)),
            fc3: random_array(rng, (n, n, n, 3, 3, 3)),
            fc4: random_array(rng, IxDyn(&[n, n, n, n, 3, 3, 3, 3])),
        }
    }

    fn forces(&self, [i, j, k]: [usize; 3], [u1, u2, u3]: [V3; 3]) -> Vec<V3> {
        let n = self.fc2.shape()[0];
        (0..n).map(|l| vee::from_fn(|d| {
            let mut total = 0.0;
            for a in 0..3 {
                total += self.linear[[i, l, a, d]] * u1[a];
                total += self.fc2[[k, l, a, d]] * u3[a];
                for b in 0..3 {
                    total += self.fc3[[j, k, l, a, b, d]] * u2[a] * u3[b];
                    for c in 0..3 {
                        total += self.fc4[&[i, j, k, l, a, b, c, d][..]] * u1[a] * u2[b] * u3[c];
                    }
                }
            }
            -total
        })).collect()
    }
}

fn dense_dataset(rng: &mut impl Rng, model: &PolynomialModel) -> DisplacementDataset {
    let n = NUM_ATOMS;
    let mut first_atoms = vec![];
    for first in 0..n {
        for _ in 0..ENTRIES_PER_ATOM {
            let u1 = shared::random_v3(rng, 1.0);
            let second_atoms = (0..n).map(|second| {
                let u2 = shared::random_v3(rng, 1.0);
                let third_atoms = (0..n).map(|third| {
                    let u3 = shared::random_v3(rng, 1.0);
                    ThirdAtomEntry {
                        number: third,
                        displacement: u3,
                        forces: model.forces([first, second, third], [u1, u2, u3]),
                    }
                }).collect();
                SecondAtomEntry { number: second, displacement: u2, third_atoms }
            }).collect();
            first_atoms.push(FirstAtomEntry { number: first, displacement: u1, second_atoms });
        }
    }
    DisplacementDataset { first_atoms }
}

fn structure() -> (Coords, Symmetry) {
    let coords = Coords::new(Lattice::cubic(4.0), vec![
        V3([0.0, 0.0, 0.0]),
        V3([0.25, 0.5, 0.75]),
    ]);
    let symmetry = Symmetry::new(coords.clone(), vec![FracOp::eye()], 1e-5).unwrap();
    (coords, symmetry)
}

fn fit(backend: Backend, threading: Threading, dataset: DisplacementDataset) -> FitOutput {
    let (coords, symmetry) = structure();
    let settings = Settings { backend, threading, ..Settings::default() }.validate().unwrap();
    let output = Fc4Fit::new(coords, dataset, &symmetry, settings).unwrap().run().unwrap();
    output
}

fn check_recovery(model: &PolynomialModel, output: &FitOutput) {
    assert_eq!(output.num_atoms(), NUM_ATOMS);
    assert_close!(abs=1e-8, output.fc2(), &model.fc2);
    assert_close!(abs=1e-8, output.fc3(), &model.fc3);
    assert_close!(abs=1e-8, output.fc4(), &model.fc4);
}

#[test]
fn recovers_tensors_accelerated() {
    shared::init_logger();
    let mut rng = rand::thread_rng();
    let model = PolynomialModel::random(&mut rng, NUM_ATOMS);
    let dataset = dense_dataset(&mut rng, &model);

    let output = fit(Backend::Accelerated, Threading::Rayon, dataset);
    check_recovery(&model, &output);
}

#[test]
fn recovers_tensors_generic() {
    shared::init_logger();
    let mut rng = rand::thread_rng();
    let model = PolynomialModel::random(&mut rng, NUM_ATOMS);
    let dataset = dense_dataset(&mut rng, &model);

    let output = fit(Backend::Generic, Threading::Serial, dataset);
    check_recovery(&model, &output);
}
