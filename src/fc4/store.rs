/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::extract::ExtractedBlocks;

use ndarray::{s, Array4, Array6, ArrayD, ArrayView2, ArrayView3, ArrayView4, ArrayViewD, Axis, Ix4, IxDyn};

/// Dense output tensors, written as the fit proceeds.
///
/// * `fc2`: `(N, N, 3, 3)`, indexed by `[third, fourth]`
/// * `fc3`: `(N, N, N, 3, 3, 3)`, indexed by `[second, third, fourth]`
/// * `fc4`: `(N, N, N, N, 3, 3, 3, 3)`, indexed by `[first, second, third, fourth]`
///
/// The pair and triplet slots are shared between first atoms (and the pair
/// slots between second atoms); the last write wins.  Symmetry is expected to
/// make these writes agree, and with a consistency tolerance set, writes that
/// disagree are reported with `warn!`.
pub struct TensorStore {
    num_atoms: usize,
    fc2: Array4<f64>,
    fc3: Array6<f64>,
    fc4: ArrayD<f64>,
    fc2_written: Vec<bool>,
    fc3_written: Vec<bool>,
    consistency_check: Option<f64>,
}

fn max_abs_diff<'a>(a: impl IntoIterator<Item = &'a f64>, b: impl IntoIterator<Item = &'a f64>) -> f64
{ a.into_iter().zip(b).map(|(a, b)| (a - b).abs()).fold(0.0, f64::max) }

impl TensorStore {
    pub fn new(num_atoms: usize, consistency_check: Option<f64>) -> Self
    {
        let n = num_atoms;
        TensorStore {
            num_atoms,
            fc2: Array4::zeros((n, n, 3, 3)),
            fc3: Array6::zeros((n, n, n, 3, 3, 3)),
            fc4: ArrayD::zeros(IxDyn(&[n, n, n, n, 3, 3, 3, 3])),
            fc2_written: vec![false; n],
            fc3_written: vec![false; n * n],
            consistency_check,
        }
    }

    pub fn num_atoms(&self) -> usize
    { self.num_atoms }

    /// Write the blocks solved for `(first, second, third)`.
    pub fn deposit(&mut self, first: usize, second: usize, third: usize, blocks: &ExtractedBlocks)
    {
        let mut fc2 = self.fc2.index_axis_mut(Axis(0), third);
        if let (Some(tol), true) = (self.consistency_check, self.fc2_written[third]) {
            let diff = max_abs_diff(fc2.iter(), blocks.fc2.iter());
            if diff > tol {
                warn!(
                    "pair force constants of atom {} changed by {:e} when rewritten from atoms ({}, {})",
                    third, diff, first, second,
                );
            }
        }
        fc2.assign(&blocks.fc2);
        self.fc2_written[third] = true;

        let slot = second * self.num_atoms + third;
        let mut fc3 = self.fc3.index_axis_mut(Axis(0), second).index_axis_move(Axis(0), third);
        if let (Some(tol), true) = (self.consistency_check, self.fc3_written[slot]) {
            let diff = max_abs_diff(fc3.iter(), blocks.fc3.iter());
            if diff > tol {
                warn!(
                    "triplet force constants of atoms ({}, {}) changed by {:e} when rewritten from first atom {}",
                    second, third, diff, first,
                );
            }
        }
        fc3.assign(&blocks.fc3);
        self.fc3_written[slot] = true;

        self.fc4.index_axis_mut(Axis(0), first)
            .index_axis_move(Axis(0), second)
            .index_axis_move(Axis(0), third)
            .assign(&blocks.fc4);
    }

    /// `3 x 3` block coupling a displacement of `third` to the force on `fourth`.
    pub fn fc2_block(&self, third: usize, fourth: usize) -> ArrayView2<'_, f64>
    { self.fc2.slice(s![third, fourth, .., ..]) }

    pub fn fc3_block(&self, second: usize, third: usize, fourth: usize) -> ArrayView3<'_, f64>
    { self.fc3.slice(s![second, third, fourth, .., .., ..]) }

    pub fn fc4_block(&self, first: usize, second: usize, third: usize, fourth: usize) -> ArrayView4<'_, f64>
    { quartet_block(self.fc4.view(), [first, second, third, fourth]) }

    pub fn fc2(&self) -> &Array4<f64>
    { &self.fc2 }

    pub fn fc3(&self) -> &Array6<f64>
    { &self.fc3 }

    pub fn fc4(&self) -> &ArrayD<f64>
    { &self.fc4 }

    pub(crate) fn fc4_mut(&mut self) -> &mut ArrayD<f64>
    { &mut self.fc4 }

    pub fn into_output(self) -> FitOutput
    {
        let TensorStore { fc2, fc3, fc4, .. } = self;
        FitOutput { fc2, fc3, fc4 }
    }
}

pub(crate) fn quartet_block(fc4: ArrayViewD<'_, f64>, atoms: [usize; 4]) -> ArrayView4<'_, f64>
{
    atoms.iter()
        .fold(fc4, |view, &atom| view.index_axis_move(Axis(0), atom))
        .into_dimensionality::<Ix4>()
        .expect("(BUG) quartet tensor has the wrong number of axes")
}

/// The force constants produced by a successful fit.
///
/// Shapes are those documented on [`TensorStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutput {
    fc2: Array4<f64>,
    fc3: Array6<f64>,
    fc4: ArrayD<f64>,
}

impl FitOutput {
    pub fn num_atoms(&self) -> usize
    { self.fc2.shape()[0] }

    pub fn fc2(&self) -> &Array4<f64>
    { &self.fc2 }

    pub fn fc3(&self) -> &Array6<f64>
    { &self.fc3 }

    pub fn fc4(&self) -> &ArrayD<f64>
    { &self.fc4 }

    pub fn fc2_block(&self, third: usize, fourth: usize) -> ArrayView2<'_, f64>
    { self.fc2.slice(s![third, fourth, .., ..]) }

    pub fn fc3_block(&self, second: usize, third: usize, fourth: usize) -> ArrayView3<'_, f64>
    { self.fc3.slice(s![second, third, fourth, .., .., ..]) }

    pub fn fc4_block(&self, first: usize, second: usize, third: usize, fourth: usize) -> ArrayView4<'_, f64>
    { quartet_block(self.fc4.view(), [first, second, third, fourth]) }

    pub fn into_parts(self) -> (Array4<f64>, Array6<f64>, ArrayD<f64>)
    { (self.fc2, self.fc3, self.fc4) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, Array5};

    fn blocks(n: usize, value: f64) -> ExtractedBlocks {
        ExtractedBlocks {
            fc2: Array3::from_elem((n, 3, 3), value),
            fc3: Array4::from_elem((n, 3, 3, 3), value),
            fc4: Array5::from_elem((n, 3, 3, 3, 3), value),
        }
    }

    #[test]
    fn deposit_writes_the_right_slots() {
        let mut store = TensorStore::new(3, Some(1e-6));
        store.deposit(2, 0, 1, &blocks(3, 1.5));

        assert!(store.fc2_block(1, 2).iter().all(|&x| x == 1.5));
        assert!(store.fc2_block(0, 2).iter().all(|&x| x == 0.0));
        assert!(store.fc3_block(0, 1, 0).iter().all(|&x| x == 1.5));
        assert!(store.fc3_block(1, 0, 0).iter().all(|&x| x == 0.0));
        assert!(store.fc4_block(2, 0, 1, 2).iter().all(|&x| x == 1.5));
        assert!(store.fc4_block(0, 2, 1, 2).iter().all(|&x| x == 0.0));

        // 3 fourth atoms for one pair slot, one triplet slot, one quartet slot
        assert_eq!(store.fc2().sum(), 1.5 * 27.0);
        assert_eq!(store.fc3().sum(), 1.5 * 81.0);
        assert_eq!(store.fc4().sum(), 1.5 * 243.0);
    }

    #[test]
    fn last_write_wins() {
        let mut store = TensorStore::new(2, Some(1e-6));
        store.deposit(0, 1, 1, &blocks(2, 1.0));
        // disagrees, which only warns
        store.deposit(1, 0, 1, &blocks(2, 2.0));

        assert_eq!(store.fc2_block(1, 0)[[0, 0]], 2.0);
        assert_eq!(store.fc3_block(1, 1, 0)[[0, 0, 0]], 1.0);
        assert_eq!(store.fc3_block(0, 1, 0)[[0, 0, 0]], 2.0);

        let output = store.into_output();
        assert_eq!(output.num_atoms(), 2);
        assert_eq!(output.fc4_block(0, 1, 1, 1)[[2, 2, 2, 2]], 1.0);
        assert_eq!(output.fc4_block(1, 0, 1, 0)[[0, 1, 2, 0]], 2.0);
    }
}
