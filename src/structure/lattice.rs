/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use std::ops::{Mul, Div};
use std::sync::Arc;

use fc4fit_array_types::{V3, M33, M3, mat, inv};
use fc4fit_assert_close::{CheckClose, Tolerances, CheckCloseError};

/// Defines a vector basis for periodic boundary conditions in three dimensions.
///
/// A `Lattice` is something you multiply against fractional data to produce
/// cartesian data: `cart = frac * &lattice`, with fractional coordinates as
/// row vectors.  The inverse direction is written `cart / &lattice`.
#[derive(Debug, Clone)]
pub struct Lattice {
    matrix: Arc<M33>,
    inverse: Arc<M33>,
}

// Manual impl that doesn't compare the inverse.
impl PartialEq<Lattice> for Lattice {
    fn eq(&self, other: &Lattice) -> bool {
        let Lattice { ref matrix, inverse: _ } = *self;
        matrix == &other.matrix
    }
}

impl Lattice {
    /// Create a lattice from a matrix where the rows are lattice vectors.
    #[inline]
    pub fn new(matrix: &M33) -> Self {
        let inverse = Arc::new(inv(matrix));
        let matrix = Arc::new(*matrix);
        Self { matrix, inverse }
    }

    #[inline(always)]
    pub fn from_vectors(vectors: &[V3; 3]) -> Self {
        Self::new(&M3(*vectors))
    }

    /// Matrix where lattice vectors are rows.
    #[inline]
    pub fn matrix(&self) -> &M33
    { &self.matrix }

    /// Get the (precomputed) inverse of the matrix where lattice vectors are rows.
    #[inline]
    pub fn inverse_matrix(&self) -> &M33
    { &self.inverse }

    #[inline]
    pub fn vectors(&self) -> &[V3; 3]
    { &self.matrix().0 }

    pub fn norms(&self) -> [f64; 3]
    {
        let v = self.vectors();
        [v[0].norm(), v[1].norm(), v[2].norm()]
    }

    /// Get the (positive) volume of the lattice cell.
    pub fn volume(&self) -> f64
    { self.matrix().det().abs() }

    /// False for lattices with a vanishing or non-finite volume.
    pub fn is_invertible(&self) -> bool
    {
        let volume = self.volume();
        volume.is_finite() && volume > 0.0 && self.inverse.max_abs().is_finite()
    }
}

/// Helper constructors
impl Lattice {
    /// The identity lattice.
    #[inline]
    pub fn eye() -> Self { Self::cubic(1.0) }

    #[inline]
    pub fn diagonal(&[x, y, z]: &[f64; 3]) -> Self { Self::orthorhombic(x, y, z) }

    /// A cubic lattice ((a, a, a), (90, 90, 90))
    #[inline]
    pub fn cubic(a: f64) -> Self { Self::orthorhombic(a, a, a) }

    /// An orthorhombic lattice ((a, b, c), (90, 90, 90))
    #[inline]
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Self
    { Self::from(&[[a, 0., 0.], [0., b, 0.], [0., 0., c]]) }

    /// A random lattice with elements drawn uniformly from `[-max, max]`.
    ///
    /// These are rarely well-reduced, so don't feed them to anything that
    /// searches neighboring images.
    #[cfg(test)]
    pub(crate) fn random_uniform(max: f64) -> Self {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        Lattice::new(&mat::from_fn(|_, _| rng.gen_range(-max..=max)))
    }
}

/// Defaults to the identity matrix.
impl Default for Lattice {
    #[inline]
    fn default() -> Lattice { Lattice::eye() }
}

impl<'a> From<&'a [[f64; 3]; 3]> for Lattice {
    #[inline(always)]
    fn from(m: &'a [[f64; 3]; 3]) -> Self
    { Lattice::new(&mat::from_array(*m)) }
}

impl<'a, 'b> Mul<&'b Lattice> for &'a V3 {
    type Output = V3;

    fn mul(self, other: &'b Lattice) -> V3 {
        *self * other.matrix()
    }
}

impl<'b> Mul<&'b Lattice> for V3 {
    type Output = V3;

    fn mul(self, other: &'b Lattice) -> V3 {
        self * other.matrix()
    }
}

impl<'a, 'b> Div<&'b Lattice> for &'a V3 {
    type Output = V3;

    fn div(self, other: &'b Lattice) -> V3 {
        *self * other.inverse_matrix()
    }
}

impl<'b> Div<&'b Lattice> for V3 {
    type Output = V3;

    fn div(self, other: &'b Lattice) -> V3 {
        self * other.inverse_matrix()
    }
}

impl CheckClose for Lattice {
    fn check_close_from(&self, other: &Lattice, tol: Tolerances, start: usize) -> Result<usize, CheckCloseError> {
        self.matrix().check_close_from(other.matrix(), tol, start)
    }
}
