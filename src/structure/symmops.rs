/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::Lattice;
use fc4fit_array_types::{V3, M33, mat};

/// A point group operation, in units of some lattice.
///
/// Acting on a fractional column vector, this is `x' = R x`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FracRot {
    /// This is the transpose of what one would
    /// typically think of as the "rotation matrix"
    ///
    /// Invariants:
    ///  - `abs(det(t)) == 1`
    t: M33<i32>,
}

/// A spacegroup operation, in units of some lattice.
///
/// Acting on a fractional column vector, this is `x' = R x + t`.
/// The translation is not reduced into the unit cell.
#[derive(Debug, Clone, PartialEq)]
pub struct FracOp {
    rot: FracRot,
    trans: V3,
}

impl Default for FracRot {
    fn default() -> Self
    { Self::eye() }
}

impl Default for FracOp {
    fn default() -> Self
    { Self::eye() }
}

impl From<FracRot> for FracOp {
    fn from(r: FracRot) -> Self
    { Self::new(&r, &V3::zero()) }
}

impl FracRot {
    pub fn eye() -> Self
    { Self { t: mat::eye() } }

    /// Construct from a matrix.
    ///
    /// The input should be a matrix `R` such that `X R^T ~ X`,
    /// where the rows of `X` are fractional positions.
    ///
    /// # Panics
    ///
    /// Panics if `R` is not unimodular.
    pub fn new(mat: &M33<i32>) -> FracRot
    {
        assert_eq!(mat.det().abs(), 1, "rotation is not unimodular: {:?}", mat);
        FracRot { t: mat.t() }
    }

    /// The matrix `R` that acts on fractional column vectors.
    pub fn matrix(&self) -> M33<i32>
    { self.t.t() }

    // transposed float matrix
    pub(crate) fn float_t(&self) -> M33
    { self.t.map(f64::from) }

    pub fn det(&self) -> i32
    { self.t.det() }

    /// The same operation in cartesian coordinates, as a matrix `S` that
    /// acts on cartesian column vectors.
    ///
    /// This is the similarity transform `L^T R L^-T`, where the rows of `L`
    /// are the lattice vectors.
    pub fn cart_rot(&self, lattice: &Lattice) -> M33
    {
        let cart_t = &(lattice.inverse_matrix() * &self.float_t()) * lattice.matrix();
        cart_t.t()
    }
}

impl FracRot {
    /// Flipped group operator.
    ///
    /// `a.then(b) == b.of(a)`.  The flipped order is more aligned
    /// with this library's generally row-centric design.
    pub fn then(&self, other: &FracRot) -> FracRot
    {
        // (since these are transposes, this is the natural order of application)
        FracRot { t: &self.t * &other.t }
    }

    /// Conventional group operator.
    pub fn of(&self, other: &FracRot) -> FracRot
    { other.then(self) }

    pub fn inverse(&self) -> FracRot
    {
        // the adjugate is the inverse up to a factor of the determinant,
        // which is its own inverse here
        FracRot { t: self.t.adjugate() * self.t.det() }
    }
}

impl FracRot {
    pub fn transform_frac(&self, frac: &V3) -> V3
    { *frac * &self.float_t() }

    pub fn transform_fracs(&self, fracs: &[V3]) -> Vec<V3>
    {
        let t = self.float_t();
        fracs.iter().map(|v| *v * &t).collect()
    }
}

impl<'a> From<&'a [[i32; 3]; 3]> for FracRot {
    fn from(m: &'a [[i32; 3]; 3]) -> Self
    { FracRot::new(&mat::from_array(*m)) }
}

impl FracOp {
    pub fn eye() -> Self
    { Self::new(&FracRot::eye(), &V3::zero()) }

    pub fn new(rot: &FracRot, trans: &V3) -> Self
    { FracOp { rot: rot.clone(), trans: *trans } }

    pub fn rot(&self) -> &FracRot
    { &self.rot }

    pub fn trans(&self) -> &V3
    { &self.trans }

    /// Flipped group operator.
    ///
    /// `a.then(b) == b.of(a)`.
    pub fn then(&self, other: &FracOp) -> FracOp
    {
        let rot = self.rot.then(&other.rot);
        let trans = other.rot.transform_frac(&self.trans) + other.trans;
        FracOp { rot, trans }
    }

    /// Conventional group operator.
    pub fn of(&self, other: &FracOp) -> FracOp
    { other.then(self) }

    pub fn inverse(&self) -> FracOp
    {
        let rot = self.rot.inverse();
        let trans = -rot.transform_frac(&self.trans);
        FracOp { rot, trans }
    }

    /// Test equality of translations modulo the lattice.
    pub fn approx_eq_mod_lattice(&self, other: &FracOp, tol: f64) -> bool
    {
        self.rot == other.rot && {
            let diff = self.trans - other.trans;
            diff.iter().all(|&x| (x - x.round()).abs() < tol)
        }
    }

    pub fn transform_frac(&self, frac: &V3) -> V3
    { self.rot.transform_frac(frac) + self.trans }

    pub fn transform_fracs(&self, fracs: &[V3]) -> Vec<V3>
    {
        let t = self.rot.float_t();
        fracs.iter().map(|v| *v * &t + self.trans).collect()
    }

    /// See [`FracRot::cart_rot`].
    pub fn cart_rot(&self, lattice: &Lattice) -> M33
    { self.rot.cart_rot(lattice) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc4fit_assert_close::assert_close;

    #[test]
    fn rot_transform()
    {
        let r = [
            [0, -1, 0],
            [1,  0, 0],
            [0,  0, 1],
        ];
        assert_eq!(
            FracRot::from(&r).transform_fracs(&[V3([1.0, 5.0, 7.0])]),
            vec![V3([-5.0, 1.0, 7.0])],
        );
    }

    #[test]
    fn two_transform()
    {
        // two operations that don't commute
        let xy = FracRot::from(&[
            [0, 1, 0],
            [1, 0, 0],
            [0, 0, 1],
        ]);
        let zx = FracRot::from(&[
            [0, 0, 1],
            [0, 1, 0],
            [1, 0, 0],
        ]);
        let xyzx = FracRot::from(&[
            [0, 0, 1],
            [1, 0, 0],
            [0, 1, 0],
        ]);
        // a structure that is sensitive to any permutations of the axes
        let prim = vec![V3([1., 2., 3.])];
        assert_eq!(xy.then(&zx), xyzx);
        assert_eq!(zx.of(&xy), xyzx);
        assert_eq!(
            zx.transform_fracs(&xy.transform_fracs(&prim)),
            xyzx.transform_fracs(&prim),
        );

        let xy = FracOp::new(&xy, &V3([0.5, 0.0, 0.0]));
        let zx = FracOp::new(&zx, &V3([0.0, 0.25, 0.0]));
        assert_eq!(
            zx.transform_fracs(&xy.transform_fracs(&prim)),
            xy.then(&zx).transform_fracs(&prim),
        );
    }

    #[test]
    fn inverse_undoes()
    {
        let op = FracOp::new(
            &FracRot::from(&[
                [ 0,  1, 0],
                [-1,  1, 0],
                [ 0,  0, 1],
            ]),
            &V3([1./3., 2./3., 0.5]),
        );
        let x = V3([0.1, 0.2, 0.3]);
        assert_close!(abs=1e-12, op.inverse().transform_frac(&op.transform_frac(&x)), x);
        assert!(op.then(&op.inverse()).approx_eq_mod_lattice(&FracOp::eye(), 1e-12));
        assert_eq!(op.rot().inverse().then(op.rot()), FracRot::eye());
    }

    #[test]
    fn cart_rot_of_hexagonal_sixfold()
    {
        let s3 = f64::sqrt(3.0);
        let lattice = Lattice::from(&[
            [ 1.0,      0.0, 0.0],
            [-0.5, 0.5 * s3, 0.0],
            [ 0.0,      0.0, 1.6],
        ]);
        let sixfold = FracRot::from(&[
            [1, -1, 0],
            [1,  0, 0],
            [0,  0, 1],
        ]);
        let expected = mat::from_array([
            [     0.5, -0.5 * s3, 0.0],
            [0.5 * s3,       0.5, 0.0],
            [     0.0,       0.0, 1.0],
        ]);
        assert_close!(abs=1e-12, sixfold.cart_rot(&lattice), expected);

        // acting on a cartesian vector agrees with acting on its fractional form
        let frac = V3([0.3, -0.2, 0.7]);
        let via_cart = &sixfold.cart_rot(&lattice) * (frac * &lattice);
        let via_frac = sixfold.transform_frac(&frac) * &lattice;
        assert_close!(abs=1e-12, via_cart, via_frac);
    }
}
