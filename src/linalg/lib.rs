/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

#[macro_use] extern crate log;

use ndarray::{Array, Array2, ArrayView2, ArrayBase, Ix2};

pub use crate::pinv::{
    pseudoinverse, PinvOptions, PinvError,
    PseudoInverse, PerMatrix, Batched, BatchPinvError,
};
mod pinv;

pub fn dot<A, B>(a: &A, b: &B) -> <A as ndarray::linalg::Dot<B>>::Output
where A: ndarray::linalg::Dot<B>
{ a.dot(b) }

pub use self::c_matrix::CMatrix;
mod c_matrix {
    use super::*;

    /// Owned, contiguous, C-order matrix data.
    ///
    /// Convenient for handing rows of data to routines that work on flat
    /// buffers, which tend to assume that one of the strides is equal to 1.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CMatrix<A = f64>(
        // invariant: .strides[1] == 1
        // invariant: .strides[0] == .cols()
        // invariant: .len() == product of dims
        Array2<A>
    );

    impl<A> CMatrix<A> {
        pub fn into_inner(self) -> Array2<A> { self.0 }
        pub fn c_order_data(&self) -> &[A] { self.0.as_slice().expect("(BUG) not c-order!!") }
        pub fn c_order_data_mut(&mut self) -> &mut [A] { self.0.as_slice_mut().expect("(BUG) not c-order!!") }

        /// Build from row-major data.
        ///
        /// # Panics
        ///
        /// Panics if `data.len() != rows * cols`.
        pub fn from_row_major(rows: usize, cols: usize, data: Vec<A>) -> Self {
            assert_eq!(data.len(), rows * cols, "row-major data has wrong length");
            CMatrix(Array::from_shape_vec((rows, cols), data).expect("(BUG) shape was checked"))
        }
    }

    impl CMatrix<f64> {
        pub fn zeros(rows: usize, cols: usize) -> Self {
            CMatrix(Array2::zeros((rows, cols)))
        }
    }

    impl<A> std::ops::Deref for CMatrix<A> {
        type Target = Array2<A>;

        fn deref(&self) -> &Self::Target { &self.0 }
    }

    impl<A, const N: usize> From<&[[A; N]]> for CMatrix<A>
    where A: Clone,
    {
        fn from(slice: &[[A; N]]) -> Self {
            let data = slice.iter().flat_map(|row| row.iter().cloned()).collect();
            CMatrix::from_row_major(slice.len(), N, data)
        }
    }

    // ergonomics / placebo
    impl<A, const N: usize> From<Vec<[A; N]>> for CMatrix<A>
    where A: Clone,
    {
        fn from(vec: Vec<[A; N]>) -> Self { (&vec[..]).into() }
    }

    impl<A: Clone> From<Array2<A>> for CMatrix<A> {
        fn from(arr: Array2<A>) -> Self {
            if arr.is_standard_layout() {
                CMatrix(arr)
            } else {
                arr.view().into()
            }
        }
    }

    impl<'a, A: Clone> From<ArrayView2<'a, A>> for CMatrix<A>
    {
        fn from(arr: ArrayView2<'a, A>) -> Self {
            let dim = arr.raw_dim();
            if let Some(data) = arr.as_slice() {
                CMatrix(Array::from_shape_vec(dim, data.to_vec()).expect("BUG"))
            } else {
                CMatrix(Array::from_shape_vec(dim, arr.iter().cloned().collect()).expect("BUG"))
            }
        }
    }

    impl<'a, A: Clone, S> From<&'a ArrayBase<S, Ix2>> for CMatrix<A>
    where S: ndarray::Data<Elem = A>,
    {
        fn from(arr: &'a ArrayBase<S, Ix2>) -> Self {
            arr.view().into()
        }
    }

    impl<A> From<CMatrix<A>> for Array2<A> {
        fn from(m: CMatrix<A>) -> Array2<A> { m.0 }
    }

    #[test]
    fn test_into_c_matrix() {
        let check = |arr: Array2<_>, expected| {
            let c_mat_ref = CMatrix::from(&arr);
            let c_mat_view = CMatrix::from(arr.view());
            let c_mat_own = CMatrix::from(arr);
            assert_eq!(c_mat_ref.c_order_data(), expected);
            assert_eq!(c_mat_view.c_order_data(), expected);
            assert_eq!(c_mat_own.c_order_data(), expected);
        };

        use ndarray::{Axis, ShapeBuilder};

        // exercise the standard layout code paths
        let arr = Array::from_shape_vec((2, 3), vec![00, 01, 02, 10, 11, 12]).unwrap();
        assert!(arr.is_standard_layout());
        assert!(arr.as_slice().is_some());
        check(arr, &[00, 01, 02, 10, 11, 12]);

        // non-standard layout but contiguous (`to_owned()` would burn us here)
        let arr = Array::from_shape_vec((2, 3).f(), vec![00, 10, 01, 11, 02, 12]).unwrap();
        assert!(!arr.is_standard_layout());
        assert!(arr.as_slice().is_none());
        check(arr, &[00, 01, 02, 10, 11, 12]);

        // non-standard layout, non-contiguous
        let mut arr = Array::from_shape_vec((2, 4), vec![03, 00, 01, 02, 13, 10, 11, 12]).unwrap();
        arr.slice_axis_inplace(Axis(1), (1..).into()); // O_o discontiguous owned arrays are a thing
        check(arr, &[00, 01, 02, 10, 11, 12]);

        // rows of arrays
        let rows = vec![[00, 01, 02], [10, 11, 12]];
        assert_eq!(CMatrix::from(rows).c_order_data(), &[00, 01, 02, 10, 11, 12]);
    }
}
