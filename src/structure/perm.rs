/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

/// Represents a reordering operation on atoms.
///
/// `vec.permuted_by(&perm)[i] == vec[perm[i]]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Perm(Vec<usize>);

#[derive(Debug, thiserror::Error)]
#[error("Tried to construct an invalid permutation.")]
pub struct BadPermError;

impl Perm {
    pub fn eye(n: usize) -> Perm
    { Perm((0..n).collect()) }

    pub fn len(&self) -> usize
    { self.0.len() }

    pub fn is_empty(&self) -> bool
    { self.0.is_empty() }

    /// This performs O(n log n) validation on the data
    /// to verify that it satisfies the invariants of Perm.
    pub fn from_vec(vec: Vec<usize>) -> Result<Perm, BadPermError>
    {Ok({
        if !Self::validate_perm(&vec) {
            return Err(BadPermError);
        }
        Perm(vec)
    })}

    fn validate_perm(xs: &[usize]) -> bool
    {
        let mut vec = xs.to_vec();
        vec.sort_unstable();
        vec.into_iter().eq(0..xs.len())
    }

    #[cfg(test)]
    pub(crate) fn random(n: usize) -> Perm
    {
        use rand::seq::SliceRandom;

        let mut perm: Vec<_> = (0..n).collect();
        perm.shuffle(&mut rand::thread_rng());
        Perm(perm)
    }

    pub fn into_vec(self) -> Vec<usize>
    { self.0 }

    pub fn as_slice(&self) -> &[usize]
    { &self.0 }

    pub fn inverted(&self) -> Perm
    { argsort(&self.0) }

    /// Flipped group operator.
    ///
    /// `x.permuted_by(a).permuted_by(b) == x.permuted_by(a.then(b))`.
    pub fn then(&self, other: &Perm) -> Perm
    { self.clone().permuted_by(other) }

    /// Conventional group operator.
    pub fn of(&self, other: &Perm) -> Perm
    { other.then(self) }
}

impl std::ops::Index<usize> for Perm {
    type Output = usize;

    #[inline]
    fn index(&self, i: usize) -> &usize
    { &self.0[i] }
}

/// The permutation that sorts a sequence.
///
/// The output will satisfy `xs.permuted_by(&argsort(xs))` is sorted.
pub fn argsort<T: Ord>(xs: &[T]) -> Perm
{
    let mut perm: Vec<usize> = (0..xs.len()).collect();
    perm.sort_by(|&a, &b| xs[a].cmp(&xs[b]));
    Perm(perm)
}

pub trait Permute: Sized {
    // awkward name, but it makes it makes two things clear
    // beyond a shadow of a doubt:
    // - The receiver gets permuted, not the argument.
    //   (relevant when Self is Perm)
    // - The permutation is not in-place.
    fn permuted_by(self, perm: &Perm) -> Self;
}

impl<T> Permute for Vec<T> {
    fn permuted_by(self, perm: &Perm) -> Vec<T>
    {
        assert_eq!(self.len(), perm.0.len(),
            "Incorrect permutation length: {} vs {}",
            self.len(), perm.0.len());

        let mut slots: Vec<Option<T>> = self.into_iter().map(Some).collect();
        perm.0.iter()
            .map(|&from| slots[from].take().expect("(BUG) perm visited an index twice"))
            .collect()
    }
}

impl Permute for Perm {
    fn permuted_by(self, perm: &Perm) -> Perm
    { Perm(self.0.permuted_by(perm)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perm_inverse()
    {
        let perm = Perm::random(20);
        let inv = perm.inverted();

        assert_eq!(perm.clone().permuted_by(&inv), Perm::eye(20));
        assert_eq!(inv.permuted_by(&perm), Perm::eye(20));
    }

    #[test]
    fn invalid_perm() {
        assert!(Perm::from_vec(vec![0, 1, 3, 3]).is_err());
        assert!(Perm::from_vec(vec![1, 2, 3]).is_err());
        assert!(Perm::from_vec(vec![1, 2, 0]).is_ok());
    }

    #[test]
    #[should_panic(expected = "permutation length")]
    fn wrong_length() {
        let _ = vec![1, 2, 3].permuted_by(&Perm::eye(2));
    }

    #[test]
    fn permute_associativity()
    {
        let xy = Perm::from_vec(vec![1, 0, 2]).unwrap();
        let zx = Perm::from_vec(vec![2, 1, 0]).unwrap();
        let xyzx = Perm::from_vec(vec![2, 0, 1]).unwrap();
        assert_eq!(xy.then(&zx), xyzx);
        assert_eq!(zx.of(&xy), xyzx);
        assert_eq!(
            vec![0, 1, 2].permuted_by(&xy).permuted_by(&zx),
            vec![0, 1, 2].permuted_by(&xyzx),
        );
    }
}
