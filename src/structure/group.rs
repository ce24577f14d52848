/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Finite group helpers.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

// NOTE: There is no "group" trait.  Many groups depend on some form of
//       context, which is awkward to work into a trait but trivial to add
//       to a closure.

/// Generates a finite group from a non-empty set of generators.
///
/// The generators may contain duplicates or extraneous elements.
///
/// The order of the output is arbitrary, but consistent for
/// inputs that are related by a group isomorphism.
///
/// In line with the library's predominantly row-centric design,
/// `compose(a, b)` should perform *`a` followed by `b`*.
pub fn generate_finite_group<G>(
    generators: &[G],
    mut compose: impl FnMut(&G, &G) -> G,
) -> Vec<G>
where G: Hash + Eq + Clone,
{
    assert!(!generators.is_empty(), "empty groups do not exist!");

    let mut seen = HashSet::new();
    let mut out = vec![];

    let mut queue: VecDeque<_> = generators.iter().cloned().collect();

    while let Some(g) = queue.pop_front() {
        if seen.insert(g.clone()) {
            queue.extend(generators.iter().map(|h| compose(&g, h)));
            out.push(g);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FracRot;

    #[test]
    fn cubic_point_group() {
        let fourfold_z = FracRot::from(&[[0, -1, 0], [1, 0, 0], [0, 0, 1]]);
        let threefold = FracRot::from(&[[0, 0, 1], [1, 0, 0], [0, 1, 0]]);
        let inversion = FracRot::from(&[[-1, 0, 0], [0, -1, 0], [0, 0, -1]]);

        let group = generate_finite_group(
            &[fourfold_z, threefold, inversion],
            |a, b| a.then(b),
        );
        assert_eq!(group.len(), 48);
        assert!(group.contains(&FracRot::eye()));
        for g in &group {
            assert!(group.contains(&g.inverse()));
        }
    }

    #[test]
    fn cyclic() {
        let group = generate_finite_group(&[1u32], |a, b| (a + b) % 6);
        let mut sorted = group.clone();
        sorted.sort();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4, 5]);
    }
}
