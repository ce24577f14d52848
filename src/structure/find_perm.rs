/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Permutations induced by symmetry operations.

use crate::{Lattice, Coords, FracOp};
use crate::perm::{Perm, Permute, argsort};

use fc4fit_array_types::V3;
use ordered_float::OrderedFloat;

#[derive(Debug, thiserror::Error)]
pub enum PositionMatchError {
    #[error("positions are too dissimilar (no image found for atom {atom})")]
    NoMatch { atom: usize },
    #[error("multiple positions mapped to the same index")]
    DuplicateMatch,
}

/// Compute the atom map of every operator.
///
/// For each operator `g`, the output `rot_map` satisfies `rot_map[j] == i`
/// whenever `g` carries atom `i` onto (an image of) atom `j`.  In other words,
/// `rot_map[j]` is the atom whose data should be transformed by `g` to obtain
/// data for atom `j`.
///
/// Fails if any operator is not a symmetry of the structure.
pub fn atom_maps(
    coords: &Coords,
    ops: &[FracOp],
    tol: f64,
) -> Result<Vec<Perm>, PositionMatchError>
{ ops.iter().map(|op| atom_map(coords, op, tol)).collect() }

/// Compute the atom map of a single operator.  See [`atom_maps`].
pub fn atom_map(
    coords: &Coords,
    op: &FracOp,
    tol: f64,
) -> Result<Perm, PositionMatchError>
{
    let lattice = coords.lattice();
    let original = coords.fracs();
    let transformed = op.transform_fracs(original);

    // `perm[to] = from` where `from_fracs[from] ~ to_fracs[to]`,
    // so the transformed positions go on the "from" side.
    brute_force_with_sort_trick(lattice, &transformed, original, tol)
}

pub(crate) fn brute_force_with_sort_trick(
    lattice: &Lattice,
    from_fracs: &[V3],
    to_fracs: &[V3],
    tol: f64,
) -> Result<Perm, PositionMatchError>
{Ok({
    // Sort both sides by some measure which is likely to produce a small
    // maximum value of (sorted_rotated_index - sorted_original_index).
    // This reduces an O(n^2) search down to ~O(n).
    // (for O(n log n) work overall, including the sort)
    //
    // We sort by distance to the nearest bravais lattice point.
    let sort_by_lattice_distance = |fracs: &[V3]| {
        let fracs = fracs.iter().map(|v| *v - v.map(f64::round)).collect::<Vec<_>>();
        let keys = fracs.iter()
            .map(|v| OrderedFloat((v * lattice).norm()))
            .collect::<Vec<_>>();
        let perm = argsort(&keys);
        (perm.clone(), fracs.permuted_by(&perm))
    };

    let (perm_from, sorted_from) = sort_by_lattice_distance(from_fracs);
    let (perm_to, sorted_to) = sort_by_lattice_distance(to_fracs);

    let perm_between = brute_force_near_identity(
        lattice,
        &sorted_from[..],
        &sorted_to[..],
        tol,
    ).map_err(|e| match e {
        PositionMatchError::NoMatch { atom } => PositionMatchError::NoMatch { atom: perm_from[atom] },
        e => e,
    })?;

    // Compose all of the permutations for the full permutation.
    perm_from
        .permuted_by(&perm_between)
        .permuted_by(&perm_to.inverted())
})}

// Optimized for permutations near the identity.
// NOTE: Lattice must be reduced so that the voronoi cell fits
//       within the eight unit cells around the origin
fn brute_force_near_identity(
    lattice: &Lattice,
    from_fracs: &[V3],
    to_fracs: &[V3],
    tol: f64,
) -> Result<Perm, PositionMatchError>
{Ok({
    assert_eq!(from_fracs.len(), to_fracs.len());
    let n = from_fracs.len();

    const UNSET: usize = usize::MAX;
    assert!(n < UNSET);

    let mut perm = vec![UNSET; n];

    // optimization: Rather than filling the out vector in order,
    // we find where each index belongs (e.g. we place the 0, then
    // we place the 1, etc.).
    // Then we can track the first unassigned index.
    //
    // This works best if the permutation is close to the identity.
    // (more specifically, if the max value of 'out[i] - i' is small)
    let mut search_start = 0;

    'from: for from in 0..n {

        // Skip through things filled out of order.
        while search_start < n && perm[search_start] != UNSET {
            search_start += 1;
        }

        for to in search_start..n {
            if perm[to] != UNSET {
                continue;
            }

            let distance2 = {
                let diff = (from_fracs[from] - to_fracs[to]).map(|x| x - x.round());
                (diff * lattice).sqnorm()
            };
            if distance2 < tol * tol {
                perm[to] = from;
                continue 'from;
            }
        }
        return Err(PositionMatchError::NoMatch { atom: from });
    }

    if perm.iter().any(|&x| x == UNSET) {
        return Err(PositionMatchError::DuplicateMatch);
    }

    Perm::from_vec(perm).map_err(|_| PositionMatchError::DuplicateMatch)?
})}
