/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! The displacement dataset, as handed to the fit.
//!
//! The dataset is a tree: each displaced first atom carries a list of second
//! atom entries, each of which carries a list of third atom entries, and each
//! third atom entry carries the forces measured on every atom of the
//! supercell with all three displacements applied.
//!
//! Entries are keyed by atom index.  The same first atom (or the same second
//! atom under one first entry) may appear more than once with different
//! displacements.  Atoms that do not appear at all are filled in by symmetry.

use crate::errors::{FitResult};

use fc4fit_array_types::V3;
use itertools::Itertools;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplacementDataset {
    pub first_atoms: Vec<FirstAtomEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FirstAtomEntry {
    pub number: usize,
    pub displacement: V3,
    pub second_atoms: Vec<SecondAtomEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SecondAtomEntry {
    pub number: usize,
    pub displacement: V3,
    pub third_atoms: Vec<ThirdAtomEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThirdAtomEntry {
    pub number: usize,
    pub displacement: V3,
    /// Cartesian force on every atom of the supercell.
    pub forces: Vec<V3>,
}

impl DisplacementDataset {
    /// Distinct first atom indices, in ascending order.
    pub fn unique_first_atoms(&self) -> Vec<usize>
    {
        self.first_atoms.iter()
            .map(|e| e.number)
            .sorted()
            .dedup()
            .collect()
    }

    /// All entries for one first atom, in dataset order.
    pub fn entries_for(&self, first: usize) -> Vec<&FirstAtomEntry>
    { self.first_atoms.iter().filter(|e| e.number == first).collect() }

    /// Check the dataset against a supercell of `num_atoms` atoms.
    pub fn validate(&self, num_atoms: usize) -> FitResult<()>
    {
        if self.first_atoms.is_empty() {
            return Err(config_error!("the displacement dataset has no first atoms"));
        }

        let check_index = |what: &str, index: usize| match index < num_atoms {
            true => Ok(()),
            false => Err(config_error!("{} atom index {} is out of range for {} atoms", what, index, num_atoms)),
        };
        let check_disp = |what: &str, index: usize, disp: &V3| match disp.is_finite() {
            true => Ok(()),
            false => Err(config_error!("non-finite displacement for {} atom {}: {:?}", what, index, disp)),
        };

        for first in &self.first_atoms {
            check_index("first", first.number)?;
            check_disp("first", first.number, &first.displacement)?;
            if first.second_atoms.is_empty() {
                return Err(config_error!("first atom {} has no second atom entries", first.number));
            }

            for second in &first.second_atoms {
                check_index("second", second.number)?;
                check_disp("second", second.number, &second.displacement)?;
                if second.third_atoms.is_empty() {
                    return Err(config_error!(
                        "second atom {} (under first atom {}) has no third atom entries",
                        second.number, first.number,
                    ));
                }

                for third in &second.third_atoms {
                    check_index("third", third.number)?;
                    check_disp("third", third.number, &third.displacement)?;
                    if third.forces.len() != num_atoms {
                        return Err(config_error!(
                            "forces for atoms ({}, {}, {}) have length {}, but there are {} atoms",
                            first.number, second.number, third.number, third.forces.len(), num_atoms,
                        ));
                    }
                    if !third.forces.iter().all(|f| f.is_finite()) {
                        return Err(config_error!(
                            "non-finite force for atoms ({}, {}, {})",
                            first.number, second.number, third.number,
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}
