/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

#![allow(non_snake_case)]

use serde::{Serialize, Deserialize, de};

/// Root settings object.
///
/// This is what you should deserialize.
#[derive(Serialize)]
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSettings(pub Settings);

/// Raw deserialized form of settings.
///
/// You shouldn't deserialize this type directly; deserialize `ValidatedSettings` instead,
/// so that additional validation can be performed.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Tolerance used when matching atom positions under symmetry operations,
    /// and when testing whether an operation preserves a displacement direction.
    #[serde(default = "_settings__symprec")]
    pub symprec: f64,

    /// Singular values of a design matrix below this fraction of the largest
    /// singular value are treated as zero by the pseudoinverse.
    #[serde(default = "_settings__pinv_rcond")]
    pub pinv_rcond: f64,

    /// Iteration limit for the SVD behind the pseudoinverse.  `0` means no limit.
    #[serde(default)]
    pub svd_max_iterations: usize,

    #[serde(default)]
    pub backend: Backend,

    #[serde(default)]
    pub threading: Threading,

    /// When set, repeated writes to the same second- or third-order tensor
    /// block are compared, and differences beyond this absolute tolerance
    /// produce a warning.
    ///
    /// Defaults to `1e-6` in debug builds and to `~` in release builds.
    #[serde(default = "_settings__consistency_check")]
    pub consistency_check: Option<f64>,

    /// Distribute the second- and third-order tensors to all atoms using
    /// the full (9- and 27-term) product basis.
    ///
    /// Not implemented; `true` fails validation.
    #[serde(default)]
    pub lower_order_distribution: bool,
}
derive_yaml_read!{Settings}
derive_yaml_read!{ValidatedSettings}

fn _settings__symprec() -> f64 { 1e-5 }
fn _settings__pinv_rcond() -> f64 { 1e-13 }
fn _settings__consistency_check() -> Option<f64> {
    match cfg!(debug_assertions) {
        true => Some(1e-6),
        false => None,
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            symprec: _settings__symprec(),
            pinv_rcond: _settings__pinv_rcond(),
            svd_max_iterations: 0,
            backend: Default::default(),
            threading: Default::default(),
            consistency_check: _settings__consistency_check(),
            lower_order_distribution: false,
        }
    }
}

impl Default for ValidatedSettings {
    fn default() -> Self { ValidatedSettings(Settings::default()) }
}

impl<'de> de::Deserialize<'de> for ValidatedSettings {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cereal: Settings = de::Deserialize::deserialize(deserializer)?;

        cereal.validate().map_err(de::Error::custom)
    }
}

/// How design matrices are assembled and inverted.
///
/// Both produce the same numbers up to rounding.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Nested iteration over the sample grid, and one pseudoinverse per matrix.
    Generic,

    /// Assembly from the flattened displacement table, and batched pseudoinverses.
    Accelerated,
}

impl Default for Backend {
    fn default() -> Self { Backend::Accelerated }
}

/// A high-level control of how multiple cores are used.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Threading {
    /// Everything runs on the calling thread.
    Serial,

    /// Work for the third atoms of each pair is spread over the rayon thread pool.
    Rayon,
}

impl Default for Threading {
    fn default() -> Self { Threading::Rayon }
}

impl Threading {
    pub fn is_parallel(self) -> bool { self == Threading::Rayon }
}
