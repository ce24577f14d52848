/* ************************************************************************ **
** This file is part of fc4fit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Checks performed on settings after deserialization.

use crate::config::*;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{name} must be positive and finite (got {value})")]
    NotPositive { name: &'static str, value: f64 },

    #[error("\
        lower-order-distribution is not implemented. Only the fourth-order \
        tensor is distributed to atoms that were not displaced.\
    ")]
    LowerOrderDistribution,
}

impl Settings {
    pub fn validate(self) -> Result<ValidatedSettings, ValidationError> {
        check_positive("symprec", self.symprec)?;
        check_positive("pinv-rcond", self.pinv_rcond)?;
        if let Some(tol) = self.consistency_check {
            check_positive("consistency-check", tol)?;
        }
        if self.lower_order_distribution {
            return Err(ValidationError::LowerOrderDistribution);
        }

        Ok(ValidatedSettings(self))
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ValidationError> {
    match value.is_finite() && value > 0.0 {
        true => Ok(()),
        false => Err(ValidationError::NotPositive { name, value }),
    }
}
