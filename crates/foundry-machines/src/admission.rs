use thiserror::Error;

use crate::tier::TierState;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum AdmissionRejected {
    #[error("recipe needs {required}/t, above the structure maximum of {max_rate}/t")]
    AboveMaxRate { required: u64, max_rate: u64 },
    #[error("recipe needs {required}/t, above the coil limit of {base_rate}/t")]
    AboveCoilBase { required: u64, base_rate: u64 },
}

/// Structural gate run before any energy is touched. Both ceilings must hold.
pub fn check_admission(required: u64, tier: &TierState) -> Result<(), AdmissionRejected> {
    if required > tier.max_rate {
        return Err(AdmissionRejected::AboveMaxRate {
            required,
            max_rate: tier.max_rate,
        });
    }
    if required > tier.base_rate {
        return Err(AdmissionRejected::AboveCoilBase {
            required,
            base_rate: tier.base_rate,
        });
    }
    Ok(())
}

#[inline]
pub fn is_admissible(required: u64, tier: &TierState) -> bool {
    check_admission(required, tier).is_ok()
}
