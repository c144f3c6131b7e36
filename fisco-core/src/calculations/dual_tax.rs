//! IBS/CBS dual-VAT rate decomposition.
//!
//! The reformed consumption tax is quoted as one ad-valorem rate and
//! collected as two sub-taxes: IBS (subnational) takes 61% of the rate and
//! CBS (federal) the remaining 39%. The IBS amount is then shared equally
//! between state and municipality. All three ratios are statutory
//! constants.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// IBS portion of the combined rate.
pub const IBS_SHARE: Decimal = dec!(0.61);

/// CBS portion of the combined rate.
pub const CBS_SHARE: Decimal = dec!(0.39);

/// State (and, identically, municipality) portion of the IBS amount.
pub const IBS_STATE_SHARE: Decimal = dec!(0.50);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualTaxSplit {
    pub ibs_rate: Decimal,
    pub cbs_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IbsAllocation {
    pub state_share: Decimal,
    pub municipality_share: Decimal,
}

/// Splits a combined rate into its IBS and CBS sub-rates.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fisco_core::calculations::dual_tax::split_dual_tax;
///
/// let split = split_dual_tax(dec!(0.265));
///
/// assert_eq!(split.ibs_rate, dec!(0.16165));
/// assert_eq!(split.cbs_rate, dec!(0.10335));
/// assert_eq!(split.ibs_rate + split.cbs_rate, dec!(0.265));
/// ```
pub fn split_dual_tax(total_rate: Decimal) -> DualTaxSplit {
    DualTaxSplit {
        ibs_rate: total_rate * IBS_SHARE,
        cbs_rate: total_rate * CBS_SHARE,
    }
}

/// Shares an IBS amount equally between state and municipality.
pub fn split_ibs(ibs_amount: Decimal) -> IbsAllocation {
    let state_share = ibs_amount * IBS_STATE_SHARE;
    IbsAllocation {
        state_share,
        municipality_share: state_share,
    }
}
