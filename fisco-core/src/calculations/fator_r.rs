//! Fator R classification.
//!
//! Service activities in the annex III/V pair are taxed by Annex III when
//! the trailing-twelve-month payroll reaches 28% of trailing revenue, and
//! by Annex V otherwise. The threshold and the pairing are statutory
//! constants; they change by legislation, not by computation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::Anexo;

/// Payroll-to-revenue ratio at which the favorable annex applies.
pub const FATOR_R_THRESHOLD: Decimal = dec!(0.28);

/// Annex applied when the ratio meets the threshold.
pub const FATOR_R_FAVORABLE: Anexo = Anexo::III;

/// Annex applied when the ratio falls short.
pub const FATOR_R_UNFAVORABLE: Anexo = Anexo::V;

/// Trailing-twelve-month totals for the ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatorRInput {
    pub payroll_12_months: Decimal,
    pub gross_revenue_12_months: Decimal,
}

impl FatorRInput {
    /// The payroll-to-revenue ratio, zero when there is no revenue.
    pub fn ratio(&self) -> Decimal {
        payroll_ratio(self.payroll_12_months, self.gross_revenue_12_months)
    }
}

/// Computes `payroll / revenue`, guarded: zero or negative revenue yields a
/// ratio of zero (which classifies to the unfavorable annex).
pub fn payroll_ratio(
    payroll_12_months: Decimal,
    gross_revenue_12_months: Decimal,
) -> Decimal {
    if gross_revenue_12_months <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    payroll_12_months / gross_revenue_12_months
}

/// Resolves the annex that actually applies.
///
/// Only the III/V pair is subject to Fator R; every other annex passes
/// through unchanged.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fisco_core::calculations::fator_r::classify_annex;
/// use fisco_core::models::Anexo;
///
/// assert_eq!(classify_annex(Anexo::V, dec!(0.28)), Anexo::III);
/// assert_eq!(classify_annex(Anexo::V, dec!(0.27)), Anexo::V);
/// assert_eq!(classify_annex(Anexo::I, dec!(0.50)), Anexo::I);
/// ```
pub fn classify_annex(
    default_annex: Anexo,
    ratio: Decimal,
) -> Anexo {
    match default_annex {
        Anexo::III | Anexo::V => {
            if ratio >= FATOR_R_THRESHOLD {
                FATOR_R_FAVORABLE
            } else {
                FATOR_R_UNFAVORABLE
            }
        }
        other => other,
    }
}
