//! Simples Nacional monthly DAS calculation.
//!
//! The trailing-twelve-month revenue (RBT12) selects a bracket in the
//! activity's annex; the bracket's nominal rate and deduction produce the
//! smoothed effective rate, which is applied to the month's revenue.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fisco_core::calculations::das::{DasCalculator, DasInput};
//! use fisco_core::models::Anexo;
//! use fisco_core::tables::FiscalTables;
//!
//! let tables = FiscalTables::year_2025();
//! let calculator = DasCalculator::new(&tables);
//!
//! let result = calculator
//!     .calculate(&DasInput {
//!         rbt12: dec!(360000),
//!         monthly_revenue: dec!(30000),
//!         anexo: Anexo::I,
//!         fator_r: None,
//!     })
//!     .unwrap();
//!
//! assert!(!result.ineligible);
//! assert_eq!(result.effective_rate, dec!(0.0565));
//! assert_eq!(result.das_amount, dec!(1695.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::round_half_up;
use crate::calculations::fator_r::{FatorRInput, classify_annex};
use crate::calculations::schedule::{effective_rate, resolve_bracket};
use crate::models::{Anexo, ScheduleError};
use crate::tables::FiscalTables;

/// Errors for invalid required inputs or malformed tables. Exceeding the
/// regime ceiling is NOT here: that is a domain outcome, reported on
/// [`DasResult::ineligible`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DasError {
    #[error("RBT12 must be non-negative, got {0}")]
    InvalidRbt12(Decimal),

    #[error("monthly revenue must be non-negative, got {0}")]
    InvalidMonthlyRevenue(Decimal),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DasInput {
    /// Trailing-twelve-month gross revenue.
    pub rbt12: Decimal,
    /// Revenue of the month being taxed.
    pub monthly_revenue: Decimal,
    /// Default annex for the activity (from the CNAE directory).
    pub anexo: Anexo,
    /// Present when the activity is Fator R-eligible; resolves the III/V
    /// pair before bracket lookup.
    pub fator_r: Option<FatorRInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DasResult {
    /// RBT12 exceeded the regime's statutory ceiling; every amount is zero.
    pub ineligible: bool,
    /// Annex actually applied (after any Fator R reclassification).
    pub anexo: Anexo,
    pub bracket_lower: Decimal,
    pub bracket_upper: Option<Decimal>,
    pub nominal_rate: Decimal,
    pub deduction: Decimal,
    pub effective_rate: Decimal,
    /// Monthly DAS amount, rounded to centavos.
    pub das_amount: Decimal,
}

impl DasResult {
    /// Zero-valued result for revenue above the regime ceiling.
    fn ineligible(anexo: Anexo) -> Self {
        Self {
            ineligible: true,
            anexo,
            bracket_lower: Decimal::ZERO,
            bracket_upper: None,
            nominal_rate: Decimal::ZERO,
            deduction: Decimal::ZERO,
            effective_rate: Decimal::ZERO,
            das_amount: Decimal::ZERO,
        }
    }
}

/// Calculator for the monthly DAS over one fiscal year's tables.
#[derive(Debug, Clone)]
pub struct DasCalculator<'a> {
    tables: &'a FiscalTables,
}

impl<'a> DasCalculator<'a> {
    pub fn new(tables: &'a FiscalTables) -> Self {
        Self { tables }
    }

    /// Calculates the month's DAS.
    ///
    /// # Errors
    ///
    /// Returns [`DasError`] when a required revenue input is negative or
    /// the annex table is malformed. Revenue above the regime ceiling is a
    /// successful result with `ineligible` set.
    pub fn calculate(
        &self,
        input: &DasInput,
    ) -> Result<DasResult, DasError> {
        if input.rbt12 < Decimal::ZERO {
            return Err(DasError::InvalidRbt12(input.rbt12));
        }
        if input.monthly_revenue < Decimal::ZERO {
            return Err(DasError::InvalidMonthlyRevenue(input.monthly_revenue));
        }

        let anexo = match &input.fator_r {
            Some(fator_r) => classify_annex(input.anexo, fator_r.ratio()),
            None => input.anexo,
        };

        if input.rbt12 > self.tables.params.simples_revenue_ceiling {
            warn!(
                rbt12 = %input.rbt12,
                ceiling = %self.tables.params.simples_revenue_ceiling,
                "RBT12 above the Simples Nacional ceiling; reporting ineligible"
            );
            return Ok(DasResult::ineligible(anexo));
        }

        let schedule = self.tables.anexo(anexo);
        let bracket = resolve_bracket(schedule, input.rbt12)?;
        let rate = effective_rate(input.rbt12, bracket.rate, bracket.deduction);

        Ok(DasResult {
            ineligible: false,
            anexo,
            bracket_lower: bracket.lower,
            bracket_upper: bracket.upper,
            nominal_rate: bracket.rate,
            deduction: bracket.deduction,
            effective_rate: rate,
            das_amount: round_half_up(input.monthly_revenue * rate),
        })
    }
}
