//! Payroll withholding: INSS contribution and IRRF income tax.
//!
//! INSS accumulates per band and clamps at the contribution cap; IRRF
//! subtracts the per-dependent deduction, matches a single band and clamps
//! at zero. The income-tax base is always the amount left after the
//! social-security contribution.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;
use crate::calculations::schedule::{cumulative_tax, single_band_tax};
use crate::models::ScheduleError;
use crate::tables::FiscalTables;

/// Breakdown of the withholding applied to one gross amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingResult {
    pub gross: Decimal,
    pub inss: Decimal,
    /// Income-tax base: gross minus INSS (the dependent deduction is
    /// applied inside the IRRF band lookup).
    pub irrf_base: Decimal,
    pub irrf: Decimal,
    pub total: Decimal,
}

/// Withholding calculator over one fiscal year's tables.
#[derive(Debug, Clone)]
pub struct WithholdingCalculator<'a> {
    tables: &'a FiscalTables,
}

impl<'a> WithholdingCalculator<'a> {
    pub fn new(tables: &'a FiscalTables) -> Self {
        Self { tables }
    }

    /// Monthly INSS contribution on `base`, rounded, capped.
    pub fn inss(
        &self,
        base: Decimal,
    ) -> Decimal {
        round_half_up(cumulative_tax(&self.tables.inss, base))
    }

    /// Monthly IRRF on `base` with `dependents` deductions, rounded,
    /// never negative.
    pub fn irrf(
        &self,
        base: Decimal,
        dependents: u32,
    ) -> Result<Decimal, ScheduleError> {
        let deduction = self.tables.params.irrf_dependent_deduction * Decimal::from(dependents);
        let adjusted = base - deduction;
        Ok(round_half_up(single_band_tax(&self.tables.irrf, adjusted)?))
    }

    /// INSS then IRRF on what remains, per the statutory ordering.
    pub fn combined(
        &self,
        gross: Decimal,
        dependents: u32,
    ) -> Result<WithholdingResult, ScheduleError> {
        let inss = self.inss(gross);
        let irrf_base = (gross - inss).max(Decimal::ZERO);
        let irrf = self.irrf(irrf_base, dependents)?;

        Ok(WithholdingResult {
            gross,
            inss,
            irrf_base,
            irrf,
            total: inss + irrf,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // inss tests
    // =========================================================================

    #[test]
    fn inss_accumulates_across_bands() {
        let tables = FiscalTables::year_2025();
        let calculator = WithholdingCalculator::new(&tables);

        assert_eq!(calculator.inss(dec!(3000)), dec!(253.41));
    }

    #[test]
    fn inss_caps_above_ceiling() {
        let tables = FiscalTables::year_2025();
        let calculator = WithholdingCalculator::new(&tables);

        assert_eq!(calculator.inss(dec!(10000)), dec!(951.01));
        assert_eq!(calculator.inss(dec!(100000)), dec!(951.01));
    }

    #[test]
    fn inss_zero_base_owes_nothing() {
        let tables = FiscalTables::year_2025();
        let calculator = WithholdingCalculator::new(&tables);

        assert_eq!(calculator.inss(dec!(0)), dec!(0));
    }

    // =========================================================================
    // irrf tests
    // =========================================================================

    #[test]
    fn irrf_applies_single_band() {
        let tables = FiscalTables::year_2025();
        let calculator = WithholdingCalculator::new(&tables);

        // 3000 * 15% - 381.44 = 68.56
        assert_eq!(calculator.irrf(dec!(3000), 0), Ok(dec!(68.56)));
    }

    #[test]
    fn irrf_dependents_shrink_the_base() {
        let tables = FiscalTables::year_2025();
        let calculator = WithholdingCalculator::new(&tables);

        // 3000 - 189.59 = 2810.41, 7.5% band: 210.78075 - 169.44 = 41.34
        assert_eq!(calculator.irrf(dec!(3000), 1), Ok(dec!(41.34)));
    }

    #[test]
    fn irrf_dependents_can_push_into_exemption() {
        let tables = FiscalTables::year_2025();
        let calculator = WithholdingCalculator::new(&tables);

        // 2500 - 2 * 189.59 = 2120.82, exempt band.
        assert_eq!(calculator.irrf(dec!(2500), 2), Ok(dec!(0)));
    }

    #[test]
    fn irrf_exempt_band_owes_nothing() {
        let tables = FiscalTables::year_2025();
        let calculator = WithholdingCalculator::new(&tables);

        assert_eq!(calculator.irrf(dec!(2259.20), 0), Ok(dec!(0)));
    }

    // =========================================================================
    // combined tests
    // =========================================================================

    #[test]
    fn combined_applies_inss_before_irrf() {
        let tables = FiscalTables::year_2025();
        let calculator = WithholdingCalculator::new(&tables);

        let result = calculator.combined(dec!(6900), 0).unwrap();

        assert_eq!(result.inss, dec!(775.60));
        assert_eq!(result.irrf_base, dec!(6124.40));
        // 6124.40 * 27.5% - 896 = 788.21
        assert_eq!(result.irrf, dec!(788.21));
        assert_eq!(result.total, dec!(1563.81));
    }

    #[test]
    fn combined_zero_gross_owes_nothing() {
        let tables = FiscalTables::year_2025();
        let calculator = WithholdingCalculator::new(&tables);

        let result = calculator.combined(dec!(0), 3).unwrap();

        assert_eq!(result.total, dec!(0));
    }
}
