//! CLT employment vs PJ contracting: comparable annual totals.
//!
//! The employee side nets the monthly salary of its withholdings and a
//! capped transport-voucher deduction, then annualizes everything the
//! contract pays beyond salary: 13th, vacation bonus, employer FGTS
//! deposits, benefits and profit sharing. The contractor side nets the
//! monthly invoice of the regime's tax (Simples effective rate or the
//! presumed-profit levies) and the mandatory minimum pro-labore
//! contribution. The verdict is the sign of the annual difference.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::round_half_up;
use crate::calculations::das::{DasCalculator, DasError, DasInput};
use crate::calculations::fator_r::FatorRInput;
use crate::calculations::severance::FGTS_DEPOSIT_RATE;
use crate::calculations::withholding::WithholdingCalculator;
use crate::models::{Anexo, ScheduleError};
use crate::tables::FiscalTables;

/// Maximum employee transport-voucher deduction, as a share of gross
/// salary.
pub const TRANSPORT_VOUCHER_CAP_RATE: Decimal = dec!(0.06);

/// Flat residual tax rate on profit sharing.
pub const PLR_FLAT_TAX_RATE: Decimal = dec!(0.075);

/// Contribution rate on the mandatory minimum pro-labore remuneration.
pub const PRO_LABORE_INSS_RATE: Decimal = dec!(0.11);

/// Presumed-profit levies on service revenue.
pub const PRESUMED_PIS: Decimal = dec!(0.0065);
pub const PRESUMED_COFINS: Decimal = dec!(0.03);
pub const PRESUMED_IRPJ: Decimal = dec!(0.048);
pub const PRESUMED_CSLL: Decimal = dec!(0.0288);
pub const PRESUMED_ISS: Decimal = dec!(0.05);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CltPjError {
    #[error("gross salary must be positive, got {0}")]
    InvalidSalary(Decimal),

    #[error("monthly invoice must be positive, got {0}")]
    InvalidInvoice(Decimal),

    #[error(transparent)]
    Das(#[from] DasError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Tax regime assumed for the contractor side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PjRegime {
    Simples {
        anexo: Anexo,
        fator_r: Option<FatorRInput>,
    },
    PresumedProfit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CltInput {
    pub gross_monthly_salary: Decimal,
    pub dependents: u32,
    /// Monthly value of benefits kept under PJ comparison (meal, health,
    /// other allowances).
    pub monthly_benefits: Decimal,
    /// Monthly transport-voucher cost; the employee share is capped at 6%
    /// of gross salary.
    pub transport_voucher_cost: Decimal,
    pub annual_profit_sharing: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PjInput {
    pub monthly_invoice: Decimal,
    pub regime: PjRegime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CltAnnual {
    pub net_monthly_salary: Decimal,
    pub transport_deduction: Decimal,
    pub annual_net_salaries: Decimal,
    pub thirteenth_net: Decimal,
    /// Constitutional one-third on the vacation month.
    pub vacation_bonus: Decimal,
    /// Employer FGTS deposits on the 13 yearly remunerations.
    pub fgts_deposits: Decimal,
    pub annual_benefits: Decimal,
    pub profit_sharing_net: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PjAnnual {
    /// Simples regime requested but RBT12 above the statutory ceiling.
    pub ineligible: bool,
    pub effective_tax_rate: Decimal,
    pub monthly_tax: Decimal,
    pub pro_labore_contribution: Decimal,
    pub net_monthly: Decimal,
    pub total: Decimal,
}

impl PjAnnual {
    fn ineligible() -> Self {
        Self {
            ineligible: true,
            effective_tax_rate: Decimal::ZERO,
            monthly_tax: Decimal::ZERO,
            pro_labore_contribution: Decimal::ZERO,
            net_monthly: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CltPjComparison {
    pub clt: CltAnnual,
    pub pj: PjAnnual,
    /// `pj.total - clt.total`; meaningless when the PJ side is ineligible.
    pub annual_difference: Decimal,
    pub contractor_favorable: bool,
}

/// Comparator over one fiscal year's tables.
#[derive(Debug, Clone)]
pub struct CltPjComparator<'a> {
    tables: &'a FiscalTables,
}

impl<'a> CltPjComparator<'a> {
    pub fn new(tables: &'a FiscalTables) -> Self {
        Self { tables }
    }

    /// Builds both annual totals and the verdict.
    ///
    /// # Errors
    ///
    /// Returns [`CltPjError`] for non-positive required amounts. A
    /// Simples-ineligible invoice level is a successful result with the
    /// PJ side flagged.
    pub fn compare(
        &self,
        clt_input: &CltInput,
        pj_input: &PjInput,
    ) -> Result<CltPjComparison, CltPjError> {
        if clt_input.gross_monthly_salary <= Decimal::ZERO {
            return Err(CltPjError::InvalidSalary(clt_input.gross_monthly_salary));
        }
        if pj_input.monthly_invoice <= Decimal::ZERO {
            return Err(CltPjError::InvalidInvoice(pj_input.monthly_invoice));
        }

        let clt = self.clt_annual(clt_input)?;
        let pj = self.pj_annual(pj_input)?;

        let annual_difference = pj.total - clt.total;
        let contractor_favorable = !pj.ineligible && annual_difference > Decimal::ZERO;

        Ok(CltPjComparison {
            clt,
            pj,
            annual_difference,
            contractor_favorable,
        })
    }

    fn clt_annual(
        &self,
        input: &CltInput,
    ) -> Result<CltAnnual, CltPjError> {
        let gross = input.gross_monthly_salary;
        let withholding = WithholdingCalculator::new(self.tables);

        let monthly = withholding.combined(gross, input.dependents)?;
        let transport_deduction = self.transport_deduction(input);
        let net_monthly_salary = gross - monthly.total - transport_deduction;

        // The 13th suffers its own withholding but no transport deduction.
        let thirteenth = withholding.combined(gross, input.dependents)?;
        let thirteenth_net = gross - thirteenth.total;

        let vacation_bonus = round_half_up(gross / Decimal::from(3));
        let fgts_deposits = round_half_up(gross * FGTS_DEPOSIT_RATE * Decimal::from(13));
        let annual_benefits = self.annual_benefits(input);
        let profit_sharing_net = self.profit_sharing_net(input);

        let annual_net_salaries = net_monthly_salary * Decimal::from(12);
        let total = annual_net_salaries
            + thirteenth_net
            + vacation_bonus
            + fgts_deposits
            + annual_benefits
            + profit_sharing_net;

        Ok(CltAnnual {
            net_monthly_salary,
            transport_deduction,
            annual_net_salaries,
            thirteenth_net,
            vacation_bonus,
            fgts_deposits,
            annual_benefits,
            profit_sharing_net,
            total,
        })
    }

    /// The employee pays the voucher cost up to 6% of gross salary.
    fn transport_deduction(
        &self,
        input: &CltInput,
    ) -> Decimal {
        if input.transport_voucher_cost <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let cap = input.gross_monthly_salary * TRANSPORT_VOUCHER_CAP_RATE;
        round_half_up(input.transport_voucher_cost.min(cap))
    }

    fn annual_benefits(
        &self,
        input: &CltInput,
    ) -> Decimal {
        if input.monthly_benefits < Decimal::ZERO {
            warn!(
                monthly_benefits = %input.monthly_benefits,
                "negative benefits treated as zero"
            );
            return Decimal::ZERO;
        }
        round_half_up(input.monthly_benefits * Decimal::from(12))
    }

    fn profit_sharing_net(
        &self,
        input: &CltInput,
    ) -> Decimal {
        if input.annual_profit_sharing <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        round_half_up(input.annual_profit_sharing * (Decimal::ONE - PLR_FLAT_TAX_RATE))
    }

    fn pj_annual(
        &self,
        input: &PjInput,
    ) -> Result<PjAnnual, CltPjError> {
        let (effective_tax_rate, ineligible) = match &input.regime {
            PjRegime::Simples { anexo, fator_r } => {
                let das = DasCalculator::new(self.tables).calculate(&DasInput {
                    rbt12: input.monthly_invoice * Decimal::from(12),
                    monthly_revenue: input.monthly_invoice,
                    anexo: *anexo,
                    fator_r: fator_r.clone(),
                })?;
                (das.effective_rate, das.ineligible)
            }
            PjRegime::PresumedProfit => {
                let combined =
                    PRESUMED_PIS + PRESUMED_COFINS + PRESUMED_IRPJ + PRESUMED_CSLL + PRESUMED_ISS;
                (combined, false)
            }
        };

        if ineligible {
            return Ok(PjAnnual::ineligible());
        }

        let monthly_tax = round_half_up(input.monthly_invoice * effective_tax_rate);
        let pro_labore_contribution =
            round_half_up(self.tables.params.minimum_wage * PRO_LABORE_INSS_RATE);
        let net_monthly = input.monthly_invoice - monthly_tax - pro_labore_contribution;

        Ok(PjAnnual {
            ineligible: false,
            effective_tax_rate,
            monthly_tax,
            pro_labore_contribution,
            net_monthly,
            total: net_monthly * Decimal::from(12),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn clt_input() -> CltInput {
        CltInput {
            gross_monthly_salary: dec!(10000),
            dependents: 0,
            monthly_benefits: dec!(800),
            transport_voucher_cost: dec!(300),
            annual_profit_sharing: dec!(5000),
        }
    }

    fn simples_input() -> PjInput {
        PjInput {
            monthly_invoice: dec!(10000),
            regime: PjRegime::Simples {
                anexo: Anexo::III,
                fator_r: None,
            },
        }
    }

    // =========================================================================
    // CLT side
    // =========================================================================

    #[test]
    fn clt_annual_breakdown() {
        let tables = FiscalTables::year_2025();
        let comparator = CltPjComparator::new(&tables);

        let comparison = comparator.compare(&clt_input(), &simples_input()).unwrap();
        let clt = &comparison.clt;

        // INSS capped at 951.01; IRRF on 9048.99 at the top band = 1592.47.
        assert_eq!(clt.transport_deduction, dec!(300.00));
        assert_eq!(clt.net_monthly_salary, dec!(7156.52));
        assert_eq!(clt.annual_net_salaries, dec!(85878.24));
        assert_eq!(clt.thirteenth_net, dec!(7456.52));
        assert_eq!(clt.vacation_bonus, dec!(3333.33));
        assert_eq!(clt.fgts_deposits, dec!(10400.00));
        assert_eq!(clt.annual_benefits, dec!(9600.00));
        assert_eq!(clt.profit_sharing_net, dec!(4625.00));
        assert_eq!(clt.total, dec!(121293.09));
    }

    #[test]
    fn transport_deduction_caps_at_six_percent() {
        let tables = FiscalTables::year_2025();
        let comparator = CltPjComparator::new(&tables);
        let mut input = clt_input();
        input.transport_voucher_cost = dec!(900);

        let comparison = comparator.compare(&input, &simples_input()).unwrap();

        // 6% of 10,000.
        assert_eq!(comparison.clt.transport_deduction, dec!(600.00));
    }

    #[test]
    fn zero_voucher_cost_means_no_deduction() {
        let tables = FiscalTables::year_2025();
        let comparator = CltPjComparator::new(&tables);
        let mut input = clt_input();
        input.transport_voucher_cost = dec!(0);

        let comparison = comparator.compare(&input, &simples_input()).unwrap();

        assert_eq!(comparison.clt.transport_deduction, dec!(0));
        assert_eq!(comparison.clt.net_monthly_salary, dec!(7456.52));
    }

    #[test]
    fn negative_benefits_are_zeroed() {
        let tables = FiscalTables::year_2025();
        let comparator = CltPjComparator::new(&tables);
        let mut input = clt_input();
        input.monthly_benefits = dec!(-100);

        let comparison = comparator.compare(&input, &simples_input()).unwrap();

        assert_eq!(comparison.clt.annual_benefits, dec!(0));
    }

    // =========================================================================
    // PJ side
    // =========================================================================

    #[test]
    fn simples_pj_uses_the_das_effective_rate() {
        let tables = FiscalTables::year_2025();
        let comparator = CltPjComparator::new(&tables);

        let comparison = comparator.compare(&clt_input(), &simples_input()).unwrap();
        let pj = &comparison.pj;

        // RBT12 120,000 sits in Annex III bracket 1: flat 6%.
        assert_eq!(pj.effective_tax_rate, dec!(0.06));
        assert_eq!(pj.monthly_tax, dec!(600.00));
        // 11% of the 1,518.00 minimum wage.
        assert_eq!(pj.pro_labore_contribution, dec!(166.98));
        assert_eq!(pj.net_monthly, dec!(9233.02));
        assert_eq!(pj.total, dec!(110796.24));
    }

    #[test]
    fn presumed_profit_sums_the_fixed_levies() {
        let tables = FiscalTables::year_2025();
        let comparator = CltPjComparator::new(&tables);
        let pj_input = PjInput {
            monthly_invoice: dec!(20000),
            regime: PjRegime::PresumedProfit,
        };

        let comparison = comparator.compare(&clt_input(), &pj_input).unwrap();
        let pj = &comparison.pj;

        // 0.65% + 3% + 4.8% + 2.88% + 5% = 16.33%.
        assert_eq!(pj.effective_tax_rate, dec!(0.1633));
        assert_eq!(pj.monthly_tax, dec!(3266.00));
        assert_eq!(pj.net_monthly, dec!(16567.02));
    }

    #[test]
    fn simples_fator_r_flows_through_to_the_rate() {
        let tables = FiscalTables::year_2025();
        let comparator = CltPjComparator::new(&tables);
        let pj_input = PjInput {
            monthly_invoice: dec!(10000),
            regime: PjRegime::Simples {
                anexo: Anexo::V,
                fator_r: Some(FatorRInput {
                    payroll_12_months: dec!(40000),
                    gross_revenue_12_months: dec!(120000),
                }),
            },
        };

        let comparison = comparator.compare(&clt_input(), &pj_input).unwrap();

        // Ratio 1/3 >= 0.28: Annex III bracket 1 at 6% instead of Annex V.
        assert_eq!(comparison.pj.effective_tax_rate, dec!(0.06));
    }

    #[test]
    fn invoice_above_the_ceiling_flags_the_pj_side() {
        let tables = FiscalTables::year_2025();
        let comparator = CltPjComparator::new(&tables);
        let pj_input = PjInput {
            monthly_invoice: dec!(500000),
            regime: PjRegime::Simples {
                anexo: Anexo::III,
                fator_r: None,
            },
        };

        let comparison = comparator.compare(&clt_input(), &pj_input).unwrap();

        assert!(comparison.pj.ineligible);
        assert!(!comparison.contractor_favorable);
        assert_eq!(comparison.pj.total, dec!(0));
    }

    // =========================================================================
    // verdict
    // =========================================================================

    #[test]
    fn verdict_follows_the_sign_of_the_difference() {
        let tables = FiscalTables::year_2025();
        let comparator = CltPjComparator::new(&tables);

        // Same money on both sides: CLT keeps benefits and FGTS, so the
        // employee comes out ahead.
        let even = comparator.compare(&clt_input(), &simples_input()).unwrap();
        assert_eq!(even.annual_difference, dec!(-10496.85));
        assert!(!even.contractor_favorable);

        // Double the invoice and the contractor wins.
        let richer = comparator
            .compare(
                &clt_input(),
                &PjInput {
                    monthly_invoice: dec!(20000),
                    regime: PjRegime::Simples {
                        anexo: Anexo::III,
                        fator_r: None,
                    },
                },
            )
            .unwrap();
        assert!(richer.annual_difference > Decimal::ZERO);
        assert!(richer.contractor_favorable);
    }

    // =========================================================================
    // input validation
    // =========================================================================

    #[test]
    fn rejects_non_positive_salary() {
        let tables = FiscalTables::year_2025();
        let comparator = CltPjComparator::new(&tables);
        let mut input = clt_input();
        input.gross_monthly_salary = dec!(0);

        assert_eq!(
            comparator.compare(&input, &simples_input()),
            Err(CltPjError::InvalidSalary(dec!(0)))
        );
    }

    #[test]
    fn rejects_non_positive_invoice() {
        let tables = FiscalTables::year_2025();
        let comparator = CltPjComparator::new(&tables);
        let pj_input = PjInput {
            monthly_invoice: dec!(-10),
            regime: PjRegime::PresumedProfit,
        };

        assert_eq!(
            comparator.compare(&clt_input(), &pj_input),
            Err(CltPjError::InvalidInvoice(dec!(-10)))
        );
    }
}
