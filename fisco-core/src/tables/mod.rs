//! Versioned fiscal table sets.
//!
//! A [`FiscalTables`] value bundles every rate table and scalar parameter
//! for one fiscal year. It is built once (here, or by the CSV loader in
//! fisco-data) and passed explicitly into the calculators, so a new year's
//! tables are a new value, not a recompilation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::{Anexo, RateBracket, RateSchedule, ScheduleError, ScheduleKind};

/// Scalar parameters that accompany the bracket tables for a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalParams {
    /// Hard Simples Nacional revenue ceiling; RBT12 above this is
    /// ineligible for the regime.
    pub simples_revenue_ceiling: Decimal,
    /// Monthly IRRF deduction per dependent.
    pub irrf_dependent_deduction: Decimal,
    /// National minimum wage, the notional base for the mandatory
    /// pro-labore social-security contribution.
    pub minimum_wage: Decimal,
}

/// The complete table set for one fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalTables {
    pub year: i32,
    pub anexo_i: RateSchedule,
    pub anexo_ii: RateSchedule,
    pub anexo_iii: RateSchedule,
    pub anexo_iv: RateSchedule,
    pub anexo_v: RateSchedule,
    pub inss: RateSchedule,
    pub irrf: RateSchedule,
    pub params: FiscalParams,
}

impl FiscalTables {
    /// The schedule for a given Simples Nacional annex.
    pub fn anexo(
        &self,
        anexo: Anexo,
    ) -> &RateSchedule {
        match anexo {
            Anexo::I => &self.anexo_i,
            Anexo::II => &self.anexo_ii,
            Anexo::III => &self.anexo_iii,
            Anexo::IV => &self.anexo_iv,
            Anexo::V => &self.anexo_v,
        }
    }

    /// Validates every schedule in the set.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for schedule in [
            &self.anexo_i,
            &self.anexo_ii,
            &self.anexo_iii,
            &self.anexo_iv,
            &self.anexo_v,
            &self.inss,
            &self.irrf,
        ] {
            schedule.validate()?;
        }
        Ok(())
    }

    /// The 2025 statutory table set.
    pub fn year_2025() -> Self {
        Self {
            year: 2025,
            anexo_i: simples_schedule(
                2025,
                [
                    (dec!(0.04), dec!(0)),
                    (dec!(0.073), dec!(5940)),
                    (dec!(0.095), dec!(13860)),
                    (dec!(0.107), dec!(22500)),
                    (dec!(0.143), dec!(87300)),
                    (dec!(0.19), dec!(378000)),
                ],
            ),
            anexo_ii: simples_schedule(
                2025,
                [
                    (dec!(0.045), dec!(0)),
                    (dec!(0.078), dec!(5940)),
                    (dec!(0.10), dec!(13860)),
                    (dec!(0.112), dec!(22500)),
                    (dec!(0.147), dec!(85500)),
                    (dec!(0.30), dec!(720000)),
                ],
            ),
            anexo_iii: simples_schedule(
                2025,
                [
                    (dec!(0.06), dec!(0)),
                    (dec!(0.112), dec!(9360)),
                    (dec!(0.135), dec!(17640)),
                    (dec!(0.16), dec!(35640)),
                    (dec!(0.21), dec!(125640)),
                    (dec!(0.33), dec!(648000)),
                ],
            ),
            anexo_iv: simples_schedule(
                2025,
                [
                    (dec!(0.045), dec!(0)),
                    (dec!(0.09), dec!(8100)),
                    (dec!(0.102), dec!(12420)),
                    (dec!(0.14), dec!(39780)),
                    (dec!(0.22), dec!(183780)),
                    (dec!(0.33), dec!(828000)),
                ],
            ),
            anexo_v: simples_schedule(
                2025,
                [
                    (dec!(0.155), dec!(0)),
                    (dec!(0.18), dec!(4500)),
                    (dec!(0.195), dec!(9900)),
                    (dec!(0.205), dec!(17100)),
                    (dec!(0.23), dec!(62100)),
                    (dec!(0.305), dec!(540000)),
                ],
            ),
            inss: RateSchedule {
                year: 2025,
                kind: ScheduleKind::Cumulative,
                brackets: vec![
                    bracket(dec!(0), Some(dec!(1518.00)), dec!(0.075), dec!(0)),
                    bracket(dec!(1518.00), Some(dec!(2793.88)), dec!(0.09), dec!(0)),
                    bracket(dec!(2793.88), Some(dec!(4190.83)), dec!(0.12), dec!(0)),
                    bracket(dec!(4190.83), Some(dec!(8157.41)), dec!(0.14), dec!(0)),
                ],
                cap: Some(dec!(951.01)),
            },
            irrf: RateSchedule {
                year: 2025,
                kind: ScheduleKind::SingleBand,
                brackets: vec![
                    bracket(dec!(0), Some(dec!(2259.20)), dec!(0), dec!(0)),
                    bracket(dec!(2259.20), Some(dec!(2826.65)), dec!(0.075), dec!(169.44)),
                    bracket(dec!(2826.65), Some(dec!(3751.05)), dec!(0.15), dec!(381.44)),
                    bracket(dec!(3751.05), Some(dec!(4664.68)), dec!(0.225), dec!(662.77)),
                    bracket(dec!(4664.68), None, dec!(0.275), dec!(896.00)),
                ],
                cap: None,
            },
            params: FiscalParams {
                simples_revenue_ceiling: dec!(4800000),
                irrf_dependent_deduction: dec!(189.59),
                minimum_wage: dec!(1518.00),
            },
        }
    }
}

fn bracket(
    lower: Decimal,
    upper: Option<Decimal>,
    rate: Decimal,
    deduction: Decimal,
) -> RateBracket {
    RateBracket {
        lower,
        upper,
        rate,
        deduction,
    }
}

/// Builds a six-bracket Simples annex over the standard RBT12 bounds.
fn simples_schedule(
    year: i32,
    rows: [(Decimal, Decimal); 6],
) -> RateSchedule {
    let bounds = [
        (dec!(0), dec!(180000)),
        (dec!(180000), dec!(360000)),
        (dec!(360000), dec!(720000)),
        (dec!(720000), dec!(1800000)),
        (dec!(1800000), dec!(3600000)),
        (dec!(3600000), dec!(4800000)),
    ];

    RateSchedule {
        year,
        kind: ScheduleKind::Smoothed,
        brackets: bounds
            .iter()
            .zip(rows.iter())
            .map(|(&(lower, upper), &(rate, deduction))| {
                bracket(lower, Some(upper), rate, deduction)
            })
            .collect(),
        cap: None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn year_2025_validates() {
        assert_eq!(FiscalTables::year_2025().validate(), Ok(()));
    }

    #[test]
    fn simples_annexes_share_the_standard_bounds() {
        let tables = FiscalTables::year_2025();

        for anexo in [Anexo::I, Anexo::II, Anexo::III, Anexo::IV, Anexo::V] {
            let schedule = tables.anexo(anexo);
            assert_eq!(schedule.brackets.len(), 6, "annex {}", anexo.as_str());
            assert_eq!(schedule.ceiling(), Some(dec!(4800000)));
            assert_eq!(schedule.kind, ScheduleKind::Smoothed);
        }
    }

    #[test]
    fn anexo_i_second_bracket_matches_statute() {
        let tables = FiscalTables::year_2025();

        let second = &tables.anexo_i.brackets[1];
        assert_eq!(second.lower, dec!(180000));
        assert_eq!(second.upper, Some(dec!(360000)));
        assert_eq!(second.rate, dec!(0.073));
        assert_eq!(second.deduction, dec!(5940));
    }

    #[test]
    fn inss_table_is_cumulative_and_capped() {
        let tables = FiscalTables::year_2025();

        assert_eq!(tables.inss.kind, ScheduleKind::Cumulative);
        assert_eq!(tables.inss.cap, Some(dec!(951.01)));
        assert_eq!(tables.inss.ceiling(), Some(dec!(8157.41)));
    }

    #[test]
    fn irrf_table_is_single_band_with_open_top() {
        let tables = FiscalTables::year_2025();

        assert_eq!(tables.irrf.kind, ScheduleKind::SingleBand);
        assert_eq!(tables.irrf.ceiling(), None);
        assert_eq!(tables.irrf.brackets[0].rate, dec!(0));
    }
}
