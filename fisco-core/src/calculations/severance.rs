//! Termination-pay statement.
//!
//! Computes every severance component owed when an employment contract
//! ends, branching on the termination type:
//!
//! | Component | WithoutCause | Resignation | ForCause | MutualAgreement |
//! |-----------|--------------|-------------|----------|-----------------|
//! | Salary balance | full | full | full | full |
//! | Notice | indemnified/worked | worked or deducted | none | half |
//! | 13th salary (avos) | full | full | none | full |
//! | Due vacation | + 1/3 | + 1/3 | no 1/3 | + 1/3 |
//! | Proportional vacation | + 1/3 | + 1/3 | none | half, + 1/3 |
//! | FGTS penalty | 40% | none | none | 20% |
//!
//! Social-security and income-tax withholding apply to the salary balance,
//! notice and 13th only; vacation amounts and the FGTS penalty are never
//! withheld against.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::round_half_up;
use crate::calculations::period::EmploymentPeriod;
use crate::calculations::withholding::WithholdingCalculator;
use crate::models::{NoticeType, ScheduleError, TerminationType};
use crate::tables::FiscalTables;

/// Statutory notice floor in days.
pub const NOTICE_BASE_DAYS: u32 = 30;

/// Extra notice days per completed year of service.
pub const NOTICE_DAYS_PER_YEAR: u32 = 3;

/// Statutory notice ceiling in days.
pub const NOTICE_MAX_DAYS: u32 = 90;

/// Monthly employer FGTS deposit rate, used to estimate the account
/// balance when the caller does not supply one.
pub const FGTS_DEPOSIT_RATE: Decimal = dec!(0.08);

/// FGTS penalty rate on dismissal without cause.
pub const FGTS_PENALTY_DISMISSAL: Decimal = dec!(0.40);

/// FGTS penalty rate on termination by mutual agreement.
pub const FGTS_PENALTY_MUTUAL: Decimal = dec!(0.20);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeveranceError {
    #[error("termination date {termination} precedes hire date {hire}")]
    TerminationBeforeHire {
        hire: NaiveDate,
        termination: NaiveDate,
    },

    #[error("monthly salary must be positive, got {0}")]
    InvalidSalary(Decimal),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveranceInput {
    pub hire_date: NaiveDate,
    pub termination_date: NaiveDate,
    pub monthly_salary: Decimal,
    /// Average of habitual variable pay (commissions, overtime); joins the
    /// salary in every component. Optional in spirit: negatives are zeroed.
    pub variable_average: Decimal,
    pub termination_type: TerminationType,
    pub notice_type: NoticeType,
    /// Complete, unused annual vacation periods still owed.
    pub vacation_periods_pending: u32,
    /// IRRF dependents.
    pub dependents: u32,
    /// Actual FGTS account balance when known; estimated from tenure
    /// otherwise.
    pub fgts_balance: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveranceStatement {
    pub period: EmploymentPeriod,
    /// Salary plus variable average; the base for every component.
    pub reference_salary: Decimal,
    pub salary_balance: Decimal,
    pub notice_days: u32,
    /// Negative when a resigning employee skipped the notice period (one
    /// salary deducted).
    pub notice_value: Decimal,
    pub thirteenth_salary: Decimal,
    pub vacation_due: Decimal,
    pub vacation_proportional: Decimal,
    /// Account balance the penalty was computed on (supplied or estimated).
    pub fgts_balance: Decimal,
    pub fgts_penalty: Decimal,
    pub gross_total: Decimal,
    pub inss_withheld: Decimal,
    pub irrf_withheld: Decimal,
    pub net_total: Decimal,
}

/// Calculator for a full termination statement over one fiscal year's
/// tables.
#[derive(Debug, Clone)]
pub struct SeveranceCalculator<'a> {
    tables: &'a FiscalTables,
}

impl<'a> SeveranceCalculator<'a> {
    pub fn new(tables: &'a FiscalTables) -> Self {
        Self { tables }
    }

    /// Computes the complete statement.
    ///
    /// # Errors
    ///
    /// Returns [`SeveranceError`] when the termination date precedes the
    /// hire date or the salary is not positive. Optional inputs are
    /// permissive: negative variable averages and balances are zeroed.
    pub fn calculate(
        &self,
        input: &SeveranceInput,
    ) -> Result<SeveranceStatement, SeveranceError> {
        if input.termination_date < input.hire_date {
            return Err(SeveranceError::TerminationBeforeHire {
                hire: input.hire_date,
                termination: input.termination_date,
            });
        }
        if input.monthly_salary <= Decimal::ZERO {
            return Err(SeveranceError::InvalidSalary(input.monthly_salary));
        }

        let period = EmploymentPeriod::derive(input.hire_date, input.termination_date);
        let reference_salary = self.reference_salary(input);

        let salary_balance = self.salary_balance(reference_salary, &period);
        let notice_days = self.notice_days(period.years_employed);
        let notice_value = self.notice_value(
            reference_salary,
            notice_days,
            input.termination_type,
            input.notice_type,
        );
        let thirteenth_salary =
            self.thirteenth_salary(reference_salary, &period, input.termination_type);
        let vacation_due = self.vacation_due(
            reference_salary,
            input.vacation_periods_pending,
            input.termination_type,
        );
        let vacation_proportional =
            self.vacation_proportional(reference_salary, &period, input.termination_type);
        let fgts_balance = self.fgts_balance(input, reference_salary, &period);
        let fgts_penalty = self.fgts_penalty(fgts_balance, input.termination_type);

        // Only the salary-like components are subject to withholding.
        let taxable = (salary_balance + notice_value + thirteenth_salary).max(Decimal::ZERO);
        let withholding =
            WithholdingCalculator::new(self.tables).combined(taxable, input.dependents)?;

        let gross_total = salary_balance
            + notice_value
            + thirteenth_salary
            + vacation_due
            + vacation_proportional
            + fgts_penalty;

        Ok(SeveranceStatement {
            period,
            reference_salary,
            salary_balance,
            notice_days,
            notice_value,
            thirteenth_salary,
            vacation_due,
            vacation_proportional,
            fgts_balance,
            fgts_penalty,
            gross_total,
            inss_withheld: withholding.inss,
            irrf_withheld: withholding.irrf,
            net_total: gross_total - withholding.total,
        })
    }

    fn reference_salary(
        &self,
        input: &SeveranceInput,
    ) -> Decimal {
        let variable = if input.variable_average < Decimal::ZERO {
            warn!(
                variable_average = %input.variable_average,
                "negative variable average treated as zero"
            );
            Decimal::ZERO
        } else {
            input.variable_average
        };
        input.monthly_salary + variable
    }

    /// Days worked in the termination month, at the calendar daily rate of
    /// that month.
    fn salary_balance(
        &self,
        reference_salary: Decimal,
        period: &EmploymentPeriod,
    ) -> Decimal {
        let daily = reference_salary / Decimal::from(period.days_in_termination_month);
        round_half_up(daily * Decimal::from(period.termination_day_of_month))
    }

    /// 30 days plus 3 per completed year, capped at 90.
    fn notice_days(
        &self,
        years_employed: u32,
    ) -> u32 {
        (NOTICE_BASE_DAYS + NOTICE_DAYS_PER_YEAR * years_employed).min(NOTICE_MAX_DAYS)
    }

    fn notice_value(
        &self,
        reference_salary: Decimal,
        notice_days: u32,
        termination_type: TerminationType,
        notice_type: NoticeType,
    ) -> Decimal {
        let indemnified =
            reference_salary / Decimal::from(30) * Decimal::from(notice_days);

        let value = match (termination_type, notice_type) {
            (TerminationType::ForCause, _) => Decimal::ZERO,
            (TerminationType::WithoutCause, NoticeType::Indemnified) => indemnified,
            (TerminationType::MutualAgreement, NoticeType::Indemnified) => {
                indemnified / Decimal::TWO
            }
            (TerminationType::EmployeeResignation, NoticeType::NotServed) => -reference_salary,
            _ => Decimal::ZERO,
        };
        round_half_up(value)
    }

    /// One twelfth of the reference salary per avo accrued in the calendar
    /// year; forfeited on dismissal for cause.
    fn thirteenth_salary(
        &self,
        reference_salary: Decimal,
        period: &EmploymentPeriod,
        termination_type: TerminationType,
    ) -> Decimal {
        if termination_type == TerminationType::ForCause {
            return Decimal::ZERO;
        }
        let twelfth = reference_salary / Decimal::from(12);
        round_half_up(twelfth * Decimal::from(period.thirteenth_twelfths))
    }

    /// Complete unused periods. The constitutional one-third bonus applies
    /// except on dismissal for cause.
    fn vacation_due(
        &self,
        reference_salary: Decimal,
        periods_pending: u32,
        termination_type: TerminationType,
    ) -> Decimal {
        let base = reference_salary * Decimal::from(periods_pending);
        let value = if termination_type == TerminationType::ForCause {
            base
        } else {
            with_constitutional_third(base)
        };
        round_half_up(value)
    }

    /// Avos of the open vacation period, with the one-third bonus; halved
    /// under mutual agreement, forfeited for cause.
    fn vacation_proportional(
        &self,
        reference_salary: Decimal,
        period: &EmploymentPeriod,
        termination_type: TerminationType,
    ) -> Decimal {
        if termination_type == TerminationType::ForCause {
            return Decimal::ZERO;
        }

        let base = reference_salary / Decimal::from(12) * Decimal::from(period.vacation_twelfths);
        let mut value = with_constitutional_third(base);
        if termination_type == TerminationType::MutualAgreement {
            value /= Decimal::TWO;
        }
        round_half_up(value)
    }

    fn fgts_balance(
        &self,
        input: &SeveranceInput,
        reference_salary: Decimal,
        period: &EmploymentPeriod,
    ) -> Decimal {
        match input.fgts_balance {
            Some(balance) if balance < Decimal::ZERO => {
                warn!(%balance, "negative FGTS balance treated as zero");
                Decimal::ZERO
            }
            Some(balance) => round_half_up(balance),
            None => {
                let estimate = reference_salary
                    * FGTS_DEPOSIT_RATE
                    * Decimal::from(period.months_employed);
                warn!(
                    %estimate,
                    months = period.months_employed,
                    "no FGTS balance supplied; estimated from tenure"
                );
                round_half_up(estimate)
            }
        }
    }

    fn fgts_penalty(
        &self,
        fgts_balance: Decimal,
        termination_type: TerminationType,
    ) -> Decimal {
        let rate = match termination_type {
            TerminationType::WithoutCause => FGTS_PENALTY_DISMISSAL,
            TerminationType::MutualAgreement => FGTS_PENALTY_MUTUAL,
            TerminationType::EmployeeResignation | TerminationType::ForCause => Decimal::ZERO,
        };
        round_half_up(fgts_balance * rate)
    }
}

/// Adds the constitutional one-third vacation bonus.
fn with_constitutional_third(amount: Decimal) -> Decimal {
    amount + amount / Decimal::from(3)
}
