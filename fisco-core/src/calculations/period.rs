//! Calendar-accurate elapsed-time arithmetic for termination pay.
//!
//! Everything here works on real calendar months and days; no component
//! assumes a 30-day month except where the statute itself does (the notice
//! daily rate, which divides the monthly salary by 30).

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).expect("day 1 exists in every month");
    let next = first
        .checked_add_months(Months::new(1))
        .expect("in-range date");
    next.signed_duration_since(first).num_days() as u32
}

/// Signed day difference `end - start`.
pub fn days_between(
    start: NaiveDate,
    end: NaiveDate,
) -> i64 {
    end.signed_duration_since(start).num_days()
}

/// Whole-month difference `end - start`.
///
/// Decrements by one when `end`'s day-of-month is earlier than `start`'s:
/// a partial final month does not count.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fisco_core::calculations::period::months_between;
///
/// let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
///
/// assert_eq!(months_between(d(2024, 1, 15), d(2024, 1, 15)), 0);
/// assert_eq!(months_between(d(2024, 1, 15), d(2024, 3, 15)), 2);
/// assert_eq!(months_between(d(2024, 1, 15), d(2024, 3, 14)), 1);
/// ```
pub fn months_between(
    start: NaiveDate,
    end: NaiveDate,
) -> i64 {
    let mut months = i64::from(end.year() - start.year()) * 12
        + i64::from(end.month() as i32 - start.month() as i32);
    if end.day() < start.day() {
        months -= 1;
    }
    months
}

/// Counts accrued twelfths ("avos") between `start` and `end`: one per
/// whole month, plus one more when the trailing partial month covers 15 or
/// more worked days (the end date itself counts as worked).
pub fn twelfths(
    start: NaiveDate,
    end: NaiveDate,
) -> u32 {
    if end < start {
        return 0;
    }

    let whole = months_between(start, end).max(0) as u32;
    let anchor = start
        .checked_add_months(Months::new(whole))
        .expect("in-range date");
    let worked_partial_days = days_between(anchor, end) + 1;

    if worked_partial_days >= 15 { whole + 1 } else { whole }
}

/// Every date-derived quantity the severance components share, computed
/// once per calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentPeriod {
    pub days_employed: i64,
    pub months_employed: u32,
    pub years_employed: u32,
    /// Day-of-month of the termination date; the number of days owed in
    /// the final month.
    pub termination_day_of_month: u32,
    pub days_in_termination_month: u32,
    /// 13th-salary avos accrued in the termination calendar year.
    pub thirteenth_twelfths: u32,
    /// Avos accrued in the vacation period open at termination.
    pub vacation_twelfths: u32,
}

impl EmploymentPeriod {
    /// Derives the shared quantities. `hire` must not be after
    /// `termination` (the severance calculator validates this).
    pub fn derive(
        hire: NaiveDate,
        termination: NaiveDate,
    ) -> Self {
        let months_employed = months_between(hire, termination).max(0) as u32;

        let year_start = NaiveDate::from_ymd_opt(termination.year(), 1, 1)
            .expect("January 1st exists in every year");
        let thirteenth_anchor = hire.max(year_start);

        let completed_vacation_periods = months_employed / 12;
        let vacation_anchor = hire
            .checked_add_months(Months::new(completed_vacation_periods * 12))
            .expect("in-range date");

        Self {
            days_employed: days_between(hire, termination),
            months_employed,
            years_employed: months_employed / 12,
            termination_day_of_month: termination.day(),
            days_in_termination_month: days_in_month(termination),
            thirteenth_twelfths: twelfths(thirteenth_anchor, termination),
            vacation_twelfths: twelfths(vacation_anchor, termination),
        }
    }
}
