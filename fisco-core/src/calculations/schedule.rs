//! The three bracket algorithms.
//!
//! Every rate table in this crate shares the [`RateSchedule`] shape, but
//! three different computations are layered over it, one per
//! [`ScheduleKind`]:
//!
//! | Kind | Routine | Used by |
//! |------|---------|---------|
//! | `Smoothed` | [`resolve_bracket`] + [`effective_rate`] | Simples Nacional DAS |
//! | `Cumulative` | [`cumulative_tax`] | INSS contribution |
//! | `SingleBand` | [`single_band_tax`] | IRRF withholding |
//!
//! The routines are deliberately separate functions rather than one loop
//! with flags: a Simples table must never be accumulated and an INSS table
//! must never be flat-resolved.

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{RateBracket, RateSchedule, ScheduleError};

/// Finds the bracket containing `base`.
///
/// `base` at or below zero lands in the first bracket; `base` above a
/// bounded table's ceiling is [`ScheduleError::AboveCeiling`] — for Simples
/// tables the DAS calculator translates that into an `ineligible` result
/// rather than surfacing the error.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fisco_core::calculations::schedule::resolve_bracket;
/// use fisco_core::tables::FiscalTables;
///
/// let tables = FiscalTables::year_2025();
/// let bracket = resolve_bracket(&tables.anexo_i, dec!(360000)).unwrap();
///
/// assert_eq!(bracket.rate, dec!(0.073));
/// assert_eq!(bracket.deduction, dec!(5940));
/// ```
pub fn resolve_bracket(
    schedule: &RateSchedule,
    base: Decimal,
) -> Result<&RateBracket, ScheduleError> {
    let first = schedule.brackets.first().ok_or(ScheduleError::Empty)?;
    if base <= first.lower {
        return Ok(first);
    }

    schedule
        .brackets
        .iter()
        .find(|b| base > b.lower && b.upper.is_none_or(|upper| base <= upper))
        .ok_or_else(|| ScheduleError::AboveCeiling {
            base,
            // A miss on a validated table means every bracket is bounded.
            ceiling: schedule.ceiling().unwrap_or(Decimal::ZERO),
        })
}

/// The Simples Nacional progressive-deduction formula.
///
/// Converts a bracket's nominal marginal rate and fixed deduction into the
/// smooth effective average rate `(base * rate - deduction) / base`,
/// returning zero for a non-positive base. Within the unified-composition
/// brackets the result is continuous at every bracket boundary.
pub fn effective_rate(
    base: Decimal,
    rate: Decimal,
    deduction: Decimal,
) -> Decimal {
    if base <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (base * rate - deduction) / base
}

/// INSS-style banded accumulation.
///
/// Taxes the slice of `base` inside each bracket at that bracket's own
/// rate, stops when `base` is exhausted or the table ceiling is reached,
/// then clamps the sum at the schedule cap. Non-positive bases contribute
/// nothing. The result is unrounded; callers round at their boundary.
pub fn cumulative_tax(
    schedule: &RateSchedule,
    base: Decimal,
) -> Decimal {
    if base <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut amount = Decimal::ZERO;
    for bracket in &schedule.brackets {
        if base <= bracket.lower {
            break;
        }
        let band_top = match bracket.upper {
            Some(upper) => base.min(upper),
            None => base,
        };
        amount += (band_top - bracket.lower) * bracket.rate;
    }

    if let Some(cap) = schedule.cap {
        if amount > cap {
            warn!(%base, %amount, %cap, "banded tax clamped at schedule cap");
            return cap;
        }
    }

    amount
}

/// IRRF-style single-band tax.
///
/// Resolves the one matching bracket and applies `base * rate - deduction`,
/// clamped at zero so a deduction can never produce a negative withholding.
/// Non-positive bases owe nothing.
pub fn single_band_tax(
    schedule: &RateSchedule,
    base: Decimal,
) -> Result<Decimal, ScheduleError> {
    if base <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let bracket = resolve_bracket(schedule, base)?;
    let amount = base * bracket.rate - bracket.deduction;
    Ok(amount.max(Decimal::ZERO))
}
