use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of a rate table.
///
/// `upper` is `None` only for an unbounded final bracket (IRRF's top band);
/// every other bracket covers the half-open interval `(lower, upper]`, with
/// the first bracket also including `lower = 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBracket {
    pub lower: Decimal,
    pub upper: Option<Decimal>,
    pub rate: Decimal,
    pub deduction: Decimal,
}

/// Which algorithm a table expects.
///
/// The three kinds share the same bracket shape but are computed by three
/// distinct routines in `calculations::schedule`; a table is only ever fed
/// to the routine matching its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleKind {
    /// Simples Nacional: single bracket lookup, then the smoothed
    /// effective-rate formula `(base * rate - deduction) / base`.
    Smoothed,
    /// INSS: tax each sub-band's slice at its own rate and sum, with a
    /// final contribution cap.
    Cumulative,
    /// IRRF: single bracket lookup, `base * rate - deduction`.
    SingleBand,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("schedule has no brackets")]
    Empty,

    #[error("bracket {index} is not ordered after its predecessor")]
    OutOfOrder { index: usize },

    #[error("bracket {index} does not start where its predecessor ends")]
    Gap { index: usize },

    #[error("bracket {index} is unbounded but not the final bracket")]
    UnboundedNotLast { index: usize },

    #[error("first bracket must start at zero, got {0}")]
    NonZeroFloor(Decimal),

    #[error("base {base} exceeds the schedule ceiling {ceiling}")]
    AboveCeiling { base: Decimal, ceiling: Decimal },
}

/// An ordered, contiguous rate table for one fiscal year.
///
/// Instances come from [`crate::tables::FiscalTables`] or from the CSV
/// loader in fisco-data; either way they are read-only once built and are
/// passed explicitly into the calculators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSchedule {
    pub year: i32,
    pub kind: ScheduleKind,
    pub brackets: Vec<RateBracket>,
    /// Absolute clamp on the computed amount (the INSS contribution cap).
    pub cap: Option<Decimal>,
}

impl RateSchedule {
    /// Checks the table invariants: at least one bracket, first bracket
    /// starting at zero, ascending and contiguous bounds, and at most one
    /// unbounded bracket which must be the last.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.brackets.is_empty() {
            return Err(ScheduleError::Empty);
        }

        let first = &self.brackets[0];
        if first.lower != Decimal::ZERO {
            return Err(ScheduleError::NonZeroFloor(first.lower));
        }

        for (index, pair) in self.brackets.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            let Some(prev_upper) = prev.upper else {
                return Err(ScheduleError::UnboundedNotLast { index });
            };
            if prev_upper <= prev.lower {
                return Err(ScheduleError::OutOfOrder { index });
            }
            if next.lower != prev_upper {
                return Err(ScheduleError::Gap { index: index + 1 });
            }
        }

        let last_index = self.brackets.len() - 1;
        let last = &self.brackets[last_index];
        if let Some(upper) = last.upper {
            if upper <= last.lower {
                return Err(ScheduleError::OutOfOrder { index: last_index });
            }
        }

        Ok(())
    }

    /// The table ceiling, or `None` when the final bracket is unbounded.
    pub fn ceiling(&self) -> Option<Decimal> {
        self.brackets.last().and_then(|b| b.upper)
    }
}
