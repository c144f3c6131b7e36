//! Tax and labor calculation modules.
//!
//! Each module is a pure, synchronous calculator over a
//! [`crate::tables::FiscalTables`] reference; nothing here owns state or
//! performs I/O.

pub mod clt_pj;
pub mod common;
pub mod das;
pub mod dual_tax;
pub mod fator_r;
pub mod period;
pub mod schedule;
pub mod severance;
pub mod withholding;

pub use clt_pj::{
    CltAnnual, CltInput, CltPjComparator, CltPjComparison, CltPjError, PjAnnual, PjInput, PjRegime,
};
pub use das::{DasCalculator, DasError, DasInput, DasResult};
pub use dual_tax::{DualTaxSplit, IbsAllocation, split_dual_tax, split_ibs};
pub use fator_r::{FATOR_R_THRESHOLD, FatorRInput, classify_annex, payroll_ratio};
pub use period::{EmploymentPeriod, days_between, days_in_month, months_between, twelfths};
pub use schedule::{cumulative_tax, effective_rate, resolve_bracket, single_band_tax};
pub use severance::{SeveranceCalculator, SeveranceError, SeveranceInput, SeveranceStatement};
pub use withholding::{WithholdingCalculator, WithholdingResult};
