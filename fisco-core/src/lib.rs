//! Brazilian tax and labor computation core.
//!
//! Pure, deterministic calculators over explicit, versioned fiscal table
//! sets: Simples Nacional DAS (with Fator R classification), INSS/IRRF
//! payroll withholding, termination-pay statements, the IBS/CBS dual-VAT
//! split, and a CLT-vs-PJ annual comparison. No I/O, no shared state; UI
//! callers supply validated inputs and format the structured results.

pub mod calculations;
pub mod directory;
pub mod models;
pub mod tables;

pub use directory::{CnaeDirectory, DirectoryError, StaticCnaeDirectory};
pub use models::*;
pub use tables::{FiscalParams, FiscalTables};
