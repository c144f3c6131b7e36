use serde::{Deserialize, Serialize};

/// How the employment contract ended. Chosen once per calculation; every
/// severance component branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationType {
    /// Employer-initiated dismissal without just cause.
    WithoutCause,
    /// Employee-initiated resignation.
    EmployeeResignation,
    /// Employer-initiated dismissal with just cause.
    ForCause,
    /// Consensual termination (CLT art. 484-A): indemnified amounts halved.
    MutualAgreement,
}

/// How the statutory notice period was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeType {
    /// Paid out instead of worked.
    Indemnified,
    /// Worked through; nothing extra owed.
    Worked,
    /// Skipped unilaterally by a resigning employee; one salary is deducted.
    NotServed,
}

impl TerminationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WithoutCause => "without-cause",
            Self::EmployeeResignation => "resignation",
            Self::ForCause => "for-cause",
            Self::MutualAgreement => "mutual-agreement",
        }
    }
}

impl NoticeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indemnified => "indemnified",
            Self::Worked => "worked",
            Self::NotServed => "not-served",
        }
    }
}
