use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::BusinessRecord;

/// Days of lookahead before an expiry drops a business to `Pending`.
pub const PENDING_WINDOW_DAYS: i64 = 30;

/// Derived permit standing of a business. Computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    Pending,
    Noncompliant,
}

impl ComplianceStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Compliant, Self::Pending, Self::Noncompliant]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::Pending => "pending",
            Self::Noncompliant => "noncompliant",
        }
    }
}

/// The three permit expiries a classification is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermitExpiries {
    pub dti: Option<NaiveDate>,
    pub sec: Option<NaiveDate>,
    pub cda: Option<NaiveDate>,
}

impl From<&BusinessRecord> for PermitExpiries {
    fn from(record: &BusinessRecord) -> Self {
        Self {
            dti: record.dti_expiry,
            sec: record.sec_expiry,
            cda: record.cda_expiry,
        }
    }
}

/// Classify a permit triple against a reference date.
///
/// A missing expiry counts as expiring today. Any expiry strictly in the
/// past makes the business noncompliant; all expiries at least thirty days
/// out make it compliant; everything in between is pending.
pub fn classify(permits: &PermitExpiries, today: NaiveDate) -> ComplianceStatus {
    let threshold = today + Duration::days(PENDING_WINDOW_DAYS);
    let expiries = [
        permits.dti.unwrap_or(today),
        permits.sec.unwrap_or(today),
        permits.cda.unwrap_or(today),
    ];

    if expiries.iter().any(|expiry| *expiry < today) {
        ComplianceStatus::Noncompliant
    } else if expiries.iter().all(|expiry| *expiry >= threshold) {
        ComplianceStatus::Compliant
    } else {
        ComplianceStatus::Pending
    }
}

/// Directory filter selector. Unrecognized names fall back to `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceFilter {
    All,
    Compliant,
    Pending,
    Noncompliant,
}

impl ComplianceFilter {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "compliant" => Self::Compliant,
            "pending" => Self::Pending,
            "noncompliant" => Self::Noncompliant,
            _ => Self::All,
        }
    }

    pub fn matches(self, status: ComplianceStatus) -> bool {
        match self {
            Self::All => true,
            Self::Compliant => status == ComplianceStatus::Compliant,
            Self::Pending => status == ComplianceStatus::Pending,
            Self::Noncompliant => status == ComplianceStatus::Noncompliant,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Compliant => "compliant",
            Self::Pending => "pending",
            Self::Noncompliant => "noncompliant",
        }
    }
}

impl Default for ComplianceFilter {
    fn default() -> Self {
        Self::All
    }
}
