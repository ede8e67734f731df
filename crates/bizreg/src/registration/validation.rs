use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use super::draft::{ApplicationDraft, DraftField};

/// A single validation finding, addressable back to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionViolation {
    #[error("{field} is required")]
    MissingField { field: DraftField },
    #[error("{field} must be a valid email address")]
    InvalidEmail { field: DraftField },
    #[error("{field} must be a valid date (YYYY-MM-DD)")]
    InvalidDate { field: DraftField },
    #[error("the undertaking must be accepted before submission")]
    TermsNotAccepted,
}

impl SubmissionViolation {
    pub fn field(&self) -> Option<DraftField> {
        match self {
            Self::MissingField { field }
            | Self::InvalidEmail { field }
            | Self::InvalidDate { field } => Some(*field),
            Self::TermsNotAccepted => Some(DraftField::AgreedToTerms),
        }
    }

    pub fn to_view(&self) -> ViolationView {
        ViolationView {
            field: self.field().map(DraftField::code),
            message: self.to_string(),
        }
    }
}

/// Wire form of a violation for inline per-field rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ViolationView {
    pub field: Option<&'static str>,
    pub message: String,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern compiles"))
}

const REQUIRED_FIELDS: [DraftField; 6] = [
    DraftField::FirstName,
    DraftField::LastName,
    DraftField::Email,
    DraftField::BirthDate,
    DraftField::BusinessName,
    DraftField::RegistrationNumber,
];

const DATE_FIELDS: [DraftField; 6] = [
    DraftField::BirthDate,
    DraftField::DateEstablished,
    DraftField::DtiIssuedDate,
    DraftField::DtiExpirationDate,
    DraftField::CdaIssuedDate,
    DraftField::CdaExpirationDate,
];

/// Validate the whole draft eagerly, collecting every violation at once.
///
/// An empty result clears the draft for submission; a non-empty result
/// blocks it until every finding is fixed.
pub fn validate_submission(draft: &ApplicationDraft) -> Vec<SubmissionViolation> {
    let mut violations = Vec::new();

    for field in REQUIRED_FIELDS {
        if text_of(draft, field).trim().is_empty() {
            violations.push(SubmissionViolation::MissingField { field });
        }
    }

    let email = text_of(draft, DraftField::Email);
    if !email.trim().is_empty() && !email_pattern().is_match(email.trim()) {
        violations.push(SubmissionViolation::InvalidEmail {
            field: DraftField::Email,
        });
    }

    for field in DATE_FIELDS {
        let raw = text_of(draft, field);
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_err() {
            violations.push(SubmissionViolation::InvalidDate { field });
        }
    }

    if !draft.undertaking.agreed_to_terms {
        violations.push(SubmissionViolation::TermsNotAccepted);
    }

    violations
}

fn text_of(draft: &ApplicationDraft, field: DraftField) -> String {
    match draft.field(field) {
        super::draft::FieldValue::Text(text) => text,
        super::draft::FieldValue::Flag(flag) => flag.to_string(),
    }
}
