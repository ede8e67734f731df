use serde::{Deserialize, Serialize};

/// Identifier wrapper for registration drafts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftId(pub String);

impl std::fmt::Display for DraftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The four ordered steps of the registration wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStep {
    TaxpayerInfo,
    BusinessInfo,
    Requirements,
    Undertaking,
}

impl RegistrationStep {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::TaxpayerInfo,
            Self::BusinessInfo,
            Self::Requirements,
            Self::Undertaking,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TaxpayerInfo => "Taxpayer Info",
            Self::BusinessInfo => "Business Info",
            Self::Requirements => "Requirements",
            Self::Undertaking => "Undertaking",
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::TaxpayerInfo => 1,
            Self::BusinessInfo => 2,
            Self::Requirements => 3,
            Self::Undertaking => 4,
        }
    }

    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::TaxpayerInfo),
            2 => Some(Self::BusinessInfo),
            3 => Some(Self::Requirements),
            4 => Some(Self::Undertaking),
            _ => None,
        }
    }
}

/// Derived standing of a step relative to the wizard's current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Complete,
    Current,
    Incomplete,
}

impl StepStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Complete => "Complete",
            Self::Current => "Current",
            Self::Incomplete => "Incomplete",
        }
    }
}

/// Upload standing of a supporting document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    Pending,
    Uploaded,
}

impl RequirementStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Uploaded => "Uploaded",
        }
    }
}

/// A named supporting document attached to the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: String,
    pub kind: String,
    pub description: String,
    pub status: RequirementStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Inbound payload for attaching a new supporting document.
///
/// Kind, description, and file name must all be present for the add to
/// succeed; a partial payload appends nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRequirement {
    pub kind: String,
    pub description: String,
    pub file_name: String,
}

/// Errors raised by requirement-list mutations.
#[derive(Debug, thiserror::Error)]
pub enum RequirementError {
    #[error("requirement kind, description, and file are all required")]
    Incomplete,
    #[error("requirement {0} not found")]
    NotFound(String),
}
