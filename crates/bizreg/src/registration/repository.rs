use serde::{Deserialize, Serialize};

use super::domain::DraftId;
use super::draft::ApplicationDraft;
use super::wizard::{RegistrationWizard, StepView};

/// Lifecycle of a registration session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Submitted,
}

impl SessionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Submitted => "submitted",
        }
    }
}

/// A stored wizard session: the draft plus the controller position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationSession {
    pub id: DraftId,
    pub draft: ApplicationDraft,
    pub wizard: RegistrationWizard,
    pub status: SessionStatus,
}

impl RegistrationSession {
    pub fn new(id: DraftId) -> Self {
        Self {
            id,
            draft: ApplicationDraft::new(),
            wizard: RegistrationWizard::new(),
            status: SessionStatus::InProgress,
        }
    }

    pub fn to_view(&self) -> SessionView {
        SessionView {
            draft_id: self.id.clone(),
            status: self.status.label(),
            current_step: self.wizard.current_number(),
            steps: self.wizard.step_views(),
            draft: self.draft.clone(),
        }
    }
}

/// Wire representation of a session for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub draft_id: DraftId,
    pub status: &'static str,
    pub current_step: u8,
    pub steps: Vec<StepView>,
    pub draft: ApplicationDraft,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait DraftRepository: Send + Sync {
    fn insert(&self, session: RegistrationSession) -> Result<RegistrationSession, DraftStoreError>;
    fn update(&self, session: RegistrationSession) -> Result<(), DraftStoreError>;
    fn fetch(&self, id: &DraftId) -> Result<Option<RegistrationSession>, DraftStoreError>;
}

/// Error enumeration for draft-store failures.
#[derive(Debug, thiserror::Error)]
pub enum DraftStoreError {
    #[error("draft already exists")]
    Conflict,
    #[error("draft not found")]
    NotFound,
    #[error("draft store unavailable: {0}")]
    Unavailable(String),
}

/// The validated application handed to the submission target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedApplication {
    pub draft_id: DraftId,
    pub draft: ApplicationDraft,
}

/// Trait describing the outbound submission hook (the backend that owns
/// accepted applications).
pub trait SubmissionSink: Send + Sync {
    fn accept(&self, application: SubmittedApplication) -> Result<(), SubmissionError>;
}

/// Submission dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission transport unavailable: {0}")]
    Transport(String),
}

/// Receipt returned to the registrant after a clean submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub draft_id: DraftId,
    pub status: &'static str,
    pub business_name: String,
    pub requirements_uploaded: usize,
}
