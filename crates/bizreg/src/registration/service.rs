use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;

use super::domain::{DraftId, NewRequirement, RequirementError};
use super::draft::{DraftField, DraftFieldError, FieldValue};
use super::repository::{
    DraftRepository, DraftStoreError, RegistrationSession, SessionStatus, SessionView,
    SubmissionError, SubmissionReceipt, SubmissionSink, SubmittedApplication,
};
use super::validation::{validate_submission, SubmissionViolation};
use super::wizard::WizardError;

/// Service composing the draft store, wizard controller, validation guard,
/// and submission sink.
pub struct RegistrationService<R, S> {
    drafts: Arc<R>,
    sink: Arc<S>,
}

static DRAFT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_draft_id() -> DraftId {
    let id = DRAFT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DraftId(format!("draft-{id:06}"))
}

impl<R, S> RegistrationService<R, S>
where
    R: DraftRepository + 'static,
    S: SubmissionSink + 'static,
{
    pub fn new(drafts: Arc<R>, sink: Arc<S>) -> Self {
        Self { drafts, sink }
    }

    /// Open a fresh draft at step 1 with default values.
    pub fn start(&self) -> Result<SessionView, RegistrationError> {
        let session = RegistrationSession::new(next_draft_id());
        let stored = self.drafts.insert(session)?;
        Ok(stored.to_view())
    }

    pub fn get(&self, id: &DraftId) -> Result<SessionView, RegistrationError> {
        let session = self
            .drafts
            .fetch(id)?
            .ok_or_else(|| RegistrationError::DraftNotFound(id.clone()))?;
        Ok(session.to_view())
    }

    pub fn update_field(
        &self,
        id: &DraftId,
        field: DraftField,
        value: FieldValue,
    ) -> Result<SessionView, RegistrationError> {
        self.mutate(id, |session| {
            session.draft.set_field(field, value)?;
            Ok(())
        })
    }

    pub fn add_requirement(
        &self,
        id: &DraftId,
        new: NewRequirement,
    ) -> Result<SessionView, RegistrationError> {
        self.mutate(id, |session| {
            session.draft.add_requirement(new)?;
            Ok(())
        })
    }

    pub fn mark_requirement_uploaded(
        &self,
        id: &DraftId,
        requirement_id: &str,
        file_name: String,
    ) -> Result<SessionView, RegistrationError> {
        self.mutate(id, |session| {
            session
                .draft
                .mark_requirement_uploaded(requirement_id, file_name)?;
            Ok(())
        })
    }

    pub fn remove_requirement(
        &self,
        id: &DraftId,
        requirement_id: &str,
    ) -> Result<SessionView, RegistrationError> {
        self.mutate(id, |session| {
            session.draft.remove_requirement(requirement_id)?;
            Ok(())
        })
    }

    pub fn advance(&self, id: &DraftId) -> Result<SessionView, RegistrationError> {
        self.mutate(id, |session| {
            session.wizard.advance();
            Ok(())
        })
    }

    pub fn retreat(&self, id: &DraftId) -> Result<SessionView, RegistrationError> {
        self.mutate(id, |session| {
            session.wizard.retreat();
            Ok(())
        })
    }

    pub fn go_to(&self, id: &DraftId, step_number: u8) -> Result<SessionView, RegistrationError> {
        self.mutate(id, |session| {
            session.wizard.go_to(step_number)?;
            Ok(())
        })
    }

    /// Submit the draft from the final step.
    ///
    /// Validation runs eagerly and reports every violation at once; a clean
    /// draft is handed to the submission sink and the session is frozen.
    pub fn submit(&self, id: &DraftId) -> Result<SubmissionReceipt, RegistrationError> {
        let mut session = self.fetch_in_progress(id)?;

        if !session.wizard.is_final_step() {
            return Err(RegistrationError::NotOnFinalStep {
                current: session.wizard.current_number(),
            });
        }

        let violations = validate_submission(&session.draft);
        if !violations.is_empty() {
            return Err(RegistrationError::Validation(violations));
        }

        self.sink.accept(SubmittedApplication {
            draft_id: session.id.clone(),
            draft: session.draft.clone(),
        })?;

        session.status = SessionStatus::Submitted;
        let receipt = SubmissionReceipt {
            draft_id: session.id.clone(),
            status: session.status.label(),
            business_name: session.draft.business.business_name.clone(),
            requirements_uploaded: session.draft.uploaded_requirements(),
        };
        self.drafts.update(session)?;

        Ok(receipt)
    }

    fn mutate(
        &self,
        id: &DraftId,
        apply: impl FnOnce(&mut RegistrationSession) -> Result<(), RegistrationError>,
    ) -> Result<SessionView, RegistrationError> {
        let mut session = self.fetch_in_progress(id)?;
        apply(&mut session)?;
        let view = session.to_view();
        self.drafts.update(session)?;
        Ok(view)
    }

    fn fetch_in_progress(&self, id: &DraftId) -> Result<RegistrationSession, RegistrationError> {
        let session = self
            .drafts
            .fetch(id)?
            .ok_or_else(|| RegistrationError::DraftNotFound(id.clone()))?;

        if session.status == SessionStatus::Submitted {
            return Err(RegistrationError::AlreadySubmitted(id.clone()));
        }

        Ok(session)
    }
}

/// Error raised by the registration service.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("draft {0} not found")]
    DraftNotFound(DraftId),
    #[error("draft {0} has already been submitted")]
    AlreadySubmitted(DraftId),
    #[error("submission is only available on the final step (currently on step {current})")]
    NotOnFinalStep { current: u8 },
    #[error("submission blocked by {} validation issue(s)", .0.len())]
    Validation(Vec<SubmissionViolation>),
    #[error(transparent)]
    Field(#[from] DraftFieldError),
    #[error(transparent)]
    Requirement(#[from] RequirementError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Store(#[from] DraftStoreError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl RegistrationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DraftNotFound(_)
            | Self::Requirement(RequirementError::NotFound(_))
            | Self::Store(DraftStoreError::NotFound) => StatusCode::NOT_FOUND,
            Self::AlreadySubmitted(_)
            | Self::NotOnFinalStep { .. }
            | Self::Store(DraftStoreError::Conflict) => StatusCode::CONFLICT,
            Self::Validation(_)
            | Self::Field(_)
            | Self::Requirement(RequirementError::Incomplete)
            | Self::Wizard(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store(DraftStoreError::Unavailable(_)) | Self::Submission(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
