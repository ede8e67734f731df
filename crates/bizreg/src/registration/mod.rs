//! Registration wizard: the application draft, the step controller, eager
//! submit-time validation, and the HTTP surface that drives them.

pub mod domain;
pub mod draft;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;
pub mod wizard;

pub use domain::{
    DraftId, NewRequirement, RegistrationStep, Requirement, RequirementError, RequirementStatus,
    StepStatus,
};
pub use draft::{
    ApplicationDraft, BusinessProfile, DraftField, DraftFieldError, FieldValue,
    PermitRegistrations, TaxpayerProfile, UndertakingInfo,
};
pub use repository::{
    DraftRepository, DraftStoreError, RegistrationSession, SessionStatus, SessionView,
    SubmissionError, SubmissionReceipt, SubmissionSink, SubmittedApplication,
};
pub use router::registration_router;
pub use service::{RegistrationError, RegistrationService};
pub use validation::{validate_submission, SubmissionViolation, ViolationView};
pub use wizard::{RegistrationWizard, StepView, WizardError};
