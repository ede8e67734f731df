use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{DraftId, NewRequirement};
use super::draft::{DraftField, FieldValue};
use super::repository::{DraftRepository, SubmissionSink};
use super::service::{RegistrationError, RegistrationService};
use super::validation::SubmissionViolation;

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateFieldRequest {
    pub(crate) field: DraftField,
    pub(crate) value: FieldValue,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AttachFileRequest {
    pub(crate) file_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoToRequest {
    pub(crate) step: u8,
}

/// Router builder exposing HTTP endpoints for the registration wizard.
pub fn registration_router<R, S>(service: Arc<RegistrationService<R, S>>) -> Router
where
    R: DraftRepository + 'static,
    S: SubmissionSink + 'static,
{
    Router::new()
        .route("/api/v1/registrations", post(start_handler::<R, S>))
        .route(
            "/api/v1/registrations/:draft_id",
            get(get_handler::<R, S>),
        )
        .route(
            "/api/v1/registrations/:draft_id/fields",
            patch(update_field_handler::<R, S>),
        )
        .route(
            "/api/v1/registrations/:draft_id/requirements",
            post(add_requirement_handler::<R, S>),
        )
        .route(
            "/api/v1/registrations/:draft_id/requirements/:requirement_id",
            axum::routing::put(attach_file_handler::<R, S>)
                .delete(remove_requirement_handler::<R, S>),
        )
        .route(
            "/api/v1/registrations/:draft_id/advance",
            post(advance_handler::<R, S>),
        )
        .route(
            "/api/v1/registrations/:draft_id/retreat",
            post(retreat_handler::<R, S>),
        )
        .route(
            "/api/v1/registrations/:draft_id/go-to",
            post(go_to_handler::<R, S>),
        )
        .route(
            "/api/v1/registrations/:draft_id/submit",
            post(submit_handler::<R, S>),
        )
        .with_state(service)
}

fn error_response(error: RegistrationError) -> Response {
    let status = error.status_code();
    let body = match &error {
        RegistrationError::Validation(violations) => json!({
            "error": error.to_string(),
            "violations": violations
                .iter()
                .map(SubmissionViolation::to_view)
                .collect::<Vec<_>>(),
        }),
        _ => json!({ "error": error.to_string() }),
    };
    (status, axum::Json(body)).into_response()
}

pub(crate) async fn start_handler<R, S>(
    State(service): State<Arc<RegistrationService<R, S>>>,
) -> Response
where
    R: DraftRepository + 'static,
    S: SubmissionSink + 'static,
{
    match service.start() {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R, S>(
    State(service): State<Arc<RegistrationService<R, S>>>,
    Path(draft_id): Path<String>,
) -> Response
where
    R: DraftRepository + 'static,
    S: SubmissionSink + 'static,
{
    match service.get(&DraftId(draft_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_field_handler<R, S>(
    State(service): State<Arc<RegistrationService<R, S>>>,
    Path(draft_id): Path<String>,
    axum::Json(request): axum::Json<UpdateFieldRequest>,
) -> Response
where
    R: DraftRepository + 'static,
    S: SubmissionSink + 'static,
{
    match service.update_field(&DraftId(draft_id), request.field, request.value) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_requirement_handler<R, S>(
    State(service): State<Arc<RegistrationService<R, S>>>,
    Path(draft_id): Path<String>,
    axum::Json(request): axum::Json<NewRequirement>,
) -> Response
where
    R: DraftRepository + 'static,
    S: SubmissionSink + 'static,
{
    match service.add_requirement(&DraftId(draft_id), request) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn attach_file_handler<R, S>(
    State(service): State<Arc<RegistrationService<R, S>>>,
    Path((draft_id, requirement_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<AttachFileRequest>,
) -> Response
where
    R: DraftRepository + 'static,
    S: SubmissionSink + 'static,
{
    match service.mark_requirement_uploaded(&DraftId(draft_id), &requirement_id, request.file_name)
    {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_requirement_handler<R, S>(
    State(service): State<Arc<RegistrationService<R, S>>>,
    Path((draft_id, requirement_id)): Path<(String, String)>,
) -> Response
where
    R: DraftRepository + 'static,
    S: SubmissionSink + 'static,
{
    match service.remove_requirement(&DraftId(draft_id), &requirement_id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn advance_handler<R, S>(
    State(service): State<Arc<RegistrationService<R, S>>>,
    Path(draft_id): Path<String>,
) -> Response
where
    R: DraftRepository + 'static,
    S: SubmissionSink + 'static,
{
    match service.advance(&DraftId(draft_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn retreat_handler<R, S>(
    State(service): State<Arc<RegistrationService<R, S>>>,
    Path(draft_id): Path<String>,
) -> Response
where
    R: DraftRepository + 'static,
    S: SubmissionSink + 'static,
{
    match service.retreat(&DraftId(draft_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn go_to_handler<R, S>(
    State(service): State<Arc<RegistrationService<R, S>>>,
    Path(draft_id): Path<String>,
    axum::Json(request): axum::Json<GoToRequest>,
) -> Response
where
    R: DraftRepository + 'static,
    S: SubmissionSink + 'static,
{
    match service.go_to(&DraftId(draft_id), request.step) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R, S>(
    State(service): State<Arc<RegistrationService<R, S>>>,
    Path(draft_id): Path<String>,
) -> Response
where
    R: DraftRepository + 'static,
    S: SubmissionSink + 'static,
{
    match service.submit(&DraftId(draft_id)) {
        Ok(receipt) => (StatusCode::ACCEPTED, axum::Json(receipt)).into_response(),
        Err(error) => error_response(error),
    }
}
