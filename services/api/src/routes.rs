use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use bizreg::dashboard::{dashboard_router, SummaryService};
use bizreg::directory::{directory_router, BusinessDirectory, DirectoryService};
use bizreg::registration::{
    registration_router, DraftRepository, RegistrationService, SubmissionSink,
};
use serde_json::json;
use std::sync::Arc;

/// Compose the portal surface: registration wizard, directory, dashboard,
/// and the operational endpoints.
pub(crate) fn portal_router<R, S, D>(
    registration: Arc<RegistrationService<R, S>>,
    directory: Arc<DirectoryService<D>>,
    dashboard: Arc<SummaryService<D>>,
) -> axum::Router
where
    R: DraftRepository + 'static,
    S: SubmissionSink + 'static,
    D: BusinessDirectory + 'static,
{
    registration_router(registration)
        .merge(directory_router(directory))
        .merge(dashboard_router(dashboard))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
