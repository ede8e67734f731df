use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::compliance::ComplianceFilter;
use super::export;
use super::service::{BusinessDirectory, DirectoryError, DirectoryService, MapMarker};
use super::table::{self, Page, SortDirection, SortKey, TableQuery};
use crate::directory::domain::BusinessId;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingQuery {
    #[serde(default)]
    pub(crate) filter: Option<String>,
    #[serde(default)]
    pub(crate) search: Option<String>,
    #[serde(default)]
    pub(crate) sort: Option<String>,
    #[serde(default)]
    pub(crate) dir: Option<String>,
    #[serde(default)]
    pub(crate) page: Option<usize>,
    #[serde(default)]
    pub(crate) page_size: Option<usize>,
    /// Reference date override, mainly for reproducible reports and tests.
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

impl ListingQuery {
    fn compliance_filter(&self) -> ComplianceFilter {
        self.filter
            .as_deref()
            .map(ComplianceFilter::parse)
            .unwrap_or_default()
    }

    fn table_query(&self) -> TableQuery {
        TableQuery {
            search: self.search.clone(),
            sort_key: self.sort.as_deref().and_then(SortKey::parse),
            sort_direction: self
                .dir
                .as_deref()
                .map(SortDirection::parse)
                .unwrap_or_default(),
            page: self.page,
            page_size: self.page_size,
        }
    }

    fn reference_date(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ListingResponse {
    pub(crate) filter: &'static str,
    pub(crate) today: NaiveDate,
    #[serde(flatten)]
    pub(crate) page: Page,
}

#[derive(Debug, Serialize)]
pub(crate) struct MarkersResponse {
    pub(crate) filter: &'static str,
    pub(crate) today: NaiveDate,
    pub(crate) markers: Vec<MapMarker>,
}

/// Router builder exposing the directory listing, details, map markers, and
/// CSV export.
pub fn directory_router<D>(service: Arc<DirectoryService<D>>) -> Router
where
    D: BusinessDirectory + 'static,
{
    Router::new()
        .route("/api/v1/businesses", get(list_handler::<D>))
        .route("/api/v1/businesses/export.csv", get(export_handler::<D>))
        .route(
            "/api/v1/businesses/:business_id",
            get(details_handler::<D>),
        )
        .route("/api/v1/map/markers", get(markers_handler::<D>))
        .with_state(service)
}

fn error_response(error: DirectoryError) -> Response {
    let status = match &error {
        DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
        DirectoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, axum::Json(json!({ "error": error.to_string() }))).into_response()
}

pub(crate) async fn list_handler<D>(
    State(service): State<Arc<DirectoryService<D>>>,
    Query(query): Query<ListingQuery>,
) -> Response
where
    D: BusinessDirectory + 'static,
{
    let filter = query.compliance_filter();
    let today = query.reference_date();

    match service.list_filtered(filter, today) {
        Ok(rows) => {
            let page = table::apply(rows, &query.table_query());
            let body = ListingResponse {
                filter: filter.label(),
                today,
                page,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn details_handler<D>(
    State(service): State<Arc<DirectoryService<D>>>,
    Path(business_id): Path<String>,
) -> Response
where
    D: BusinessDirectory + 'static,
{
    match service.details(&BusinessId(business_id)) {
        Ok(details) => (StatusCode::OK, axum::Json(details)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn markers_handler<D>(
    State(service): State<Arc<DirectoryService<D>>>,
    Query(query): Query<ListingQuery>,
) -> Response
where
    D: BusinessDirectory + 'static,
{
    let filter = query.compliance_filter();
    let today = query.reference_date();

    match service.markers(filter, today) {
        Ok(markers) => {
            let body = MarkersResponse {
                filter: filter.label(),
                today,
                markers,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_handler<D>(
    State(service): State<Arc<DirectoryService<D>>>,
    Query(query): Query<ListingQuery>,
) -> Response
where
    D: BusinessDirectory + 'static,
{
    let filter = query.compliance_filter();
    let today = query.reference_date();

    let rows = match service.list_filtered(filter, today) {
        Ok(rows) => table::apply(rows, &query.table_query().without_pagination()).rows,
        Err(error) => return error_response(error),
    };

    match export::to_csv(&rows) {
        Ok(bytes) => {
            let filename = format!("businesses_{today}.csv");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": format!("csv export failed: {error}") })),
        )
            .into_response(),
    }
}
