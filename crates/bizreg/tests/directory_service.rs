//! Integration scenarios for the business directory: classification-driven
//! filtering, details lookup, marker assembly, statistics, table queries,
//! and CSV export, through the service facade and the HTTP router.

mod common {
    use std::collections::HashMap;
    use std::sync::Arc;

    use bizreg::directory::{
        BusinessDetails, BusinessDirectory, BusinessId, BusinessRecord, DirectoryError,
        DirectoryService, PermitRequirements,
    };
    use chrono::NaiveDate;

    pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    /// Reference date every fixture is classified against.
    pub(super) fn today() -> NaiveDate {
        date(2024, 1, 1)
    }

    #[derive(Clone)]
    pub(super) struct MemoryDirectory {
        records: Vec<BusinessRecord>,
        details: HashMap<String, BusinessDetails>,
    }

    impl MemoryDirectory {
        pub(super) fn from_records(
            records: Vec<BusinessRecord>,
            details: HashMap<String, BusinessDetails>,
        ) -> Self {
            Self { records, details }
        }
    }

    impl BusinessDirectory for MemoryDirectory {
        fn list_all(&self) -> Result<Vec<BusinessRecord>, DirectoryError> {
            Ok(self.records.clone())
        }

        fn details(&self, id: &BusinessId) -> Result<BusinessDetails, DirectoryError> {
            self.details
                .get(id.0.as_str())
                .cloned()
                .ok_or_else(|| DirectoryError::NotFound(id.clone()))
        }
    }

    pub(super) fn record(
        id: &str,
        name: &str,
        longlat: &str,
        expiry: Option<NaiveDate>,
    ) -> BusinessRecord {
        BusinessRecord {
            business_id: BusinessId(id.to_string()),
            business_name: name.to_string(),
            representative: format!("{name} Owner"),
            longlat: longlat.to_string(),
            barangay: "Poblacion".to_string(),
            municipality: "Leganes".to_string(),
            province: "Iloilo".to_string(),
            street: "Rizal Street".to_string(),
            house_no: "1".to_string(),
            dti_expiry: expiry,
            sec_expiry: expiry,
            cda_expiry: expiry,
        }
    }

    /// One business per compliance bucket, relative to [`today`].
    pub(super) fn build_service() -> DirectoryService<MemoryDirectory> {
        let records = vec![
            record(
                "BIZ-OK",
                "Compliant Store",
                "10.7868,122.5894",
                Some(date(2024, 6, 1)),
            ),
            record(
                "BIZ-SOON",
                "Pending Store",
                "10.7912,122.5921",
                Some(date(2024, 1, 15)),
            ),
            record(
                "BIZ-PAST",
                "Lapsed Store",
                "10.7945,122.5956",
                Some(date(2023, 12, 1)),
            ),
        ];

        let mut details = HashMap::new();
        details.insert(
            "BIZ-OK".to_string(),
            BusinessDetails {
                requirements: Some(PermitRequirements {
                    dti_no: "DTI123456".to_string(),
                    dti_expiry: Some(date(2024, 6, 1)),
                    sec_no: "SEC789012".to_string(),
                    sec_expiry: Some(date(2024, 6, 1)),
                    cda_no: "CDA345678".to_string(),
                    cda_expiry: Some(date(2024, 6, 1)),
                }),
                ..BusinessDetails::default()
            },
        );

        DirectoryService::new(Arc::new(MemoryDirectory { records, details }))
    }
}

mod filtering {
    use super::common::*;
    use bizreg::directory::{ComplianceFilter, ComplianceStatus};

    #[test]
    fn each_bucket_filters_to_its_own_record() {
        let service = build_service();

        let compliant = service
            .list_filtered(ComplianceFilter::Compliant, today())
            .expect("filtered list");
        assert_eq!(compliant.len(), 1);
        assert_eq!(compliant[0].business_id.0, "BIZ-OK");
        assert_eq!(compliant[0].compliance, ComplianceStatus::Compliant);

        let pending = service
            .list_filtered(ComplianceFilter::Pending, today())
            .expect("filtered list");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].business_id.0, "BIZ-SOON");

        let noncompliant = service
            .list_filtered(ComplianceFilter::Noncompliant, today())
            .expect("filtered list");
        assert_eq!(noncompliant.len(), 1);
        assert_eq!(noncompliant[0].business_id.0, "BIZ-PAST");
    }

    #[test]
    fn unrecognized_filter_matches_the_unfiltered_list() {
        let service = build_service();
        let all = service
            .list_filtered(ComplianceFilter::parse("all"), today())
            .expect("list");
        let bogus = service
            .list_filtered(ComplianceFilter::parse("bogus-filter"), today())
            .expect("list");

        let ids = |rows: &[bizreg::directory::BusinessRow]| {
            rows.iter()
                .map(|row| row.business_id.0.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&all), ids(&bogus));
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn stats_partition_the_directory() {
        let service = build_service();
        let stats = service.stats(today()).expect("stats");
        assert_eq!(stats.total, 3);
        assert_eq!(
            stats.total,
            stats.compliant + stats.pending + stats.noncompliant
        );
        assert_eq!(stats.compliant, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.noncompliant, 1);
        assert_eq!(stats.municipalities, 1);
    }
}

mod details {
    use super::common::*;
    use bizreg::directory::{BusinessId, DirectoryError};

    #[test]
    fn known_id_returns_the_detail_sections() {
        let service = build_service();
        let details = service
            .details(&BusinessId("BIZ-OK".to_string()))
            .expect("details");
        let requirements = details.requirements.expect("requirements section");
        assert_eq!(requirements.dti_no, "DTI123456");
    }

    #[test]
    fn absent_id_fails_with_not_found() {
        let service = build_service();
        match service.details(&BusinessId("BIZ-NONE".to_string())) {
            Err(DirectoryError::NotFound(id)) => assert_eq!(id.0, "BIZ-NONE"),
            other => panic!("expected not-found, got {other:?}"),
        }
    }
}

mod markers {
    use super::common::*;
    use bizreg::directory::{ComplianceFilter, ComplianceStatus, DirectoryService};
    use std::collections::HashMap;
    use std::sync::Arc;

    #[test]
    fn markers_carry_position_and_classification() {
        let service = build_service();
        let markers = service
            .markers(ComplianceFilter::All, today())
            .expect("markers");

        assert_eq!(markers.len(), 3);
        let lapsed = markers
            .iter()
            .find(|marker| marker.business_id.0 == "BIZ-PAST")
            .expect("lapsed marker");
        assert_eq!(lapsed.compliance, ComplianceStatus::Noncompliant);
        assert!((lapsed.position.lat - 10.7945).abs() < 1e-9);
        assert!(lapsed.address.contains("Rizal Street"));
    }

    #[test]
    fn unparseable_coordinates_are_skipped_not_fatal() {
        let records = vec![
            record("BIZ-GOOD", "Mapped Store", "10.78,122.58", Some(date(2024, 6, 1))),
            record("BIZ-BAD", "Unmapped Store", "not-coordinates", Some(date(2024, 6, 1))),
        ];
        let service = DirectoryService::new(Arc::new(super::common::MemoryDirectory::from_records(
            records,
            HashMap::new(),
        )));

        let markers = service
            .markers(ComplianceFilter::All, today())
            .expect("markers");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].business_id.0, "BIZ-GOOD");
    }

    #[test]
    fn marker_filter_narrows_by_status() {
        let service = build_service();
        let markers = service
            .markers(ComplianceFilter::Noncompliant, today())
            .expect("markers");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].business_id.0, "BIZ-PAST");
    }
}

mod export {
    use super::common::*;
    use bizreg::directory::{export, table, ComplianceFilter, SortKey, TableQuery};

    #[test]
    fn csv_holds_exactly_the_filtered_rows_in_sorted_order() {
        let service = build_service();
        let rows = service
            .list_filtered(ComplianceFilter::All, today())
            .expect("rows");
        let query = TableQuery {
            sort_key: Some(SortKey::BusinessName),
            ..TableQuery::default()
        }
        .without_pagination();
        let page = table::apply(rows, &query);

        let bytes = export::to_csv(&page.rows).expect("csv renders");
        let text = String::from_utf8(bytes).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("business_id,"));
        assert!(lines[1].contains("Compliant Store"));
        assert!(lines[2].contains("Lapsed Store"));
        assert!(lines[3].contains("Pending Store"));
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use bizreg::directory::directory_router;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn build_router() -> axum::Router {
        directory_router(Arc::new(build_service()))
    }

    #[tokio::test]
    async fn listing_applies_filter_search_and_pagination() {
        let router = build_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/businesses?filter=pending&search=store&today=2024-01-01&page=1&page_size=10")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload.get("filter"), Some(&json!("pending")));
        assert_eq!(payload.get("total_rows"), Some(&json!(1)));
        assert_eq!(
            payload.pointer("/rows/0/business_id").and_then(Value::as_str),
            Some("BIZ-SOON")
        );
    }

    #[tokio::test]
    async fn export_route_serves_csv_with_attachment_headers() {
        let router = build_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/businesses/export.csv?filter=all&today=2024-01-01")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/csv"));
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.contains("businesses_2024-01-01.csv"));

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let text = String::from_utf8(body.to_vec()).expect("utf8");
        assert_eq!(text.lines().count(), 4);
    }

    #[tokio::test]
    async fn markers_route_reports_filter_and_positions() {
        let router = build_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/map/markers?filter=noncompliant&today=2024-01-01")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload.get("filter"), Some(&json!("noncompliant")));
        assert_eq!(
            payload
                .get("markers")
                .and_then(Value::as_array)
                .map(Vec::len),
            Some(1)
        );
        assert_eq!(
            payload
                .pointer("/markers/0/compliance")
                .and_then(Value::as_str),
            Some("noncompliant")
        );
    }

    #[tokio::test]
    async fn details_route_maps_absent_ids_to_404() {
        let router = build_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/businesses/BIZ-NONE")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), 1024).await.expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert!(payload
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .contains("not found"));
    }
}
