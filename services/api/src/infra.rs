use bizreg::directory::{
    BusinessAddress, BusinessDetails, BusinessDirectory, BusinessId, BusinessNameInfo,
    BusinessRecord, BusinessRepresentative, DirectoryError, PermitRequirements,
};
use bizreg::registration::{
    DraftId, DraftRepository, DraftStoreError, RegistrationSession, SubmissionError,
    SubmissionSink, SubmittedApplication,
};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDraftRepository {
    sessions: Arc<Mutex<HashMap<DraftId, RegistrationSession>>>,
}

impl DraftRepository for InMemoryDraftRepository {
    fn insert(&self, session: RegistrationSession) -> Result<RegistrationSession, DraftStoreError> {
        let mut guard = self.sessions.lock().expect("draft store mutex poisoned");
        if guard.contains_key(&session.id) {
            return Err(DraftStoreError::Conflict);
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn update(&self, session: RegistrationSession) -> Result<(), DraftStoreError> {
        let mut guard = self.sessions.lock().expect("draft store mutex poisoned");
        if guard.contains_key(&session.id) {
            guard.insert(session.id.clone(), session);
            Ok(())
        } else {
            Err(DraftStoreError::NotFound)
        }
    }

    fn fetch(&self, id: &DraftId) -> Result<Option<RegistrationSession>, DraftStoreError> {
        let guard = self.sessions.lock().expect("draft store mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionSink {
    applications: Arc<Mutex<Vec<SubmittedApplication>>>,
}

impl SubmissionSink for InMemorySubmissionSink {
    fn accept(&self, application: SubmittedApplication) -> Result<(), SubmissionError> {
        let mut guard = self.applications.lock().expect("submission mutex poisoned");
        guard.push(application);
        Ok(())
    }
}

impl InMemorySubmissionSink {
    pub(crate) fn applications(&self) -> Vec<SubmittedApplication> {
        self.applications
            .lock()
            .expect("submission mutex poisoned")
            .clone()
    }
}

#[derive(Clone)]
pub(crate) struct InMemoryBusinessDirectory {
    records: Vec<BusinessRecord>,
    details: HashMap<String, BusinessDetails>,
}

impl BusinessDirectory for InMemoryBusinessDirectory {
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

impl InMemoryBusinessDirectory {
    /// The Leganes sample directory served until a records backend exists.
    pub(crate) fn seeded() -> Self {
        let records = vec![
            record(
                "BIZ001",
                "Leganes General Store",
                "Juan Dela Cruz",
                "10.7868,122.5894",
                "Poblacion",
                "Rizal Street",
                "123",
                NaiveDate::from_ymd_opt(2024, 12, 31),
                NaiveDate::from_ymd_opt(2025, 12, 31),
                NaiveDate::from_ymd_opt(2024, 12, 31),
            ),
            record(
                "BIZ002",
                "Napnud Agri Supply",
                "Maria Santos",
                "10.7912,122.5921",
                "Napnud",
                "Luna Street",
                "456",
                NaiveDate::from_ymd_opt(2026, 1, 15),
                NaiveDate::from_ymd_opt(2026, 12, 31),
                NaiveDate::from_ymd_opt(2026, 12, 31),
            ),
            record(
                "BIZ003",
                "Cagamutan Hardware",
                "Pedro Reyes",
                "10.7945,122.5956",
                "Cagamutan Sur",
                "Burgos Street",
                "789",
                NaiveDate::from_ymd_opt(2023, 12, 1),
                NaiveDate::from_ymd_opt(2023, 12, 1),
                NaiveDate::from_ymd_opt(2023, 12, 1),
            ),
            record(
                "BIZ004",
                "Guihaman Bakery",
                "Ana Villanueva",
                "10.7701,122.5878",
                "Guihaman",
                "Mabini Street",
                "12",
                NaiveDate::from_ymd_opt(2026, 11, 30),
                NaiveDate::from_ymd_opt(2026, 11, 30),
                NaiveDate::from_ymd_opt(2026, 11, 30),
            ),
            record(
                "BIZ005",
                "Buntatala Pharmacy",
                "Ramon Ledesma",
                "10.7839,122.6002",
                "Buntatala",
                "Quezon Street",
                "34",
                None,
                NaiveDate::from_ymd_opt(2026, 12, 31),
                NaiveDate::from_ymd_opt(2026, 12, 31),
            ),
        ];

        let mut details = HashMap::new();
        details.insert(
            "BIZ001".to_string(),
            BusinessDetails {
                business_info: Some(BusinessNameInfo {
                    business_id: BusinessId("BIZ001".to_string()),
                    is_main: true,
                    business_name: "Leganes General Store".to_string(),
                    date_established: NaiveDate::from_ymd_opt(2010, 5, 15),
                    ownership_type: "Single Proprietorship".to_string(),
                    registered_ceo: "Juan Dela Cruz".to_string(),
                    trade_name: "LGS".to_string(),
                    active: true,
                }),
                address: Some(BusinessAddress {
                    province: "Iloilo".to_string(),
                    municipality: "Leganes".to_string(),
                    barangay: "Poblacion".to_string(),
                    street: "Rizal Street".to_string(),
                    house_no: "123".to_string(),
                    longlat: "10.7868,122.5894".to_string(),
                    cell_no: "09171234567".to_string(),
                    email: "lgs@email.com".to_string(),
                }),
                representative: Some(BusinessRepresentative {
                    name: "Juan Dela Cruz".to_string(),
                    position: "Owner".to_string(),
                    cell_no: "09171234567".to_string(),
                    email: "juan@email.com".to_string(),
                }),
                requirements: Some(PermitRequirements {
                    dti_no: "DTI123456".to_string(),
                    dti_expiry: NaiveDate::from_ymd_opt(2024, 12, 31),
                    sec_no: "SEC789012".to_string(),
                    sec_expiry: NaiveDate::from_ymd_opt(2025, 12, 31),
                    cda_no: "CDA345678".to_string(),
                    cda_expiry: NaiveDate::from_ymd_opt(2024, 12, 31),
                }),
            },
        );
        details.insert(
            "BIZ002".to_string(),
            BusinessDetails {
                business_info: Some(BusinessNameInfo {
                    business_id: BusinessId("BIZ002".to_string()),
                    is_main: true,
                    business_name: "Napnud Agri Supply".to_string(),
                    date_established: NaiveDate::from_ymd_opt(2018, 3, 20),
                    ownership_type: "Single Proprietorship".to_string(),
                    registered_ceo: "Maria Santos".to_string(),
                    trade_name: "NAS".to_string(),
                    active: true,
                }),
                address: Some(BusinessAddress {
                    province: "Iloilo".to_string(),
                    municipality: "Leganes".to_string(),
                    barangay: "Napnud".to_string(),
                    street: "Luna Street".to_string(),
                    house_no: "456".to_string(),
                    longlat: "10.7912,122.5921".to_string(),
                    cell_no: "09176543210".to_string(),
                    email: "nas@email.com".to_string(),
                }),
                representative: None,
                requirements: None,
            },
        );

        Self { records, details }
    }
}

#[allow(clippy::too_many_arguments)]
fn record(
    id: &str,
    name: &str,
    representative: &str,
    longlat: &str,
    barangay: &str,
    street: &str,
    house_no: &str,
    dti_expiry: Option<NaiveDate>,
    sec_expiry: Option<NaiveDate>,
    cda_expiry: Option<NaiveDate>,
) -> BusinessRecord {
    BusinessRecord {
        business_id: BusinessId(id.to_string()),
        business_name: name.to_string(),
        representative: representative.to_string(),
        longlat: longlat.to_string(),
        barangay: barangay.to_string(),
        municipality: "Leganes".to_string(),
        province: "Iloilo".to_string(),
        street: street.to_string(),
        house_no: house_no.to_string(),
        dti_expiry,
        sec_expiry,
        cda_expiry,
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
