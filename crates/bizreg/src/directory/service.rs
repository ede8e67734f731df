use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::warn;

use super::compliance::{classify, ComplianceFilter, ComplianceStatus, PermitExpiries};
use super::domain::{BusinessDetails, BusinessId, BusinessRecord, Coordinates};

/// Read abstraction over the registered-business directory.
pub trait BusinessDirectory: Send + Sync {
    fn list_all(&self) -> Result<Vec<BusinessRecord>, DirectoryError>;
    fn details(&self, id: &BusinessId) -> Result<BusinessDetails, DirectoryError>;
}

/// Error enumeration for directory failures.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("business {0} not found")]
    NotFound(BusinessId),
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// A listing row with the classification already applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessRow {
    pub business_id: BusinessId,
    pub business_name: String,
    pub representative: String,
    pub barangay: String,
    pub municipality: String,
    pub province: String,
    pub street: String,
    pub house_no: String,
    pub dti_expiry: Option<NaiveDate>,
    pub sec_expiry: Option<NaiveDate>,
    pub cda_expiry: Option<NaiveDate>,
    pub compliance: ComplianceStatus,
}

impl BusinessRow {
    fn from_record(record: &BusinessRecord, today: NaiveDate) -> Self {
        Self {
            business_id: record.business_id.clone(),
            business_name: record.business_name.clone(),
            representative: record.representative.clone(),
            barangay: record.barangay.clone(),
            municipality: record.municipality.clone(),
            province: record.province.clone(),
            street: record.street.clone(),
            house_no: record.house_no.clone(),
            dti_expiry: record.dti_expiry,
            sec_expiry: record.sec_expiry,
            cda_expiry: record.cda_expiry,
            compliance: classify(&PermitExpiries::from(record), today),
        }
    }
}

/// Counts backing the dashboard stat cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryStats {
    pub total: usize,
    pub compliant: usize,
    pub pending: usize,
    pub noncompliant: usize,
    pub municipalities: usize,
}

/// Map pin for the compliance viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub position: Coordinates,
    pub business_id: BusinessId,
    pub business_name: String,
    pub owner: String,
    pub address: String,
    pub compliance: ComplianceStatus,
}

/// Read-side service layering classification, filtering, statistics, and
/// marker assembly over a [`BusinessDirectory`].
pub struct DirectoryService<D> {
    directory: Arc<D>,
}

impl<D> DirectoryService<D>
where
    D: BusinessDirectory + 'static,
{
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    pub fn list_all(&self) -> Result<Vec<BusinessRecord>, DirectoryError> {
        self.directory.list_all()
    }

    pub fn details(&self, id: &BusinessId) -> Result<BusinessDetails, DirectoryError> {
        self.directory.details(id)
    }

    /// Classified rows narrowed to the requested filter.
    pub fn list_filtered(
        &self,
        filter: ComplianceFilter,
        today: NaiveDate,
    ) -> Result<Vec<BusinessRow>, DirectoryError> {
        let rows = self
            .directory
            .list_all()?
            .iter()
            .map(|record| BusinessRow::from_record(record, today))
            .filter(|row| filter.matches(row.compliance))
            .collect();
        Ok(rows)
    }

    pub fn stats(&self, today: NaiveDate) -> Result<DirectoryStats, DirectoryError> {
        let records = self.directory.list_all()?;
        let mut stats = DirectoryStats {
            total: records.len(),
            ..DirectoryStats::default()
        };

        let mut municipalities: Vec<&str> = Vec::new();
        for record in &records {
            match classify(&PermitExpiries::from(record), today) {
                ComplianceStatus::Compliant => stats.compliant += 1,
                ComplianceStatus::Pending => stats.pending += 1,
                ComplianceStatus::Noncompliant => stats.noncompliant += 1,
            }
            if !municipalities.contains(&record.municipality.as_str()) {
                municipalities.push(&record.municipality);
            }
        }
        stats.municipalities = municipalities.len();

        Ok(stats)
    }

    /// Marker views for the map page. Records with unparseable coordinates
    /// are skipped with a warning rather than failing the whole page.
    pub fn markers(
        &self,
        filter: ComplianceFilter,
        today: NaiveDate,
    ) -> Result<Vec<MapMarker>, DirectoryError> {
        let mut markers = Vec::new();
        for record in self.directory.list_all()? {
            let status = classify(&PermitExpiries::from(&record), today);
            if !filter.matches(status) {
                continue;
            }

            let position = match Coordinates::parse(&record.longlat) {
                Ok(position) => position,
                Err(error) => {
                    warn!(business_id = %record.business_id, %error, "skipping marker");
                    continue;
                }
            };

            markers.push(MapMarker {
                position,
                business_id: record.business_id.clone(),
                business_name: record.business_name.clone(),
                owner: record.representative.clone(),
                address: record.address_line(),
                compliance: status,
            });
        }
        Ok(markers)
    }

    /// Businesses whose DTI registration lapses within the given window.
    pub fn expiring_dti_within(
        &self,
        days: i64,
        today: NaiveDate,
    ) -> Result<Vec<BusinessRecord>, DirectoryError> {
        let horizon = today + Duration::days(days);
        let records = self
            .directory
            .list_all()?
            .into_iter()
            .filter(|record| {
                record
                    .dti_expiry
                    .map(|expiry| expiry >= today && expiry < horizon)
                    .unwrap_or(false)
            })
            .collect();
        Ok(records)
    }
}

impl<D> Clone for DirectoryService<D> {
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
        }
    }
}
