use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for directory entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusinessId(pub String);

impl std::fmt::Display for BusinessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered business as listed in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub business_id: BusinessId,
    pub business_name: String,
    pub representative: String,
    /// Raw `"lat,lng"` pair as captured at registration time.
    pub longlat: String,
    pub barangay: String,
    pub municipality: String,
    pub province: String,
    pub street: String,
    pub house_no: String,
    pub dti_expiry: Option<NaiveDate>,
    pub sec_expiry: Option<NaiveDate>,
    pub cda_expiry: Option<NaiveDate>,
}

impl BusinessRecord {
    /// Single-line postal rendering used by markers and exports.
    pub fn address_line(&self) -> String {
        format!(
            "{} {}, {}, {}, {}",
            self.house_no, self.street, self.barangay, self.municipality, self.province
        )
    }
}

/// Parsed map position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Parse a `"lat,lng"` pair.
    pub fn parse(raw: &str) -> Result<Self, CoordinateError> {
        let mut parts = raw.split(',');
        let lat = parts.next().map(str::trim).unwrap_or_default();
        let lng = parts.next().map(str::trim).unwrap_or_default();

        if lat.is_empty() || lng.is_empty() || parts.next().is_some() {
            return Err(CoordinateError::Malformed(raw.to_string()));
        }

        let lat = lat
            .parse::<f64>()
            .map_err(|_| CoordinateError::Malformed(raw.to_string()))?;
        let lng = lng
            .parse::<f64>()
            .map_err(|_| CoordinateError::Malformed(raw.to_string()))?;

        Ok(Self { lat, lng })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoordinateError {
    #[error("coordinates '{0}' are not a lat,lng pair")]
    Malformed(String),
}

/// Business identity section of the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessNameInfo {
    pub business_id: BusinessId,
    pub is_main: bool,
    pub business_name: String,
    pub date_established: Option<NaiveDate>,
    pub ownership_type: String,
    pub registered_ceo: String,
    pub trade_name: String,
    pub active: bool,
}

/// Address and contact section of the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessAddress {
    pub province: String,
    pub municipality: String,
    pub barangay: String,
    pub street: String,
    pub house_no: String,
    pub longlat: String,
    pub cell_no: String,
    pub email: String,
}

/// Representative section of the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRepresentative {
    pub name: String,
    pub position: String,
    pub cell_no: String,
    pub email: String,
}

/// Permit numbers and expiries of the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermitRequirements {
    pub dti_no: String,
    pub dti_expiry: Option<NaiveDate>,
    pub sec_no: String,
    pub sec_expiry: Option<NaiveDate>,
    pub cda_no: String,
    pub cda_expiry: Option<NaiveDate>,
}

/// Detail payload: every section is optional because upstream records are
/// unevenly populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_info: Option<BusinessNameInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<BusinessAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representative: Option<BusinessRepresentative>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<PermitRequirements>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_parse_a_lat_lng_pair() {
        let parsed = Coordinates::parse("10.7868,122.5894").expect("valid pair");
        assert!((parsed.lat - 10.7868).abs() < f64::EPSILON);
        assert!((parsed.lng - 122.5894).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_coordinates_are_rejected() {
        for raw in ["", "10.78", "a,b", "1,2,3"] {
            assert!(Coordinates::parse(raw).is_err(), "{raw} should fail");
        }
    }
}
