use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::domain::{NewRequirement, Requirement, RequirementError, RequirementStatus};
use super::domain::RegistrationStep;

/// Taxpayer identity and contact details captured on the first step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxpayerProfile {
    pub taxpayer_type: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub gender: String,
    pub civil_status: String,
    pub email: String,
    pub phone: String,
    pub tin: String,
    pub street: String,
    pub barangay: String,
    pub city_municipality: String,
    pub province: String,
    pub postal_code: String,
}

impl Default for TaxpayerProfile {
    fn default() -> Self {
        Self {
            taxpayer_type: "individual".to_string(),
            first_name: String::new(),
            middle_name: String::new(),
            last_name: String::new(),
            birth_date: String::new(),
            gender: String::new(),
            civil_status: String::new(),
            email: String::new(),
            phone: String::new(),
            tin: String::new(),
            street: String::new(),
            barangay: String::new(),
            city_municipality: String::new(),
            province: String::new(),
            postal_code: String::new(),
        }
    }
}

/// Business identity, premises, and activity details from the second step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub business_type: String,
    pub business_name: String,
    pub trade_name: String,
    pub registration_number: String,
    pub date_established: String,
    pub president_name: String,
    pub same_as_business_name: bool,
    pub branch: bool,
    pub foreign_company: bool,
    pub building_name: String,
    pub subdivision: String,
    pub landmark: String,
    pub telephone_no: String,
    pub cellphone_no: String,
    pub fax_no: String,
    pub email_address: String,
    pub primary_activity: String,
    pub secondary_activity: String,
    pub products_services: String,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            business_type: "sole".to_string(),
            business_name: String::new(),
            trade_name: String::new(),
            registration_number: String::new(),
            date_established: String::new(),
            president_name: String::new(),
            same_as_business_name: false,
            branch: false,
            foreign_company: false,
            building_name: String::new(),
            subdivision: String::new(),
            landmark: String::new(),
            telephone_no: String::new(),
            cellphone_no: String::new(),
            fax_no: String::new(),
            email_address: String::new(),
            primary_activity: String::new(),
            secondary_activity: String::new(),
            products_services: String::new(),
        }
    }
}

/// National permit registrations captured alongside the requirements step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitRegistrations {
    pub dti_no: String,
    pub dti_issued_date: String,
    pub dti_expiration_date: String,
    pub sec_registration_no: String,
    pub cda_no: String,
    pub cda_issued_date: String,
    pub cda_expiration_date: String,
    pub community_tax_cert_no: String,
    pub community_tax_place: String,
    pub community_tax_issued_date: String,
    pub community_tax_amount: String,
}

/// Agreement and emergency details from the final step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndertakingInfo {
    pub agreed_to_terms: bool,
    pub emergency_name: String,
    pub emergency_contact: String,
    pub insurance_provider: String,
    pub policy_number: String,
    pub additional_comments: String,
}

/// A single draft value: free text or a flag. Requirements are managed
/// through their own operations, not through field writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Flag(_) => "flag",
            Self::Text(_) => "text",
        }
    }
}

/// Errors raised by draft field access.
#[derive(Debug, thiserror::Error)]
pub enum DraftFieldError {
    #[error("unknown draft field '{0}'")]
    UnknownField(String),
    #[error("{field} expects a {expected} value")]
    KindMismatch {
        field: DraftField,
        expected: &'static str,
    },
}

/// Addressable draft fields, namespaced by the wizard step that owns them.
///
/// The wire code (`"taxpayer.first_name"`, `"undertaking.agreed_to_terms"`,
/// ...) is the stable contract clients patch against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    // Taxpayer Info
    TaxpayerType,
    FirstName,
    MiddleName,
    LastName,
    BirthDate,
    Gender,
    CivilStatus,
    Email,
    Phone,
    Tin,
    Street,
    Barangay,
    CityMunicipality,
    Province,
    PostalCode,
    // Business Info
    BusinessType,
    BusinessName,
    TradeName,
    RegistrationNumber,
    DateEstablished,
    PresidentName,
    SameAsBusinessName,
    Branch,
    ForeignCompany,
    BuildingName,
    Subdivision,
    Landmark,
    TelephoneNo,
    CellphoneNo,
    FaxNo,
    EmailAddress,
    PrimaryActivity,
    SecondaryActivity,
    ProductsServices,
    // Permit registrations
    DtiNo,
    DtiIssuedDate,
    DtiExpirationDate,
    SecRegistrationNo,
    CdaNo,
    CdaIssuedDate,
    CdaExpirationDate,
    CommunityTaxCertNo,
    CommunityTaxPlace,
    CommunityTaxIssuedDate,
    CommunityTaxAmount,
    // Undertaking
    AgreedToTerms,
    EmergencyName,
    EmergencyContact,
    InsuranceProvider,
    PolicyNumber,
    AdditionalComments,
}

impl DraftField {
    pub const ALL: [Self; 51] = [
        Self::TaxpayerType,
        Self::FirstName,
        Self::MiddleName,
        Self::LastName,
        Self::BirthDate,
        Self::Gender,
        Self::CivilStatus,
        Self::Email,
        Self::Phone,
        Self::Tin,
        Self::Street,
        Self::Barangay,
        Self::CityMunicipality,
        Self::Province,
        Self::PostalCode,
        Self::BusinessType,
        Self::BusinessName,
        Self::TradeName,
        Self::RegistrationNumber,
        Self::DateEstablished,
        Self::PresidentName,
        Self::SameAsBusinessName,
        Self::Branch,
        Self::ForeignCompany,
        Self::BuildingName,
        Self::Subdivision,
        Self::Landmark,
        Self::TelephoneNo,
        Self::CellphoneNo,
        Self::FaxNo,
        Self::EmailAddress,
        Self::PrimaryActivity,
        Self::SecondaryActivity,
        Self::ProductsServices,
        Self::DtiNo,
        Self::DtiIssuedDate,
        Self::DtiExpirationDate,
        Self::SecRegistrationNo,
        Self::CdaNo,
        Self::CdaIssuedDate,
        Self::CdaExpirationDate,
        Self::CommunityTaxCertNo,
        Self::CommunityTaxPlace,
        Self::CommunityTaxIssuedDate,
        Self::CommunityTaxAmount,
        Self::AgreedToTerms,
        Self::EmergencyName,
        Self::EmergencyContact,
        Self::InsuranceProvider,
        Self::PolicyNumber,
        Self::AdditionalComments,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Self::TaxpayerType => "taxpayer.taxpayer_type",
            Self::FirstName => "taxpayer.first_name",
            Self::MiddleName => "taxpayer.middle_name",
            Self::LastName => "taxpayer.last_name",
            Self::BirthDate => "taxpayer.birth_date",
            Self::Gender => "taxpayer.gender",
            Self::CivilStatus => "taxpayer.civil_status",
            Self::Email => "taxpayer.email",
            Self::Phone => "taxpayer.phone",
            Self::Tin => "taxpayer.tin",
            Self::Street => "taxpayer.street",
            Self::Barangay => "taxpayer.barangay",
            Self::CityMunicipality => "taxpayer.city_municipality",
            Self::Province => "taxpayer.province",
            Self::PostalCode => "taxpayer.postal_code",
            Self::BusinessType => "business.business_type",
            Self::BusinessName => "business.business_name",
            Self::TradeName => "business.trade_name",
            Self::RegistrationNumber => "business.registration_number",
            Self::DateEstablished => "business.date_established",
            Self::PresidentName => "business.president_name",
            Self::SameAsBusinessName => "business.same_as_business_name",
            Self::Branch => "business.branch",
            Self::ForeignCompany => "business.foreign_company",
            Self::BuildingName => "business.building_name",
            Self::Subdivision => "business.subdivision",
            Self::Landmark => "business.landmark",
            Self::TelephoneNo => "business.telephone_no",
            Self::CellphoneNo => "business.cellphone_no",
            Self::FaxNo => "business.fax_no",
            Self::EmailAddress => "business.email_address",
            Self::PrimaryActivity => "business.primary_activity",
            Self::SecondaryActivity => "business.secondary_activity",
            Self::ProductsServices => "business.products_services",
            Self::DtiNo => "permits.dti_no",
            Self::DtiIssuedDate => "permits.dti_issued_date",
            Self::DtiExpirationDate => "permits.dti_expiration_date",
            Self::SecRegistrationNo => "permits.sec_registration_no",
            Self::CdaNo => "permits.cda_no",
            Self::CdaIssuedDate => "permits.cda_issued_date",
            Self::CdaExpirationDate => "permits.cda_expiration_date",
            Self::CommunityTaxCertNo => "permits.community_tax_cert_no",
            Self::CommunityTaxPlace => "permits.community_tax_place",
            Self::CommunityTaxIssuedDate => "permits.community_tax_issued_date",
            Self::CommunityTaxAmount => "permits.community_tax_amount",
            Self::AgreedToTerms => "undertaking.agreed_to_terms",
            Self::EmergencyName => "undertaking.emergency_name",
            Self::EmergencyContact => "undertaking.emergency_contact",
            Self::InsuranceProvider => "undertaking.insurance_provider",
            Self::PolicyNumber => "undertaking.policy_number",
            Self::AdditionalComments => "undertaking.additional_comments",
        }
    }

    pub fn parse(code: &str) -> Result<Self, DraftFieldError> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.code() == code)
            .ok_or_else(|| DraftFieldError::UnknownField(code.to_string()))
    }

    /// The wizard step that owns this field, derived from the code prefix.
    pub fn step(self) -> RegistrationStep {
        match self.code().split('.').next() {
            Some("taxpayer") => RegistrationStep::TaxpayerInfo,
            Some("business") => RegistrationStep::BusinessInfo,
            Some("permits") => RegistrationStep::Requirements,
            _ => RegistrationStep::Undertaking,
        }
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for DraftField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for DraftField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Self::parse(&code).map_err(de::Error::custom)
    }
}

static REQUIREMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_requirement_id() -> String {
    let id = REQUIREMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:06}")
}

/// The in-progress registration application.
///
/// Every step contributes a disjoint section; field writes replace exactly
/// the addressed field and never touch the rest. No validation happens at
/// write time (submission validates the whole draft at once).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDraft {
    pub taxpayer: TaxpayerProfile,
    pub business: BusinessProfile,
    pub permits: PermitRegistrations,
    pub undertaking: UndertakingInfo,
    pub requirements: Vec<Requirement>,
}

impl ApplicationDraft {
    /// A fresh draft with default values and the standard pending
    /// requirement placeholders.
    pub fn new() -> Self {
        let requirements = ["Business Terms", "Community Tax Certification", "DTI"]
            .into_iter()
            .map(|name| Requirement {
                id: next_requirement_id(),
                kind: name.to_string(),
                description: name.to_string(),
                status: RequirementStatus::Pending,
                file_name: None,
            })
            .collect();

        Self {
            taxpayer: TaxpayerProfile::default(),
            business: BusinessProfile::default(),
            permits: PermitRegistrations::default(),
            undertaking: UndertakingInfo::default(),
            requirements,
        }
    }

    pub fn field(&self, field: DraftField) -> FieldValue {
        use FieldValue::{Flag, Text};
        match field {
            DraftField::TaxpayerType => Text(self.taxpayer.taxpayer_type.clone()),
            DraftField::FirstName => Text(self.taxpayer.first_name.clone()),
            DraftField::MiddleName => Text(self.taxpayer.middle_name.clone()),
            DraftField::LastName => Text(self.taxpayer.last_name.clone()),
            DraftField::BirthDate => Text(self.taxpayer.birth_date.clone()),
            DraftField::Gender => Text(self.taxpayer.gender.clone()),
            DraftField::CivilStatus => Text(self.taxpayer.civil_status.clone()),
            DraftField::Email => Text(self.taxpayer.email.clone()),
            DraftField::Phone => Text(self.taxpayer.phone.clone()),
            DraftField::Tin => Text(self.taxpayer.tin.clone()),
            DraftField::Street => Text(self.taxpayer.street.clone()),
            DraftField::Barangay => Text(self.taxpayer.barangay.clone()),
            DraftField::CityMunicipality => Text(self.taxpayer.city_municipality.clone()),
            DraftField::Province => Text(self.taxpayer.province.clone()),
            DraftField::PostalCode => Text(self.taxpayer.postal_code.clone()),
            DraftField::BusinessType => Text(self.business.business_type.clone()),
            DraftField::BusinessName => Text(self.business.business_name.clone()),
            DraftField::TradeName => Text(self.business.trade_name.clone()),
            DraftField::RegistrationNumber => Text(self.business.registration_number.clone()),
            DraftField::DateEstablished => Text(self.business.date_established.clone()),
            DraftField::PresidentName => Text(self.business.president_name.clone()),
            DraftField::SameAsBusinessName => Flag(self.business.same_as_business_name),
            DraftField::Branch => Flag(self.business.branch),
            DraftField::ForeignCompany => Flag(self.business.foreign_company),
            DraftField::BuildingName => Text(self.business.building_name.clone()),
            DraftField::Subdivision => Text(self.business.subdivision.clone()),
            DraftField::Landmark => Text(self.business.landmark.clone()),
            DraftField::TelephoneNo => Text(self.business.telephone_no.clone()),
            DraftField::CellphoneNo => Text(self.business.cellphone_no.clone()),
            DraftField::FaxNo => Text(self.business.fax_no.clone()),
            DraftField::EmailAddress => Text(self.business.email_address.clone()),
            DraftField::PrimaryActivity => Text(self.business.primary_activity.clone()),
            DraftField::SecondaryActivity => Text(self.business.secondary_activity.clone()),
            DraftField::ProductsServices => Text(self.business.products_services.clone()),
            DraftField::DtiNo => Text(self.permits.dti_no.clone()),
            DraftField::DtiIssuedDate => Text(self.permits.dti_issued_date.clone()),
            DraftField::DtiExpirationDate => Text(self.permits.dti_expiration_date.clone()),
            DraftField::SecRegistrationNo => Text(self.permits.sec_registration_no.clone()),
            DraftField::CdaNo => Text(self.permits.cda_no.clone()),
            DraftField::CdaIssuedDate => Text(self.permits.cda_issued_date.clone()),
            DraftField::CdaExpirationDate => Text(self.permits.cda_expiration_date.clone()),
            DraftField::CommunityTaxCertNo => Text(self.permits.community_tax_cert_no.clone()),
            DraftField::CommunityTaxPlace => Text(self.permits.community_tax_place.clone()),
            DraftField::CommunityTaxIssuedDate => {
                Text(self.permits.community_tax_issued_date.clone())
            }
            DraftField::CommunityTaxAmount => Text(self.permits.community_tax_amount.clone()),
            DraftField::AgreedToTerms => Flag(self.undertaking.agreed_to_terms),
            DraftField::EmergencyName => Text(self.undertaking.emergency_name.clone()),
            DraftField::EmergencyContact => Text(self.undertaking.emergency_contact.clone()),
            DraftField::InsuranceProvider => Text(self.undertaking.insurance_provider.clone()),
            DraftField::PolicyNumber => Text(self.undertaking.policy_number.clone()),
            DraftField::AdditionalComments => Text(self.undertaking.additional_comments.clone()),
        }
    }

    pub fn set_field(&mut self, field: DraftField, value: FieldValue) -> Result<(), DraftFieldError> {
        match field {
            DraftField::TaxpayerType => set_text(&mut self.taxpayer.taxpayer_type, field, value),
            DraftField::FirstName => set_text(&mut self.taxpayer.first_name, field, value),
            DraftField::MiddleName => set_text(&mut self.taxpayer.middle_name, field, value),
            DraftField::LastName => set_text(&mut self.taxpayer.last_name, field, value),
            DraftField::BirthDate => set_text(&mut self.taxpayer.birth_date, field, value),
            DraftField::Gender => set_text(&mut self.taxpayer.gender, field, value),
            DraftField::CivilStatus => set_text(&mut self.taxpayer.civil_status, field, value),
            DraftField::Email => set_text(&mut self.taxpayer.email, field, value),
            DraftField::Phone => set_text(&mut self.taxpayer.phone, field, value),
            DraftField::Tin => set_text(&mut self.taxpayer.tin, field, value),
            DraftField::Street => set_text(&mut self.taxpayer.street, field, value),
            DraftField::Barangay => set_text(&mut self.taxpayer.barangay, field, value),
            DraftField::CityMunicipality => {
                set_text(&mut self.taxpayer.city_municipality, field, value)
            }
            DraftField::Province => set_text(&mut self.taxpayer.province, field, value),
            DraftField::PostalCode => set_text(&mut self.taxpayer.postal_code, field, value),
            DraftField::BusinessType => set_text(&mut self.business.business_type, field, value),
            DraftField::BusinessName => set_text(&mut self.business.business_name, field, value),
            DraftField::TradeName => set_text(&mut self.business.trade_name, field, value),
            DraftField::RegistrationNumber => {
                set_text(&mut self.business.registration_number, field, value)
            }
            DraftField::DateEstablished => {
                set_text(&mut self.business.date_established, field, value)
            }
            DraftField::PresidentName => set_text(&mut self.business.president_name, field, value),
            DraftField::SameAsBusinessName => {
                set_flag(&mut self.business.same_as_business_name, field, value)
            }
            DraftField::Branch => set_flag(&mut self.business.branch, field, value),
            DraftField::ForeignCompany => set_flag(&mut self.business.foreign_company, field, value),
            DraftField::BuildingName => set_text(&mut self.business.building_name, field, value),
            DraftField::Subdivision => set_text(&mut self.business.subdivision, field, value),
            DraftField::Landmark => set_text(&mut self.business.landmark, field, value),
            DraftField::TelephoneNo => set_text(&mut self.business.telephone_no, field, value),
            DraftField::CellphoneNo => set_text(&mut self.business.cellphone_no, field, value),
            DraftField::FaxNo => set_text(&mut self.business.fax_no, field, value),
            DraftField::EmailAddress => set_text(&mut self.business.email_address, field, value),
            DraftField::PrimaryActivity => {
                set_text(&mut self.business.primary_activity, field, value)
            }
            DraftField::SecondaryActivity => {
                set_text(&mut self.business.secondary_activity, field, value)
            }
            DraftField::ProductsServices => {
                set_text(&mut self.business.products_services, field, value)
            }
            DraftField::DtiNo => set_text(&mut self.permits.dti_no, field, value),
            DraftField::DtiIssuedDate => set_text(&mut self.permits.dti_issued_date, field, value),
            DraftField::DtiExpirationDate => {
                set_text(&mut self.permits.dti_expiration_date, field, value)
            }
            DraftField::SecRegistrationNo => {
                set_text(&mut self.permits.sec_registration_no, field, value)
            }
            DraftField::CdaNo => set_text(&mut self.permits.cda_no, field, value),
            DraftField::CdaIssuedDate => set_text(&mut self.permits.cda_issued_date, field, value),
            DraftField::CdaExpirationDate => {
                set_text(&mut self.permits.cda_expiration_date, field, value)
            }
            DraftField::CommunityTaxCertNo => {
                set_text(&mut self.permits.community_tax_cert_no, field, value)
            }
            DraftField::CommunityTaxPlace => {
                set_text(&mut self.permits.community_tax_place, field, value)
            }
            DraftField::CommunityTaxIssuedDate => {
                set_text(&mut self.permits.community_tax_issued_date, field, value)
            }
            DraftField::CommunityTaxAmount => {
                set_text(&mut self.permits.community_tax_amount, field, value)
            }
            DraftField::AgreedToTerms => {
                set_flag(&mut self.undertaking.agreed_to_terms, field, value)
            }
            DraftField::EmergencyName => {
                set_text(&mut self.undertaking.emergency_name, field, value)
            }
            DraftField::EmergencyContact => {
                set_text(&mut self.undertaking.emergency_contact, field, value)
            }
            DraftField::InsuranceProvider => {
                set_text(&mut self.undertaking.insurance_provider, field, value)
            }
            DraftField::PolicyNumber => set_text(&mut self.undertaking.policy_number, field, value),
            DraftField::AdditionalComments => {
                set_text(&mut self.undertaking.additional_comments, field, value)
            }
        }
    }

    /// Append a fully described requirement as `Uploaded`.
    ///
    /// All three parts must be non-blank; a partial payload appends nothing.
    pub fn add_requirement(
        &mut self,
        new: NewRequirement,
    ) -> Result<&Requirement, RequirementError> {
        if new.kind.trim().is_empty()
            || new.description.trim().is_empty()
            || new.file_name.trim().is_empty()
        {
            return Err(RequirementError::Incomplete);
        }

        self.requirements.push(Requirement {
            id: next_requirement_id(),
            kind: new.kind,
            description: new.description,
            status: RequirementStatus::Uploaded,
            file_name: Some(new.file_name),
        });

        Ok(self
            .requirements
            .last()
            .expect("requirement was just appended"))
    }

    /// Attach a file to an existing requirement, marking it uploaded.
    pub fn mark_requirement_uploaded(
        &mut self,
        requirement_id: &str,
        file_name: String,
    ) -> Result<&Requirement, RequirementError> {
        let requirement = self
            .requirements
            .iter_mut()
            .find(|requirement| requirement.id == requirement_id)
            .ok_or_else(|| RequirementError::NotFound(requirement_id.to_string()))?;

        requirement.status = RequirementStatus::Uploaded;
        requirement.file_name = Some(file_name);
        Ok(requirement)
    }

    pub fn remove_requirement(&mut self, requirement_id: &str) -> Result<(), RequirementError> {
        let position = self
            .requirements
            .iter()
            .position(|requirement| requirement.id == requirement_id)
            .ok_or_else(|| RequirementError::NotFound(requirement_id.to_string()))?;

        self.requirements.remove(position);
        Ok(())
    }

    pub fn uploaded_requirements(&self) -> usize {
        self.requirements
            .iter()
            .filter(|requirement| requirement.status == RequirementStatus::Uploaded)
            .count()
    }
}

impl Default for ApplicationDraft {
    fn default() -> Self {
        Self::new()
    }
}

fn set_text(
    slot: &mut String,
    field: DraftField,
    value: FieldValue,
) -> Result<(), DraftFieldError> {
    match value {
        FieldValue::Text(text) => {
            *slot = text;
            Ok(())
        }
        FieldValue::Flag(_) => Err(DraftFieldError::KindMismatch {
            field,
            expected: "text",
        }),
    }
}

fn set_flag(slot: &mut bool, field: DraftField, value: FieldValue) -> Result<(), DraftFieldError> {
    match value {
        FieldValue::Flag(flag) => {
            *slot = flag;
            Ok(())
        }
        FieldValue::Text(_) => Err(DraftFieldError::KindMismatch {
            field,
            expected: "flag",
        }),
    }
}
