//! Business directory: registered-business records, the compliance
//! classifier both the listing and the map depend on, table queries, and
//! CSV export.

pub mod compliance;
pub mod domain;
pub mod export;
pub mod router;
pub mod service;
pub mod table;

pub use compliance::{
    classify, ComplianceFilter, ComplianceStatus, PermitExpiries, PENDING_WINDOW_DAYS,
};
pub use domain::{
    BusinessAddress, BusinessDetails, BusinessId, BusinessNameInfo, BusinessRecord,
    BusinessRepresentative, CoordinateError, Coordinates, PermitRequirements,
};
pub use router::directory_router;
pub use service::{
    BusinessDirectory, BusinessRow, DirectoryError, DirectoryService, DirectoryStats, MapMarker,
};
pub use table::{Page, SortDirection, SortKey, TableQuery};
