//! Domain library for the municipal business-permit registration portal:
//! the registration wizard, the business directory with compliance
//! classification, and the degraded-by-design external lookups backing the
//! dashboard.

pub mod config;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod external;
pub mod registration;
pub mod telemetry;
