pub mod doses;
pub mod system;
pub mod vaccines;

use chrono::{DateTime, SecondsFormat, Utc};

pub use doses::{CreateDoseRequest, DoseListParams, DoseResponse, UpdateDoseRequest};
pub use system::{Endpoints, Health, Welcome};
pub use vaccines::{CreateVaccineRequest, UpdateVaccineRequest, VaccineListParams, VaccineResponse};

/// ISO-8601 UTC with millisecond precision and a `Z` suffix,
/// e.g. `2025-10-22T08:19:49.171Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
