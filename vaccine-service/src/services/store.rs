//! Persistence seams for the resource routers.
//!
//! Handlers only see these traits, so the router runs unchanged against
//! MongoDB in production and [`InMemoryStore`](super::InMemoryStore) in tests.

use crate::models::{Dose, DoseStatus, Vaccine};
use async_trait::async_trait;
use service_core::error::AppError;

pub const DUPLICATE_VACCINE_NAME: &str = "Vaccine with this name already exists";
pub const DUPLICATE_DOSE: &str = "Dose already recorded for this patient";

#[derive(Debug, Clone, Default)]
pub struct VaccineFilter {
    pub is_active: Option<bool>,
}

impl VaccineFilter {
    pub fn matches(&self, vaccine: &Vaccine) -> bool {
        self.is_active.map_or(true, |active| vaccine.is_active == active)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DoseFilter {
    pub vaccine_id: Option<String>,
    pub patient_id: Option<String>,
    pub status: Option<DoseStatus>,
}

impl DoseFilter {
    pub fn matches(&self, dose: &Dose) -> bool {
        self.vaccine_id.as_ref().map_or(true, |id| &dose.vaccine_id == id)
            && self.patient_id.as_ref().map_or(true, |id| &dose.patient_id == id)
            && self.status.map_or(true, |status| dose.status == status)
    }
}

#[async_trait]
pub trait VaccineStore: Send + Sync {
    /// Matching vaccines, newest first.
    async fn list_vaccines(&self, filter: &VaccineFilter) -> Result<Vec<Vaccine>, AppError>;

    async fn find_vaccine(&self, id: &str) -> Result<Option<Vaccine>, AppError>;

    /// Fails with `Conflict` when the name is taken.
    async fn insert_vaccine(&self, vaccine: &Vaccine) -> Result<(), AppError>;

    /// Returns `false` when no vaccine has this id. Fails with `Conflict` when
    /// the new name belongs to another vaccine.
    async fn replace_vaccine(&self, vaccine: &Vaccine) -> Result<bool, AppError>;

    /// Returns `false` when no vaccine has this id.
    async fn delete_vaccine(&self, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait DoseStore: Send + Sync {
    /// Matching doses, most recently administered first.
    async fn list_doses(&self, filter: &DoseFilter) -> Result<Vec<Dose>, AppError>;

    async fn find_dose(&self, id: &str) -> Result<Option<Dose>, AppError>;

    /// Fails with `Conflict` when the patient already has this dose number of
    /// this vaccine.
    async fn insert_dose(&self, dose: &Dose) -> Result<(), AppError>;

    /// Returns `false` when no dose has this id.
    async fn replace_dose(&self, dose: &Dose) -> Result<bool, AppError>;

    /// Returns `false` when no dose has this id.
    async fn delete_dose(&self, id: &str) -> Result<bool, AppError>;

    async fn count_doses_for_vaccine(&self, vaccine_id: &str) -> Result<u64, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn empty_filters_match_everything() {
        let vaccine = Vaccine::new("BCG".into(), "SII".into(), 1);
        let dose = Dose::new(vaccine.id.clone(), "P".into(), "Pat".into(), 1, Utc::now());
        assert!(VaccineFilter::default().matches(&vaccine));
        assert!(DoseFilter::default().matches(&dose));
    }

    #[test]
    fn dose_filter_combines_conditions() {
        let dose = Dose::new("v-1".into(), "P-1".into(), "Pat".into(), 1, Utc::now());
        let filter = DoseFilter {
            vaccine_id: Some("v-1".into()),
            patient_id: Some("P-2".into()),
            status: None,
        };
        assert!(!filter.matches(&dose));

        let filter = DoseFilter {
            vaccine_id: Some("v-1".into()),
            patient_id: Some("P-1".into()),
            status: Some(DoseStatus::Administered),
        };
        assert!(filter.matches(&dose));
    }

    #[test]
    fn vaccine_filter_on_active_flag() {
        let mut vaccine = Vaccine::new("BCG".into(), "SII".into(), 1);
        vaccine.is_active = false;
        assert!(!VaccineFilter { is_active: Some(true) }.matches(&vaccine));
        assert!(VaccineFilter { is_active: Some(false) }.matches(&vaccine));
    }
}
