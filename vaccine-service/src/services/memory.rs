use crate::models::{Dose, Vaccine};
use crate::services::store::{
    DoseFilter, DoseStore, VaccineFilter, VaccineStore, DUPLICATE_DOSE, DUPLICATE_VACCINE_NAME,
};
use async_trait::async_trait;
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-local store with the same uniqueness rules as the MongoDB indexes.
///
/// Backs the test suites and local runs without a database.
#[derive(Default)]
pub struct InMemoryStore {
    vaccines: RwLock<HashMap<String, Vaccine>>,
    doses: RwLock<HashMap<String, Dose>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, AppError> {
    lock.read()
        .map_err(|_| AppError::InternalError(anyhow::anyhow!("store lock poisoned")))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, AppError> {
    lock.write()
        .map_err(|_| AppError::InternalError(anyhow::anyhow!("store lock poisoned")))
}

fn same_course(a: &Dose, b: &Dose) -> bool {
    a.patient_id == b.patient_id && a.vaccine_id == b.vaccine_id && a.dose_number == b.dose_number
}

#[async_trait]
impl VaccineStore for InMemoryStore {
    async fn list_vaccines(&self, filter: &VaccineFilter) -> Result<Vec<Vaccine>, AppError> {
        let vaccines = read(&self.vaccines)?;
        let mut found: Vec<Vaccine> = vaccines
            .values()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find_vaccine(&self, id: &str) -> Result<Option<Vaccine>, AppError> {
        Ok(read(&self.vaccines)?.get(id).cloned())
    }

    async fn insert_vaccine(&self, vaccine: &Vaccine) -> Result<(), AppError> {
        let mut vaccines = write(&self.vaccines)?;
        if vaccines.values().any(|v| v.name == vaccine.name) {
            return Err(AppError::conflict(DUPLICATE_VACCINE_NAME));
        }
        vaccines.insert(vaccine.id.clone(), vaccine.clone());
        Ok(())
    }

    async fn replace_vaccine(&self, vaccine: &Vaccine) -> Result<bool, AppError> {
        let mut vaccines = write(&self.vaccines)?;
        if !vaccines.contains_key(&vaccine.id) {
            return Ok(false);
        }
        if vaccines
            .values()
            .any(|v| v.id != vaccine.id && v.name == vaccine.name)
        {
            return Err(AppError::conflict(DUPLICATE_VACCINE_NAME));
        }
        vaccines.insert(vaccine.id.clone(), vaccine.clone());
        Ok(true)
    }

    async fn delete_vaccine(&self, id: &str) -> Result<bool, AppError> {
        Ok(write(&self.vaccines)?.remove(id).is_some())
    }
}

#[async_trait]
impl DoseStore for InMemoryStore {
    async fn list_doses(&self, filter: &DoseFilter) -> Result<Vec<Dose>, AppError> {
        let doses = read(&self.doses)?;
        let mut found: Vec<Dose> = doses
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.administered_at.cmp(&a.administered_at));
        Ok(found)
    }

    async fn find_dose(&self, id: &str) -> Result<Option<Dose>, AppError> {
        Ok(read(&self.doses)?.get(id).cloned())
    }

    async fn insert_dose(&self, dose: &Dose) -> Result<(), AppError> {
        let mut doses = write(&self.doses)?;
        if doses.values().any(|d| same_course(d, dose)) {
            return Err(AppError::conflict(DUPLICATE_DOSE));
        }
        doses.insert(dose.id.clone(), dose.clone());
        Ok(())
    }

    async fn replace_dose(&self, dose: &Dose) -> Result<bool, AppError> {
        let mut doses = write(&self.doses)?;
        if !doses.contains_key(&dose.id) {
            return Ok(false);
        }
        if doses.values().any(|d| d.id != dose.id && same_course(d, dose)) {
            return Err(AppError::conflict(DUPLICATE_DOSE));
        }
        doses.insert(dose.id.clone(), dose.clone());
        Ok(true)
    }

    async fn delete_dose(&self, id: &str) -> Result<bool, AppError> {
        Ok(write(&self.doses)?.remove(id).is_some())
    }

    async fn count_doses_for_vaccine(&self, vaccine_id: &str) -> Result<u64, AppError> {
        let doses = read(&self.doses)?;
        Ok(doses.values().filter(|d| d.vaccine_id == vaccine_id).count() as u64)
    }
}
