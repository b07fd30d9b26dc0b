use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vaccine {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub manufacturer: String,
    pub description: Option<String>,
    pub doses_required: i32,
    /// Days between consecutive doses.
    pub interval_days: Option<i32>,
    pub target_age_group: Option<String>,
    pub storage_temperature: Option<String>,
    pub is_active: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Vaccine {
    pub fn new(name: String, manufacturer: String, doses_required: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            manufacturer,
            description: None,
            doses_required,
            interval_days: None,
            target_age_group: None,
            storage_temperature: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a dose with this number completes the course.
    pub fn is_final_dose(&self, dose_number: i32) -> bool {
        dose_number >= self.doses_required
    }

    /// When the dose after `dose_number` falls due, if the course continues
    /// and the vaccine has a fixed interval.
    pub fn next_dose_due(
        &self,
        dose_number: i32,
        administered_at: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        if self.is_final_dose(dose_number) {
            return None;
        }
        let days = self.interval_days?;
        administered_at.checked_add_signed(chrono::Duration::days(i64::from(days)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hepatitis_b() -> Vaccine {
        let mut vaccine = Vaccine::new("Hepatitis B".into(), "GSK".into(), 3);
        vaccine.interval_days = Some(30);
        vaccine
    }

    #[test]
    fn new_vaccine_is_active() {
        let vaccine = Vaccine::new("BCG".into(), "Serum Institute".into(), 1);
        assert!(vaccine.is_active);
        assert_eq!(vaccine.created_at, vaccine.updated_at);
        assert!(Uuid::parse_str(&vaccine.id).is_ok());
    }

    #[test]
    fn next_dose_is_interval_after_administration() {
        let given = Utc.with_ymd_and_hms(2025, 1, 10, 9, 30, 0).unwrap();
        let due = hepatitis_b().next_dose_due(1, given).unwrap();
        assert_eq!(due, Utc.with_ymd_and_hms(2025, 2, 9, 9, 30, 0).unwrap());
    }

    #[test]
    fn final_dose_has_no_follow_up() {
        let given = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        assert_eq!(hepatitis_b().next_dose_due(3, given), None);
    }

    #[test]
    fn no_interval_means_no_follow_up() {
        let mut vaccine = hepatitis_b();
        vaccine.interval_days = None;
        assert_eq!(vaccine.next_dose_due(1, Utc::now()), None);
    }
}
