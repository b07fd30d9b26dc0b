use crate::models::Vaccine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DoseStatus {
    Scheduled,
    #[default]
    Administered,
    Missed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dose {
    #[serde(rename = "_id")]
    pub id: String,
    pub vaccine_id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub dose_number: i32,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub administered_at: DateTime<Utc>,
    pub administered_by: Option<String>,
    pub location: Option<String>,
    pub batch_number: Option<String>,
    pub status: DoseStatus,
    pub next_dose_due: Option<mongodb::bson::DateTime>,
    pub notes: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Dose {
    pub fn new(
        vaccine_id: String,
        patient_id: String,
        patient_name: String,
        dose_number: i32,
        administered_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            vaccine_id,
            patient_id,
            patient_name,
            dose_number,
            administered_at,
            administered_by: None,
            location: None,
            batch_number: None,
            status: DoseStatus::default(),
            next_dose_due: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Recompute `next_dose_due` from the vaccine's schedule.
    pub fn schedule_next(&mut self, vaccine: &Vaccine) {
        self.next_dose_due = vaccine
            .next_dose_due(self.dose_number, self.administered_at)
            .map(mongodb::bson::DateTime::from_chrono);
    }
}
