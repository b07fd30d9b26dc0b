use crate::dtos::iso_timestamp;
use crate::models::{Dose, DoseStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoseRequest {
    #[validate(length(min = 1))]
    pub vaccine_id: String,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "PAT-00042")]
    pub patient_id: String,
    #[validate(length(min = 1, max = 200))]
    #[schema(example = "Jane Doe")]
    pub patient_name: String,
    #[validate(range(min = 1))]
    #[schema(example = 1)]
    pub dose_number: i32,
    /// Defaults to the time the request is received.
    pub administered_at: Option<DateTime<Utc>>,
    #[validate(length(max = 200))]
    pub administered_by: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 100))]
    pub batch_number: Option<String>,
    pub status: Option<DoseStatus>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<CreateDoseRequest> for Dose {
    fn from(req: CreateDoseRequest) -> Self {
        let mut dose = Dose::new(
            req.vaccine_id,
            req.patient_id,
            req.patient_name,
            req.dose_number,
            req.administered_at.unwrap_or_else(Utc::now),
        );
        dose.administered_by = req.administered_by;
        dose.location = req.location;
        dose.batch_number = req.batch_number;
        dose.status = req.status.unwrap_or_default();
        dose.notes = req.notes;
        dose
    }
}

/// Partial update. The vaccine, patient and dose number of a record are fixed;
/// delete and re-record the dose to change them.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoseRequest {
    pub administered_at: Option<DateTime<Utc>>,
    #[validate(length(max = 200))]
    pub administered_by: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 100))]
    pub batch_number: Option<String>,
    pub status: Option<DoseStatus>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl UpdateDoseRequest {
    /// Apply the update and report whether the administration time moved.
    pub fn apply_to(self, dose: &mut Dose) -> bool {
        let rescheduled = match self.administered_at {
            Some(at) if at != dose.administered_at => {
                dose.administered_at = at;
                true
            }
            _ => false,
        };
        if let Some(administered_by) = self.administered_by {
            dose.administered_by = Some(administered_by);
        }
        if let Some(location) = self.location {
            dose.location = Some(location);
        }
        if let Some(batch_number) = self.batch_number {
            dose.batch_number = Some(batch_number);
        }
        if let Some(status) = self.status {
            dose.status = status;
        }
        if let Some(notes) = self.notes {
            dose.notes = Some(notes);
        }
        dose.updated_at = Utc::now();
        rescheduled
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DoseListParams {
    /// Only doses of this vaccine.
    pub vaccine_id: Option<String>,
    /// Only doses given to this patient.
    pub patient_id: Option<String>,
    /// Only doses in this status.
    pub status: Option<DoseStatus>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoseResponse {
    pub id: String,
    pub vaccine_id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub dose_number: i32,
    pub administered_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administered_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,
    pub status: DoseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_dose_due: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Dose> for DoseResponse {
    fn from(dose: Dose) -> Self {
        Self {
            id: dose.id,
            vaccine_id: dose.vaccine_id,
            patient_id: dose.patient_id,
            patient_name: dose.patient_name,
            dose_number: dose.dose_number,
            administered_at: iso_timestamp(dose.administered_at),
            administered_by: dose.administered_by,
            location: dose.location,
            batch_number: dose.batch_number,
            status: dose.status,
            next_dose_due: dose.next_dose_due.map(|d| iso_timestamp(d.to_chrono())),
            notes: dose.notes,
            created_at: iso_timestamp(dose.created_at),
            updated_at: iso_timestamp(dose.updated_at),
        }
    }
}
