use crate::dtos::iso_timestamp;
use crate::models::Vaccine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVaccineRequest {
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Hepatitis B")]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "GSK")]
    pub manufacturer: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 10))]
    #[schema(example = 3)]
    pub doses_required: i32,
    #[validate(range(min = 0, max = 3650))]
    #[schema(example = 30)]
    pub interval_days: Option<i32>,
    #[validate(length(max = 100))]
    #[schema(example = "Infants")]
    pub target_age_group: Option<String>,
    #[validate(length(max = 50))]
    #[schema(example = "2-8°C")]
    pub storage_temperature: Option<String>,
    pub is_active: Option<bool>,
}

impl From<CreateVaccineRequest> for Vaccine {
    fn from(req: CreateVaccineRequest) -> Self {
        let mut vaccine = Vaccine::new(req.name, req.manufacturer, req.doses_required);
        vaccine.description = req.description;
        vaccine.interval_days = req.interval_days;
        vaccine.target_age_group = req.target_age_group;
        vaccine.storage_temperature = req.storage_temperature;
        vaccine.is_active = req.is_active.unwrap_or(true);
        vaccine
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVaccineRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub manufacturer: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub doses_required: Option<i32>,
    #[validate(range(min = 0, max = 3650))]
    pub interval_days: Option<i32>,
    #[validate(length(max = 100))]
    pub target_age_group: Option<String>,
    #[validate(length(max = 50))]
    pub storage_temperature: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateVaccineRequest {
    pub fn apply_to(self, vaccine: &mut Vaccine) {
        if let Some(name) = self.name {
            vaccine.name = name;
        }
        if let Some(manufacturer) = self.manufacturer {
            vaccine.manufacturer = manufacturer;
        }
        if let Some(description) = self.description {
            vaccine.description = Some(description);
        }
        if let Some(doses_required) = self.doses_required {
            vaccine.doses_required = doses_required;
        }
        if let Some(interval_days) = self.interval_days {
            vaccine.interval_days = Some(interval_days);
        }
        if let Some(target_age_group) = self.target_age_group {
            vaccine.target_age_group = Some(target_age_group);
        }
        if let Some(storage_temperature) = self.storage_temperature {
            vaccine.storage_temperature = Some(storage_temperature);
        }
        if let Some(is_active) = self.is_active {
            vaccine.is_active = is_active;
        }
        vaccine.updated_at = Utc::now();
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VaccineListParams {
    /// Only vaccines with this active flag.
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VaccineResponse {
    pub id: String,
    pub name: String,
    pub manufacturer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub doses_required: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_days: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_age_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_temperature: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Vaccine> for VaccineResponse {
    fn from(vaccine: Vaccine) -> Self {
        Self {
            id: vaccine.id,
            name: vaccine.name,
            manufacturer: vaccine.manufacturer,
            description: vaccine.description,
            doses_required: vaccine.doses_required,
            interval_days: vaccine.interval_days,
            target_age_group: vaccine.target_age_group,
            storage_temperature: vaccine.storage_temperature,
            is_active: vaccine.is_active,
            created_at: iso_timestamp(vaccine.created_at),
            updated_at: iso_timestamp(vaccine.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateVaccineRequest {
        serde_json::from_value(serde_json::json!({
            "name": "Measles",
            "manufacturer": "Merck",
            "dosesRequired": 2,
            "intervalDays": 28
        }))
        .unwrap()
    }

    #[test]
    fn create_request_defaults_to_active() {
        let vaccine = Vaccine::from(create_request());
        assert!(vaccine.is_active);
        assert_eq!(vaccine.doses_required, 2);
        assert_eq!(vaccine.interval_days, Some(28));
    }

    #[test]
    fn create_request_rejects_out_of_range_doses() {
        let mut req = create_request();
        req.doses_required = 0;
        assert!(req.validate().is_err());
        req.doses_required = 11;
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_only_touches_provided_fields() {
        let mut vaccine = Vaccine::from(create_request());
        let before = vaccine.updated_at;

        UpdateVaccineRequest {
            manufacturer: Some("MSD".into()),
            is_active: Some(false),
            ..Default::default()
        }
        .apply_to(&mut vaccine);

        assert_eq!(vaccine.name, "Measles");
        assert_eq!(vaccine.manufacturer, "MSD");
        assert!(!vaccine.is_active);
        assert_eq!(vaccine.interval_days, Some(28));
        assert!(vaccine.updated_at >= before);
    }

    #[test]
    fn response_uses_camel_case_and_omits_empty_fields() {
        let value = serde_json::to_value(VaccineResponse::from(Vaccine::from(create_request())))
            .unwrap();
        assert_eq!(value["dosesRequired"], 2);
        assert_eq!(value["isActive"], true);
        assert!(value.get("description").is_none());
        assert!(value["createdAt"].as_str().unwrap().ends_with('Z'));
    }
}
