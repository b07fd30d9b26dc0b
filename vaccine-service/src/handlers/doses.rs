use crate::dtos::{CreateDoseRequest, DoseListParams, DoseResponse, UpdateDoseRequest};
use crate::handlers::vaccines::VACCINE_NOT_FOUND;
use crate::models::Dose;
use crate::services::DoseFilter;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use service_core::envelope::Envelope;
use service_core::error::AppError;
use service_core::extract::{ApiQuery, ValidatedBody};

const DOSE_NOT_FOUND: &str = "Dose not found";
const VACCINE_INACTIVE: &str = "Vaccine is not active";
const DOSE_NUMBER_TOO_HIGH: &str = "Dose number exceeds doses required for this vaccine";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_doses).post(record_dose))
        .route("/:id", get(get_dose).put(update_dose).delete(delete_dose))
}

async fn load(state: &AppState, id: &str) -> Result<Dose, AppError> {
    state
        .doses
        .find_dose(id)
        .await?
        .ok_or_else(|| AppError::not_found(DOSE_NOT_FOUND))
}

#[utoipa::path(
    get,
    path = "/api/doses",
    params(DoseListParams),
    responses(
        (status = 200, description = "Doses retrieved successfully", body = [DoseResponse]),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "Doses"
)]
pub async fn list_doses(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<DoseListParams>,
) -> Result<impl IntoResponse, AppError> {
    let filter = DoseFilter {
        vaccine_id: params.vaccine_id,
        patient_id: params.patient_id,
        status: params.status,
    };
    let doses = state.doses.list_doses(&filter).await?;

    let data: Vec<DoseResponse> = doses.into_iter().map(DoseResponse::from).collect();
    Ok(Envelope::ok("Doses retrieved successfully").with_list(data))
}

#[utoipa::path(
    get,
    path = "/api/doses/{id}",
    params(
        ("id" = String, Path, description = "Dose ID")
    ),
    responses(
        (status = 200, description = "Dose retrieved successfully", body = DoseResponse),
        (status = 404, description = "Dose not found")
    ),
    tag = "Doses"
)]
pub async fn get_dose(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let dose = load(&state, &id).await?;
    Ok(Envelope::ok("Dose retrieved successfully").with_data(DoseResponse::from(dose)))
}

#[utoipa::path(
    post,
    path = "/api/doses",
    request_body = CreateDoseRequest,
    responses(
        (status = 201, description = "Dose recorded successfully", body = DoseResponse),
        (status = 400, description = "Invalid body, inactive vaccine or dose number out of range"),
        (status = 404, description = "Vaccine not found"),
        (status = 409, description = "Dose already recorded for this patient")
    ),
    tag = "Doses"
)]
pub async fn record_dose(
    State(state): State<AppState>,
    ValidatedBody(req): ValidatedBody<CreateDoseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let vaccine = state
        .vaccines
        .find_vaccine(&req.vaccine_id)
        .await?
        .ok_or_else(|| AppError::not_found(VACCINE_NOT_FOUND))?;

    if !vaccine.is_active {
        return Err(AppError::bad_request(VACCINE_INACTIVE));
    }
    if req.dose_number > vaccine.doses_required {
        return Err(AppError::bad_request(DOSE_NUMBER_TOO_HIGH));
    }

    let mut dose = Dose::from(req);
    dose.schedule_next(&vaccine);
    state.doses.insert_dose(&dose).await?;

    tracing::info!(
        dose_id = %dose.id,
        vaccine_id = %dose.vaccine_id,
        dose_number = dose.dose_number,
        "Dose recorded"
    );

    Ok(Envelope::ok("Dose recorded successfully")
        .with_data(DoseResponse::from(dose))
        .status(StatusCode::CREATED))
}

#[utoipa::path(
    put,
    path = "/api/doses/{id}",
    params(
        ("id" = String, Path, description = "Dose ID")
    ),
    request_body = UpdateDoseRequest,
    responses(
        (status = 200, description = "Dose updated successfully", body = DoseResponse),
        (status = 400, description = "Invalid request body or validation error"),
        (status = 404, description = "Dose not found")
    ),
    tag = "Doses"
)]
pub async fn update_dose(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedBody(req): ValidatedBody<UpdateDoseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut dose = load(&state, &id).await?;

    if req.apply_to(&mut dose) {
        // A vaccine removed since recording leaves the old due date in place
        if let Some(vaccine) = state.vaccines.find_vaccine(&dose.vaccine_id).await? {
            dose.schedule_next(&vaccine);
        }
    }

    if !state.doses.replace_dose(&dose).await? {
        return Err(AppError::not_found(DOSE_NOT_FOUND));
    }

    tracing::info!(dose_id = %dose.id, "Dose updated");

    Ok(Envelope::ok("Dose updated successfully").with_data(DoseResponse::from(dose)))
}

#[utoipa::path(
    delete,
    path = "/api/doses/{id}",
    params(
        ("id" = String, Path, description = "Dose ID")
    ),
    responses(
        (status = 200, description = "Dose deleted successfully"),
        (status = 404, description = "Dose not found")
    ),
    tag = "Doses"
)]
pub async fn delete_dose(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.doses.delete_dose(&id).await? {
        return Err(AppError::not_found(DOSE_NOT_FOUND));
    }

    tracing::info!(dose_id = %id, "Dose deleted");

    Ok(Envelope::ok("Dose deleted successfully"))
}
