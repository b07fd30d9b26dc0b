use crate::dtos::{CreateVaccineRequest, UpdateVaccineRequest, VaccineListParams, VaccineResponse};
use crate::models::Vaccine;
use crate::services::VaccineFilter;
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

pub const VACCINE_NOT_FOUND: &str = "Vaccine not found";
const VACCINE_IN_USE: &str = "Cannot delete vaccine with recorded doses";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vaccines).post(create_vaccine))
        .route(
            "/:id",
            get(get_vaccine).put(update_vaccine).delete(delete_vaccine),
        )
}

async fn load(state: &AppState, id: &str) -> Result<Vaccine, AppError> {
    state
        .vaccines
        .find_vaccine(id)
        .await?
        .ok_or_else(|| AppError::not_found(VACCINE_NOT_FOUND))
}

#[utoipa::path(
    get,
    path = "/api/vaccines",
    params(VaccineListParams),
    responses(
        (status = 200, description = "Vaccines retrieved successfully", body = [VaccineResponse]),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "Vaccines"
)]
pub async fn list_vaccines(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<VaccineListParams>,
) -> Result<impl IntoResponse, AppError> {
    let filter = VaccineFilter {
        is_active: params.is_active,
    };
    let vaccines = state.vaccines.list_vaccines(&filter).await?;

    let data: Vec<VaccineResponse> = vaccines.into_iter().map(VaccineResponse::from).collect();
    Ok(Envelope::ok("Vaccines retrieved successfully").with_list(data))
}

#[utoipa::path(
    get,
    path = "/api/vaccines/{id}",
    params(
        ("id" = String, Path, description = "Vaccine ID")
    ),
    responses(
        (status = 200, description = "Vaccine retrieved successfully", body = VaccineResponse),
        (status = 404, description = "Vaccine not found")
    ),
    tag = "Vaccines"
)]
pub async fn get_vaccine(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let vaccine = load(&state, &id).await?;
    Ok(Envelope::ok("Vaccine retrieved successfully").with_data(VaccineResponse::from(vaccine)))
}

#[utoipa::path(
    post,
    path = "/api/vaccines",
    request_body = CreateVaccineRequest,
    responses(
        (status = 201, description = "Vaccine created successfully", body = VaccineResponse),
        (status = 400, description = "Invalid request body or validation error"),
        (status = 409, description = "Vaccine with this name already exists")
    ),
    tag = "Vaccines"
)]
pub async fn create_vaccine(
    State(state): State<AppState>,
    ValidatedBody(req): ValidatedBody<CreateVaccineRequest>,
) -> Result<impl IntoResponse, AppError> {
    let vaccine = Vaccine::from(req);
    state.vaccines.insert_vaccine(&vaccine).await?;

    tracing::info!(vaccine_id = %vaccine.id, name = %vaccine.name, "Vaccine created");

    Ok(Envelope::ok("Vaccine created successfully")
        .with_data(VaccineResponse::from(vaccine))
        .status(StatusCode::CREATED))
}

#[utoipa::path(
    put,
    path = "/api/vaccines/{id}",
    params(
        ("id" = String, Path, description = "Vaccine ID")
    ),
    request_body = UpdateVaccineRequest,
    responses(
        (status = 200, description = "Vaccine updated successfully", body = VaccineResponse),
        (status = 400, description = "Invalid request body or validation error"),
        (status = 404, description = "Vaccine not found"),
        (status = 409, description = "Vaccine with this name already exists")
    ),
    tag = "Vaccines"
)]
pub async fn update_vaccine(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedBody(req): ValidatedBody<UpdateVaccineRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut vaccine = load(&state, &id).await?;
    req.apply_to(&mut vaccine);

    // Deleted between the read and the write
    if !state.vaccines.replace_vaccine(&vaccine).await? {
        return Err(AppError::not_found(VACCINE_NOT_FOUND));
    }

    tracing::info!(vaccine_id = %vaccine.id, "Vaccine updated");

    Ok(Envelope::ok("Vaccine updated successfully").with_data(VaccineResponse::from(vaccine)))
}

#[utoipa::path(
    delete,
    path = "/api/vaccines/{id}",
    params(
        ("id" = String, Path, description = "Vaccine ID")
    ),
    responses(
        (status = 200, description = "Vaccine deleted successfully"),
        (status = 404, description = "Vaccine not found"),
        (status = 409, description = "Cannot delete vaccine with recorded doses")
    ),
    tag = "Vaccines"
)]
pub async fn delete_vaccine(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let vaccine = load(&state, &id).await?;

    let recorded = state.doses.count_doses_for_vaccine(&vaccine.id).await?;
    if recorded > 0 {
        return Err(AppError::conflict(VACCINE_IN_USE));
    }

    if !state.vaccines.delete_vaccine(&vaccine.id).await? {
        return Err(AppError::not_found(VACCINE_NOT_FOUND));
    }

    tracing::info!(vaccine_id = %vaccine.id, "Vaccine deleted");

    Ok(Envelope::ok("Vaccine deleted successfully"))
}
