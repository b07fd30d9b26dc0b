use crate::dtos::{iso_timestamp, Endpoints, Health, Welcome};
use axum::response::IntoResponse;
use chrono::Utc;
use service_core::envelope::Envelope;
use service_core::error::AppError;

pub const HEALTH_PATH: &str = "/api/health";
pub const VACCINES_PATH: &str = "/api/vaccines";
pub const DOSES_PATH: &str = "/api/doses";

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "API summary with its mount points", body = Welcome)
    ),
    tag = "System"
)]
pub async fn root() -> impl IntoResponse {
    Envelope::ok("Welcome to Vaccine Management System API").with(Welcome {
        endpoints: Endpoints {
            health: HEALTH_PATH.to_string(),
            vaccines: VACCINES_PATH.to_string(),
            doses: DOSES_PATH.to_string(),
        },
    })
}

/// Liveness only; the database is not consulted.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is running", body = Health)
    ),
    tag = "System"
)]
pub async fn health_check() -> impl IntoResponse {
    Envelope::ok("Vaccine Management API is running").with(Health {
        timestamp: iso_timestamp(Utc::now()),
    })
}

pub async fn not_found() -> AppError {
    AppError::RouteNotFound
}
