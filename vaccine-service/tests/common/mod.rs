#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
};
use serde_json::Value;
use service_core::config::Environment;
use service_core::error::AppError;
use std::sync::Arc;
use tower::util::ServiceExt;
use vaccine_service::config::VaccineConfig;
use vaccine_service::models::{Dose, Vaccine};
use vaccine_service::services::{
    DoseFilter, DoseStore, InMemoryStore, VaccineFilter, VaccineStore,
};
use vaccine_service::{build_app, App, AppState};

pub fn test_config(environment: Environment) -> VaccineConfig {
    let mut config = VaccineConfig::default();
    config.common.environment = environment;
    config.common.port = 0;
    config
}

/// Full application over a fresh in-memory store.
pub fn spawn_app() -> App {
    spawn_app_in(Environment::Test)
}

pub fn spawn_app_in(environment: Environment) -> App {
    let state = AppState::new(test_config(environment), Arc::new(InMemoryStore::new()));
    build_app(state)
}

pub fn spawn_app_with<S>(environment: Environment, store: S) -> App
where
    S: VaccineStore + DoseStore + 'static,
{
    build_app(AppState::new(test_config(environment), Arc::new(store)))
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn get(app: &App, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request");
    send_request(app, request).await
}

pub async fn send_request(app: &App, request: Request<Body>) -> Response {
    app.clone()
        .oneshot(request)
        .await
        .expect("Router is infallible")
}

/// Send a request with an optional JSON body and decode the JSON reply.
pub async fn send(
    app: &App,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = send_request(app, request).await;
    let status = response.status();
    (status, body_json(response).await)
}

pub async fn send_form(app: &App, method: Method, uri: &str, form: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("Failed to build request");

    let response = send_request(app, request).await;
    let status = response.status();
    (status, body_json(response).await)
}

/// Create a vaccine and return its id.
pub async fn create_vaccine(app: &App, body: Value) -> String {
    let (status, json) = send(app, Method::POST, "/api/vaccines", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {json}");
    json["data"]["id"]
        .as_str()
        .expect("Vaccine id missing")
        .to_string()
}

pub fn hepatitis_b() -> Value {
    serde_json::json!({
        "name": "Hepatitis B",
        "manufacturer": "GSK",
        "dosesRequired": 3,
        "intervalDays": 30,
        "targetAgeGroup": "Infants",
        "storageTemperature": "2-8°C"
    })
}

#[derive(Clone, Copy)]
pub enum FaultMode {
    Error,
    Panic,
}

/// Store whose list operations fail, for exercising the fault path.
pub struct FaultyStore {
    pub mode: FaultMode,
}

impl FaultyStore {
    fn fail<T>(&self) -> Result<T, AppError> {
        match self.mode {
            FaultMode::Error => Err(AppError::DatabaseError(anyhow::anyhow!(
                "connection pool exhausted"
            ))),
            FaultMode::Panic => panic!("store invariant broken"),
        }
    }
}

#[async_trait]
impl VaccineStore for FaultyStore {
    async fn list_vaccines(&self, _filter: &VaccineFilter) -> Result<Vec<Vaccine>, AppError> {
        self.fail()
    }

    async fn find_vaccine(&self, _id: &str) -> Result<Option<Vaccine>, AppError> {
        Ok(None)
    }

    async fn insert_vaccine(&self, _vaccine: &Vaccine) -> Result<(), AppError> {
        self.fail()
    }

    async fn replace_vaccine(&self, _vaccine: &Vaccine) -> Result<bool, AppError> {
        self.fail()
    }

    async fn delete_vaccine(&self, _id: &str) -> Result<bool, AppError> {
        self.fail()
    }
}

#[async_trait]
impl DoseStore for FaultyStore {
    async fn list_doses(&self, _filter: &DoseFilter) -> Result<Vec<Dose>, AppError> {
        self.fail()
    }

    async fn find_dose(&self, _id: &str) -> Result<Option<Dose>, AppError> {
        Ok(None)
    }

    async fn insert_dose(&self, _dose: &Dose) -> Result<(), AppError> {
        self.fail()
    }

    async fn replace_dose(&self, _dose: &Dose) -> Result<bool, AppError> {
        self.fail()
    }

    async fn delete_dose(&self, _id: &str) -> Result<bool, AppError> {
        self.fail()
    }

    async fn count_doses_for_vaccine(&self, _vaccine_id: &str) -> Result<u64, AppError> {
        self.fail()
    }
}
