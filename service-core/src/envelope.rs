//! Uniform JSON response envelope.
//!
//! Every response body has the shape `{success, message, ...payload}`. The
//! payload is any serialisable struct whose fields are flattened into the
//! top-level object, so `Envelope::ok("...").with(Health { timestamp })`
//! renders as `{"success":true,"message":"...","timestamp":"..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T = NoPayload> {
    #[serde(skip)]
    status: StatusCode,
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub payload: Option<T>,
}

/// Placeholder payload for envelopes that only carry `success` and `message`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NoPayload {}

/// Payload of failure envelopes that carry detail.
#[derive(Debug, Clone, Serialize)]
pub struct Fault {
    pub error: String,
}

/// Payload of list responses.
#[derive(Debug, Clone, Serialize)]
pub struct Listing<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> From<Vec<T>> for Listing<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Payload of single-record responses.
#[derive(Debug, Clone, Serialize)]
pub struct Record<T> {
    pub data: T,
}

impl Envelope<NoPayload> {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            message: message.into(),
            payload: None,
        }
    }

    /// Failure envelope. The status defaults to 500 until overridden with
    /// [`Envelope::status`].
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            success: false,
            message: message.into(),
            payload: None,
        }
    }

    pub fn with<T>(self, payload: T) -> Envelope<T> {
        Envelope {
            status: self.status,
            success: self.success,
            message: self.message,
            payload: Some(payload),
        }
    }

    pub fn with_data<T>(self, data: T) -> Envelope<Record<T>> {
        self.with(Record { data })
    }

    pub fn with_list<T>(self, data: Vec<T>) -> Envelope<Listing<T>> {
        self.with(Listing::from(data))
    }

    pub fn with_error(self, error: impl Into<String>) -> Envelope<Fault> {
        self.with(Fault {
            error: error.into(),
        })
    }
}

impl<T> Envelope<T> {
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_envelope_has_only_success_and_message() {
        let body = serde_json::to_string(&Envelope::failure("Route not found")).unwrap();
        assert_eq!(body, r#"{"success":false,"message":"Route not found"}"#);
    }

    #[test]
    fn payload_fields_are_flattened() {
        let envelope = Envelope::ok("Vaccines retrieved successfully").with_list(vec![1, 2, 3]);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "success": true,
                "message": "Vaccines retrieved successfully",
                "count": 3,
                "data": [1, 2, 3]
            })
        );
    }

    #[test]
    fn failure_defaults_to_internal_server_error() {
        let envelope = Envelope::failure("Something went wrong!").with_error("boom");
        assert_eq!(envelope.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!envelope.success);
    }

    #[test]
    fn status_is_not_serialised() {
        let envelope = Envelope::ok("created").status(StatusCode::CREATED);
        let value = serde_json::to_value(&envelope).unwrap();
        assert!(value.get("status").is_none());
        assert_eq!(envelope.into_response().status(), StatusCode::CREATED);
    }
}
