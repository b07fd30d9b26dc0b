//! Request extractors whose rejections render as the uniform envelope.

use crate::error::AppError;
use axum::{
    Form, Json,
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{HeaderMap, StatusCode, header, request::Parts},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Validated request body accepted as JSON or as a urlencoded form.
///
/// The decoder is picked from `Content-Type`; anything that is not a form is
/// treated as JSON, so a missing content type is reported as a body error.
pub struct ValidatedBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedBody<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = if is_form(req.headers()) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| body_rejection(e.status(), e.body_text()))?;
            value
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| body_rejection(e.status(), e.body_text()))?;
            value
        };

        value.validate()?;

        Ok(ValidatedBody(value))
    }
}

/// Query string extractor that reports malformed parameters as a 400 envelope.
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidQuery(e.body_text()))?;
        Ok(ApiQuery(value))
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

fn body_rejection(status: StatusCode, detail: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::InvalidBody(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct NewItem {
        #[validate(length(min = 1, max = 10))]
        name: String,
        #[validate(range(min = 1, max = 5))]
        quantity: i32,
    }

    fn request(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = Request::builder().method("POST").uri("/items");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn decodes_json() {
        let req = request(Some("application/json"), r#"{"name":"bcg","quantity":2}"#);
        let ValidatedBody(item) = ValidatedBody::<NewItem>::from_request(req, &()).await.unwrap();
        assert_eq!(item.name, "bcg");
        assert_eq!(item.quantity, 2);
    }

    #[tokio::test]
    async fn decodes_urlencoded_form() {
        let req = request(
            Some("application/x-www-form-urlencoded"),
            "name=polio&quantity=3",
        );
        let ValidatedBody(item) = ValidatedBody::<NewItem>::from_request(req, &()).await.unwrap();
        assert_eq!(item.name, "polio");
        assert_eq!(item.quantity, 3);
    }

    #[tokio::test]
    async fn malformed_json_is_an_invalid_body() {
        let req = request(Some("application/json"), "{not json");
        let err = ValidatedBody::<NewItem>::from_request(req, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::InvalidBody(_)));
    }

    #[tokio::test]
    async fn missing_content_type_is_an_invalid_body() {
        let req = request(None, r#"{"name":"bcg","quantity":2}"#);
        let err = ValidatedBody::<NewItem>::from_request(req, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::InvalidBody(_)));
    }

    #[tokio::test]
    async fn rule_violations_are_validation_errors() {
        let req = request(Some("application/json"), r#"{"name":"","quantity":9}"#);
        let err = ValidatedBody::<NewItem>::from_request(req, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[derive(Debug, Deserialize)]
    struct Filter {
        active: Option<bool>,
    }

    #[tokio::test]
    async fn malformed_query_is_rejected() {
        let req = Request::builder()
            .uri("/items?active=maybe")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = req.into_parts();
        let err = ApiQuery::<Filter>::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn well_formed_query_is_decoded() {
        let req = Request::builder()
            .uri("/items?active=false")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = req.into_parts();
        let ApiQuery(filter) = ApiQuery::<Filter>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(filter.active, Some(false));
    }
}
