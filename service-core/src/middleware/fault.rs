//! Terminal fault handling for the whole router.
//!
//! Handlers report faults by returning [`AppError`]; panics are turned into
//! faults by [`panic_to_fault`] (install it with
//! `CatchPanicLayer::custom(panic_to_fault)` inside this middleware).
//! [`fault_envelope_middleware`] sits around the routing layer and is the one
//! place that logs faults and decides how much of them the client sees.

use crate::config::Environment;
use crate::envelope::Envelope;
use crate::error::{AppError, FAULT_MESSAGE, FaultDetail};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::any::Any;

#[derive(Debug, Clone, Copy)]
pub struct FaultPolicy {
    /// Put the fault detail in the `error` field instead of the generic text.
    pub expose_detail: bool,
}

impl FaultPolicy {
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            expose_detail: environment.is_development(),
        }
    }
}

pub async fn fault_envelope_middleware(
    State(policy): State<FaultPolicy>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    // Known path, unsupported method: report it like any other miss.
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        return AppError::RouteNotFound.into_response();
    }

    let Some(FaultDetail(detail)) = response.extensions().get::<FaultDetail>().cloned() else {
        return response;
    };

    tracing::error!(
        method = %method,
        path = %path,
        error = %detail,
        "Unhandled request fault"
    );

    if !policy.expose_detail {
        return response;
    }

    let mut res = Envelope::failure(FAULT_MESSAGE)
        .with_error(detail.clone())
        .into_response();
    res.extensions_mut().insert(FaultDetail(detail));
    res
}

/// Panic handler for `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn panic_to_fault(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    AppError::InternalError(anyhow::anyhow!(detail)).into_response()
}
