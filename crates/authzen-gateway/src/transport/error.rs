//! HTTP rendering of `AuthzenError`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use authzen_core::error::{AuthzenError, ClientCode};

use crate::app_state::AppState;

/// Wrapper so the core error can implement axum's `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub AuthzenError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<AuthzenError> for ApiError {
    fn from(e: AuthzenError) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(_: JsonRejection) -> Self {
        Self(AuthzenError::BadRequest("invalid request body".into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let status = match code {
            ClientCode::BadRequest
            | ClientCode::InvalidSemantic
            | ClientCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
            ClientCode::Unauthenticated => StatusCode::UNAUTHORIZED,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({
            "error": code.as_str(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Decode + validate a JSON body. Rejections are counted per endpoint and
/// logged before being rendered.
pub(crate) fn accept<T>(
    app: &AppState,
    endpoint: &'static str,
    body: Result<Json<T>, JsonRejection>,
    validate: impl FnOnce(&T) -> authzen_core::Result<()>,
) -> ApiResult<T> {
    let outcome = body.map_err(ApiError::from).and_then(|Json(req)| {
        validate(&req)?;
        Ok(req)
    });
    if let Err(e) = &outcome {
        app.metrics()
            .validation_errors
            .inc(&[("endpoint", endpoint)]);
        tracing::warn!(endpoint, error = %e.0, "request rejected");
    }
    outcome
}
