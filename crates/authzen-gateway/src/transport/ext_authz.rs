//! External authorization (HTTP mode).
//!
//! A proxy forwards the original request under `/ext-authz`. The caller's
//! identity header becomes the subject, the forwarded path (prefixed) the
//! resource, and the HTTP method the action. 200 lets the request through;
//! anything else is returned to the client as-is.
//!
//! The path is matched exactly as received: no percent-decoding and no query
//! string, so `%2F` never aliases a `/` segment.

use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use authzen_core::error::{AuthzenError, Result};
use authzen_core::DENY_REASON;

use crate::app_state::AppState;

/// Set on allowed responses so the proxy can forward it upstream.
pub const RESULT_HEADER: &str = "x-authzen-result";

/// Route prefix the proxy forwards under.
pub const MOUNT: &str = "/ext-authz";

const ENDPOINT: &str = "ext_authz";
const NO_USER: &str = "No user ID found in headers";

/// The `(subject, resource, action)` triple carried by a forwarded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedCheck {
    pub subject: String,
    pub resource: String,
    pub action: String,
}

/// Raw forwarded path: the request path with [`MOUNT`] stripped, `/` when
/// nothing follows it.
pub fn forwarded_path(request_path: &str) -> &str {
    match request_path.strip_prefix(MOUNT) {
        Some("") | None => "/",
        Some(rest) => rest,
    }
}

impl ForwardedCheck {
    /// `path` is the raw forwarded path, leading `/` included.
    pub fn extract(
        headers: &HeaderMap,
        user_header: &HeaderName,
        resource_prefix: &str,
        method: &Method,
        path: &str,
    ) -> Result<Self> {
        let subject = headers
            .get(user_header)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AuthzenError::Unauthenticated(NO_USER.into()))?;

        Ok(Self {
            subject: subject.to_string(),
            resource: format!("{resource_prefix}{path}"),
            action: method.as_str().to_string(),
        })
    }
}

/// `/ext-authz` and `/ext-authz/*path`.
pub async fn check(
    State(app): State<AppState>,
    method: Method,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let path = forwarded_path(uri.path());
    let ext = &app.cfg().ext_authz;

    // header name was validated with the config
    let Ok(user_header) = ext.header_name() else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "ext_authz misconfigured").into_response();
    };

    let req = match ForwardedCheck::extract(
        &headers,
        &user_header,
        &ext.resource_prefix,
        &method,
        path,
    ) {
        Ok(req) => req,
        Err(e) => {
            app.metrics()
                .validation_errors
                .inc(&[("endpoint", ENDPOINT)]);
            tracing::warn!(%method, %path, error = %e, "ext-authz request without identity");
            return (StatusCode::UNAUTHORIZED, NO_USER).into_response();
        }
    };

    let started = Instant::now();
    let result = app.engine().decide(&req.subject, &req.resource, &req.action);
    app.record_decisions(ENDPOINT, [result.decision], started);

    if result.is_allow() {
        (StatusCode::OK, [(RESULT_HEADER, "allowed")]).into_response()
    } else {
        tracing::warn!(
            subject = %req.subject,
            resource = %req.resource,
            action = %req.action,
            "ext-authz denied"
        );
        (StatusCode::FORBIDDEN, DENY_REASON).into_response()
    }
}
