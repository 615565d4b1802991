//! Lightweight in-process metrics plus the request-counting middleware.
//!
//! Metrics are stored as atomics and rendered by the `/metrics` handler in
//! Prometheus text format.

pub mod metrics;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;

pub use metrics::PdpMetrics;

/// Count every routed request by its route template (not the raw path, so
/// ext-authz wildcards do not explode label cardinality).
pub async fn track_requests(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    app.metrics().http_requests.inc(&[("route", route.as_str())]);
    next.run(req).await
}
