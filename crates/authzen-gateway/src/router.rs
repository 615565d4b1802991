//! Axum router wiring.

use axum::{
    middleware,
    routing::{any, get, post},
    Router,
};

use authzen_core::protocol::paths;

use crate::{app_state::AppState, obs, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(paths::METADATA, get(transport::access::metadata))
        .route(paths::EVALUATION, post(transport::access::evaluation))
        .route(paths::EVALUATIONS, post(transport::access::evaluations))
        .route(paths::SEARCH_SUBJECT, post(transport::access::search_subject))
        .route(paths::SEARCH_RESOURCE, post(transport::access::search_resource))
        .route(paths::SEARCH_ACTION, post(transport::access::search_action))
        .route(paths::AUTHORIZE, post(transport::principal::authorize))
        .route(paths::PRINCIPAL_EVALUATIONS, post(transport::principal::evaluations))
        .route(
            paths::PRINCIPAL_SEARCH_SUBJECT,
            post(transport::principal::search_subject),
        )
        .route(
            paths::PRINCIPAL_SEARCH_RESOURCE,
            post(transport::principal::search_resource),
        )
        .route(
            paths::PRINCIPAL_SEARCH_ACTION,
            post(transport::principal::search_action),
        )
        .route(paths::POLICIES, get(transport::access::list_policies))
        .route("/ext-authz", any(transport::ext_authz::check))
        .route("/ext-authz/*path", any(transport::ext_authz::check))
        .route("/health", get(ops::health))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .route_layer(middleware::from_fn_with_state(state.clone(), obs::track_requests))
        .with_state(state)
}
