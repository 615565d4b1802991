//! AuthZEN Authorization API handlers.
//!
//! Each handler: decode + validate the envelope, call the decision engine,
//! render the result. No decision semantics live here.

use std::time::Instant;

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use authzen_core::protocol::access::{
    ActionSearchRequest, ActionSearchResponse, EvaluationRequest, EvaluationResponse,
    EvaluationsRequest, EvaluationsResponse, MetadataResponse, ResourceSearchRequest,
    ResourceSearchResponse, SearchRequest, SubjectSearchRequest, SubjectSearchResponse,
};
use authzen_core::PolicyRecord;

use crate::app_state::AppState;

use super::error::{accept, ApiResult};

pub async fn metadata(State(app): State<AppState>) -> Json<MetadataResponse> {
    Json(MetadataResponse::for_base_url(&app.cfg().gateway.base_url))
}

pub async fn evaluation(
    State(app): State<AppState>,
    body: Result<Json<EvaluationRequest>, JsonRejection>,
) -> ApiResult<Json<EvaluationResponse>> {
    const ENDPOINT: &str = "evaluation";
    let req = accept(&app, ENDPOINT, body, EvaluationRequest::validate)?;

    let started = Instant::now();
    let result = app
        .engine()
        .decide(&req.subject.id, &req.resource.id, &req.action.name);
    app.record_decisions(ENDPOINT, [result.decision], started);

    Ok(Json(result.into()))
}

pub async fn evaluations(
    State(app): State<AppState>,
    body: Result<Json<EvaluationsRequest>, JsonRejection>,
) -> ApiResult<Json<EvaluationsResponse>> {
    const ENDPOINT: &str = "evaluations";
    let req = accept(&app, ENDPOINT, body, EvaluationsRequest::validate)?;

    let started = Instant::now();
    let items = req.batch_items();
    let results = app.engine().evaluate_batch(
        &req.subject.id,
        req.shared_action(),
        req.context.as_ref(),
        &items,
        req.semantic()?,
    )?;
    app.record_decisions(ENDPOINT, results.iter().map(|r| r.decision), started);

    Ok(Json(results.into_iter().collect()))
}

pub async fn search_subject(
    State(app): State<AppState>,
    body: Result<Json<SubjectSearchRequest>, JsonRejection>,
) -> ApiResult<Json<SubjectSearchResponse>> {
    let req = accept(&app, "search_subject", body, SearchRequest::validate_subject_search)?;
    let ids = app
        .engine()
        .find_subjects_for_resource(&req.resource.id, &req.action.name);
    Ok(Json(SubjectSearchResponse::from_identifiers(&ids)))
}

pub async fn search_resource(
    State(app): State<AppState>,
    body: Result<Json<ResourceSearchRequest>, JsonRejection>,
) -> ApiResult<Json<ResourceSearchResponse>> {
    let req = accept(&app, "search_resource", body, SearchRequest::validate_resource_search)?;
    let ids = app
        .engine()
        .find_resources_for_subject(&req.subject.id, &req.action.name);
    Ok(Json(ResourceSearchResponse::from_identifiers(&ids)))
}

pub async fn search_action(
    State(app): State<AppState>,
    body: Result<Json<ActionSearchRequest>, JsonRejection>,
) -> ApiResult<Json<ActionSearchResponse>> {
    let req = accept(&app, "search_action", body, SearchRequest::validate_action_search)?;
    let names = app
        .engine()
        .find_actions_for_subject_and_resource(&req.subject.id, &req.resource.id);
    Ok(Json(ActionSearchResponse::from_names(names)))
}

pub async fn list_policies(State(app): State<AppState>) -> Json<Vec<PolicyRecord>> {
    Json(app.store().list_policies())
}
