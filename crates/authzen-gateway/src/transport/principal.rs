//! Principal-shaped handlers (`/v1/authorize`, `/v1/evaluations`,
//! `/v1/search/*`).

use std::time::Instant;

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use authzen_core::protocol::principal::{
    AuthorizeRequest, AuthorizeResponse, PrincipalActionSearchRequest,
    PrincipalActionSearchResponse, PrincipalEvaluationsRequest, PrincipalEvaluationsResponse,
    PrincipalResourceSearchRequest, PrincipalSearchResponse, PrincipalSubjectSearchRequest,
};

use crate::app_state::AppState;

use super::error::{accept, ApiResult};

pub async fn authorize(
    State(app): State<AppState>,
    body: Result<Json<AuthorizeRequest>, JsonRejection>,
) -> ApiResult<Json<AuthorizeResponse>> {
    const ENDPOINT: &str = "authorize";
    let req = accept(&app, ENDPOINT, body, AuthorizeRequest::validate)?;

    let started = Instant::now();
    let result = app
        .engine()
        .decide(&req.principal.id, &req.resource.id, &req.action);
    app.record_decisions(ENDPOINT, [result.decision], started);

    Ok(Json(result.into()))
}

pub async fn evaluations(
    State(app): State<AppState>,
    body: Result<Json<PrincipalEvaluationsRequest>, JsonRejection>,
) -> ApiResult<Json<PrincipalEvaluationsResponse>> {
    const ENDPOINT: &str = "principal_evaluations";
    let req = accept(&app, ENDPOINT, body, PrincipalEvaluationsRequest::validate)?;

    let started = Instant::now();
    let items = req.batch_items();
    let results = app.engine().evaluate_batch(
        &req.principal.id,
        req.action.as_deref(),
        req.context.as_ref(),
        &items,
        req.semantic()?,
    )?;
    app.record_decisions(ENDPOINT, results.iter().map(|r| r.decision), started);

    Ok(Json(results.into_iter().collect()))
}

pub async fn search_subject(
    State(app): State<AppState>,
    body: Result<Json<PrincipalSubjectSearchRequest>, JsonRejection>,
) -> ApiResult<Json<PrincipalSearchResponse>> {
    let req = accept(
        &app,
        "principal_search_subject",
        body,
        PrincipalSubjectSearchRequest::validate,
    )?;
    let ids = app
        .engine()
        .find_subjects_for_resource(&req.resource.id, &req.action);
    Ok(Json(ids.into_iter().collect()))
}

pub async fn search_resource(
    State(app): State<AppState>,
    body: Result<Json<PrincipalResourceSearchRequest>, JsonRejection>,
) -> ApiResult<Json<PrincipalSearchResponse>> {
    let req = accept(
        &app,
        "principal_search_resource",
        body,
        PrincipalResourceSearchRequest::validate,
    )?;
    let ids = app
        .engine()
        .find_resources_for_subject(&req.principal.id, &req.action);
    Ok(Json(ids.into_iter().collect()))
}

pub async fn search_action(
    State(app): State<AppState>,
    body: Result<Json<PrincipalActionSearchRequest>, JsonRejection>,
) -> ApiResult<Json<PrincipalActionSearchResponse>> {
    let req = accept(
        &app,
        "principal_search_action",
        body,
        PrincipalActionSearchRequest::validate,
    )?;
    let names = app
        .engine()
        .find_actions_for_subject_and_resource(&req.principal.id, &req.resource.id);
    Ok(Json(names.into()))
}
