use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::directory::{EmployeePayload, PageRequest, SearchPage, SearchRequest};
use crate::http::request::org_id;
use crate::http::response::ApiError;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

/// `POST /search`: filters in the body, paging and sorting in the query string.
pub async fn search_employees(
    State(state): State<AppState>,
    headers: HeaderMap,
    page: Result<Query<PageRequest>, QueryRejection>,
    request: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchPage>, ApiError> {
    let Query(page) = page?;
    let Json(request) = request?;
    let org = org_id(&headers);
    let service = state.service.clone();

    let result = tokio::task::spawn_blocking(move || {
        service.search(org.as_deref(), &request, &page)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Search task failed");
        ApiError::Internal
    })?;

    Ok(Json(result?))
}

/// `POST /employees`: the new record belongs to the caller's organization.
pub async fn add_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<EmployeePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let Json(payload) = payload?;
    let org = org_id(&headers);
    let service = state.service.clone();

    let id = tokio::task::spawn_blocking(move || service.add_employee(org.as_deref(), payload))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Add task failed");
            ApiError::Internal
        })??;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}
