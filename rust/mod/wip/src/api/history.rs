use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json,
};
use serde::Serialize;

use wip_core::ServiceError;

use crate::model::HistoryEntry;
use crate::service::HistoryFilter;
use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/history", get(list_history).post(record_history))
        .route("/history/entity/{id}", get(history_for_entity))
        .route("/history/@clear", delete(clear_history))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClearResponse {
    message: &'static str,
    deleted_count: usize,
}

async fn list_history(
    State(svc): State<AppState>,
    Query(filter): Query<HistoryFilter>,
) -> Result<Json<Vec<HistoryEntry>>, ServiceError> {
    Ok(Json(svc.list_history(&filter)?))
}

async fn history_for_entity(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<HistoryEntry>>, ServiceError> {
    Ok(Json(svc.history_for_entity(&id)?))
}

async fn record_history(
    State(svc): State<AppState>,
    Json(entry): Json<HistoryEntry>,
) -> Result<(StatusCode, Json<HistoryEntry>), ServiceError> {
    Ok((StatusCode::CREATED, Json(svc.record_history(entry)?)))
}

async fn clear_history(State(svc): State<AppState>) -> Result<Json<ClearResponse>, ServiceError> {
    let deleted_count = svc.clear_history()?;
    Ok(Json(ClearResponse {
        message: "History cleared successfully",
        deleted_count,
    }))
}
