use axum::{
    Router,
    extract::{Path, State},
    routing::{delete, get, post},
    Json,
};

use wip_core::ServiceError;

use crate::bucket::Grouped;
use crate::model::ArchivedOrder;
use crate::service::DedupeOutcome;
use super::{Actor, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/archives", get(archives_by_month))
        .route("/archives/@duplicates", get(archive_duplicates))
        .route("/archives/@dedupe", post(dedupe_archives))
        .route("/archives/{month}", get(archives_for_month))
        .route("/archived-orders/{id}", delete(delete_archived_order))
}

async fn archives_by_month(
    State(svc): State<AppState>,
) -> Result<Json<Grouped<ArchivedOrder>>, ServiceError> {
    Ok(Json(svc.archives_by_month()?))
}

async fn archives_for_month(
    State(svc): State<AppState>,
    Path(month): Path<String>,
) -> Result<Json<Vec<ArchivedOrder>>, ServiceError> {
    Ok(Json(svc.archives_for_month(&month)?))
}

async fn archive_duplicates(
    State(svc): State<AppState>,
) -> Result<Json<Grouped<ArchivedOrder>>, ServiceError> {
    Ok(Json(svc.archive_duplicates()?))
}

async fn dedupe_archives(
    State(svc): State<AppState>,
    Actor(actor): Actor,
) -> Result<Json<DedupeOutcome>, ServiceError> {
    Ok(Json(svc.dedupe_archives(&actor)?))
}

async fn delete_archived_order(
    State(svc): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<String>,
) -> Result<Json<ArchivedOrder>, ServiceError> {
    Ok(Json(svc.delete_archived_order(&id, &actor)?))
}
