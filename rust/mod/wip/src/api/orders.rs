use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json,
};
use serde::Deserialize;

use wip_core::{ListParams, ListResult, ServiceError};

use crate::bucket::Grouped;
use crate::import;
use crate::model::{ArchivedOrder, Order, OrderFields};
use crate::pdf;
use crate::service::{DedupeOutcome, ImportOutcome};
use super::{optional_json, Actor, AppState};

/// Case PDFs with scanned attachments run well past axum's 2 MB default.
const PDF_BODY_LIMIT: usize = 25 * 1024 * 1024;

const SHEET_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{id}", get(get_order).patch(update_order).delete(delete_order))
        .route("/orders/{id}/@archive", post(archive_order))
        .route("/orders/@completed", get(completed_orders))
        .route("/orders/@archive-completed", post(archive_completed))
        .route("/orders/@duplicates", get(duplicate_ros))
        .route("/orders/@dedupe", post(dedupe_orders))
        .route(
            "/orders/@parse-pdf",
            post(parse_pdf).layer(DefaultBodyLimit::max(PDF_BODY_LIMIT)),
        )
        .route("/orders/@parse-text", post(parse_text))
        .route(
            "/orders/@import",
            post(import_sheet).layer(DefaultBodyLimit::max(SHEET_BODY_LIMIT)),
        )
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArchiveBody {
    archive_month: Option<String>,
}

/// `?archive=true&archiveMonth=November 2025` loads the sheet into the archive.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportQuery {
    #[serde(default)]
    archive: bool,
    archive_month: Option<String>,
}

async fn list_orders(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<Order>>, ServiceError> {
    Ok(Json(svc.list_orders(&params)?))
}

async fn get_order(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ServiceError> {
    Ok(Json(svc.get_order(&id)?))
}

async fn create_order(
    State(svc): State<AppState>,
    Actor(actor): Actor,
    Json(fields): Json<OrderFields>,
) -> Result<(StatusCode, Json<Order>), ServiceError> {
    Ok((StatusCode::CREATED, Json(svc.create_order(fields, &actor)?)))
}

async fn update_order(
    State(svc): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<Order>, ServiceError> {
    Ok(Json(svc.update_order(&id, patch, &actor)?))
}

async fn delete_order(
    State(svc): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<String>,
) -> Result<Json<Order>, ServiceError> {
    Ok(Json(svc.delete_order(&id, &actor)?))
}

async fn archive_order(
    State(svc): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ArchivedOrder>, ServiceError> {
    let body: ArchiveBody = optional_json(&body)?;
    Ok(Json(svc.archive_order(&id, body.archive_month.as_deref(), &actor)?))
}

async fn completed_orders(State(svc): State<AppState>) -> Result<Json<Vec<Order>>, ServiceError> {
    Ok(Json(svc.completed_orders()?))
}

async fn archive_completed(
    State(svc): State<AppState>,
    Actor(actor): Actor,
    body: Bytes,
) -> Result<Json<Vec<ArchivedOrder>>, ServiceError> {
    let body: ArchiveBody = optional_json(&body)?;
    Ok(Json(svc.archive_completed(body.archive_month.as_deref(), &actor)?))
}

async fn duplicate_ros(State(svc): State<AppState>) -> Result<Json<Grouped<Order>>, ServiceError> {
    Ok(Json(svc.duplicate_ros()?))
}

async fn dedupe_orders(
    State(svc): State<AppState>,
    Actor(actor): Actor,
) -> Result<Json<DedupeOutcome>, ServiceError> {
    Ok(Json(svc.dedupe_orders(&actor)?))
}

/// Raw PDF bytes in, order draft out. Nothing is saved.
async fn parse_pdf(body: Bytes) -> Result<Json<OrderFields>, ServiceError> {
    Ok(Json(pdf::parse_order_pdf(&body)?))
}

/// Plain text in (already extracted), order draft out.
async fn parse_text(body: String) -> Json<OrderFields> {
    Json(pdf::parse_order_text(&body))
}

/// CSV sheet export in, import counts out.
async fn import_sheet(
    State(svc): State<AppState>,
    Actor(actor): Actor,
    Query(query): Query<ImportQuery>,
    body: Bytes,
) -> Result<(StatusCode, Json<ImportOutcome>), ServiceError> {
    let sheet = import::read_sheet(body.as_ref())?;
    let outcome = if query.archive {
        svc.import_archived(sheet, query.archive_month.as_deref(), &actor)?
    } else {
        svc.import_orders(sheet, &actor)?
    };
    Ok((StatusCode::CREATED, Json(outcome)))
}
