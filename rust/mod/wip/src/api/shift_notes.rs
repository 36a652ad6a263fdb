use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use wip_core::ServiceError;

use crate::bucket::Grouped;
use crate::model::{ArchivedShiftNote, ShiftNote};
use crate::service::{NoteArchiveOutcome, NoteUpdate};
use crate::shift::Shift;
use super::{Actor, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shift-notes", post(create_note))
        .route("/shift-notes/today", get(notes_today))
        .route("/shift-notes/yesterday", get(notes_yesterday))
        .route("/shift-notes/{id}", patch(update_note).delete(delete_note))
        .route("/shift-notes/@archive", post(archive_notes))
        .route("/shift-notes/archived", get(archived_by_date))
        .route("/shift-notes/archived/{date}", get(archived_for_date))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateNoteBody {
    notes: String,
    shift: Shift,
    author: Option<String>,
}

async fn notes_today(State(svc): State<AppState>) -> Result<Json<Vec<ShiftNote>>, ServiceError> {
    Ok(Json(svc.notes_today()?))
}

async fn notes_yesterday(
    State(svc): State<AppState>,
) -> Result<Json<Vec<ShiftNote>>, ServiceError> {
    Ok(Json(svc.notes_yesterday()?))
}

async fn create_note(
    State(svc): State<AppState>,
    Actor(actor): Actor,
    Json(body): Json<CreateNoteBody>,
) -> Result<(StatusCode, Json<ShiftNote>), ServiceError> {
    let note = svc.create_note(body.notes, body.shift, body.author, &actor)?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn update_note(
    State(svc): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<String>,
    Json(update): Json<NoteUpdate>,
) -> Result<Json<ShiftNote>, ServiceError> {
    Ok(Json(svc.update_note(&id, update, &actor)?))
}

async fn delete_note(
    State(svc): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<String>,
) -> Result<Json<ShiftNote>, ServiceError> {
    Ok(Json(svc.delete_note(&id, &actor)?))
}

async fn archive_notes(
    State(svc): State<AppState>,
    Actor(actor): Actor,
) -> Result<Json<NoteArchiveOutcome>, ServiceError> {
    Ok(Json(svc.archive_notes(&actor)?))
}

async fn archived_by_date(
    State(svc): State<AppState>,
) -> Result<Json<Grouped<ArchivedShiftNote>>, ServiceError> {
    Ok(Json(svc.archived_notes_by_date()?))
}

async fn archived_for_date(
    State(svc): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<ArchivedShiftNote>>, ServiceError> {
    let date: NaiveDate = date
        .parse()
        .map_err(|_| ServiceError::Validation(format!("invalid date '{}' (expected YYYY-MM-DD)", date)))?;
    Ok(Json(svc.archived_notes_for_date(date)?))
}
