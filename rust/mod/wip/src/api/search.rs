use axum::{
    Router,
    extract::{Query, State},
    routing::get,
    Json,
};
use serde::Deserialize;

use wip_core::ServiceError;

use crate::service::SearchHit;
use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/search", get(search))
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn search(
    State(svc): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<SearchHit>>, ServiceError> {
    Ok(Json(svc.search_all(&query.q)?))
}
