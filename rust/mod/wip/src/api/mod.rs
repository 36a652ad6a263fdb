pub mod archives;
pub mod history;
pub mod orders;
pub mod search;
pub mod shift_notes;

#[cfg(test)]
mod tests;

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::Router;
use serde::de::DeserializeOwned;

use wip_core::ServiceError;

use crate::service::WipService;

/// Shared application state.
pub type AppState = Arc<WipService>;

/// Header naming the person at the keyboard.
pub const USER_HEADER: &str = "x-wip-user";

/// Build the WIP API router. `wipd` nests it under `/wip`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(orders::routes())
        .merge(archives::routes())
        .merge(search::routes())
        .merge(shift_notes::routes())
        .merge(history::routes())
        .with_state(state)
}

/// The acting user, from `x-wip-user`. Missing or blank means "Anonymous".
#[derive(Debug, Clone, PartialEq)]
pub struct Actor(pub String);

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("Anonymous");
        Ok(Actor(name.to_string()))
    }
}

/// Decode an optional JSON body; an empty body yields the default.
pub(crate) fn optional_json<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ServiceError::Validation(format!("invalid JSON body: {}", e)))
}
