//! Route registration: module routes plus system endpoints.

use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

/// Build the complete router. Each module is mounted under `/{name}`.
pub fn build_router(module_routes: Vec<(&str, Router)>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    for (name, router) in module_routes {
        app = app.nest(&format!("/{}", name), router);
    }
    app
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "wipd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use wip::bucket::ArchivePolicy;
    use wip::{WipModule, WipService};
    use wip_core::{FixedClock, Module};

    use super::*;

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_system_and_module_routes() {
        let dir = tempfile::tempdir().unwrap();
        let kv: Arc<dyn wip_kv::KVStore> =
            Arc::new(wip_kv::RedbStore::open(&dir.path().join("wip.redb")).unwrap());
        let clock = Arc::new(FixedClock::at("2025-10-14T09:00:00-05:00").unwrap());
        let svc = Arc::new(WipService::new(kv, clock, ArchivePolicy::default()));
        let module = WipModule::new(svc);
        let app = build_router(vec![(module.name(), module.routes())]);

        let (status, body) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (_, body) = get_json(&app, "/version").await;
        assert_eq!(body["name"], "wipd");

        let (status, body) = get_json(&app, "/wip/orders").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
    }
}
