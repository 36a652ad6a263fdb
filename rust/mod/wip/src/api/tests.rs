use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::DateTime;
use tower::ServiceExt;

use wip_core::FixedClock;
use wip_kv::KVStore;

use crate::bucket::ArchivePolicy;
use crate::service::WipService;
use super::{router, USER_HEADER};

struct TestApp {
    router: Router,
    clock: Arc<FixedClock>,
    _dir: tempfile::TempDir,
}

fn setup(rfc3339: &str) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let kv: Arc<dyn KVStore> =
        Arc::new(wip_kv::RedbStore::open(&dir.path().join("wip.redb")).unwrap());
    let clock = Arc::new(FixedClock::at(rfc3339).unwrap());
    let svc = WipService::new(kv, clock.clone(), ArchivePolicy::default());
    TestApp {
        router: router(Arc::new(svc)),
        clock,
        _dir: dir,
    }
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::json!(null)
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::json!(null))
    };
    (status, json)
}

async fn call(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(USER_HEADER, "dana");
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let body = match body {
        Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
        None => Body::empty(),
    };
    send(router, builder.body(body).unwrap()).await
}

fn order_body(customer: &str, ro: &str) -> serde_json::Value {
    serde_json::json!({"customer": customer, "unit": "T-1", "ro": ro})
}

#[tokio::test]
async fn order_crud_roundtrip() {
    let app = setup("2025-10-14T09:00:00-05:00");

    let (status, created) =
        call(&app.router, "POST", "/orders", Some(order_body("Acme", "100"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["dateAdded"], "2025-10-14");
    assert_eq!(created["bay"], "");

    let (status, got) = call(&app.router, "GET", &format!("/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(got["customer"], "Acme");

    let (status, patched) = call(
        &app.router,
        "PATCH",
        &format!("/orders/{id}"),
        Some(serde_json::json!({"secondShift": "waiting on tow"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["secondShift"], "waiting on tow");
    assert_eq!(patched["secondShiftUpdatedAt"], "2025-10-14T14:00:00.000000000Z");

    let (status, list) = call(&app.router, "GET", "/orders?q=acme&limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);

    let (status, _) = call(&app.router, "DELETE", &format!("/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, err) = call(&app.router, "GET", &format!("/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], "NOT_FOUND");

    let (_, history) = call(&app.router, "GET", &format!("/history/entity/{id}"), None).await;
    let actions: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["actionType"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["delete", "update", "create"]);
    assert_eq!(history[0]["userName"], "dana");
}

#[tokio::test]
async fn create_without_required_field_is_400() {
    let app = setup("2025-10-14T09:00:00-05:00");
    let (status, err) = call(
        &app.router,
        "POST",
        "/orders",
        Some(serde_json::json!({"customer": "Acme", "unit": "T-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_FAILED");
    assert_eq!(err["message"], "ro is required");
}

#[tokio::test]
async fn archive_flow_by_month() {
    let app = setup("2025-10-14T09:00:00-05:00");
    let (_, a) = call(&app.router, "POST", "/orders", Some(order_body("Acme", "100"))).await;
    let (_, b) = call(&app.router, "POST", "/orders", Some(order_body("Bolt", "200"))).await;
    let a_id = a["id"].as_str().unwrap();
    let b_id = b["id"].as_str().unwrap();

    // No body archives under the current month.
    let (status, archived) =
        call(&app.router, "POST", &format!("/orders/{a_id}/@archive"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(archived["archiveMonth"], "October 2025");
    assert_eq!(archived["sourceId"], a_id);

    let (status, archived) = call(
        &app.router,
        "POST",
        &format!("/orders/{b_id}/@archive"),
        Some(serde_json::json!({"archiveMonth": "Sep 2025"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(archived["archiveMonth"], "September 2025");

    let (_, list) = call(&app.router, "GET", "/orders", None).await;
    assert_eq!(list["total"], 0);

    let (status, grouped) = call(&app.router, "GET", "/archives", None).await;
    assert_eq!(status, StatusCode::OK);
    let months: Vec<&String> = grouped.as_object().unwrap().keys().collect();
    assert_eq!(months.len(), 2);
    assert_eq!(grouped["October 2025"].as_array().unwrap().len(), 1);

    let (status, october) = call(&app.router, "GET", "/archives/October-2025", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(october[0]["customer"], "Acme");

    let (status, _) = call(
        &app.router,
        "POST",
        &format!("/orders/{a_id}/@archive"),
        Some(serde_json::json!({"archiveMonth": "whenever"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, hits) = call(&app.router, "GET", "/search?q=bolt", None).await;
    assert_eq!(hits[0]["source"], "September 2025");
}

#[tokio::test]
async fn completed_and_duplicates_endpoints() {
    let app = setup("2025-10-14T09:00:00-05:00");
    let mut done = order_body("Cobalt", "300");
    done["customerStatus"] = "Complete".into();
    call(&app.router, "POST", "/orders", Some(done)).await;
    call(&app.router, "POST", "/orders", Some(order_body("Acme", "100"))).await;
    call(&app.router, "POST", "/orders", Some(order_body("Acme again", "100"))).await;

    let (_, completed) = call(&app.router, "GET", "/orders/@completed", None).await;
    assert_eq!(completed.as_array().unwrap().len(), 1);

    let (_, dupes) = call(&app.router, "GET", "/orders/@duplicates", None).await;
    assert_eq!(dupes["100"].as_array().unwrap().len(), 2);

    let (status, outcome) = call(&app.router, "POST", "/orders/@dedupe", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["removed"], 1);

    let (status, swept) = call(&app.router, "POST", "/orders/@archive-completed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(swept[0]["customer"], "Cobalt");
    assert_eq!(swept[0]["archiveMonth"], "October 2025");

    let (_, list) = call(&app.router, "GET", "/orders", None).await;
    assert_eq!(list["total"], 1);
}

#[tokio::test]
async fn shift_note_archive_is_gated_by_hour() {
    let app = setup("2025-10-12T10:00:00-05:00");
    let (status, note) = call(
        &app.router,
        "POST",
        "/shift-notes",
        Some(serde_json::json!({"notes": "lift 3 hydraulic leak", "shift": "first"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(note["shift"], "1st");
    assert_eq!(note["author"], "dana");
    assert_eq!(note["date"], "2025-10-12");

    // Two days later, before 8pm: nothing moves.
    app.clock.set(DateTime::parse_from_rfc3339("2025-10-14T19:00:00-05:00").unwrap());
    let (_, outcome) = call(&app.router, "POST", "/shift-notes/@archive", None).await;
    assert_eq!(outcome["archived"], 0);
    let (_, today) = call(&app.router, "GET", "/shift-notes/today", None).await;
    assert!(today.as_array().unwrap().is_empty());

    app.clock.set(DateTime::parse_from_rfc3339("2025-10-14T20:05:00-05:00").unwrap());
    let (_, outcome) = call(&app.router, "POST", "/shift-notes/@archive", None).await;
    assert_eq!(outcome["archived"], 1);

    let (_, grouped) = call(&app.router, "GET", "/shift-notes/archived", None).await;
    assert_eq!(grouped["2025-10-12"][0]["archiveDate"], "2025-10-14");

    let (status, day) = call(&app.router, "GET", "/shift-notes/archived/2025-10-12", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day.as_array().unwrap().len(), 1);

    let (status, _) = call(&app.router, "GET", "/shift-notes/archived/yesterday-ish", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn shift_note_edit_and_delete() {
    let app = setup("2025-10-14T16:00:00-05:00");
    let (_, note) = call(
        &app.router,
        "POST",
        "/shift-notes",
        Some(serde_json::json!({"notes": "yard gate stuck", "shift": "2nd", "author": "Lee"})),
    )
    .await;
    let id = note["id"].as_str().unwrap();

    let (status, updated) = call(
        &app.router,
        "PATCH",
        &format!("/shift-notes/{id}"),
        Some(serde_json::json!({"notes": "yard gate fixed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["notes"], "yard gate fixed");
    assert_eq!(updated["author"], "Lee");

    let (status, _) = call(&app.router, "DELETE", &format!("/shift-notes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app.router, "DELETE", &format!("/shift-notes/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn history_endpoints() {
    let app = setup("2025-10-14T09:00:00-05:00");
    call(&app.router, "POST", "/orders", Some(order_body("Acme", "100"))).await;

    let (status, entry) = call(
        &app.router,
        "POST",
        "/history",
        Some(serde_json::json!({
            "actionType": "update",
            "entityType": "order",
            "entityId": "external-1",
            "userName": "kiosk",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(!entry["timestamp"].as_str().unwrap().is_empty());

    let (_, filtered) = call(&app.router, "GET", "/history?userName=kiosk", None).await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    let (_, filtered) = call(&app.router, "GET", "/history?actionType=create&limit=5", None).await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);

    let (status, cleared) = call(&app.router, "DELETE", "/history/@clear", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["deletedCount"], 2);
}

#[tokio::test]
async fn anonymous_when_no_user_header() {
    let app = setup("2025-10-14T09:00:00-05:00");
    let req = Request::builder()
        .method("POST")
        .uri("/orders")
        .header("content-type", "application/json")
        .body(Body::from(order_body("Acme", "100").to_string()))
        .unwrap();
    let (status, _) = send(&app.router, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, history) = call(&app.router, "GET", "/history", None).await;
    assert_eq!(history[0]["userName"], "Anonymous");
}

#[tokio::test]
async fn parse_endpoints() {
    let app = setup("2025-10-14T09:00:00-05:00");

    let req = Request::builder()
        .method("POST")
        .uri("/orders/@parse-text")
        .header("content-type", "text/plain")
        .body(Body::from("Case # 42\nRepair Order: 7788\nUnit No: 55A"))
        .unwrap();
    let (status, draft) = send(&app.router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["decisivCase"], "42");
    assert_eq!(draft["ro"], "7788");
    assert_eq!(draft["unit"], "55A");
    assert_eq!(draft["customer"], "");

    let req = Request::builder()
        .method("POST")
        .uri("/orders/@parse-pdf")
        .header("content-type", "application/pdf")
        .body(Body::from("not a pdf"))
        .unwrap();
    let (status, err) = send(&app.router, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_FAILED");

    // Drafts are never saved.
    let (_, list) = call(&app.router, "GET", "/orders", None).await;
    assert_eq!(list["total"], 0);
}

async fn post_csv(router: &Router, uri: &str, csv: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "text/csv")
        .header(USER_HEADER, "dana")
        .body(Body::from(csv.to_string()))
        .unwrap();
    send(router, req).await
}

#[tokio::test]
async fn sheet_import_and_archive_cleanup() {
    let app = setup("2025-12-02T10:00:00-05:00");

    let current = "Customer,UNIT,R.O.\nAcme,T-1,100\n>>> YARD <<<,,\nBolt,T-2,\n";
    let (status, outcome) = post_csv(&app.router, "/orders/@import", current).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(outcome["imported"], 1);
    assert_eq!(outcome["skipped"], 2);
    let (_, list) = call(&app.router, "GET", "/orders", None).await;
    assert_eq!(list["items"][0]["dateAdded"], "2025-12-02");

    let november = "Cobalt,C-1,300\nCobalt,C-1,300\nDelta,D-4,400\n";
    let (status, outcome) = post_csv(
        &app.router,
        "/orders/@import?archive=true&archiveMonth=Nov%202025",
        november,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(outcome["imported"], 3);
    assert_eq!(outcome["archiveMonth"], "November 2025");

    let (status, dupes) = call(&app.router, "GET", "/archives/@duplicates", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dupes["300"].as_array().unwrap().len(), 2);

    let (status, outcome) = call(&app.router, "POST", "/archives/@dedupe", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["removed"], 1);

    let (_, month) = call(&app.router, "GET", "/archives/November-2025", None).await;
    let month = month.as_array().unwrap().clone();
    assert_eq!(month.len(), 2);

    let id = month[0]["id"].as_str().unwrap();
    let (status, deleted) = call(&app.router, "DELETE", &format!("/archived-orders/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["id"], id);
    let (status, _) = call(&app.router, "DELETE", &format!("/archived-orders/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, err) = post_csv(&app.router, "/orders/@import?archive=true&archiveMonth=later", november).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_FAILED");
}
