use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use osint_admin_api::{AppState, router};
use osint_admin_core::test_util::{MemoryStore, gate_with};
use osint_admin_core::{AdminService, EntitlementStore, Pricing};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const KEY: &str = "test-api-key";
const ADMIN: i64 = 5682019164;

fn app(store: Arc<MemoryStore>) -> Router {
    let store: Arc<dyn EntitlementStore> = store;
    let service = AdminService::new(gate_with(&[ADMIN, 1844138085]), store, Pricing::default());
    router(AppState::new(service, KEY))
}

fn post(path: &str, key: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header("X-API-Key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

#[tokio::test]
async fn missing_or_wrong_key_is_401() {
    let store = Arc::new(MemoryStore::new());
    let body = json!({"admin_user_id": ADMIN});

    let (status, value) = send(app(store.clone()), post("/api/telegram/stats", None, body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(value["ok"], false);

    let (status, _) = send(app(store.clone()), post("/api/telegram/stats", Some("nope"), body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn verify_admin_reports_membership() {
    let store = Arc::new(MemoryStore::new());
    let (status, value) = send(
        app(store.clone()),
        post("/api/telegram/verify-admin", Some(KEY), json!({"user_id": 1844138085})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"ok": true, "data": {"is_admin": true}}));

    let (_, value) = send(
        app(store),
        post("/api/telegram/verify-admin", Some(KEY), json!({"user_id": 999999999})),
    )
    .await;
    assert_eq!(value["data"]["is_admin"], false);
}

#[tokio::test]
async fn non_admin_caller_is_403() {
    let store = Arc::new(MemoryStore::new());
    let (status, value) = send(
        app(store.clone()),
        post("/api/telegram/stats", Some(KEY), json!({"admin_user_id": 999999999})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(value["error"]["kind"], "unauthorized");
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn grant_then_user_info() {
    let store = Arc::new(MemoryStore::new());
    store.seed_user(123456789, None);

    let before = Utc::now();
    let (status, value) = send(
        app(store.clone()),
        post(
            "/api/telegram/grant-subscription",
            Some(KEY),
            json!({"admin_user_id": ADMIN, "target_user_id": 123456789, "days": 21}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["data"]["days"], 21);
    assert_eq!(value["data"]["currency"], "PKR");

    let end = store.user(123456789).unwrap().subscription_end_date.unwrap();
    assert!(end >= before + Duration::days(21));

    let (status, value) = send(
        app(store),
        post("/api/telegram/user-info", Some(KEY), json!({"admin_user_id": ADMIN, "target_user_id": 123456789})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["data"]["is_active"], true);
    assert_eq!(value["data"]["recent_events"][0]["action"], "grant");
}

#[tokio::test]
async fn error_kinds_map_to_statuses() {
    let store = Arc::new(MemoryStore::new());
    store.seed_user(5, None);

    let (status, value) = send(
        app(store.clone()),
        post("/api/telegram/user-info", Some(KEY), json!({"admin_user_id": ADMIN, "target_user_id": 404})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["error"]["kind"], "not_found");
    assert_eq!(value["error"]["user_id"], 404);

    let (status, value) = send(
        app(store.clone()),
        post(
            "/api/telegram/grant-subscription",
            Some(KEY),
            json!({"admin_user_id": ADMIN, "target_user_id": 5, "days": 0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"]["kind"], "invalid_argument");

    let (status, value) = send(
        app(store.clone()),
        post("/api/telegram/users", Some(KEY), json!({"admin_user_id": ADMIN, "page": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"]["kind"], "invalid_argument");

    store.set_unavailable(true);
    let (status, value) = send(
        app(store),
        post("/api/telegram/revoke-subscription", Some(KEY), json!({"admin_user_id": ADMIN, "target_user_id": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(value["error"]["kind"], "store_unavailable");
}

#[tokio::test]
async fn malformed_body_is_invalid_argument() {
    let store = Arc::new(MemoryStore::new());
    let (status, value) = send(
        app(store.clone()),
        post("/api/telegram/grant-subscription", Some(KEY), json!({"admin_user_id": "me"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["ok"], false);
    assert_eq!(value["error"]["kind"], "invalid_argument");
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn non_admin_with_malformed_fields_is_still_403() {
    let store = Arc::new(MemoryStore::new());
    store.seed_user(5, None);
    let body = json!({"admin_user_id": 999999999, "target_user_id": 5, "days": "x"});
    let (status, value) = send(
        app(store.clone()),
        post("/api/telegram/grant-subscription", Some(KEY), body),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(value["error"]["kind"], "unauthorized");
    assert!(!value["error"]["message"].as_str().unwrap().contains("days"));

    let body = json!({"admin_user_id": 999999999, "page": "two"});
    let (status, _) = send(app(store.clone()), post("/api/telegram/users", Some(KEY), body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn admin_with_malformed_fields_is_400() {
    let store = Arc::new(MemoryStore::new());
    store.seed_user(5, None);
    let body = json!({"admin_user_id": ADMIN, "target_user_id": 5, "days": "x"});
    let (status, value) = send(
        app(store.clone()),
        post("/api/telegram/grant-subscription", Some(KEY), body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"]["kind"], "invalid_argument");
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn users_pages_in_registration_order() {
    let store = Arc::new(MemoryStore::new());
    store.seed_users(25);
    let (status, value) = send(
        app(store),
        post("/api/telegram/users", Some(KEY), json!({"admin_user_id": ADMIN, "page": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = value["data"]["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["user_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, (11..=20).collect::<Vec<_>>());
    assert_eq!(value["data"]["total_pages"], 3);
    assert_eq!(value["data"]["has_prev"], true);
}

#[tokio::test]
async fn health_needs_no_key() {
    let store = Arc::new(MemoryStore::new());
    for path in ["/health", "/api/health"] {
        let req = Request::builder().uri(path).body(Body::empty()).unwrap();
        let (status, value) = send(app(store.clone()), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["database"], "connected");
    }

    store.set_unavailable(true);
    let req = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
    let (status, value) = send(app(store), req).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(value["status"], "unhealthy");
}
