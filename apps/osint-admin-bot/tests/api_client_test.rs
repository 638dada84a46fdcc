use chrono::{Duration, Utc};
use osint_admin_api::{AppState, router};
use osint_admin_bot::api_client::ApiClient;
use osint_admin_core::receiver;
use osint_admin_core::test_util::MemoryStore;
use osint_admin_core::{AdminBackend, AdminError, AdminGate, AdminService, EntitlementStore, Pricing};
use std::sync::Arc;

const KEY: &str = "bot-test-key";
const ADMIN: i64 = 5682019164;
const STRANGER: i64 = 999999999;

async fn spawn_api(store: Arc<MemoryStore>) -> String {
    let store: Arc<dyn EntitlementStore> = store;
    let gate = AdminGate::from_config("5682019164:boyonthegrid").unwrap();
    let service = AdminService::new(gate, store, Pricing::default());
    let app = router(AppState::new(service, KEY));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn client_round_trips_operations() {
    let store = Arc::new(MemoryStore::new());
    store.seed_user(123456789, None);
    let client = ApiClient::new(&spawn_api(store.clone()).await, KEY).unwrap();

    let identity = client.verify_admin(ADMIN).await.unwrap().unwrap();
    assert_eq!(identity.user_id, ADMIN);
    assert_eq!(identity.handle.as_deref(), Some("boyonthegrid"));
    assert_eq!(client.verify_admin(STRANGER).await.unwrap(), None);

    let before = Utc::now();
    let granted = client.grant(ADMIN, 123456789, Some(21)).await.unwrap();
    assert!(granted.expires_at >= before + Duration::days(21));
    assert_eq!(store.user(123456789).unwrap().subscription_end_date, Some(granted.expires_at));

    let detail = client.user_info(ADMIN, 123456789).await.unwrap();
    assert!(detail.is_active);

    let revoked = client.revoke(ADMIN, 123456789).await.unwrap();
    assert!(revoked.was_active);

    let stats = client.stats(ADMIN).await.unwrap();
    assert_eq!(stats.total_users, 1);
    assert_eq!(stats.grants_total, 1);
    assert_eq!(stats.revokes_total, 1);

    let health = client.health().await.unwrap();
    assert!(health.is_healthy());
}

#[tokio::test]
async fn client_maps_every_error_kind_back() {
    let store = Arc::new(MemoryStore::new());
    store.seed_user(5, None);
    let client = ApiClient::new(&spawn_api(store.clone()).await, KEY).unwrap();

    assert_eq!(client.stats(STRANGER).await.unwrap_err(), AdminError::Unauthorized);
    assert_eq!(client.user_info(ADMIN, 404).await.unwrap_err(), AdminError::NotFound(404));
    assert!(matches!(client.grant(ADMIN, 5, Some(-1)).await, Err(AdminError::InvalidArgument(_))));
    assert!(matches!(client.list_users(ADMIN, 0).await, Err(AdminError::InvalidArgument(_))));

    store.set_unavailable(true);
    let err = client.revoke(ADMIN, 5).await.unwrap_err();
    assert!(matches!(err, AdminError::StoreUnavailable(_)));
    assert!(!client.health().await.unwrap().is_healthy());
}

#[tokio::test]
async fn wrong_key_and_dead_server_are_unavailable() {
    let store = Arc::new(MemoryStore::new());
    let base = spawn_api(store.clone()).await;

    let wrong_key = ApiClient::new(&base, "not-the-key").unwrap();
    assert!(matches!(wrong_key.verify_admin(ADMIN).await, Err(AdminError::StoreUnavailable(_))));
    assert_eq!(store.calls(), 0);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let client = ApiClient::new(&dead, KEY).unwrap();
    assert!(matches!(client.stats(ADMIN).await, Err(AdminError::StoreUnavailable(_))));
}

#[tokio::test]
async fn receiver_over_http_behaves_like_local() {
    let store = Arc::new(MemoryStore::new());
    store.seed_users(25);
    let client = ApiClient::new(&spawn_api(store.clone()).await, KEY).unwrap();

    let welcome = receiver::handle(&client, ADMIN, "/start").await;
    assert!(welcome.text.starts_with("Welcome, @boyonthegrid."), "{}", welcome.text);

    let denied = receiver::handle(&client, STRANGER, "/stats").await;
    assert_eq!(denied.text, osint_admin_core::format::access_denied());
    assert_eq!(store.calls(), 0);

    let page = receiver::handle(&client, ADMIN, "/users 2").await;
    let pagination = page.pagination.unwrap();
    assert_eq!((pagination.prev, pagination.next), (Some(1), Some(3)));
    assert!(page.text.contains("page 2/3"), "{}", page.text);
}
