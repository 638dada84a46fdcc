pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use state::AppState;

pub fn router(state: AppState) -> Router {
    let telegram = Router::new()
        .route("/verify-admin", post(handlers::telegram::verify_admin))
        .route("/stats", post(handlers::telegram::stats))
        .route("/users", post(handlers::telegram::users))
        .route("/user-info", post(handlers::telegram::user_info))
        .route("/grant-subscription", post(handlers::telegram::grant_subscription))
        .route("/revoke-subscription", post(handlers::telegram::revoke_subscription))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_api_key));

    Router::new()
        .route("/", get(handlers::health::index))
        .route("/health", get(handlers::health::health_check))
        .route("/api/health", get(handlers::health::health_check))
        .nest("/api/telegram", telegram)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
