use crate::AppState;
use axum::{Json, extract::State, http::StatusCode};
use osint_admin_core::wire::HealthReport;
use serde_json::{Value, json};

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.service.health().await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

pub async fn index() -> Json<Value> {
    Json(json!({
        "service": "osint-admin-api",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /health": "Health check",
            "GET /api/health": "Health check",
            "POST /api/telegram/verify-admin": "Check whether a user id is an admin",
            "POST /api/telegram/stats": "Subscription statistics",
            "POST /api/telegram/users": "Paginated user list",
            "POST /api/telegram/user-info": "Single user details",
            "POST /api/telegram/grant-subscription": "Grant or extend a subscription",
            "POST /api/telegram/revoke-subscription": "Revoke a subscription"
        }
    }))
}
