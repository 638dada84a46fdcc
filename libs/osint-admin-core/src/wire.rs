//! Values returned by admin operations, plus the JSON bodies exchanged
//! between the bot and the API.

use crate::error::{AdminError, ErrorKind};
use chrono::{DateTime, Utc};
use osint_admin_db::models::{EntitlementEvent, User};
use serde::{Deserialize, Serialize};

/// Header carrying the shared secret on `/api/telegram` routes.
pub const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_users: i64,
    pub active_subscriptions: i64,
    pub expired_subscriptions: i64,
    pub never_subscribed: i64,
    pub total_queries: i64,
    pub grants_total: i64,
    pub revokes_total: i64,
    /// Percentage of users with an active subscription.
    pub conversion_rate: f64,
    pub estimated_revenue: f64,
    pub subscription_price: f64,
    pub estimated_daily_revenue: f64,
    pub currency: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsersPage {
    pub page: u32,
    pub page_size: u32,
    pub total_users: i64,
    pub total_pages: u32,
    pub has_prev: bool,
    pub has_next: bool,
    pub users: Vec<User>,
    pub as_of: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetail {
    pub user: User,
    pub is_active: bool,
    pub days_remaining: i64,
    pub recent_events: Vec<EntitlementEvent>,
    pub as_of: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantOutcome {
    pub user_id: i64,
    pub days: i32,
    pub previous_expiry: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevokeOutcome {
    pub user_id: i64,
    pub previous_expiry: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub was_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub database: String,
    pub uptime_seconds: u64,
    pub version: String,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl From<&AdminError> for ErrorBody {
    fn from(err: &AdminError) -> Self {
        let (message, user_id) = match err {
            AdminError::Unauthorized => ("not authorized".to_string(), None),
            AdminError::NotFound(id) => (format!("user {} not found", id), Some(*id)),
            AdminError::InvalidArgument(msg) | AdminError::StoreUnavailable(msg) => (msg.clone(), None),
        };
        Self { kind: err.kind(), message, user_id }
    }
}

impl From<ErrorBody> for AdminError {
    fn from(body: ErrorBody) -> Self {
        match body.kind {
            ErrorKind::Unauthorized => AdminError::Unauthorized,
            ErrorKind::NotFound => AdminError::NotFound(body.user_id.unwrap_or_default()),
            ErrorKind::InvalidArgument => AdminError::InvalidArgument(body.message),
            ErrorKind::StoreUnavailable => AdminError::StoreUnavailable(body.message),
        }
    }
}

/// `{"ok": true, "data": ...}` or `{"ok": false, "error": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T> ApiEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }

    pub fn failure(err: &AdminError) -> Self {
        Self { ok: false, data: None, error: Some(err.into()) }
    }

    pub fn into_result(self) -> Result<T, AdminError> {
        match (self.ok, self.data, self.error) {
            (true, Some(data), _) => Ok(data),
            (_, _, Some(body)) => Err(body.into()),
            _ => Err(AdminError::StoreUnavailable("malformed API response".into())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VerifyAdminRequest {
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyAdminResponse {
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CallerRequest {
    pub admin_user_id: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UsersRequest {
    pub admin_user_id: i64,
    #[serde(default)]
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TargetRequest {
    pub admin_user_id: i64,
    pub target_user_id: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GrantRequest {
    pub admin_user_id: i64,
    pub target_user_id: i64,
    #[serde(default)]
    pub days: Option<i32>,
}
