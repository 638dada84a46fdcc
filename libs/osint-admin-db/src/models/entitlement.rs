use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementAction {
    Grant,
    Revoke,
}

impl EntitlementAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntitlementAction::Grant => "grant",
            EntitlementAction::Revoke => "revoke",
        }
    }
}

/// Audit row written alongside every subscription change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct EntitlementEvent {
    pub id: i64,
    pub user_id: i64,
    pub admin_id: i64,
    pub action: String, // 'grant', 'revoke'
    pub days: Option<i32>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub reference: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Expiry before and after a grant or revoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ExpiryChange {
    pub previous_expiry: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}
