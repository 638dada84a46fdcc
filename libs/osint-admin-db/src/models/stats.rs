use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Raw counters behind the stats view, read in one statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserCounts {
    pub total_users: i64,
    pub active_subscriptions: i64,
    pub expired_subscriptions: i64,
    pub never_subscribed: i64,
    pub total_queries: i64,
    pub grants_total: i64,
    pub revokes_total: i64,
}
