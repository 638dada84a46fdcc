use crate::models::{EntitlementAction, EntitlementEvent};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

#[derive(Debug, Clone)]
pub struct NewEntitlementEvent<'a> {
    pub user_id: i64,
    pub admin_id: i64,
    pub action: EntitlementAction,
    pub days: Option<i32>,
    pub amount: Option<f64>,
    pub currency: Option<&'a str>,
    pub reference: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct EntitlementRepository {
    pool: PgPool,
}

impl EntitlementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts on the caller's connection so the event commits with the change it records.
    pub async fn insert_event(conn: &mut PgConnection, event: &NewEntitlementEvent<'_>) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO entitlement_events
                (user_id, admin_id, action, days, amount, currency, reference, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, CURRENT_TIMESTAMP)
            RETURNING id
            "#,
        )
        .bind(event.user_id)
        .bind(event.admin_id)
        .bind(event.action.as_str())
        .bind(event.days)
        .bind(event.amount)
        .bind(event.currency)
        .bind(event.reference.as_deref())
        .bind(event.expires_at)
        .fetch_one(conn)
        .await
        .context("Failed to record entitlement event")
    }

    pub async fn recent_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<EntitlementEvent>> {
        sqlx::query_as::<_, EntitlementEvent>(
            "SELECT * FROM entitlement_events WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch entitlement history")
    }
}
