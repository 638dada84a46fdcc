use crate::models::{User, UserCounts};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub(crate) const USER_COLUMNS: &str = "user_id, username, first_name, last_name, \
     subscription_start_date, subscription_end_date, queries_used, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE user_id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by ID")
    }

    /// Returns the total user count and one page in registration order.
    pub async fn list_page(&self, offset: i64, limit: i64) -> Result<(i64, Vec<User>)> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await
            .context("Failed to count users")?;

        let sql = format!(
            "SELECT {} FROM users ORDER BY created_at ASC, user_id ASC LIMIT $1 OFFSET $2",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *tx)
            .await
            .context("Failed to fetch users page")?;

        tx.commit().await.context("Failed to commit transaction")?;
        Ok((total, users))
    }

    pub async fn counts(&self, now: DateTime<Utc>) -> Result<UserCounts> {
        sqlx::query_as::<_, UserCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM users WHERE subscription_end_date > $1) AS active_subscriptions,
                (SELECT COUNT(*) FROM users WHERE subscription_end_date <= $1) AS expired_subscriptions,
                (SELECT COUNT(*) FROM users WHERE subscription_end_date IS NULL) AS never_subscribed,
                (SELECT COALESCE(SUM(queries_used), 0)::BIGINT FROM users) AS total_queries,
                (SELECT COUNT(*) FROM entitlement_events WHERE action = 'grant') AS grants_total,
                (SELECT COUNT(*) FROM entitlement_events WHERE action = 'revoke') AS revokes_total
            "#,
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .context("Failed to fetch user statistics")
    }
}
