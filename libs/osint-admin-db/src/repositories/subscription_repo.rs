use crate::models::{EntitlementAction, ExpiryChange};
use crate::repositories::entitlement_repo::{EntitlementRepository, NewEntitlementEvent};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Moves the subscription window on `users`. Each call is one transaction:
/// a row-locked `UPDATE ... RETURNING` plus the matching audit row.
#[derive(Debug, Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Extends the window to `max(now, current_end) + days`.
    /// Returns `None` when the user does not exist.
    pub async fn grant(
        &self,
        admin_id: i64,
        user_id: i64,
        days: i32,
        amount: f64,
        currency: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ExpiryChange>> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let change = sqlx::query_as::<_, ExpiryChange>(
            r#"
            WITH prev AS (
                SELECT user_id, subscription_end_date FROM users WHERE user_id = $1 FOR UPDATE
            )
            UPDATE users u SET
                subscription_start_date = CASE
                    WHEN prev.subscription_end_date IS NULL OR prev.subscription_end_date <= $2 THEN $2
                    ELSE u.subscription_start_date
                END,
                subscription_end_date = GREATEST(COALESCE(prev.subscription_end_date, $2), $2)
                    + make_interval(days => $3),
                subscription_status = 'active',
                updated_at = $2
            FROM prev
            WHERE u.user_id = prev.user_id
            RETURNING prev.subscription_end_date AS previous_expiry, u.subscription_end_date AS expires_at
            "#,
        )
        .bind(user_id)
        .bind(now)
        .bind(days)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to extend subscription")?;

        let Some(change) = change else {
            return Ok(None);
        };

        let event = NewEntitlementEvent {
            user_id,
            admin_id,
            action: EntitlementAction::Grant,
            days: Some(days),
            amount: Some(amount),
            currency: Some(currency),
            reference: Some(format!("admin_grant_{}_{}", user_id, now.timestamp())),
            expires_at: change.expires_at,
        };
        EntitlementRepository::insert_event(&mut *tx, &event).await?;

        tx.commit().await.context("Failed to commit grant")?;
        Ok(Some(change))
    }

    /// Pulls a future end date back to `now`; a past or missing end date is left alone.
    /// Returns `None` when the user does not exist.
    pub async fn revoke(&self, admin_id: i64, user_id: i64, now: DateTime<Utc>) -> Result<Option<ExpiryChange>> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let change = sqlx::query_as::<_, ExpiryChange>(
            r#"
            WITH prev AS (
                SELECT user_id, subscription_end_date FROM users WHERE user_id = $1 FOR UPDATE
            )
            UPDATE users u SET
                subscription_end_date = CASE
                    WHEN prev.subscription_end_date > $2 THEN $2
                    ELSE prev.subscription_end_date
                END,
                subscription_status = 'expired',
                updated_at = $2
            FROM prev
            WHERE u.user_id = prev.user_id
            RETURNING prev.subscription_end_date AS previous_expiry, u.subscription_end_date AS expires_at
            "#,
        )
        .bind(user_id)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to revoke subscription")?;

        let Some(change) = change else {
            return Ok(None);
        };

        let event = NewEntitlementEvent {
            user_id,
            admin_id,
            action: EntitlementAction::Revoke,
            days: None,
            amount: None,
            currency: None,
            reference: Some(format!("admin_revoke_{}_{}", user_id, now.timestamp())),
            expires_at: change.expires_at,
        };
        EntitlementRepository::insert_event(&mut *tx, &event).await?;

        tx.commit().await.context("Failed to commit revoke")?;
        Ok(Some(change))
    }
}
