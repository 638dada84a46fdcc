use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use osint_admin_db::models::{EntitlementEvent, ExpiryChange, User, UserCounts};
use osint_admin_db::repositories::{EntitlementRepository, SubscriptionRepository, UserRepository};
use osint_admin_db::sqlx::PgPool;

/// Persistence seam under [`crate::AdminService`].
///
/// `grant` and `revoke` return `None` when the user does not exist. Any `Err`
/// means the store could not answer.
#[async_trait]
pub trait EntitlementStore: Send + Sync {
    async fn ping(&self) -> Result<()>;

    async fn counts(&self, now: DateTime<Utc>) -> Result<UserCounts>;

    async fn list_users(&self, offset: i64, limit: i64) -> Result<(i64, Vec<User>)>;

    async fn get_user(&self, user_id: i64) -> Result<Option<User>>;

    async fn recent_events(&self, user_id: i64, limit: i64) -> Result<Vec<EntitlementEvent>>;

    async fn grant(
        &self,
        admin_id: i64,
        user_id: i64,
        days: i32,
        amount: f64,
        currency: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ExpiryChange>>;

    async fn revoke(&self, admin_id: i64, user_id: i64, now: DateTime<Utc>) -> Result<Option<ExpiryChange>>;
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    users: UserRepository,
    subscriptions: SubscriptionRepository,
    entitlements: EntitlementRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            subscriptions: SubscriptionRepository::new(pool.clone()),
            entitlements: EntitlementRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl EntitlementStore for PgStore {
    async fn ping(&self) -> Result<()> {
        osint_admin_db::ping(&self.pool).await
    }

    async fn counts(&self, now: DateTime<Utc>) -> Result<UserCounts> {
        self.users.counts(now).await
    }

    async fn list_users(&self, offset: i64, limit: i64) -> Result<(i64, Vec<User>)> {
        self.users.list_page(offset, limit).await
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        self.users.get_by_id(user_id).await
    }

    async fn recent_events(&self, user_id: i64, limit: i64) -> Result<Vec<EntitlementEvent>> {
        self.entitlements.recent_for_user(user_id, limit).await
    }

    async fn grant(
        &self,
        admin_id: i64,
        user_id: i64,
        days: i32,
        amount: f64,
        currency: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ExpiryChange>> {
        self.subscriptions.grant(admin_id, user_id, days, amount, currency, now).await
    }

    async fn revoke(&self, admin_id: i64, user_id: i64, now: DateTime<Utc>) -> Result<Option<ExpiryChange>> {
        self.subscriptions.revoke(admin_id, user_id, now).await
    }
}
