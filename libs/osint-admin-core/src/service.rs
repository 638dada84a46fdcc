use crate::error::{AdminError, AdminResult};
use crate::gate::AdminGate;
use crate::store::EntitlementStore;
use crate::wire::{GrantOutcome, HealthReport, RevokeOutcome, Stats, UserDetail, UsersPage};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

pub const DEFAULT_GRANT_DAYS: i32 = 21;
pub const MAX_GRANT_DAYS: i32 = 3650;
pub const USERS_PAGE_SIZE: u32 = 10;
const RECENT_EVENTS: i64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Pricing {
    pub price: f64,
    pub currency: String,
}

impl Default for Pricing {
    fn default() -> Self {
        Self { price: 399.0, currency: "PKR".to_string() }
    }
}

/// Admin operations over an [`EntitlementStore`].
///
/// Every operation checks the gate, then validates its arguments, and only
/// then touches the store.
pub struct AdminService<S: ?Sized> {
    gate: AdminGate,
    store: Arc<S>,
    pricing: Pricing,
    started_at: Instant,
}

impl<S: ?Sized> Clone for AdminService<S> {
    fn clone(&self) -> Self {
        Self {
            gate: self.gate.clone(),
            store: self.store.clone(),
            pricing: self.pricing.clone(),
            started_at: self.started_at,
        }
    }
}

impl<S: EntitlementStore + ?Sized> AdminService<S> {
    pub fn new(gate: AdminGate, store: Arc<S>, pricing: Pricing) -> Self {
        Self { gate, store, pricing, started_at: Instant::now() }
    }

    pub fn gate(&self) -> &AdminGate {
        &self.gate
    }

    pub fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    pub fn is_admin(&self, caller_id: i64) -> bool {
        self.gate.authorize(caller_id)
    }

    fn check(&self, caller_id: i64) -> AdminResult<()> {
        if self.gate.authorize(caller_id) {
            Ok(())
        } else {
            tracing::warn!(caller_id, "Rejected non-admin caller");
            Err(AdminError::Unauthorized)
        }
    }

    pub async fn stats(&self, caller_id: i64) -> AdminResult<Stats> {
        self.check(caller_id)?;
        let now = Utc::now();
        let counts = self.store.counts(now).await.map_err(store_failure)?;

        let conversion_rate = if counts.total_users > 0 {
            counts.active_subscriptions as f64 / counts.total_users as f64 * 100.0
        } else {
            0.0
        };
        let estimated_revenue = counts.active_subscriptions as f64 * self.pricing.price;

        Ok(Stats {
            total_users: counts.total_users,
            active_subscriptions: counts.active_subscriptions,
            expired_subscriptions: counts.expired_subscriptions,
            never_subscribed: counts.never_subscribed,
            total_queries: counts.total_queries,
            grants_total: counts.grants_total,
            revokes_total: counts.revokes_total,
            conversion_rate,
            estimated_revenue,
            subscription_price: self.pricing.price,
            estimated_daily_revenue: estimated_revenue / 30.0,
            currency: self.pricing.currency.clone(),
            generated_at: now,
        })
    }

    /// `page` is 1-based. A page past the end comes back empty.
    pub async fn list_users(&self, caller_id: i64, page: u32) -> AdminResult<UsersPage> {
        self.check(caller_id)?;
        if page == 0 {
            return Err(AdminError::invalid("page must be 1 or greater"));
        }

        let offset = i64::from(page - 1) * i64::from(USERS_PAGE_SIZE);
        let (total_users, users) = self
            .store
            .list_users(offset, i64::from(USERS_PAGE_SIZE))
            .await
            .map_err(store_failure)?;

        let total_pages = total_pages(total_users);
        Ok(UsersPage {
            page,
            page_size: USERS_PAGE_SIZE,
            total_users,
            total_pages,
            has_prev: page > 1,
            has_next: page < total_pages,
            users,
            as_of: Utc::now(),
        })
    }

    pub async fn user_info(&self, caller_id: i64, user_id: i64) -> AdminResult<UserDetail> {
        self.check(caller_id)?;
        validate_user_id(user_id)?;

        let user = self
            .store
            .get_user(user_id)
            .await
            .map_err(store_failure)?
            .ok_or(AdminError::NotFound(user_id))?;
        let recent_events = self
            .store
            .recent_events(user_id, RECENT_EVENTS)
            .await
            .map_err(store_failure)?;

        let now = Utc::now();
        Ok(UserDetail {
            is_active: user.is_active_at(now),
            days_remaining: user.days_remaining(now),
            user,
            recent_events,
            as_of: now,
        })
    }

    pub async fn grant(&self, caller_id: i64, user_id: i64, days: Option<i32>) -> AdminResult<GrantOutcome> {
        self.check(caller_id)?;
        validate_user_id(user_id)?;
        let days = days.unwrap_or(DEFAULT_GRANT_DAYS);
        if days <= 0 {
            return Err(AdminError::invalid("days must be a positive number"));
        }
        if days > MAX_GRANT_DAYS {
            return Err(AdminError::invalid(format!("days must not exceed {}", MAX_GRANT_DAYS)));
        }

        let change = self
            .store
            .grant(caller_id, user_id, days, self.pricing.price, &self.pricing.currency, Utc::now())
            .await
            .map_err(store_failure)?
            .ok_or(AdminError::NotFound(user_id))?;
        let expires_at = change
            .expires_at
            .ok_or_else(|| AdminError::StoreUnavailable("grant returned no expiry".into()))?;

        tracing::info!(admin_id = caller_id, user_id, days, %expires_at, "Subscription granted");
        Ok(GrantOutcome {
            user_id,
            days,
            previous_expiry: change.previous_expiry,
            expires_at,
            amount: self.pricing.price,
            currency: self.pricing.currency.clone(),
        })
    }

    pub async fn revoke(&self, caller_id: i64, user_id: i64) -> AdminResult<RevokeOutcome> {
        self.check(caller_id)?;
        validate_user_id(user_id)?;

        let now = Utc::now();
        let change = self
            .store
            .revoke(caller_id, user_id, now)
            .await
            .map_err(store_failure)?
            .ok_or(AdminError::NotFound(user_id))?;

        let was_active = change.previous_expiry.is_some_and(|end| end > now);
        tracing::info!(
            admin_id = caller_id,
            user_id,
            was_active,
            expires_at = ?change.expires_at,
            "Subscription revoked"
        );
        Ok(RevokeOutcome {
            user_id,
            previous_expiry: change.previous_expiry,
            expires_at: change.expires_at,
            was_active,
        })
    }

    /// Not gated: the API exposes it unauthenticated.
    pub async fn health(&self) -> HealthReport {
        let (status, database) = match self.store.ping().await {
            Ok(()) => ("healthy", "connected"),
            Err(e) => {
                tracing::error!("Health check failed: {:#}", e);
                ("unhealthy", "disconnected")
            }
        };
        HealthReport {
            status: status.to_string(),
            timestamp: Utc::now(),
            database: database.to_string(),
            uptime_seconds: self.started_at.elapsed().as_secs(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

fn validate_user_id(user_id: i64) -> AdminResult<()> {
    if user_id <= 0 {
        return Err(AdminError::invalid("user id must be a positive number"));
    }
    Ok(())
}

fn total_pages(total_users: i64) -> u32 {
    let size = i64::from(USERS_PAGE_SIZE);
    let pages = (total_users.max(0) + size - 1) / size;
    u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
}

fn store_failure(err: anyhow::Error) -> AdminError {
    tracing::error!("Entitlement store error: {:#}", err);
    AdminError::store(err)
}
