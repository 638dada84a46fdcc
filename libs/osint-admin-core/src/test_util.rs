//! In-memory [`EntitlementStore`] for tests in this and dependent crates.

use crate::gate::AdminGate;
use crate::service::{AdminService, Pricing};
use crate::store::EntitlementStore;
use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use osint_admin_db::models::{EntitlementAction, EntitlementEvent, ExpiryChange, User, UserCounts};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    events: Vec<EntitlementEvent>,
}

/// Applies the same expiry rules as the PostgreSQL repositories and counts
/// every call it receives.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            bail!("connection refused");
        }
        Ok(())
    }

    /// Number of store operations attempted so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Registration time grows with the id, so id order is registration order.
    pub fn seed_user(&self, user_id: i64, subscription_end_date: Option<DateTime<Utc>>) {
        let created_at = Utc.timestamp_opt(1_700_000_000 + user_id * 60, 0).single().unwrap_or_default();
        self.insert_user(User {
            user_id,
            username: Some(format!("user{}", user_id)),
            first_name: None,
            last_name: None,
            subscription_start_date: None,
            subscription_end_date,
            queries_used: 0,
            created_at,
            updated_at: None,
        });
    }

    /// Seeds ids `1..=count` without subscriptions.
    pub fn seed_users(&self, count: i64) {
        for user_id in 1..=count {
            self.seed_user(user_id, None);
        }
    }

    pub fn insert_user(&self, user: User) {
        self.lock().users.insert(user.user_id, user);
    }

    pub fn user(&self, user_id: i64) -> Option<User> {
        self.lock().users.get(&user_id).cloned()
    }

    pub fn events(&self) -> Vec<EntitlementEvent> {
        self.lock().events.clone()
    }
}

impl Inner {
    fn push_event(&mut self, mut event: EntitlementEvent) {
        event.id = self.events.len() as i64 + 1;
        self.events.push(event);
    }
}

fn event(user_id: i64, admin_id: i64, action: EntitlementAction, now: DateTime<Utc>) -> EntitlementEvent {
    EntitlementEvent {
        id: 0,
        user_id,
        admin_id,
        action: action.as_str().to_string(),
        days: None,
        amount: None,
        currency: None,
        reference: None,
        expires_at: None,
        created_at: now,
    }
}

#[async_trait]
impl EntitlementStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        self.enter()
    }

    async fn counts(&self, now: DateTime<Utc>) -> Result<UserCounts> {
        self.enter()?;
        let inner = self.lock();
        let mut counts = UserCounts {
            total_users: inner.users.len() as i64,
            ..UserCounts::default()
        };
        for user in inner.users.values() {
            match user.subscription_end_date {
                Some(end) if end > now => counts.active_subscriptions += 1,
                Some(_) => counts.expired_subscriptions += 1,
                None => counts.never_subscribed += 1,
            }
            counts.total_queries += user.queries_used;
        }
        for event in &inner.events {
            match event.action.as_str() {
                "grant" => counts.grants_total += 1,
                "revoke" => counts.revokes_total += 1,
                _ => {}
            }
        }
        Ok(counts)
    }

    async fn list_users(&self, offset: i64, limit: i64) -> Result<(i64, Vec<User>)> {
        self.enter()?;
        let inner = self.lock();
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by_key(|u| (u.created_at, u.user_id));
        let total = users.len() as i64;
        let page = users
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((total, page))
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        self.enter()?;
        Ok(self.user(user_id))
    }

    async fn recent_events(&self, user_id: i64, limit: i64) -> Result<Vec<EntitlementEvent>> {
        self.enter()?;
        let inner = self.lock();
        Ok(inner
            .events
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
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
        self.enter()?;
        let mut inner = self.lock();
        let Some(user) = inner.users.get_mut(&user_id) else {
            return Ok(None);
        };
        let previous_expiry = user.subscription_end_date;
        let base = previous_expiry.filter(|end| *end > now).unwrap_or(now);
        if previous_expiry.is_none_or(|end| end <= now) {
            user.subscription_start_date = Some(now);
        }
        let expires_at = base + Duration::days(i64::from(days));
        user.subscription_end_date = Some(expires_at);
        user.updated_at = Some(now);

        inner.push_event(EntitlementEvent {
            days: Some(days),
            amount: Some(amount),
            currency: Some(currency.to_string()),
            expires_at: Some(expires_at),
            ..event(user_id, admin_id, EntitlementAction::Grant, now)
        });
        Ok(Some(ExpiryChange { previous_expiry, expires_at: Some(expires_at) }))
    }

    async fn revoke(&self, admin_id: i64, user_id: i64, now: DateTime<Utc>) -> Result<Option<ExpiryChange>> {
        self.enter()?;
        let mut inner = self.lock();
        let Some(user) = inner.users.get_mut(&user_id) else {
            return Ok(None);
        };
        let previous_expiry = user.subscription_end_date;
        let expires_at = match previous_expiry {
            Some(end) if end > now => Some(now),
            other => other,
        };
        user.subscription_end_date = expires_at;
        user.updated_at = Some(now);

        inner.push_event(EntitlementEvent {
            expires_at,
            ..event(user_id, admin_id, EntitlementAction::Revoke, now)
        });
        Ok(Some(ExpiryChange { previous_expiry, expires_at }))
    }
}

pub fn gate_with(ids: &[i64]) -> AdminGate {
    AdminGate::from_ids(ids)
}

/// Service over `store` with default pricing and `ids` as the admin set.
pub fn service_with(ids: &[i64], store: Arc<MemoryStore>) -> AdminService<MemoryStore> {
    AdminService::new(gate_with(ids), store, Pricing::default())
}
