use crate::error::AdminResult;
use crate::gate::AdminIdentity;
use crate::service::AdminService;
use crate::store::EntitlementStore;
use crate::wire::{GrantOutcome, HealthReport, RevokeOutcome, Stats, UserDetail, UsersPage};
use async_trait::async_trait;

/// What the command receiver talks to: the service in-process, or the HTTP
/// API through a client.
#[async_trait]
pub trait AdminBackend: Send + Sync {
    /// `None` when the caller is not on the allow-list.
    async fn verify_admin(&self, caller_id: i64) -> AdminResult<Option<AdminIdentity>>;

    async fn stats(&self, caller_id: i64) -> AdminResult<Stats>;

    async fn list_users(&self, caller_id: i64, page: u32) -> AdminResult<UsersPage>;

    async fn user_info(&self, caller_id: i64, user_id: i64) -> AdminResult<UserDetail>;

    async fn grant(&self, caller_id: i64, user_id: i64, days: Option<i32>) -> AdminResult<GrantOutcome>;

    async fn revoke(&self, caller_id: i64, user_id: i64) -> AdminResult<RevokeOutcome>;

    async fn health(&self) -> AdminResult<HealthReport>;

    /// Short label for logs and the health reply.
    fn describe(&self) -> &'static str;
}

#[async_trait]
impl<S: EntitlementStore + ?Sized + 'static> AdminBackend for AdminService<S> {
    async fn verify_admin(&self, caller_id: i64) -> AdminResult<Option<AdminIdentity>> {
        Ok(self.gate().identity(caller_id).cloned())
    }

    async fn stats(&self, caller_id: i64) -> AdminResult<Stats> {
        AdminService::stats(self, caller_id).await
    }

    async fn list_users(&self, caller_id: i64, page: u32) -> AdminResult<UsersPage> {
        AdminService::list_users(self, caller_id, page).await
    }

    async fn user_info(&self, caller_id: i64, user_id: i64) -> AdminResult<UserDetail> {
        AdminService::user_info(self, caller_id, user_id).await
    }

    async fn grant(&self, caller_id: i64, user_id: i64, days: Option<i32>) -> AdminResult<GrantOutcome> {
        AdminService::grant(self, caller_id, user_id, days).await
    }

    async fn revoke(&self, caller_id: i64, user_id: i64) -> AdminResult<RevokeOutcome> {
        AdminService::revoke(self, caller_id, user_id).await
    }

    async fn health(&self) -> AdminResult<HealthReport> {
        Ok(AdminService::health(self).await)
    }

    fn describe(&self) -> &'static str {
        "local"
    }
}
