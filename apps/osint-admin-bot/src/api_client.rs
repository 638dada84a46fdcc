use anyhow::{Context, Result};
use async_trait::async_trait;
use osint_admin_core::wire::{
    API_KEY_HEADER, ApiEnvelope, CallerRequest, GrantOutcome, GrantRequest, HealthReport,
    RevokeOutcome, Stats, TargetRequest, UserDetail, UsersPage, UsersRequest, VerifyAdminRequest,
    VerifyAdminResponse,
};
use osint_admin_core::{AdminBackend, AdminError, AdminIdentity, AdminResult};
use reqwest::{Client, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Talks to the admin API. Every failure to get an answer, including a
/// rejected API key, comes back as `StoreUnavailable`.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> AdminResult<T> {
        let url = format!("{}/api/telegram{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| unreachable_api(&url, e))?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::error!("Admin API rejected the API key");
            return Err(AdminError::StoreUnavailable("admin API rejected the API key".into()));
        }

        let envelope: ApiEnvelope<T> = resp.json().await.map_err(|e| {
            tracing::error!("Unexpected response from {} ({}): {}", url, status, e);
            AdminError::StoreUnavailable(format!("unexpected response from admin API ({})", status))
        })?;
        envelope.into_result()
    }
}

fn unreachable_api(url: &str, err: reqwest::Error) -> AdminError {
    tracing::error!("Request to {} failed: {}", url, err);
    let reason = if err.is_timeout() { "timed out" } else { "unreachable" };
    AdminError::StoreUnavailable(format!("admin API {}", reason))
}

#[async_trait]
impl AdminBackend for ApiClient {
    async fn verify_admin(&self, caller_id: i64) -> AdminResult<Option<AdminIdentity>> {
        let resp: VerifyAdminResponse = self
            .post("/verify-admin", &VerifyAdminRequest { user_id: caller_id })
            .await?;
        Ok(resp.is_admin.then(|| AdminIdentity { user_id: caller_id, handle: resp.handle }))
    }

    async fn stats(&self, caller_id: i64) -> AdminResult<Stats> {
        self.post("/stats", &CallerRequest { admin_user_id: caller_id }).await
    }

    async fn list_users(&self, caller_id: i64, page: u32) -> AdminResult<UsersPage> {
        self.post("/users", &UsersRequest { admin_user_id: caller_id, page: Some(page) })
            .await
    }

    async fn user_info(&self, caller_id: i64, user_id: i64) -> AdminResult<UserDetail> {
        self.post(
            "/user-info",
            &TargetRequest { admin_user_id: caller_id, target_user_id: user_id },
        )
        .await
    }

    async fn grant(&self, caller_id: i64, user_id: i64, days: Option<i32>) -> AdminResult<GrantOutcome> {
        self.post(
            "/grant-subscription",
            &GrantRequest { admin_user_id: caller_id, target_user_id: user_id, days },
        )
        .await
    }

    async fn revoke(&self, caller_id: i64, user_id: i64) -> AdminResult<RevokeOutcome> {
        self.post(
            "/revoke-subscription",
            &TargetRequest { admin_user_id: caller_id, target_user_id: user_id },
        )
        .await
    }

    /// The API answers 503 with a report body when its database is down.
    async fn health(&self) -> AdminResult<HealthReport> {
        let url = format!("{}/api/health", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unreachable_api(&url, e))?;
        let status = resp.status();
        resp.json().await.map_err(|e| {
            tracing::error!("Unexpected health response ({}): {}", status, e);
            AdminError::StoreUnavailable(format!("unexpected response from admin API ({})", status))
        })
    }

    fn describe(&self) -> &'static str {
        "api"
    }
}
