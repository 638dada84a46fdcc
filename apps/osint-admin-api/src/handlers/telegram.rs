//! Admin operations for the Telegram bot. Every route sits behind the API key
//! middleware. The caller in `admin_user_id` is checked against the allow-list
//! before the rest of the body is decoded, so a non-admin learns nothing about
//! whether the request was well formed.

use crate::AppState;
use crate::error::{ApiError, ApiResult, ok};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use osint_admin_core::AdminError;
use osint_admin_core::wire::{
    CallerRequest, GrantOutcome, GrantRequest, RevokeOutcome, Stats, TargetRequest, UserDetail,
    UsersPage, UsersRequest, VerifyAdminRequest, VerifyAdminResponse,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

type Body = Result<Json<Value>, JsonRejection>;

/// Gates the caller, then decodes the typed request.
fn admin_request<T: DeserializeOwned>(state: &AppState, payload: Body) -> Result<T, ApiError> {
    let Json(body) = payload?;
    let caller_id = body
        .get("admin_user_id")
        .and_then(Value::as_i64)
        .ok_or_else(|| AdminError::invalid("admin_user_id must be an integer"))?;
    if !state.service.is_admin(caller_id) {
        tracing::warn!(caller_id, "Rejected API call from non-admin");
        return Err(AdminError::Unauthorized.into());
    }
    serde_json::from_value(body).map_err(|e| AdminError::invalid(e.to_string()).into())
}

pub async fn verify_admin(
    State(state): State<AppState>,
    payload: Result<Json<VerifyAdminRequest>, JsonRejection>,
) -> ApiResult<VerifyAdminResponse> {
    let Json(req) = payload?;
    let identity = state.service.gate().identity(req.user_id);
    ok(VerifyAdminResponse {
        is_admin: identity.is_some(),
        handle: identity.and_then(|a| a.handle.clone()),
    })
}

pub async fn stats(State(state): State<AppState>, payload: Body) -> ApiResult<Stats> {
    let req: CallerRequest = admin_request(&state, payload)?;
    ok(state.service.stats(req.admin_user_id).await?)
}

pub async fn users(State(state): State<AppState>, payload: Body) -> ApiResult<UsersPage> {
    let req: UsersRequest = admin_request(&state, payload)?;
    let page = req.page.unwrap_or(1);
    ok(state.service.list_users(req.admin_user_id, page).await?)
}

pub async fn user_info(State(state): State<AppState>, payload: Body) -> ApiResult<UserDetail> {
    let req: TargetRequest = admin_request(&state, payload)?;
    ok(state.service.user_info(req.admin_user_id, req.target_user_id).await?)
}

pub async fn grant_subscription(State(state): State<AppState>, payload: Body) -> ApiResult<GrantOutcome> {
    let req: GrantRequest = admin_request(&state, payload)?;
    ok(state
        .service
        .grant(req.admin_user_id, req.target_user_id, req.days)
        .await?)
}

pub async fn revoke_subscription(State(state): State<AppState>, payload: Body) -> ApiResult<RevokeOutcome> {
    let req: TargetRequest = admin_request(&state, payload)?;
    ok(state.service.revoke(req.admin_user_id, req.target_user_id).await?)
}
