//! Payout handlers (withdrawal methods, withdrawals)
//!
//! Every write path here requires the `payouts:write` scope and a fresh
//! MFA session; reads only need `payouts:read`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Extension,
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::otp::require_recent_mfa;
use crate::payouts::{
    NewWithdrawalMethod, Withdrawal, WithdrawalMethod, WithdrawalRequest, service,
};

use super::super::response::{ApiError, ApiResult, created, ok};
use super::super::state::AppState;

/// Context the payout step-up sessions are keyed on.
const MFA_CONTEXT: &str = "default";

async fn require_step_up(state: &AppState, user: &AuthenticatedUser) -> Result<(), ApiError> {
    require_recent_mfa(
        state.pool(),
        user.user_id,
        MFA_CONTEXT,
        state.config.otp.mfa_max_age_seconds,
    )
    .await?;
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WithdrawalMethodCreate {
    pub account_holder_name: String,
    pub iban: String,
    pub bic: Option<String>,
    pub bank_name: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// Register a bank account for withdrawals
#[utoipa::path(
    post,
    path = "/payouts/withdrawal-methods",
    request_body = WithdrawalMethodCreate,
    responses(
        (status = 201, description = "Method registered", body = WithdrawalMethod),
        (status = 400, description = "Invalid IBAN/BIC or holder mismatch"),
        (status = 403, description = "Missing scope or MFA step-up"),
        (status = 409, description = "IBAN registered by another user")
    ),
    security(("bearer_auth" = [])),
    tag = "Payouts"
)]
pub async fn create_withdrawal_method(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    axum::Json(req): axum::Json<WithdrawalMethodCreate>,
) -> ApiResult<WithdrawalMethod> {
    user.require_scope("payouts:write")?;
    require_step_up(&state, &user).await?;

    let method = service::create_withdrawal_method(
        state.pool(),
        user.user_id,
        user.kyc_name.as_deref(),
        NewWithdrawalMethod {
            iban: req.iban,
            bic: req.bic,
            bank_name: req.bank_name,
            account_holder_name: req.account_holder_name,
            is_default: req.is_default,
        },
    )
    .await?;
    created(method)
}

/// List the caller's withdrawal methods
#[utoipa::path(
    get,
    path = "/payouts/withdrawal-methods",
    responses(
        (status = 200, description = "Registered methods, newest first", body = Vec<WithdrawalMethod>),
        (status = 403, description = "Missing payouts:read scope")
    ),
    security(("bearer_auth" = [])),
    tag = "Payouts"
)]
pub async fn list_withdrawal_methods(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<WithdrawalMethod>> {
    user.require_scope("payouts:read")?;
    let methods = service::list_withdrawal_methods(state.pool(), user.user_id).await?;
    ok(methods)
}

/// Delete a withdrawal method
#[utoipa::path(
    delete,
    path = "/payouts/withdrawal-methods/{method_id}",
    params(("method_id" = Uuid, Path, description = "Method to delete")),
    responses(
        (status = 204, description = "Method deleted"),
        (status = 400, description = "Method has withdrawals attached"),
        (status = 404, description = "Method not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payouts"
)]
pub async fn delete_withdrawal_method(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(method_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    user.require_scope("payouts:write")?;
    service::delete_withdrawal_method(state.pool(), user.user_id, method_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WithdrawalCreate {
    pub account_id: Uuid,
    pub method_id: Uuid,
    /// Positive amount in the account currency, fee charged on top
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// Request a withdrawal to a registered bank account
#[utoipa::path(
    post,
    path = "/payouts/withdrawals",
    request_body = WithdrawalCreate,
    responses(
        (status = 201, description = "Withdrawal accepted and funds frozen", body = Withdrawal),
        (status = 400, description = "Invalid amount, currency mismatch or insufficient balance"),
        (status = 403, description = "Missing scope or MFA step-up"),
        (status = 404, description = "Account or method not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payouts"
)]
pub async fn create_withdrawal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    axum::Json(req): axum::Json<WithdrawalCreate>,
) -> ApiResult<Withdrawal> {
    user.require_scope("payouts:write")?;
    require_step_up(&state, &user).await?;

    let requested_user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let withdrawal = service::create_withdrawal(
        state.pool(),
        user.user_id,
        WithdrawalRequest {
            account_id: req.account_id,
            method_id: req.method_id,
            amount: req.amount,
            currency: req.currency,
            requested_ip: Some(peer.ip().to_string()),
            requested_user_agent,
        },
    )
    .await?;
    created(withdrawal)
}

/// List the caller's withdrawals
#[utoipa::path(
    get,
    path = "/payouts/withdrawals",
    responses(
        (status = 200, description = "Withdrawals, newest first", body = Vec<Withdrawal>),
        (status = 403, description = "Missing payouts:read scope")
    ),
    security(("bearer_auth" = [])),
    tag = "Payouts"
)]
pub async fn list_withdrawals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<Withdrawal>> {
    user.require_scope("payouts:read")?;
    let rows = service::list_withdrawals(state.pool(), user.user_id).await?;
    ok(rows)
}
