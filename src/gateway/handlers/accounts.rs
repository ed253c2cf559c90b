//! Account handlers (listing, demo top-ups)

use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::ledger::{self, Account};

use super::super::response::{ApiResult, ok};
use super::super::state::AppState;

/// List the caller's cash accounts
#[utoipa::path(
    get,
    path = "/accounts",
    responses(
        (status = 200, description = "Accounts owned by the caller", body = Vec<Account>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing accounts:read scope")
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<Account>> {
    user.require_scope("accounts:read")?;
    let accounts = ledger::accounts::list_accounts(state.pool(), user.user_id).await?;
    ok(accounts)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TopUpRequest {
    /// Positive amount to credit in the account currency
    pub amount: Decimal,
}

/// Credit a demo account
#[utoipa::path(
    post,
    path = "/accounts/{account_id}/topup",
    params(("account_id" = Uuid, Path, description = "Account to credit")),
    request_body = TopUpRequest,
    responses(
        (status = 200, description = "Updated account", body = Account),
        (status = 400, description = "Non-positive amount"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
pub async fn top_up_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(account_id): Path<Uuid>,
    axum::Json(req): axum::Json<TopUpRequest>,
) -> ApiResult<Account> {
    user.require_scope("transactions:write")?;
    let account =
        ledger::accounts::top_up(state.pool(), user.user_id, account_id, req.amount).await?;
    ok(account)
}
