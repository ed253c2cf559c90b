//! Transaction handlers (listing with filters, idempotent creation)

use std::sync::Arc;

use axum::{
    Extension,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::ledger::{self, CreateOutcome, NewTransaction, Transaction, TransactionFilter};

use super::super::response::{ApiError, ApiResult, created, ok};
use super::super::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListTransactionsQuery {
    /// Inclusive lower bound on created_at
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on created_at
    pub to: Option<DateTime<Utc>>,
    pub category: Option<String>,
}

/// List the caller's transactions, newest first
#[utoipa::path(
    get,
    path = "/transactions",
    params(ListTransactionsQuery),
    responses(
        (status = 200, description = "Matching transactions", body = Vec<Transaction>),
        (status = 403, description = "Missing transactions:read scope")
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ListTransactionsQuery>,
) -> ApiResult<Vec<Transaction>> {
    user.require_scope("transactions:read")?;
    let filter = TransactionFilter {
        from: query.from,
        to: query.to,
        category: query.category,
    };
    let rows = ledger::transactions::list_transactions(state.pool(), user.user_id, filter).await?;
    ok(rows)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTransactionRequest {
    pub account_id: Uuid,
    /// Positive amount in the transaction currency
    pub amount: Decimal,
    /// Three-letter currency code
    pub currency: String,
    pub category: Option<String>,
    /// buy or sell
    pub direction: String,
    /// Client-supplied idempotency key
    pub idem_key: String,
}

/// Create a transaction, idempotently
///
/// Replaying the same `idem_key` returns the stored transaction with
/// 200 instead of creating a duplicate.
#[utoipa::path(
    post,
    path = "/transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction created", body = Transaction),
        (status = 200, description = "Idempotent replay, original returned", body = Transaction),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Idempotency key used by another user")
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    axum::Json(req): axum::Json<CreateTransactionRequest>,
) -> ApiResult<Transaction> {
    user.require_scope("transactions:write")?;

    if req.currency.len() != 3 {
        return Err(ApiError::bad_request("currency must be a 3-letter code"));
    }
    if req.direction != "buy" && req.direction != "sell" {
        return Err(ApiError::bad_request("direction must be buy or sell"));
    }
    if req.idem_key.trim().is_empty() {
        return Err(ApiError::bad_request("idem_key must not be empty"));
    }

    let outcome = ledger::transactions::create_transaction(
        state.pool(),
        user.user_id,
        NewTransaction {
            account_id: req.account_id,
            amount: req.amount,
            currency: req.currency.to_uppercase(),
            category: req.category,
            idem_key: req.idem_key,
            direction: req.direction,
        },
    )
    .await?;

    match outcome {
        CreateOutcome::Created(tx) => created(tx),
        CreateOutcome::AlreadyExists(tx) => ok(tx),
    }
}
