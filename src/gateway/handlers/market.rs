//! Market handlers (prices, asset detail, simulated orders)

use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::ledger::{self, Account, Direction, MarketOrder, Transaction};
use crate::oracle::{AssetQuote, HistoryPoint};

use super::super::response::{ApiError, ApiResult, ok};
use super::super::state::AppState;
use super::positions::CryptoPositionView;

/// Current prices for all supported assets
#[utoipa::path(
    get,
    path = "/market/prices",
    responses(
        (status = 200, description = "Quotes for the supported asset whitelist", body = Vec<AssetQuote>),
        (status = 502, description = "Upstream unavailable and no cached data")
    ),
    tag = "Market"
)]
pub async fn list_market_prices(State(state): State<Arc<AppState>>) -> ApiResult<Vec<AssetQuote>> {
    let snapshot = state.oracle.market_snapshot().await?;
    ok(snapshot)
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AssetDetailQuery {
    /// Trailing history window in days (1 to 30)
    pub days: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarketAssetData {
    pub asset: AssetQuote,
    pub history: Vec<HistoryPoint>,
    pub position: Option<CryptoPositionView>,
    /// Ten most recent fills for this asset
    pub transactions: Vec<Transaction>,
}

/// Asset detail: quote, history and the caller's exposure
#[utoipa::path(
    get,
    path = "/market/assets/{asset_identifier}",
    params(
        ("asset_identifier" = String, Path, description = "CoinCap id or ticker, e.g. bitcoin or BTC"),
        AssetDetailQuery
    ),
    responses(
        (status = 200, description = "Asset detail", body = MarketAssetData),
        (status = 404, description = "Asset not supported")
    ),
    security(("bearer_auth" = [])),
    tag = "Market"
)]
pub async fn get_market_asset(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(asset_identifier): Path<String>,
    Query(query): Query<AssetDetailQuery>,
) -> ApiResult<MarketAssetData> {
    user.require_scope("accounts:read")?;

    let days = query.days.unwrap_or(7);
    if !(1..=30).contains(&days) {
        return Err(ApiError::bad_request("days must be between 1 and 30"));
    }

    let asset = state.oracle.asset_quote(&asset_identifier).await?;
    let history = state.oracle.history(&asset_identifier, days).await?;

    let position = ledger::orders::get_position(state.pool(), user.user_id, &asset.symbol)
        .await?
        .map(CryptoPositionView::from);
    let transactions =
        ledger::transactions::recent_by_category(state.pool(), user.user_id, &asset.symbol, 10)
            .await?;

    ok(MarketAssetData {
        asset,
        history,
        position,
        transactions,
    })
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CryptoOrderRequest {
    pub account_id: Uuid,
    /// Ticker, e.g. BTC
    pub asset_symbol: String,
    pub asset_name: Option<String>,
    /// Unit price in EUR, as quoted to the user
    pub price_eur: Decimal,
    pub quantity: Decimal,
    /// buy or sell
    pub side: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CryptoOrderData {
    pub account: Account,
    /// Remaining position, absent when a sell closed it
    pub position: Option<CryptoPositionView>,
}

/// Execute a simulated market order
#[utoipa::path(
    post,
    path = "/market/orders",
    request_body = CryptoOrderRequest,
    responses(
        (status = 200, description = "Order filled", body = CryptoOrderData),
        (status = 400, description = "Invalid payload, insufficient balance or position"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Market"
)]
pub async fn process_crypto_order(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    axum::Json(req): axum::Json<CryptoOrderRequest>,
) -> ApiResult<CryptoOrderData> {
    user.require_scope("transactions:write")?;

    let side = match req.side.as_str() {
        "buy" => Direction::Buy,
        "sell" => Direction::Sell,
        _ => return Err(ApiError::bad_request("side must be buy or sell")),
    };

    let outcome = ledger::orders::process_market_order(
        state.pool(),
        user.user_id,
        MarketOrder {
            account_id: req.account_id,
            asset_symbol: req.asset_symbol,
            asset_name: req.asset_name,
            quantity: req.quantity,
            price: req.price_eur,
            side,
        },
    )
    .await?;

    ok(CryptoOrderData {
        account: outcome.account,
        position: outcome.position.map(CryptoPositionView::from),
    })
}
