//! Crypto position handlers

use std::sync::Arc;

use axum::{Extension, extract::State};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::ledger::{self, CryptoPosition};

use super::super::response::{ApiResult, ok};
use super::super::state::AppState;

const ICON_BASE: &str = "https://assets.coincap.io/assets/icons";

#[derive(Debug, Serialize, ToSchema)]
pub struct CryptoPositionView {
    pub id: Uuid,
    pub ticker: String,
    pub name: Option<String>,
    pub amount: Decimal,
    /// Last known valuation of the whole position, in EUR
    pub eur_value: Decimal,
    /// Performance versus book cost, percent with two decimals
    pub change_percent: Option<Decimal>,
    pub icon_url: Option<String>,
    pub price_source: Option<String>,
    pub synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CryptoPositionsData {
    pub positions: Vec<CryptoPositionView>,
    /// Sum of all position valuations, in EUR
    pub total_eur_value: Decimal,
}

/// Percent gain/loss of the current valuation over the book cost. A zero
/// book cost has no meaningful baseline and yields None.
fn change_percent(book_cost: Decimal, current_value: Decimal) -> Option<Decimal> {
    if book_cost == Decimal::ZERO {
        return None;
    }
    Some(((current_value - book_cost) / book_cost * Decimal::ONE_HUNDRED).round_dp(2))
}

impl From<CryptoPosition> for CryptoPositionView {
    fn from(pos: CryptoPosition) -> Self {
        Self {
            change_percent: change_percent(pos.book_cost_eur, pos.last_valuation_eur),
            icon_url: Some(format!(
                "{ICON_BASE}/{}@2x.png",
                pos.asset_symbol.to_lowercase()
            )),
            id: pos.id,
            ticker: pos.asset_symbol,
            name: pos.asset_name,
            amount: pos.amount,
            eur_value: pos.last_valuation_eur,
            price_source: pos.price_source,
            synced_at: pos.synced_at,
            created_at: pos.created_at,
            updated_at: pos.updated_at,
        }
    }
}

/// List the caller's crypto positions with aggregate value
#[utoipa::path(
    get,
    path = "/crypto-positions",
    responses(
        (status = 200, description = "Positions with aggregate EUR value", body = CryptoPositionsData),
        (status = 403, description = "Missing crypto:read scope")
    ),
    security(("bearer_auth" = [])),
    tag = "Crypto Positions"
)]
pub async fn list_crypto_positions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<CryptoPositionsData> {
    user.require_scope("crypto:read")?;

    let rows = ledger::orders::list_positions(state.pool(), user.user_id).await?;
    let total_eur_value = rows.iter().map(|p| p.last_valuation_eur).sum();
    let positions = rows.into_iter().map(CryptoPositionView::from).collect();
    ok(CryptoPositionsData {
        positions,
        total_eur_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn change_percent_is_quantized_to_two_decimals() {
        assert_eq!(change_percent(d("300"), d("400")), Some(d("33.33")));
        assert_eq!(change_percent(d("500"), d("450")), Some(d("-10.00")));
        assert_eq!(change_percent(Decimal::ZERO, d("100")), None);
    }
}
