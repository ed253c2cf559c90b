use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Cash account row. Balances are numeric(18,2) and never negative; every
/// mutation happens under `FOR UPDATE`.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub currency: String,
    pub balance: Decimal,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Ledger entry. `amount` is always positive; `direction` carries the sign.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub category: Option<String>,
    pub idem_key: String,
    pub direction: String,
    pub created_at: DateTime<Utc>,
}

/// Per-user holding of one crypto asset, keyed by (user_id, asset_symbol).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CryptoPosition {
    pub id: Uuid,
    pub user_id: Uuid,
    pub asset_symbol: String,
    pub asset_name: Option<String>,
    pub amount: Decimal,
    pub book_cost_eur: Decimal,
    pub last_valuation_eur: Decimal,
    pub price_source: Option<String>,
    pub synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "buy",
            Direction::Sell => "sell",
        }
    }
}
