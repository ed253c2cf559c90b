use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct WithdrawalMethod {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub method_type: String,
    pub iban: String,
    pub bic: Option<String>,
    pub bank_name: Option<String>,
    pub account_holder_name: String,
    pub is_default: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Withdrawal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub method_id: Uuid,
    pub account_id: Uuid,
    pub amount: Decimal,
    pub fee: Decimal,
    pub currency: String,
    pub total_debit: Decimal,
    pub status: String,
    pub requested_at: DateTime<Utc>,
    pub reference: String,
}
