//! OpenAPI / Swagger UI documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::gateway::handlers::HealthResponse;
use crate::gateway::handlers::accounts::TopUpRequest;
use crate::gateway::handlers::market::{CryptoOrderData, CryptoOrderRequest, MarketAssetData};
use crate::gateway::handlers::otp::{OtpSendData, OtpSendRequest, OtpVerifyData, OtpVerifyRequest};
use crate::gateway::handlers::payouts::{WithdrawalCreate, WithdrawalMethodCreate};
use crate::gateway::handlers::positions::{CryptoPositionView, CryptoPositionsData};
use crate::gateway::handlers::transactions::CreateTransactionRequest;
use crate::ledger::{Account, CryptoPosition, Transaction};
use crate::oracle::{AssetQuote, HistoryPoint};
use crate::payouts::{Withdrawal, WithdrawalMethod};

/// Bearer JWT security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Main API documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fintera API",
        version = "1.0.0",
        description = "Fintech demo backend: accounts, transactions, crypto positions, OTP step-up auth and bank withdrawals.",
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    modifiers(&SecurityAddon),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::accounts::list_accounts,
        crate::gateway::handlers::accounts::top_up_account,
        crate::gateway::handlers::transactions::list_transactions,
        crate::gateway::handlers::transactions::create_transaction,
        crate::gateway::handlers::positions::list_crypto_positions,
        crate::gateway::handlers::market::list_market_prices,
        crate::gateway::handlers::market::get_market_asset,
        crate::gateway::handlers::market::process_crypto_order,
        crate::gateway::handlers::otp::send_otp,
        crate::gateway::handlers::otp::verify_otp,
        crate::gateway::handlers::payouts::create_withdrawal_method,
        crate::gateway::handlers::payouts::list_withdrawal_methods,
        crate::gateway::handlers::payouts::delete_withdrawal_method,
        crate::gateway::handlers::payouts::create_withdrawal,
        crate::gateway::handlers::payouts::list_withdrawals,
    ),
    components(
        schemas(
            HealthResponse,
            Account,
            TopUpRequest,
            Transaction,
            CreateTransactionRequest,
            CryptoPosition,
            CryptoPositionView,
            CryptoPositionsData,
            AssetQuote,
            HistoryPoint,
            MarketAssetData,
            CryptoOrderRequest,
            CryptoOrderData,
            OtpSendRequest,
            OtpSendData,
            OtpVerifyRequest,
            OtpVerifyData,
            WithdrawalMethodCreate,
            WithdrawalMethod,
            WithdrawalCreate,
            Withdrawal,
        )
    ),
    tags(
        (name = "System", description = "Health and diagnostics"),
        (name = "Accounts", description = "Cash accounts"),
        (name = "Transactions", description = "Idempotent transaction ledger"),
        (name = "Crypto Positions", description = "User crypto holdings"),
        (name = "Market", description = "Market data and simulated orders"),
        (name = "OTP", description = "One-time-password step-up"),
        (name = "Payouts", description = "Withdrawal methods and withdrawals"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("serializable");
        assert!(json.contains("/payouts/withdrawals"));
        assert!(json.contains("bearer_auth"));
    }
}
