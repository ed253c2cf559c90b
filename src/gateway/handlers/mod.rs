//! HTTP handlers, grouped by resource.

pub mod accounts;
pub mod health;
pub mod market;
pub mod otp;
pub mod payouts;
pub mod positions;
pub mod transactions;

pub use accounts::{list_accounts, top_up_account};
pub use health::{HealthResponse, health_check};
pub use market::{get_market_asset, list_market_prices, process_crypto_order};
pub use otp::{send_otp, verify_otp};
pub use payouts::{
    create_withdrawal, create_withdrawal_method, delete_withdrawal_method,
    list_withdrawal_methods, list_withdrawals,
};
pub use positions::list_crypto_positions;
pub use transactions::{create_transaction, list_transactions};
