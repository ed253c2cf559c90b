//! Fintera - fintech demo backend
//!
//! Cash accounts, an idempotent transaction ledger, simulated crypto market
//! orders, OTP step-up authentication and bank withdrawals, served over an
//! axum HTTP gateway backed by PostgreSQL.
//!
//! ```text
//! ┌─────────┐    ┌──────────┐    ┌────────────┐
//! │ Gateway │───▶│ Engines  │───▶│ PostgreSQL │
//! │ (axum)  │    │ (ledger, │    │ (sqlx,     │
//! │         │    │  otp, …) │    │  FOR UPDATE)│
//! └─────────┘    └──────────┘    └────────────┘
//! ```
//!
//! Every balance mutation runs inside a database transaction with the
//! affected rows locked; sensitive payout operations additionally require a
//! fresh OTP-backed MFA session.

pub mod auth;
pub mod config;
pub mod db;
pub mod gateway;
pub mod ledger;
pub mod logging;
pub mod money;
pub mod oracle;
pub mod otp;
pub mod payouts;

pub use config::AppConfig;
pub use db::Database;
