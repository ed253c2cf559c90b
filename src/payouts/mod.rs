//! Bank payout rails: registered withdrawal methods (IBAN accounts) and
//! withdrawal requests that debit and freeze user funds. Both write paths
//! sit behind the `payouts:write` scope and a fresh MFA session.

pub mod error;
pub mod models;
pub mod service;
pub mod validation;

pub use error::PayoutError;
pub use models::{Withdrawal, WithdrawalMethod};
pub use service::{NewWithdrawalMethod, WithdrawalRequest};
