//! Cash accounts, the idempotent transaction ledger and simulated market
//! orders. All balance mutations run inside a database transaction with the
//! affected rows locked `FOR UPDATE`.

pub mod accounts;
pub mod error;
pub mod models;
pub mod orders;
pub mod transactions;

pub use error::LedgerError;
pub use models::{Account, CryptoPosition, Direction, Transaction};
pub use orders::{MarketOrder, OrderOutcome, process_market_order};
pub use transactions::{CreateOutcome, NewTransaction, TransactionFilter};
