//! Market-data oracle backed by the CoinCap REST API, with an explicit TTL
//! cache in front of every upstream call.

pub mod cache;
pub mod client;

pub use cache::{CacheLookup, Clock, SystemClock, TtlCache};
pub use client::{
    AssetQuote, HistoryPoint, OracleError, PriceOracle, SUPPORTED_ASSETS, SupportedAsset,
    normalize_asset_identifier,
};
