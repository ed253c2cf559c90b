//! CoinCap market-data client with TTL caching and stale fallback.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::OracleConfig;

use super::cache::{CacheLookup, Clock, SystemClock, TtlCache};

const ICON_BASE: &str = "https://assets.coincap.io/assets/icons";

/// The demo trades a fixed whitelist of assets.
pub struct SupportedAsset {
    pub id: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

pub const SUPPORTED_ASSETS: &[SupportedAsset] = &[
    SupportedAsset { id: "bitcoin", symbol: "BTC", name: "Bitcoin" },
    SupportedAsset { id: "ethereum", symbol: "ETH", name: "Ethereum" },
    SupportedAsset { id: "xrp", symbol: "XRP", name: "XRP" },
    SupportedAsset { id: "solana", symbol: "SOL", name: "Solana" },
    SupportedAsset { id: "dogecoin", symbol: "DOGE", name: "Dogecoin" },
];

/// Accepts either a CoinCap id ("bitcoin") or a ticker ("BTC").
pub fn normalize_asset_identifier(identifier: &str) -> Option<&'static SupportedAsset> {
    let identifier = identifier.trim();
    SUPPORTED_ASSETS
        .iter()
        .find(|a| a.id == identifier)
        .or_else(|| {
            let upper = identifier.to_uppercase();
            SUPPORTED_ASSETS.iter().find(|a| a.symbol == upper)
        })
}

fn icon_url(symbol: &str) -> String {
    format!("{ICON_BASE}/{}@2x.png", symbol.to_lowercase())
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssetQuote {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change24h: f64,
    pub image: Option<String>,
    pub market_cap: Option<f64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HistoryPoint {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub price: f64,
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("asset not supported")]
    UnknownAsset,
    #[error("market data upstream failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

// ============================================================================
// Upstream wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct AssetsResponse {
    #[serde(default)]
    data: Vec<RawAsset>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAsset {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    price_usd: Option<String>,
    #[serde(default)]
    change_percent24_hr: Option<String>,
    #[serde(default)]
    market_cap_usd: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    data: Vec<RawHistoryPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHistoryPoint {
    #[serde(default)]
    time: Option<i64>,
    #[serde(default)]
    price_usd: Option<String>,
}

fn parse_price(value: Option<&str>) -> f64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0.0)
}

// ============================================================================
// Client
// ============================================================================

pub struct PriceOracle {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    snapshot_cache: TtlCache<(), Vec<AssetQuote>>,
    history_cache: TtlCache<(String, u32), Vec<HistoryPoint>>,
}

impl PriceOracle {
    pub fn new(config: &OracleConfig, clock: Arc<dyn Clock>) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_seconds);
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .expect("failed to build market data HTTP client"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            snapshot_cache: TtlCache::new(ttl, clock.clone()),
            history_cache: TtlCache::new(ttl, clock),
        }
    }

    pub fn from_config(config: &OracleConfig) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    fn get(&self, url: String) -> reqwest::RequestBuilder {
        let req = self.client.get(url);
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    /// Current prices for every supported asset, in whitelist order.
    ///
    /// Fresh cache hits skip the upstream entirely; on upstream failure a
    /// stale snapshot is served instead of an error.
    pub async fn market_snapshot(&self) -> Result<Vec<AssetQuote>, OracleError> {
        let stale = match self.snapshot_cache.get(&()) {
            CacheLookup::Fresh(snapshot) => return Ok(snapshot),
            CacheLookup::Stale(snapshot) => Some(snapshot),
            CacheLookup::Miss => None,
        };

        match self.fetch_snapshot().await {
            Ok(snapshot) => {
                self.snapshot_cache.put((), snapshot.clone());
                Ok(snapshot)
            }
            Err(err) => match stale {
                Some(snapshot) => {
                    tracing::warn!("market snapshot refresh failed, serving stale data: {err}");
                    Ok(snapshot)
                }
                None => Err(err.into()),
            },
        }
    }

    async fn fetch_snapshot(&self) -> Result<Vec<AssetQuote>, reqwest::Error> {
        let ids: Vec<&str> = SUPPORTED_ASSETS.iter().map(|a| a.id).collect();
        let response: AssetsResponse = self
            .get(format!("{}/assets", self.base_url))
            .query(&[("ids", ids.join(","))])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let entries: std::collections::HashMap<&str, &RawAsset> =
            response.data.iter().map(|a| (a.id.as_str(), a)).collect();

        // Whitelist order, with zeroed quotes for assets the upstream omits.
        let snapshot = SUPPORTED_ASSETS
            .iter()
            .map(|asset| {
                let entry = entries.get(asset.id);
                AssetQuote {
                    id: asset.id.to_string(),
                    symbol: asset.symbol.to_string(),
                    name: entry
                        .and_then(|e| e.name.clone())
                        .unwrap_or_else(|| asset.name.to_string()),
                    price: parse_price(entry.and_then(|e| e.price_usd.as_deref())),
                    change24h: parse_price(entry.and_then(|e| e.change_percent24_hr.as_deref())),
                    image: Some(icon_url(asset.symbol)),
                    market_cap: entry
                        .and_then(|e| e.market_cap_usd.as_deref())
                        .and_then(|v| v.parse().ok()),
                }
            })
            .collect();
        Ok(snapshot)
    }

    /// One quote by id or ticker, out of the cached snapshot.
    pub async fn asset_quote(&self, identifier: &str) -> Result<AssetQuote, OracleError> {
        let asset = normalize_asset_identifier(identifier).ok_or(OracleError::UnknownAsset)?;
        let snapshot = self.market_snapshot().await?;
        snapshot
            .into_iter()
            .find(|q| q.id == asset.id)
            .ok_or(OracleError::UnknownAsset)
    }

    /// Daily close series over the trailing `days` window.
    pub async fn history(&self, identifier: &str, days: u32) -> Result<Vec<HistoryPoint>, OracleError> {
        let asset = normalize_asset_identifier(identifier).ok_or(OracleError::UnknownAsset)?;
        let key = (asset.id.to_string(), days);

        let stale = match self.history_cache.get(&key) {
            CacheLookup::Fresh(history) => return Ok(history),
            CacheLookup::Stale(history) => Some(history),
            CacheLookup::Miss => None,
        };

        match self.fetch_history(asset.id, days).await {
            Ok(history) => {
                self.history_cache.put(key, history.clone());
                Ok(history)
            }
            Err(err) => match stale {
                Some(history) => {
                    tracing::warn!(asset = asset.id, "history refresh failed, serving stale data: {err}");
                    Ok(history)
                }
                None => Err(err.into()),
            },
        }
    }

    async fn fetch_history(
        &self,
        asset_id: &str,
        days: u32,
    ) -> Result<Vec<HistoryPoint>, reqwest::Error> {
        let end_ms = chrono::Utc::now().timestamp_millis();
        let start_ms = end_ms - i64::from(days) * 24 * 60 * 60 * 1000;
        let response: HistoryResponse = self
            .get(format!("{}/assets/{}/history", self.base_url, asset_id))
            .query(&[
                ("interval", "d1".to_string()),
                ("start", start_ms.to_string()),
                ("end", end_ms.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .data
            .into_iter()
            .map(|p| HistoryPoint {
                timestamp: p.time.unwrap_or(0),
                price: parse_price(p.price_usd.as_deref()),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_accepts_id_or_ticker() {
        assert_eq!(normalize_asset_identifier("bitcoin").unwrap().symbol, "BTC");
        assert_eq!(normalize_asset_identifier("btc").unwrap().id, "bitcoin");
        assert_eq!(normalize_asset_identifier(" SOL ").unwrap().id, "solana");
        assert!(normalize_asset_identifier("shiba-inu").is_none());
    }

    #[test]
    fn icon_urls_use_lowercase_ticker() {
        assert_eq!(
            icon_url("BTC"),
            "https://assets.coincap.io/assets/icons/btc@2x.png"
        );
    }

    #[test]
    fn upstream_payload_parses_with_string_numbers() {
        let payload = r#"{
            "data": [
                {
                    "id": "bitcoin",
                    "name": "Bitcoin",
                    "priceUsd": "64123.4567",
                    "changePercent24Hr": "-1.23",
                    "marketCapUsd": "1260000000000.0"
                },
                {"id": "xrp", "priceUsd": null}
            ]
        }"#;
        let parsed: AssetsResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parse_price(parsed.data[0].price_usd.as_deref()), 64123.4567);
        assert_eq!(parse_price(parsed.data[1].price_usd.as_deref()), 0.0);
    }

    #[test]
    fn history_payload_parses_millisecond_timestamps() {
        let payload = r#"{"data": [{"time": 1724889600000, "priceUsd": "59000.1"}]}"#;
        let parsed: HistoryResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.data[0].time, Some(1724889600000));
    }
}
