//! Alpaca market-data fetcher
//!
//! Fetches historical crypto daily bars from the Alpaca Market Data API.
//!
//! # Example
//!
//! Requires the `fetch` feature.
//!
//! ```rust,ignore
//! use data::fetch_crypto_bars_sync;
//!
//! let bars = fetch_crypto_bars_sync("BTC/USD", "2021-01-01", "2025-01-01").unwrap();
//! println!("Got {} daily bars", bars.len());
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};
use crate::features::DailyClose;

/// A single daily OHLCV bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoBar {
    /// RFC3339 timestamp of the bar open.
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Alpaca API response structures
#[derive(Debug, Deserialize)]
struct BarsResponse {
    bars: Option<HashMap<String, Vec<RawBar>>>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBar {
    #[serde(rename = "t")]
    timestamp: String,
    #[serde(rename = "o")]
    open: f64,
    #[serde(rename = "h")]
    high: f64,
    #[serde(rename = "l")]
    low: f64,
    #[serde(rename = "c")]
    close: f64,
    #[serde(rename = "v")]
    volume: f64,
}

/// Alpaca crypto market-data client.
#[derive(Debug, Clone)]
pub struct AlpacaClient {
    base_url: String,
    key_id: String,
    secret_key: String,
}

impl AlpacaClient {
    /// Create a client with explicit credentials.
    pub fn new(key_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://data.alpaca.markets/v1beta3/crypto/us/bars".to_string(),
            key_id: key_id.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Create a client from the `APCA_API_KEY_ID` and
    /// `APCA_API_SECRET_KEY` environment variables.
    pub fn from_env() -> Result<Self> {
        let key_id = std::env::var("APCA_API_KEY_ID").map_err(|_| DataError::MissingCredential {
            name: "APCA_API_KEY_ID".to_string(),
        })?;
        let secret_key =
            std::env::var("APCA_API_SECRET_KEY").map_err(|_| DataError::MissingCredential {
                name: "APCA_API_SECRET_KEY".to_string(),
            })?;
        Ok(Self::new(key_id, secret_key))
    }

    /// Build the request URL for one page of daily bars.
    fn build_url(&self, symbol: &str, start: &str, end: &str, page_token: Option<&str>) -> String {
        let mut url = format!(
            "{}?symbols={}&timeframe=1Day&start={}&end={}&limit=1000",
            self.base_url,
            symbol.replace('/', "%2F"),
            start,
            end
        );
        if let Some(token) = page_token {
            url.push_str("&page_token=");
            url.push_str(token);
        }
        url
    }

    /// Parse one response page into bars plus the next page token.
    fn parse_response(&self, json: &str, symbol: &str) -> Result<(Vec<CryptoBar>, Option<String>)> {
        let response: BarsResponse =
            serde_json::from_str(json).map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut bars = Vec::new();
        if let Some(mut by_symbol) = response.bars {
            if let Some(raw_bars) = by_symbol.remove(symbol) {
                for raw in raw_bars {
                    bars.push(CryptoBar {
                        timestamp: raw.timestamp,
                        open: raw.open,
                        high: raw.high,
                        low: raw.low,
                        close: raw.close,
                        volume: raw.volume,
                    });
                }
            }
        }
        Ok((bars, response.next_page_token))
    }

    /// Fetch all daily bars for `symbol` between two RFC3339 dates
    /// (async), following pagination.
    #[cfg(feature = "fetch")]
    pub async fn fetch(&self, symbol: &str, start: &str, end: &str) -> Result<Vec<CryptoBar>> {
        let client = reqwest::Client::new();
        let mut bars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = self.build_url(symbol, start, end, page_token.as_deref());
            let text = client
                .get(&url)
                .header("APCA-API-KEY-ID", &self.key_id)
                .header("APCA-API-SECRET-KEY", &self.secret_key)
                .send()
                .await
                .map_err(|e| DataError::RequestFailed(e.to_string()))?
                .text()
                .await
                .map_err(|e| DataError::RequestFailed(e.to_string()))?;

            let (page, next) = self.parse_response(&text, symbol)?;
            bars.extend(page);
            match next {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        if bars.is_empty() {
            return Err(DataError::NoData);
        }
        bars.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(bars)
    }

    /// Fetch all daily bars for `symbol` between two RFC3339 dates
    /// (blocking), following pagination.
    #[cfg(feature = "fetch")]
    pub fn fetch_blocking(&self, symbol: &str, start: &str, end: &str) -> Result<Vec<CryptoBar>> {
        let client = reqwest::blocking::Client::new();
        let mut bars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = self.build_url(symbol, start, end, page_token.as_deref());
            let text = client
                .get(&url)
                .header("APCA-API-KEY-ID", &self.key_id)
                .header("APCA-API-SECRET-KEY", &self.secret_key)
                .send()
                .map_err(|e| DataError::RequestFailed(e.to_string()))?
                .text()
                .map_err(|e| DataError::RequestFailed(e.to_string()))?;

            let (page, next) = self.parse_response(&text, symbol)?;
            bars.extend(page);
            match next {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        if bars.is_empty() {
            return Err(DataError::NoData);
        }
        bars.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(bars)
    }
}

/// Convenience function to fetch crypto daily bars (async), with
/// credentials taken from the environment.
#[cfg(feature = "fetch")]
pub async fn fetch_crypto_bars(symbol: &str, start: &str, end: &str) -> Result<Vec<CryptoBar>> {
    AlpacaClient::from_env()?.fetch(symbol, start, end).await
}

/// Convenience function to fetch crypto daily bars (blocking), with
/// credentials taken from the environment.
#[cfg(feature = "fetch")]
pub fn fetch_crypto_bars_sync(symbol: &str, start: &str, end: &str) -> Result<Vec<CryptoBar>> {
    AlpacaClient::from_env()?.fetch_blocking(symbol, start, end)
}

/// Reduce bars to the close series the feature builder consumes.
pub fn close_series(bars: &[CryptoBar]) -> Vec<DailyClose> {
    bars.iter()
        .map(|b| DailyClose {
            timestamp: b.timestamp.clone(),
            close: b.close,
        })
        .collect()
}

/// Persist bars as CSV (`timestamp,open,high,low,close,volume`).
pub fn write_bars_csv<P: AsRef<Path>>(path: P, bars: &[CryptoBar]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(["timestamp", "open", "high", "low", "close", "volume"])?;
    for bar in bars {
        writer.write_record([
            bar.timestamp.as_str(),
            &bar.open.to_string(),
            &bar.high.to_string(),
            &bar.low.to_string(),
            &bar.close.to_string(),
            &bar.volume.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
