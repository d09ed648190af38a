//! BTC/ETH pair feature engineering.
//!
//! Aligns two daily close series on their common timestamps and derives
//! the rolling statistical features the clustering core consumes:
//! return spread, volatility ratio, rolling beta, and rolling
//! correlation over several window lengths, plus min-max normalized
//! variants. Rows with incomplete windows are dropped so the resulting
//! table holds no missing values.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use cluster_spi::FeatureTable;
use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

/// Window lengths (in trading days) for the rolling features.
pub const ROLLING_WINDOWS: [usize; 6] = [7, 14, 30, 60, 90, 120];

/// One day of a close-price series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyClose {
    pub timestamp: String,
    pub close: f64,
}

/// Read a close series from a bar CSV with `timestamp` and `close`
/// columns.
pub fn read_close_series<P: AsRef<Path>>(path: P) -> Result<Vec<DailyClose>> {
    let file = File::open(path)?;
    read_close_series_from(BufReader::new(file))
}

/// Read a close series from any reader.
pub fn read_close_series_from<R: Read>(reader: R) -> Result<Vec<DailyClose>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let ts_idx = headers
        .iter()
        .position(|h| h == "timestamp")
        .ok_or_else(|| DataError::MissingColumn {
            name: "timestamp".to_string(),
        })?;
    let close_idx = headers
        .iter()
        .position(|h| h == "close")
        .ok_or_else(|| DataError::MissingColumn {
            name: "close".to_string(),
        })?;

    let mut series = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let timestamp = record.get(ts_idx).unwrap_or("").to_string();
        let raw = record.get(close_idx).unwrap_or("").trim();
        let close = raw.parse::<f64>().map_err(|_| DataError::InvalidValue {
            key: timestamp.clone(),
            column: "close".to_string(),
            value: raw.to_string(),
        })?;
        series.push(DailyClose { timestamp, close });
    }
    Ok(series)
}

/// Build the pair feature table from two close series.
///
/// Only timestamps present in both series are used. Derived columns
/// follow the upstream naming (`volatility_ratio_7D`, `eth_beta_120D`,
/// `correlation_60D`, ...); every derived column except the prices also
/// gets a min-max normalized `*_norm` twin.
pub fn build_pair_features(btc: &[DailyClose], eth: &[DailyClose]) -> Result<FeatureTable> {
    let btc_by_ts: BTreeMap<&str, f64> = btc
        .iter()
        .map(|d| (d.timestamp.as_str(), d.close))
        .collect();
    let eth_by_ts: BTreeMap<&str, f64> = eth
        .iter()
        .map(|d| (d.timestamp.as_str(), d.close))
        .collect();

    let mut timestamps = Vec::new();
    let mut btc_price = Vec::new();
    let mut eth_price = Vec::new();
    for (&ts, &b) in &btc_by_ts {
        if let Some(&e) = eth_by_ts.get(ts) {
            timestamps.push(ts.to_string());
            btc_price.push(b);
            eth_price.push(e);
        }
    }
    if timestamps.is_empty() {
        return Err(DataError::NoData);
    }

    let price_pair: Vec<f64> = btc_price
        .iter()
        .zip(&eth_price)
        .map(|(b, e)| b / e)
        .collect();
    let btc_returns = pct_change(&btc_price);
    let eth_returns = pct_change(&eth_price);
    let return_spread: Vec<f64> = btc_returns
        .iter()
        .zip(&eth_returns)
        .map(|(b, e)| b - e)
        .collect();

    let mut columns: Vec<(String, Vec<f64>)> = vec![
        ("btc_price".to_string(), btc_price),
        ("eth_price".to_string(), eth_price),
        ("price_pair".to_string(), price_pair),
        ("btc_returns".to_string(), btc_returns.clone()),
        ("eth_returns".to_string(), eth_returns.clone()),
        ("return_spread".to_string(), return_spread.clone()),
    ];

    let mut to_normalize: Vec<(String, Vec<f64>)> =
        vec![("return_spread".to_string(), return_spread)];

    for window in ROLLING_WINDOWS {
        let btc_std = rolling(&btc_returns, window, sample_std);
        let eth_std = rolling(&eth_returns, window, sample_std);
        let volatility_ratio: Vec<f64> = btc_std.iter().zip(&eth_std).map(|(b, e)| b / e).collect();

        let eth_beta = rolling_pair(&eth_returns, &btc_returns, window, |e, b| {
            sample_cov(e, b) / sample_cov(b, b)
        });
        let correlation = rolling_pair(&btc_returns, &eth_returns, window, |b, e| {
            sample_cov(b, e) / (sample_std(b) * sample_std(e))
        });

        for (name, values) in [
            (format!("volatility_ratio_{}D", window), volatility_ratio),
            (format!("eth_beta_{}D", window), eth_beta),
            (format!("correlation_{}D", window), correlation),
        ] {
            columns.push((name.clone(), values.clone()));
            to_normalize.push((name, values));
        }
    }

    for (name, values) in to_normalize {
        columns.push((format!("{}_norm", name), min_max_normalize(&values)));
    }

    let names: Vec<String> = columns.iter().map(|(n, _)| n.clone()).collect();
    let mut entries = Vec::new();
    for (i, ts) in timestamps.into_iter().enumerate() {
        let row: Vec<f64> = columns.iter().map(|(_, values)| values[i]).collect();
        // Incomplete windows surface as NaN; those rows never reach the
        // core.
        if row.iter().all(|v| v.is_finite()) {
            entries.push((ts, row));
        }
    }

    Ok(FeatureTable::new(names, entries)?)
}

/// Day-over-day fractional change; the first element has no
/// predecessor and comes back NaN.
fn pct_change(values: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for i in 1..values.len() {
        out[i] = (values[i] - values[i - 1]) / values[i - 1];
    }
    out
}

/// Apply `f` over a trailing window. Positions without a full window,
/// or whose window holds a non-finite value, come back NaN.
fn rolling<F: Fn(&[f64]) -> f64>(values: &[f64], window: usize, f: F) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().all(|v| v.is_finite()) {
            out[i] = f(slice);
        }
    }
    out
}

/// Two-series version of [`rolling`].
fn rolling_pair<F: Fn(&[f64], &[f64]) -> f64>(
    a: &[f64],
    b: &[f64],
    window: usize,
    f: F,
) -> Vec<f64> {
    let mut out = vec![f64::NAN; a.len().min(b.len())];
    for i in (window - 1)..out.len() {
        let sa = &a[i + 1 - window..=i];
        let sb = &b[i + 1 - window..=i];
        if sa.iter().chain(sb).all(|v| v.is_finite()) {
            out[i] = f(sa, sb);
        }
    }
    out
}

fn sample_mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator), matching the upstream
/// pipeline's statistics.
fn sample_std(values: &[f64]) -> f64 {
    let mean = sample_mean(values);
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Sample covariance (n - 1 denominator).
fn sample_cov(a: &[f64], b: &[f64]) -> f64 {
    let mean_a = sample_mean(a);
    let mean_b = sample_mean(b);
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum::<f64>()
        / (a.len() - 1) as f64
}

/// Scale finite values into [0, 1]. Non-finite inputs pass through
/// untouched; a constant column maps to 0.
fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return values.to_vec();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values
        .iter()
        .map(|&v| {
            if !v.is_finite() {
                v
            } else if range == 0.0 {
                0.0
            } else {
                (v - min) / range
            }
        })
        .collect()
}
