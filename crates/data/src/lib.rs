//! Data plumbing around the clustering core
//!
//! CSV feature-table I/O, BTC/ETH pair feature engineering, and an
//! optional Alpaca market-data fetcher behind the `fetch` feature.

pub mod alpaca;
mod error;
pub mod features;
pub mod table_io;

pub use alpaca::{close_series, write_bars_csv, AlpacaClient, CryptoBar};
pub use error::{DataError, Result};
pub use features::{build_pair_features, read_close_series, DailyClose, ROLLING_WINDOWS};
pub use table_io::{
    label_code, label_from_code, read_feature_table, read_labeled_table, write_feature_table,
    write_labeled_table,
};

#[cfg(feature = "fetch")]
pub use alpaca::{fetch_crypto_bars, fetch_crypto_bars_sync};
