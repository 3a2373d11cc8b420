#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_extern_crates,
    unused_qualifications,
    missing_debug_implementations,
    rust_2018_idioms
)]
#![allow(clippy::type_complexity)]

//! # Binance Market Data
//! Client for the Binance spot public market-data REST API.
//!
//! The centrepiece is [`fetch_history`](history::fetch_history), which walks backwards
//! through the page-capped klines endpoint and assembles a single deduplicated,
//! time-ordered [`KlineSeries`](series::KlineSeries).
//!
//! ## Example
//! ```rust,no_run
//! use binance_market_data::{
//!     history::{HistoryConfig, fetch_history},
//!     rest::client::BinanceRestClient,
//! };
//! use chrono::{TimeDelta, Utc};
//!
//! # async fn run() -> Result<(), binance_market_data::error::DataError> {
//! let client = BinanceRestClient::new()?;
//! let end = Utc::now();
//! let start = end - TimeDelta::days(30);
//!
//! let series = fetch_history(&client, "BTCUSDT", "1h", start, end, &HistoryConfig::default()).await?;
//! println!("fetched {} klines", series.len());
//! # Ok(())
//! # }
//! ```

/// All [`Error`](std::error::Error)s generated in this crate.
pub mod error;

/// Paginated historical kline retrieval.
pub mod history;

/// Kline [`Interval`](interval::Interval) lookup table.
pub mod interval;

/// Binance spot REST client, endpoint wrappers, parameters and response models.
pub mod rest;

/// Deduplicated, time-ordered [`KlineSeries`](series::KlineSeries).
pub mod series;

/// Conversion between epoch timestamps and local calendar time.
pub mod time;
