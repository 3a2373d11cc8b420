use crate::{error::DataError, interval::Interval};
use std::future::Future;

/// [`BinanceRestClient`](client::BinanceRestClient) and the shared `query` /
/// `limit_request` helpers every endpoint delegates to.
pub mod client;

/// Kline/candlestick wire row, positional deserialiser and [`KlineFetcher`] implementation.
pub mod klines;

/// Public market-data endpoint wrappers (ping, time, depth, trades, tickers, etc).
pub mod market;

/// Typed response models for the market-data endpoints.
pub mod model;

/// Typed optional parameters for the market-data endpoints.
pub mod params;

/// Request parameters for fetching one page of kline/candlestick data.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct KlineRequest {
    /// Exchange market symbol (eg/ "BTCUSDT").
    pub symbol: String,
    /// Kline interval period.
    pub interval: Interval,
    /// Inclusive lower bound on kline open time (epoch ms).
    pub start_time: Option<i64>,
    /// Inclusive upper bound on kline open time (epoch ms).
    pub end_time: Option<i64>,
    /// Maximum number of klines to return.
    pub limit: Option<u32>,
}

/// Fetches a single page of raw klines from an exchange.
///
/// Implemented by [`BinanceRestClient`](client::BinanceRestClient), and by test doubles.
pub trait KlineFetcher {
    /// Fetch one page of klines. Transport and API failures are returned as-is.
    fn fetch_klines(
        &self,
        request: KlineRequest,
    ) -> impl Future<Output = Result<Vec<klines::KlineRow>, DataError>> + Send;
}
