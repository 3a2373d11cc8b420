use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use thiserror::Error;

/// All errors generated in `binance-market-data`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// Interval token is not present in the interval lookup table.
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    /// Requested history range does not satisfy `start < end`.
    #[error("invalid time range: start {start} must be before end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Missing or conflicting endpoint parameter, detected before any request is sent.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Network, HTTP or response decoding failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Binance API error payload returned with a non-success status.
    ///
    /// ```json
    /// { "code": -1121, "msg": "Invalid symbol." }
    /// ```
    #[error("Binance API error (status {status}, code {code}): {msg}")]
    Api {
        status: StatusCode,
        code: i64,
        msg: String,
    },

    /// Historical pagination completed without yielding a single kline.
    #[error("no klines returned for {symbol} {interval}")]
    EmptyResult { symbol: String, interval: String },

    /// Epoch timestamp cannot be represented as a calendar time.
    #[error("timestamp out of range: {0}")]
    InvalidTimestamp(i64),
}

impl From<reqwest::Error> for DataError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(error: serde_json::Error) -> Self {
        Self::Transport(format!("failed to deserialise response: {error}"))
    }
}

impl From<url::ParseError> for DataError {
    fn from(error: url::ParseError) -> Self {
        Self::InvalidParameter(format!("invalid url: {error}"))
    }
}
