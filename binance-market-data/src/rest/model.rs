use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Deserialize a `String` as the desired type.
pub fn de_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let data = String::deserialize(deserializer)?;
    data.parse::<T>().map_err(serde::de::Error::custom)
}

/// Binance REST API error payload.
///
/// ```json
/// { "code": -1121, "msg": "Invalid symbol." }
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Deserialize)]
pub struct BinanceApiError {
    pub code: i64,
    pub msg: String,
}

/// Ticker endpoints return an object when a symbol is given, and an array otherwise.
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

/// `GET /api/v3/time` response.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTime {
    /// Epoch ms.
    pub server_time: i64,
}

impl ServerTime {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.server_time)
    }
}

/// `GET /api/v3/exchangeInfo` response.
///
/// Only the commonly used fields are modelled; unknown fields are ignored.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeInfo {
    pub timezone: String,
    pub server_time: i64,
    #[serde(default)]
    pub rate_limits: Vec<RateLimit>,
    #[serde(default)]
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimit {
    pub rate_limit_type: String,
    pub interval: String,
    pub interval_num: u32,
    pub limit: u32,
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: String,
    pub base_asset: String,
    #[serde(default)]
    pub base_asset_precision: u32,
    pub quote_asset: String,
    #[serde(default)]
    pub quote_asset_precision: u32,
    #[serde(default)]
    pub order_types: Vec<String>,
    #[serde(default)]
    pub is_spot_trading_allowed: bool,
    #[serde(default)]
    pub filters: Vec<serde_json::Value>,
}

/// `GET /api/v3/depth` response.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBook {
    pub last_update_id: u64,
    pub bids: Vec<Level>,
    pub asks: Vec<Level>,
}

/// OrderBook price level, encoded by Binance as `["4.00000000", "431.00000000"]`.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Serialize)]
pub struct Level {
    pub price: f64,
    pub amount: f64,
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (price, amount) = <(String, String)>::deserialize(deserializer)?;

        Ok(Self {
            price: price.parse().map_err(serde::de::Error::custom)?,
            amount: amount.parse().map_err(serde::de::Error::custom)?,
        })
    }
}

/// `GET /api/v3/trades` and `GET /api/v3/historicalTrades` response element.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: u64,
    #[serde(deserialize_with = "de_str")]
    pub price: f64,
    #[serde(deserialize_with = "de_str")]
    pub qty: f64,
    #[serde(deserialize_with = "de_str")]
    pub quote_qty: f64,
    /// Epoch ms.
    pub time: i64,
    pub is_buyer_maker: bool,
    pub is_best_match: bool,
}

/// `GET /api/v3/aggTrades` response element.
///
/// ```json
/// {"a":26129,"p":"0.01633102","q":"4.70443515","f":27781,"l":27781,"T":1498793709153,"m":true,"M":true}
/// ```
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct AggTrade {
    #[serde(alias = "a")]
    pub id: u64,
    #[serde(alias = "p", deserialize_with = "de_str")]
    pub price: f64,
    #[serde(alias = "q", deserialize_with = "de_str")]
    pub quantity: f64,
    #[serde(alias = "f")]
    pub first_trade_id: u64,
    #[serde(alias = "l")]
    pub last_trade_id: u64,
    /// Epoch ms.
    #[serde(alias = "T")]
    pub time: i64,
    #[serde(alias = "m")]
    pub is_buyer_maker: bool,
    #[serde(alias = "M")]
    pub is_best_match: bool,
}

/// `GET /api/v3/avgPrice` response.
#[derive(Copy, Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct AvgPrice {
    /// Averaging window in minutes.
    pub mins: u32,
    #[serde(deserialize_with = "de_str")]
    pub price: f64,
}

/// `GET /api/v3/ticker/24hr` response element.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24hr {
    pub symbol: String,
    #[serde(deserialize_with = "de_str")]
    pub price_change: f64,
    #[serde(deserialize_with = "de_str")]
    pub price_change_percent: f64,
    #[serde(deserialize_with = "de_str")]
    pub weighted_avg_price: f64,
    #[serde(deserialize_with = "de_str")]
    pub prev_close_price: f64,
    #[serde(deserialize_with = "de_str")]
    pub last_price: f64,
    #[serde(deserialize_with = "de_str")]
    pub last_qty: f64,
    #[serde(deserialize_with = "de_str")]
    pub bid_price: f64,
    #[serde(deserialize_with = "de_str")]
    pub bid_qty: f64,
    #[serde(deserialize_with = "de_str")]
    pub ask_price: f64,
    #[serde(deserialize_with = "de_str")]
    pub ask_qty: f64,
    #[serde(deserialize_with = "de_str")]
    pub open_price: f64,
    #[serde(deserialize_with = "de_str")]
    pub high_price: f64,
    #[serde(deserialize_with = "de_str")]
    pub low_price: f64,
    #[serde(deserialize_with = "de_str")]
    pub volume: f64,
    #[serde(deserialize_with = "de_str")]
    pub quote_volume: f64,
    pub open_time: i64,
    pub close_time: i64,
    pub first_id: i64,
    pub last_id: i64,
    pub count: u64,
}

/// `GET /api/v3/ticker/price` response element.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct TickerPrice {
    pub symbol: String,
    #[serde(deserialize_with = "de_str")]
    pub price: f64,
}

/// `GET /api/v3/ticker/bookTicker` response element.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTicker {
    pub symbol: String,
    #[serde(deserialize_with = "de_str")]
    pub bid_price: f64,
    #[serde(deserialize_with = "de_str")]
    pub bid_qty: f64,
    #[serde(deserialize_with = "de_str")]
    pub ask_price: f64,
    #[serde(deserialize_with = "de_str")]
    pub ask_qty: f64,
}
