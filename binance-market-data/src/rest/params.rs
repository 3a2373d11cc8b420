use crate::error::DataError;
use serde::{Deserialize, Serialize};

/// Optional parameters for `GET /api/v3/depth`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Deserialize, Serialize)]
pub struct DepthParams {
    /// Default 100, valid limits: 5, 10, 20, 50, 100, 500, 1000, 5000.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Optional parameters for `GET /api/v3/trades`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Deserialize, Serialize)]
pub struct TradesParams {
    /// Default 500, max 1000.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Optional parameters for `GET /api/v3/historicalTrades`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalTradesParams {
    /// Default 500, max 1000.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Trade id to fetch from. Defaults to the most recent trades.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_id: Option<u64>,
}

/// Optional parameters for `GET /api/v3/aggTrades`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggTradesParams {
    /// Default 500, max 1000.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Aggregate trade id to fetch from, inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_id: Option<u64>,
    /// Epoch ms to fetch from, inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    /// Epoch ms to fetch until, inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

/// Optional parameters for `GET /api/v3/klines`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KlinesParams {
    /// Default 500, max 1000.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Epoch ms of the earliest kline open time, inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    /// Epoch ms of the latest kline open time, inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

/// Query string for endpoints keyed by a required `symbol`.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct SymbolQuery<'a, Params> {
    pub symbol: &'a str,
    #[serde(flatten)]
    pub params: Params,
}

/// Query string for endpoints with an optional `symbol` (tickers).
#[derive(Clone, Debug, Serialize)]
pub(crate) struct OptionalSymbolQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<&'a str>,
}

/// Query string for `GET /api/v3/exchangeInfo`.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct ExchangeInfoQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<String>,
}

impl<'a> ExchangeInfoQuery<'a> {
    /// Validate that at most one of `symbol` or `symbols` is provided, encoding `symbols`
    /// as a compact JSON array (eg/ `["BTCUSDT","BNBUSDT"]`).
    pub fn new(symbol: Option<&'a str>, symbols: Option<&[&str]>) -> Result<Self, DataError> {
        if symbol.is_some() && symbols.is_some() {
            return Err(DataError::InvalidParameter(
                "symbol and symbols cannot be sent together".to_string(),
            ));
        }

        if let Some(symbol) = symbol {
            check_required_parameter(symbol, "symbol")?;
        }

        let symbols = symbols
            .map(|symbols| {
                if symbols.is_empty() {
                    return Err(DataError::InvalidParameter(
                        "symbols must contain at least one symbol".to_string(),
                    ));
                }
                symbols
                    .iter()
                    .try_for_each(|symbol| check_required_parameter(symbol, "symbols"))?;
                serde_json::to_string(symbols).map_err(DataError::from)
            })
            .transpose()?;

        Ok(Self { symbol, symbols })
    }
}

/// Query string for `GET /api/v3/klines`.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct KlinesQuery<'a> {
    pub symbol: &'a str,
    pub interval: &'a str,
    #[serde(flatten)]
    pub params: KlinesParams,
}

/// Fail with [`DataError::InvalidParameter`] if a required parameter is empty.
pub fn check_required_parameter(value: &str, name: &str) -> Result<(), DataError> {
    if value.trim().is_empty() {
        Err(DataError::InvalidParameter(format!(
            "{name} is mandatory, but received empty"
        )))
    } else {
        Ok(())
    }
}
