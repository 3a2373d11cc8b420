use super::{KlineFetcher, KlineRequest, client::BinanceRestClient, params::KlinesParams};
use crate::{error::DataError, series::Kline};
use serde::de::{Error as _, SeqAccess};
use std::future::Future;
use tracing::{Instrument, debug, warn};

/// Number of positional elements in every Binance kline array.
pub const KLINE_ROW_FIELDS: usize = 12;

/// Raw kline/candlestick row returned by the Binance REST API.
///
/// Binance returns klines as arrays of mixed types, with decimals encoded as text:
/// `[open_time, open, high, low, close, volume, close_time, quote_volume, trade_count,
/// taker_buy_base_volume, taker_buy_quote_volume, ignore]`
///
/// Rows are kept in wire form until deduplication, since two rows are only duplicates
/// if every field matches exactly.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct KlineRow {
    pub open_time: i64,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
    pub close_time: i64,
    pub quote_volume: String,
    pub trade_count: u64,
    pub taker_buy_base_volume: String,
    pub taker_buy_quote_volume: String,
    pub ignore: String,
}

impl<'de> serde::Deserialize<'de> for KlineRow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        struct KlineRowVisitor;

        impl<'de> serde::de::Visitor<'de> for KlineRowVisitor {
            type Value = KlineRow;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "a Binance kline array with {KLINE_ROW_FIELDS} elements")
            }

            fn visit_seq<SeqAccessor>(
                self,
                mut seq: SeqAccessor,
            ) -> Result<Self::Value, SeqAccessor::Error>
            where
                SeqAccessor: SeqAccess<'de>,
            {
                let row = KlineRow {
                    open_time: extract_next(&mut seq, "open_time")?,
                    open: extract_next(&mut seq, "open")?,
                    high: extract_next(&mut seq, "high")?,
                    low: extract_next(&mut seq, "low")?,
                    close: extract_next(&mut seq, "close")?,
                    volume: extract_next(&mut seq, "volume")?,
                    close_time: extract_next(&mut seq, "close_time")?,
                    quote_volume: extract_next(&mut seq, "quote_volume")?,
                    trade_count: extract_next(&mut seq, "trade_count")?,
                    taker_buy_base_volume: extract_next(&mut seq, "taker_buy_base_volume")?,
                    taker_buy_quote_volume: extract_next(&mut seq, "taker_buy_quote_volume")?,
                    ignore: extract_next(&mut seq, "ignore")?,
                };

                // Column count must match exactly
                if seq.next_element::<serde::de::IgnoredAny>()?.is_some() {
                    return Err(SeqAccessor::Error::invalid_length(
                        KLINE_ROW_FIELDS + 1,
                        &self,
                    ));
                }

                Ok(row)
            }
        }

        deserializer.deserialize_seq(KlineRowVisitor)
    }
}

/// Deserialise the next sequence element, failing with a missing field error if the
/// sequence is exhausted.
fn extract_next<'de, SeqAccessor, Target>(
    sequence: &mut SeqAccessor,
    name: &'static str,
) -> Result<Target, SeqAccessor::Error>
where
    SeqAccessor: SeqAccess<'de>,
    Target: serde::Deserialize<'de>,
{
    sequence
        .next_element::<Target>()?
        .ok_or_else(|| SeqAccessor::Error::missing_field(name))
}

fn parse_decimal(name: &str, value: &str) -> Result<f64, DataError> {
    value
        .parse::<f64>()
        .map_err(|error| DataError::Transport(format!("failed to parse {name} '{value}': {error}")))
}

impl TryFrom<&KlineRow> for Kline {
    type Error = DataError;

    fn try_from(raw: &KlineRow) -> Result<Self, Self::Error> {
        Ok(Kline {
            open_time: raw.open_time,
            open: parse_decimal("open", &raw.open)?,
            high: parse_decimal("high", &raw.high)?,
            low: parse_decimal("low", &raw.low)?,
            close: parse_decimal("close", &raw.close)?,
            volume: parse_decimal("volume", &raw.volume)?,
            close_time: raw.close_time,
            quote_volume: parse_decimal("quote_volume", &raw.quote_volume)?,
            trade_count: raw.trade_count,
            taker_buy_base_volume: parse_decimal(
                "taker_buy_base_volume",
                &raw.taker_buy_base_volume,
            )?,
            taker_buy_quote_volume: parse_decimal(
                "taker_buy_quote_volume",
                &raw.taker_buy_quote_volume,
            )?,
        })
    }
}

impl KlineFetcher for BinanceRestClient {
    /// Fetch a single page of klines from the Binance REST API.
    fn fetch_klines(
        &self,
        request: KlineRequest,
    ) -> impl Future<Output = Result<Vec<KlineRow>, DataError>> + Send {
        let span = tracing::info_span!(
            "fetch_klines",
            exchange = "binance",
            symbol = %request.symbol,
            interval = %request.interval,
        );

        async move {
            let params = KlinesParams {
                limit: request.limit,
                start_time: request.start_time,
                end_time: request.end_time,
            };

            match self.klines(&request.symbol, request.interval.as_str(), params).await {
                Ok(rows) => {
                    debug!(count = rows.len(), "fetched klines page");
                    Ok(rows)
                }
                Err(error) => {
                    warn!(?error, "klines fetch failed");
                    Err(error)
                }
            }
        }
        .instrument(span)
    }
}
