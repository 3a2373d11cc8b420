use super::{
    client::BinanceRestClient,
    klines::KlineRow,
    model::{
        AggTrade, AvgPrice, BookTicker, ExchangeInfo, OneOrMany, OrderBook, ServerTime,
        Ticker24hr, TickerPrice, Trade,
    },
    params::{
        AggTradesParams, DepthParams, ExchangeInfoQuery, HistoricalTradesParams, KlinesParams,
        KlinesQuery, OptionalSymbolQuery, SymbolQuery, TradesParams, check_required_parameter,
    },
};
use crate::error::DataError;
use reqwest::Method;
use serde::de::IgnoredAny;

pub const PATH_PING: &str = "/api/v3/ping";
pub const PATH_TIME: &str = "/api/v3/time";
pub const PATH_EXCHANGE_INFO: &str = "/api/v3/exchangeInfo";
pub const PATH_DEPTH: &str = "/api/v3/depth";
pub const PATH_TRADES: &str = "/api/v3/trades";
pub const PATH_HISTORICAL_TRADES: &str = "/api/v3/historicalTrades";
pub const PATH_AGG_TRADES: &str = "/api/v3/aggTrades";
pub const PATH_KLINES: &str = "/api/v3/klines";
pub const PATH_AVG_PRICE: &str = "/api/v3/avgPrice";
pub const PATH_TICKER_24HR: &str = "/api/v3/ticker/24hr";
pub const PATH_TICKER_PRICE: &str = "/api/v3/ticker/price";
pub const PATH_BOOK_TICKER: &str = "/api/v3/ticker/bookTicker";

/// Binance spot public market-data endpoints.
///
/// See docs: <https://binance-docs.github.io/apidocs/spot/en/#market-data-endpoints>
impl BinanceRestClient {
    /// Test connectivity to the REST API.
    pub async fn ping(&self) -> Result<(), DataError> {
        self.query::<IgnoredAny, ()>(PATH_PING, None).await?;
        Ok(())
    }

    /// Test connectivity to the REST API and get the current server time.
    pub async fn time(&self) -> Result<ServerTime, DataError> {
        self.query::<_, ()>(PATH_TIME, None).await
    }

    /// Current exchange trading rules and symbol information.
    ///
    /// At most one of `symbol` or `symbols` may be provided.
    pub async fn exchange_info(
        &self,
        symbol: Option<&str>,
        symbols: Option<&[&str]>,
    ) -> Result<ExchangeInfo, DataError> {
        let query = ExchangeInfoQuery::new(symbol, symbols)?;
        self.query(PATH_EXCHANGE_INFO, Some(&query)).await
    }

    /// OrderBook snapshot.
    pub async fn depth(&self, symbol: &str, params: DepthParams) -> Result<OrderBook, DataError> {
        check_required_parameter(symbol, "symbol")?;
        self.query(PATH_DEPTH, Some(&SymbolQuery { symbol, params }))
            .await
    }

    /// Recent trades (up to last 1000).
    pub async fn trades(&self, symbol: &str, params: TradesParams) -> Result<Vec<Trade>, DataError> {
        check_required_parameter(symbol, "symbol")?;
        self.query(PATH_TRADES, Some(&SymbolQuery { symbol, params }))
            .await
    }

    /// Older market trades. Sends the configured API key.
    pub async fn historical_trades(
        &self,
        symbol: &str,
        params: HistoricalTradesParams,
    ) -> Result<Vec<Trade>, DataError> {
        check_required_parameter(symbol, "symbol")?;
        self.limit_request(
            Method::GET,
            PATH_HISTORICAL_TRADES,
            Some(&SymbolQuery { symbol, params }),
        )
        .await
    }

    /// Compressed/aggregate trades.
    pub async fn agg_trades(
        &self,
        symbol: &str,
        params: AggTradesParams,
    ) -> Result<Vec<AggTrade>, DataError> {
        check_required_parameter(symbol, "symbol")?;
        self.query(PATH_AGG_TRADES, Some(&SymbolQuery { symbol, params }))
            .await
    }

    /// Kline/candlestick rows in wire form, open times ascending.
    ///
    /// `interval` is any Binance interval token (eg/ "1s", "3m", "1M") and is sent as is.
    pub async fn klines(
        &self,
        symbol: &str,
        interval: &str,
        params: KlinesParams,
    ) -> Result<Vec<KlineRow>, DataError> {
        check_required_parameter(symbol, "symbol")?;
        check_required_parameter(interval, "interval")?;
        let query = KlinesQuery {
            symbol,
            interval,
            params,
        };
        self.query(PATH_KLINES, Some(&query)).await
    }

    /// Current average price for a symbol.
    pub async fn avg_price(&self, symbol: &str) -> Result<AvgPrice, DataError> {
        check_required_parameter(symbol, "symbol")?;
        self.query(
            PATH_AVG_PRICE,
            Some(&OptionalSymbolQuery {
                symbol: Some(symbol),
            }),
        )
        .await
    }

    /// 24hr rolling window price change statistics, for one symbol or all symbols.
    pub async fn ticker_24hr(&self, symbol: Option<&str>) -> Result<Vec<Ticker24hr>, DataError> {
        self.optional_symbol_query(PATH_TICKER_24HR, symbol).await
    }

    /// Latest price, for one symbol or all symbols.
    pub async fn ticker_price(&self, symbol: Option<&str>) -> Result<Vec<TickerPrice>, DataError> {
        self.optional_symbol_query(PATH_TICKER_PRICE, symbol).await
    }

    /// Best bid/ask price and quantity, for one symbol or all symbols.
    pub async fn book_ticker(&self, symbol: Option<&str>) -> Result<Vec<BookTicker>, DataError> {
        self.optional_symbol_query(PATH_BOOK_TICKER, symbol).await
    }

    async fn optional_symbol_query<Response>(
        &self,
        path: &str,
        symbol: Option<&str>,
    ) -> Result<Vec<Response>, DataError>
    where
        Response: serde::de::DeserializeOwned,
    {
        if let Some(symbol) = symbol {
            check_required_parameter(symbol, "symbol")?;
        }

        self.query::<OneOrMany<Response>, _>(path, Some(&OptionalSymbolQuery { symbol }))
            .await
            .map(OneOrMany::into_vec)
    }
}
