use crate::{
    error::DataError,
    interval::Interval,
    rest::{KlineFetcher, KlineRequest, params::check_required_parameter},
    series::KlineSeries,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{str::FromStr, time::Duration};
use tokio::time::sleep;
use tracing::{Instrument, debug, info, warn};

/// Maximum number of klines the Binance klines endpoint returns per request.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Default courtesy delay between consecutive page requests.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(100);

/// Configuration for [`fetch_history`].
#[derive(Copy, Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct HistoryConfig {
    /// Fixed delay slept between consecutive page requests.
    pub page_delay: Duration,
    /// Hours added to UTC when deriving the local time index (eg/ 8 for Beijing).
    pub hour_offset: i64,
    /// Klines per page, clamped to `1..=MAX_PAGE_SIZE`.
    pub max_page_size: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            page_delay: DEFAULT_PAGE_DELAY,
            hour_offset: 0,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Time window of a single page request, in epoch seconds (both ends inclusive).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct PageWindow {
    pub start: i64,
    pub end: i64,
}

impl PageWindow {
    pub fn start_millis(&self) -> i64 {
        self.start * 1000
    }

    pub fn end_millis(&self) -> i64 {
        self.end * 1000
    }
}

/// Plan the page windows required to cover `[start, end]` (epoch seconds), walking
/// backwards from `end`.
///
/// Each window spans at most `max_page_size` intervals and at least one, so the walk
/// always makes progress. Consecutive windows share a boundary: the lower bound of one
/// window is the upper bound of the next. Windows are produced lazily.
pub fn page_windows(start: i64, end: i64, interval: Interval, max_page_size: u32) -> PageWindows {
    PageWindows {
        start,
        cursor: end,
        interval_secs: interval.as_secs(),
        max_page_size: i64::from(max_page_size.clamp(1, MAX_PAGE_SIZE)),
    }
}

/// Iterator over the [`PageWindow`]s of a history fetch, newest first.
///
/// See [`page_windows`].
#[derive(Clone, Debug)]
pub struct PageWindows {
    start: i64,
    cursor: i64,
    interval_secs: i64,
    max_page_size: i64,
}

impl Iterator for PageWindows {
    type Item = PageWindow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor <= self.start {
            return None;
        }

        let count = ((self.cursor - self.start) / self.interval_secs).clamp(1, self.max_page_size);
        let window = PageWindow {
            start: self.cursor - self.interval_secs * count,
            end: self.cursor,
        };

        self.cursor = window.start;
        Some(window)
    }
}

/// Fetch every kline for `symbol` between `start` and `end`, paginating backwards
/// through the page-capped klines endpoint.
///
/// Pages are requested strictly sequentially with [`HistoryConfig::page_delay`] between
/// them, then merged into a single deduplicated [`KlineSeries`] sorted ascending by
/// local time.
///
/// ### Errors
/// - [`DataError::InvalidInterval`] if `interval` is unknown. No request is sent.
/// - [`DataError::InvalidParameter`] if `symbol` is empty. No request is sent.
/// - [`DataError::InvalidRange`] if `start` is not at least one whole second before `end`.
///   No request is sent.
/// - Any error returned by the [`KlineFetcher`], aborting the fetch without a partial result.
/// - [`DataError::EmptyResult`] if no klines were returned at all.
pub async fn fetch_history<Fetcher>(
    fetcher: &Fetcher,
    symbol: &str,
    interval: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    config: &HistoryConfig,
) -> Result<KlineSeries, DataError>
where
    Fetcher: KlineFetcher,
{
    let interval = Interval::from_str(interval)?;
    check_required_parameter(symbol, "symbol")?;
    // Paging works in whole seconds
    if start.timestamp() >= end.timestamp() {
        return Err(DataError::InvalidRange { start, end });
    }

    let span = tracing::info_span!(
        "fetch_history",
        exchange = "binance",
        symbol,
        %interval,
    );

    async move {
        let windows = page_windows(
            start.timestamp(),
            end.timestamp(),
            interval,
            config.max_page_size,
        );

        info!(%start, %end, "starting kline history pagination");

        let mut pages = Vec::new();
        for (index, window) in windows.enumerate() {
            if index > 0 {
                sleep(config.page_delay).await;
            }

            let request = KlineRequest {
                symbol: symbol.to_string(),
                interval,
                start_time: Some(window.start_millis()),
                end_time: Some(window.end_millis()),
                limit: Some(MAX_PAGE_SIZE),
            };

            let page = match fetcher.fetch_klines(request).await {
                Ok(page) => page,
                Err(error) => {
                    warn!(?error, page = index, "kline history page failed, aborting");
                    return Err(error);
                }
            };

            debug!(
                page = index,
                window_start = window.start,
                window_end = window.end,
                rows = page.len(),
                "fetched kline history page"
            );

            pages.push(page);
        }

        let series = KlineSeries::from_pages(pages, config.hour_offset)?;
        if series.is_empty() {
            return Err(DataError::EmptyResult {
                symbol: symbol.to_string(),
                interval: interval.to_string(),
            });
        }

        info!(rows = series.len(), "kline history pagination complete");

        Ok(series)
    }
    .instrument(span)
    .await
}
