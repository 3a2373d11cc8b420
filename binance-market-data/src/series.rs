use crate::{error::DataError, rest::klines::KlineRow, time::local_time_from_millis};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Normalised kline, with decimal fields converted to `f64` and the trailing
/// ignore column dropped.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Deserialize, Serialize)]
pub struct Kline {
    /// Epoch ms.
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Epoch ms.
    pub close_time: i64,
    pub quote_volume: f64,
    pub trade_count: u64,
    pub taker_buy_base_volume: f64,
    pub taker_buy_quote_volume: f64,
}

/// [`Kline`] keyed by the local calendar time derived from its open time.
#[derive(Copy, Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct KlineEntry {
    pub time: NaiveDateTime,
    pub kline: Kline,
}

/// Ordered, deduplicated sequence of [`KlineEntry`]s.
///
/// ### Invariants
/// - No two entries originate from identical raw rows.
/// - Entries are sorted ascending by derived time.
#[derive(Clone, PartialEq, Debug, Default, Serialize)]
pub struct KlineSeries {
    entries: Vec<KlineEntry>,
}

impl KlineSeries {
    /// Assemble a [`KlineSeries`] from raw pages of [`KlineRow`]s.
    ///
    /// Pages are concatenated, exact duplicate rows are removed (first occurrence wins),
    /// rows are normalised into [`Kline`]s, each keyed by its open time shifted by
    /// `hour_offset` hours, and finally sorted by that key.
    pub fn from_pages<Pages>(pages: Pages, hour_offset: i64) -> Result<Self, DataError>
    where
        Pages: IntoIterator<Item = Vec<KlineRow>>,
    {
        let rows = pages.into_iter().flatten().collect::<Vec<_>>();

        let mut seen = HashSet::with_capacity(rows.len());
        let mut entries = rows
            .iter()
            .filter(|row| seen.insert(*row))
            .map(|row| {
                let kline = Kline::try_from(row)?;
                let time = local_time_from_millis(kline.open_time, hour_offset)?;
                Ok::<_, DataError>(KlineEntry { time, kline })
            })
            .collect::<Result<Vec<_>, DataError>>()?;

        entries.sort_by_key(|entry| entry.time);

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KlineEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[KlineEntry] {
        &self.entries
    }

    pub fn first(&self) -> Option<&KlineEntry> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&KlineEntry> {
        self.entries.last()
    }

    /// Derived time index, ascending.
    pub fn times(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.entries.iter().map(|entry| entry.time)
    }

    pub fn klines(&self) -> impl Iterator<Item = &Kline> + '_ {
        self.entries.iter().map(|entry| &entry.kline)
    }

    /// Look up the [`Kline`] keyed by `time`.
    pub fn get(&self, time: NaiveDateTime) -> Option<&Kline> {
        self.entries
            .binary_search_by_key(&time, |entry| entry.time)
            .ok()
            .map(|index| &self.entries[index].kline)
    }

    /// Entries with `start <= time <= end`.
    pub fn range(&self, start: NaiveDateTime, end: NaiveDateTime) -> &[KlineEntry] {
        let lower = self.entries.partition_point(|entry| entry.time < start);
        let upper = self.entries.partition_point(|entry| entry.time <= end);
        &self.entries[lower..upper.max(lower)]
    }

    pub fn into_entries(self) -> Vec<KlineEntry> {
        self.entries
    }
}

impl IntoIterator for KlineSeries {
    type Item = KlineEntry;
    type IntoIter = std::vec::IntoIter<KlineEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a KlineSeries {
    type Item = &'a KlineEntry;
    type IntoIter = std::slice::Iter<'a, KlineEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
