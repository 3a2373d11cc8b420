use crate::error::DataError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Kline interval period, each mapping to a fixed duration in seconds.
///
/// Serialises to and from the Binance interval token (eg/ "1m", "1h").
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Interval {
    S10,
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    H8,
    D1,
    W1,
}

impl Interval {
    /// Every supported [`Interval`], shortest first.
    pub const ALL: [Interval; 10] = [
        Interval::S10,
        Interval::M1,
        Interval::M5,
        Interval::M15,
        Interval::M30,
        Interval::H1,
        Interval::H4,
        Interval::H8,
        Interval::D1,
        Interval::W1,
    ];

    /// Binance API interval token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::S10 => "10s",
            Interval::M1 => "1m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
            Interval::H4 => "4h",
            Interval::H8 => "8h",
            Interval::D1 => "1d",
            Interval::W1 => "1w",
        }
    }

    /// Duration of one kline in seconds.
    pub fn as_secs(&self) -> i64 {
        match self {
            Interval::S10 => 10,
            Interval::M1 => 60,
            Interval::M5 => 5 * 60,
            Interval::M15 => 15 * 60,
            Interval::M30 => 30 * 60,
            Interval::H1 => 3600,
            Interval::H4 => 4 * 3600,
            Interval::H8 => 8 * 3600,
            Interval::D1 => 24 * 3600,
            Interval::W1 => 7 * 24 * 3600,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = DataError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .into_iter()
            .find(|interval| interval.as_str() == input)
            .ok_or_else(|| DataError::InvalidInterval(input.to_string()))
    }
}

impl<'de> Deserialize<'de> for Interval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        let input = <String as Deserialize>::deserialize(deserializer)?;

        Interval::from_str(&input).map_err(|_| {
            serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(input.as_str()),
                &"a kline interval token (eg/ 1m, 1h, 1d)",
            )
        })
    }
}

impl Serialize for Interval {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
