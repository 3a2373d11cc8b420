use crate::error::DataError;
use chrono::{DateTime, NaiveDateTime, TimeDelta};

/// Convert epoch seconds into a calendar time shifted by `hour_offset` hours.
///
/// An offset of `0` yields UTC wall-clock time, `8` yields Beijing time, etc.
pub fn local_time_from_timestamp(
    seconds: i64,
    hour_offset: i64,
) -> Result<NaiveDateTime, DataError> {
    DateTime::from_timestamp(seconds, 0)
        .and_then(|time| shift_hours(time.naive_utc(), hour_offset))
        .ok_or(DataError::InvalidTimestamp(seconds))
}

/// Convert epoch milliseconds into a calendar time shifted by `hour_offset` hours.
///
/// Sub-second precision is preserved.
pub fn local_time_from_millis(millis: i64, hour_offset: i64) -> Result<NaiveDateTime, DataError> {
    DateTime::from_timestamp_millis(millis)
        .and_then(|time| shift_hours(time.naive_utc(), hour_offset))
        .ok_or(DataError::InvalidTimestamp(millis))
}

/// Inverse of [`local_time_from_timestamp`], truncating any sub-second precision.
pub fn timestamp_from_local_time(
    time: NaiveDateTime,
    hour_offset: i64,
) -> Result<i64, DataError> {
    let offset = hour_offset
        .checked_neg()
        .ok_or(DataError::InvalidTimestamp(hour_offset))?;

    shift_hours(time, offset)
        .map(|utc| utc.and_utc().timestamp())
        .ok_or(DataError::InvalidTimestamp(time.and_utc().timestamp()))
}

fn shift_hours(time: NaiveDateTime, hours: i64) -> Option<NaiveDateTime> {
    TimeDelta::try_hours(hours).and_then(|delta| time.checked_add_signed(delta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_local_time_from_timestamp_utc() {
        let actual = local_time_from_timestamp(1609459200, 0).unwrap();
        assert_eq!(actual, datetime(2021, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_local_time_from_timestamp_with_offset() {
        let actual = local_time_from_timestamp(1609459200, 8).unwrap();
        assert_eq!(actual, datetime(2021, 1, 1, 8, 0, 0));

        let actual = local_time_from_timestamp(1609459200, -5).unwrap();
        assert_eq!(actual, datetime(2020, 12, 31, 19, 0, 0));
    }

    #[test]
    fn test_local_time_from_millis_keeps_sub_second() {
        let actual = local_time_from_millis(1609459200500, 0).unwrap();
        assert_eq!(actual.and_utc().timestamp_millis(), 1609459200500);
    }

    #[test]
    fn test_round_trip_recovers_epoch_seconds() {
        let open_times_ms = [0_i64, 1499040000000, 1609459200000, 1672515780000, 1700000000999];

        for hour_offset in [-12, 0, 8, 14] {
            for open_time in open_times_ms {
                let local = local_time_from_millis(open_time, hour_offset).unwrap();
                let seconds = timestamp_from_local_time(local, hour_offset).unwrap();
                assert_eq!(seconds, open_time / 1000, "offset {hour_offset}, ms {open_time}");
            }
        }
    }

    #[test]
    fn test_local_time_out_of_range() {
        assert_eq!(
            local_time_from_timestamp(i64::MAX, 0),
            Err(DataError::InvalidTimestamp(i64::MAX))
        );
        assert!(local_time_from_timestamp(0, i64::MAX).is_err());
    }
}
