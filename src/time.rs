//! Packed-decimal timestamps.
//!
//! WIN32 timestamps are 8 bytes holding 16 decimal digits,
//! `YYYYMMDDhhmmssff`, where `ff` is hundredths of a second. Recording times
//! are Japan Standard Time; [`jst_to_utc`] applies the fixed +09:00 offset.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use crate::bcd::{hex_string, unpack_nibbles};
use crate::{KnetError, Result};

/// Hours between JST and UTC. Japan observes no daylight saving time.
pub const JST_OFFSET_HOURS: i64 = 9;

/// Decode a 16-digit packed timestamp into a naive (local) date-time.
pub fn decode_timestamp(bytes: &[u8; 8]) -> Result<NaiveDateTime> {
    let digits = unpack_nibbles(bytes);
    if digits.iter().any(|&d| d > 9) {
        return Err(KnetError::InvalidBcd {
            digits: hex_string(bytes),
        });
    }

    let field = |range: std::ops::Range<usize>| -> u32 {
        digits[range].iter().fold(0u32, |acc, &d| acc * 10 + d as u32)
    };

    let year = field(0..4) as i32;
    let month = field(4..6);
    let day = field(6..8);
    let hour = field(8..10);
    let minute = field(10..12);
    let second = field(12..14);
    let millis = field(14..16) * 10;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_milli_opt(hour, minute, second, millis))
        .ok_or_else(|| KnetError::InvalidTimestamp(hex_string(bytes)))
}

/// Convert a JST wall-clock time to UTC.
pub fn jst_to_utc(local: NaiveDateTime) -> DateTime<Utc> {
    (local - TimeDelta::hours(JST_OFFSET_HOURS)).and_utc()
}

/// Decode a packed JST timestamp straight to UTC.
pub fn decode_jst_timestamp(bytes: &[u8; 8]) -> Result<DateTime<Utc>> {
    decode_timestamp(bytes).map(jst_to_utc)
}

/// Convert a count of tenths of a second into a duration.
pub fn tenths_to_delta(tenths: u32) -> TimeDelta {
    TimeDelta::milliseconds(tenths as i64 * 100)
}
