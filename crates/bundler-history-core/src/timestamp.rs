//! Timestamp tokens of the form `YYYYMMDD_HHMMSS`.
//!
//! Tokens are interpreted as UTC. The formatted form is only used for column
//! headers and is never parsed back.

use chrono::{NaiveDate, NaiveDateTime, SecondsFormat};

use crate::errors::{HistoryError, HistoryResult};

pub const TOKEN_LEN: usize = 15;

pub fn decode(token: &str) -> HistoryResult<NaiveDateTime> {
    if token.len() != TOKEN_LEN || !token.is_ascii() {
        return Err(HistoryError::invalid_timestamp(
            token,
            format!("expected {} ASCII characters", TOKEN_LEN),
        ));
    }

    let year = field(token, 0..4, "year")?;
    let month = field(token, 4..6, "month")?;
    let day = field(token, 6..8, "day")?;
    // byte 8 is the separator and is not checked
    let hour = field(token, 9..11, "hour")?;
    let minute = field(token, 11..13, "minute")?;
    let second = field(token, 13..15, "second")?;

    let date = NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| HistoryError::invalid_timestamp(token, "date out of range"))?;
    date.and_hms_opt(hour, minute, second)
        .ok_or_else(|| HistoryError::invalid_timestamp(token, "time out of range"))
}

fn field(token: &str, range: std::ops::Range<usize>, what: &str) -> HistoryResult<u32> {
    let digits = &token[range];
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HistoryError::invalid_timestamp(
            token,
            format!("{} '{}' is not numeric", what, digits),
        ));
    }
    digits
        .parse()
        .map_err(|_| HistoryError::invalid_timestamp(token, format!("bad {}", what)))
}

pub fn encode(dt: &NaiveDateTime) -> String {
    dt.format("%Y%m%d_%H%M%S").to_string()
}

pub fn format(dt: &NaiveDateTime) -> String {
    dt.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true)
}
