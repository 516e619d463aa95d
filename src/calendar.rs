use time::{Date, OffsetDateTime};
use time_tz::{ToTimezone, timezones};

/// Current calendar date in `tz`. Unknown names fall back to UTC.
pub fn today(tz: &str) -> Date {
    date_in(OffsetDateTime::now_utc(), tz)
}

pub fn date_in(at: OffsetDateTime, tz: &str) -> Date {
    match timezones::get_by_name(tz) {
        Some(tz) => at.to_timezone(tz).date(),
        None => at.date(),
    }
}
