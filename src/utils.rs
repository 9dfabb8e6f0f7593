//! Small date/time and string helpers used by API wrappers built on this
//! crate.

use chrono::{DateTime, Duration, Local, TimeZone};

/// Appends a plural suffix to `word` when `count` calls for it.
pub fn make_plural(word: &str, count: i64, suffix: &str) -> String {
    if count > 1 {
        format!("{word}{suffix}")
    } else {
        word.to_string()
    }
}

/// Formats a datetime with the given format string, `None` in -> `None` out.
///
/// ## Examples
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use easyrest::utils::datetime_to_string;
///
/// let date = Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap();
/// assert_eq!(datetime_to_string(Some(date), "%Y-%m-%d"), Some("2024-03-09".to_string()));
/// assert_eq!(datetime_to_string(None::<chrono::DateTime<Utc>>, "%Y-%m-%d"), None);
/// ```
pub fn datetime_to_string<Tz: TimeZone>(
    datetime: Option<DateTime<Tz>>,
    format: &str,
) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    datetime.map(|dt| dt.format(format).to_string())
}

/// Formats a millisecond duration as zero-padded `"MM:SS"`.
pub fn milliseconds_to_minutes_seconds(milliseconds: u64) -> String {
    let total_seconds = milliseconds / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Returns the current local time shifted forward by `milliseconds`.
pub fn now_plus_milliseconds(milliseconds: i64) -> DateTime<Local> {
    Local::now() + Duration::milliseconds(milliseconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_make_plural() {
        assert_eq!(make_plural("item", 1, "s"), "item");
        assert_eq!(make_plural("item", 2, "s"), "items");
        assert_eq!(make_plural("match", 3, "es"), "matches");
    }

    #[test]
    fn test_datetime_to_string() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 0).unwrap();
        assert_eq!(
            datetime_to_string(Some(date), "%Y-%m-%d"),
            Some("2024-03-09".to_string())
        );
        assert_eq!(datetime_to_string(None::<DateTime<Utc>>, "%Y-%m-%d"), None);
    }

    #[test]
    fn test_milliseconds_to_minutes_seconds() {
        assert_eq!(milliseconds_to_minutes_seconds(0), "00:00");
        assert_eq!(milliseconds_to_minutes_seconds(61_000), "01:01");
        assert_eq!(milliseconds_to_minutes_seconds(754_000), "12:34");
    }

    #[test]
    fn test_now_plus_milliseconds_moves_forward() {
        let before = Local::now();
        let shifted = now_plus_milliseconds(60_000);
        assert!(shifted > before);
    }
}
