//! Timestamp helpers
//!
//! Entries carry their creation time as unix seconds. Every human-readable
//! rendering (file lines, diagnostics, day-split file names) goes through the
//! local time zone.

use chrono::{DateTime, Local, Utc};

/// Format used for the timestamp column of every output line.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used for day labels and day-split file names.
pub const DAY_LABEL_FORMAT: &str = "%Y-%m-%d";

/// Current wall-clock time in unix seconds.
#[inline]
pub fn now_secs() -> i64 {
    Utc::now().timestamp()
}

/// Convert unix seconds to local time.
///
/// Out-of-range values clamp to the unix epoch.
pub fn to_local(secs: i64) -> DateTime<Local> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .unwrap_or_default()
        .with_timezone(&Local)
}

/// `YYYY-MM-DD HH:MM:SS` in local time.
pub fn format_display(secs: i64) -> String {
    to_local(secs).format(DISPLAY_FORMAT).to_string()
}

/// `YYYY-MM-DD` in local time.
pub fn day_label(secs: i64) -> String {
    to_local(secs).format(DAY_LABEL_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local_secs(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> i64 {
        Local
            .with_ymd_and_hms(y, m, d, h, min, s)
            .single()
            .unwrap()
            .timestamp()
    }

    #[test]
    fn test_format_display() {
        let secs = local_secs(2024, 3, 9, 7, 5, 1);
        assert_eq!(format_display(secs), "2024-03-09 07:05:01");
    }

    #[test]
    fn test_day_label_changes_at_midnight() {
        let before = local_secs(2024, 1, 1, 23, 59, 59);
        let after = local_secs(2024, 1, 2, 0, 0, 1);
        assert_eq!(day_label(before), "2024-01-01");
        assert_eq!(day_label(after), "2024-01-02");
    }

    #[test]
    fn test_out_of_range_clamps_to_epoch() {
        assert_eq!(to_local(i64::MAX), to_local(0));
    }
}
