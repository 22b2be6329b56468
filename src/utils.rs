//! Small formatting helpers shared by the commands and the follower loop.

use chrono::{DateTime, Duration, Local, Utc};

/// Format a duration compactly, e.g. `4h`, `6h30m`, `12m`, `45s`.
///
/// Negative durations are shown as `0s`.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        if minutes > 0 {
            format!("{hours}h{minutes}m")
        } else {
            format!("{hours}h")
        }
    } else if minutes > 0 {
        if seconds > 0 {
            format!("{minutes}m{seconds}s")
        } else {
            format!("{minutes}m")
        }
    } else {
        format!("{seconds}s")
    }
}

/// Local `HH:MM:SS` rendering of an instant.
pub fn format_local_time(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::hours(4)), "4h");
        assert_eq!(format_duration(Duration::minutes(390)), "6h30m");
        assert_eq!(format_duration(Duration::minutes(12)), "12m");
        assert_eq!(format_duration(Duration::seconds(75)), "1m15s");
        assert_eq!(format_duration(Duration::seconds(45)), "45s");
        assert_eq!(format_duration(Duration::milliseconds(400)), "0s");
        assert_eq!(format_duration(Duration::seconds(-5)), "0s");
    }
}
