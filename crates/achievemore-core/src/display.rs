//! Text helpers the renderer uses for countdowns and due dates.

use chrono::{DateTime, Utc};

/// `MM:SS` for a countdown. Minutes are not wrapped into hours.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Coarse "in 2d 3h" / "in 4h 10m" / "in 5m" / "Due now" label.
pub fn time_until(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = target - now;
    let days = diff.num_days();
    let hours = diff.num_hours() % 24;
    let minutes = diff.num_minutes() % 60;

    if days > 0 {
        format!("in {days}d {hours}h")
    } else if hours > 0 {
        format!("in {hours}h {minutes}m")
    } else if minutes > 0 {
        format!("in {minutes}m")
    } else {
        "Due now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn clock_pads_both_fields() {
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(6000), "100:00");
    }

    #[test]
    fn time_until_buckets() {
        let now = Utc.with_ymd_and_hms(2026, 6, 10, 9, 0, 0).unwrap();
        let at = |d: Duration| time_until(now + d, now);

        assert_eq!(at(Duration::days(2) + Duration::hours(3)), "in 2d 3h");
        assert_eq!(at(Duration::hours(4) + Duration::minutes(10)), "in 4h 10m");
        assert_eq!(at(Duration::minutes(5)), "in 5m");
        assert_eq!(at(Duration::seconds(30)), "Due now");
        assert_eq!(at(-Duration::hours(2)), "Due now");
    }
}
