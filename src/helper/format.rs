use chrono::{DateTime, Utc};

/// View counts above one thousand are shortened to one decimal, e.g. `1500` becomes `1.5k`
pub fn format_views(views: u64) -> String {
    if views > 1000 {
        format!("{:.1}k", views as f64 / 1000.0)
    } else {
        views.to_string()
    }
}

/// Formats seconds as `m:ss`. Fractions of a second are dropped.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

const UNITS: [(&str, i64); 5] = [
    ("year", 365 * 24 * 3600),
    ("month", 30 * 24 * 3600),
    ("day", 24 * 3600),
    ("hour", 3600),
    ("minute", 60),
];

/// Relative age of an RFC 3339 timestamp, such as `3 days ago`
pub fn time_ago(created_at: &str, now: DateTime<Utc>) -> String {
    let Ok(created) = DateTime::parse_from_rfc3339(created_at) else {
        return String::new();
    };
    let elapsed = (now - created.with_timezone(&Utc)).num_seconds();
    for (unit, length) in UNITS {
        let count = elapsed / length;
        if count >= 1 {
            let plural = if count == 1 { "" } else { "s" };
            return format!("{count} {unit}{plural} ago");
        }
    }
    "just now".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn views() {
        assert_eq!(format_views(1500), "1.5k");
        assert_eq!(format_views(1000), "1000");
        assert_eq!(format_views(999), "999");
        assert_eq!(format_views(12345), "12.3k");
    }

    #[test]
    fn duration() {
        assert_eq!(format_duration(125.7), "2:05");
        assert_eq!(format_duration(59.9), "0:59");
        assert_eq!(format_duration(600.0), "10:00");
        assert_eq!(format_duration(-3.0), "0:00");
        assert_eq!(format_duration(f64::NAN), "0:00");
    }

    #[test]
    fn ago() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        assert_eq!(time_ago("2024-05-10T11:59:30Z", now), "just now");
        assert_eq!(time_ago("2024-05-10T11:59:00Z", now), "1 minute ago");
        assert_eq!(time_ago("2024-05-10T11:00:00Z", now), "1 hour ago");
        assert_eq!(time_ago("2024-05-07T12:00:00.000Z", now), "3 days ago");
        assert_eq!(time_ago("2022-05-01T12:00:00Z", now), "2 years ago");
        assert_eq!(time_ago("2024-05-10T12:00:00Z", now), "just now");
        assert_eq!(time_ago("yesterday", now), "");
    }
}
