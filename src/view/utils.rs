//! Utility functions for rendering UI components

/// Format a duration in seconds as `m:ss`. Negative or non-finite values
/// render as `0:00`.
pub fn format_duration(secs: f64) -> String {
    let total_seconds = if secs.is_finite() && secs > 0.0 {
        secs as u64
    } else {
        0
    };
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(59.4), "0:59");
        assert_eq!(format_duration(60.0), "1:00");
        assert_eq!(format_duration(245.7), "4:05");
        assert_eq!(format_duration(3600.0), "60:00");
    }

    #[test]
    fn formats_bad_values_as_zero() {
        assert_eq!(format_duration(-3.0), "0:00");
        assert_eq!(format_duration(f64::NAN), "0:00");
    }

    #[test]
    fn truncates_long_names_with_ellipsis() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("a very long playlist name", 10), "a very ...");
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        assert_eq!(truncate_string("ééééé", 10), "ééééé");
    }
}
