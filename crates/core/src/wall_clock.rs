//! Wall-clock strings in the scheduler's `HH:MM:SS` layout.

/// Duration reported when the scheduler knows neither start nor end.
pub const ZERO_DURATION: &str = "00:00:00";

/// Format a signed duration as `HH:MM:SS`.
///
/// Hours are not wrapped at a day boundary, so a job that ran for two days
/// reads `48:00:00`. Negative durations (clock skew between nodes) clamp to
/// zero.
pub fn format_wall_clock(duration: chrono::Duration) -> String {
    let total = duration.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = total % 3600 / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_short_duration() {
        assert_eq!(format_wall_clock(chrono::Duration::seconds(65)), "00:01:05");
    }

    #[test]
    fn test_format_multi_day_duration() {
        let d = chrono::Duration::days(2) + chrono::Duration::seconds(3 * 3600 + 7);
        assert_eq!(format_wall_clock(d), "51:00:07");
    }

    #[test]
    fn test_format_negative_clamps() {
        assert_eq!(format_wall_clock(chrono::Duration::seconds(-5)), ZERO_DURATION);
    }
}
