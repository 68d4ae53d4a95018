//! Elapsed-time formatting.

use chrono::Duration;

/// Formats a duration as `HH:MM:SS`.
///
/// Hours are not wrapped at 24; negative durations format as zero.
pub fn format_hms(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero() {
        assert_eq!(format_hms(Duration::zero()), "00:00:00");
    }

    #[test]
    fn formats_mixed_units() {
        assert_eq!(format_hms(Duration::seconds(3 * 3600 + 25 * 60 + 7)), "03:25:07");
    }

    #[test]
    fn does_not_wrap_hours() {
        assert_eq!(format_hms(Duration::hours(36)), "36:00:00");
    }

    #[test]
    fn truncates_sub_second_precision() {
        assert_eq!(format_hms(Duration::milliseconds(59_999)), "00:00:59");
    }

    #[test]
    fn clamps_negative_to_zero() {
        assert_eq!(format_hms(Duration::seconds(-5)), "00:00:00");
    }
}
