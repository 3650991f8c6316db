//! Human readable time formatting for playback positions and durations.

use std::time::Duration;

/// Format a duration as `HH:MM:SS` with zero-padded fields.
///
/// Hours are not capped; a duration past 99 hours simply grows wider.
pub fn duration_to_string(duration: Duration) -> String {
    let seconds = duration.as_secs();
    let minutes = seconds / 60;
    let hours = minutes / 60;
    format!("{:02}:{:02}:{:02}", hours, minutes % 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_renders_as_zeros() {
        assert_eq!(duration_to_string(Duration::ZERO), "00:00:00");
    }

    #[test]
    fn seconds_and_minutes_carry() {
        assert_eq!(duration_to_string(Duration::from_secs(59)), "00:00:59");
        assert_eq!(duration_to_string(Duration::from_secs(61)), "00:01:01");
        assert_eq!(duration_to_string(Duration::from_secs(3599)), "00:59:59");
    }

    #[test]
    fn hours_carry_and_are_not_capped() {
        assert_eq!(duration_to_string(Duration::from_secs(3661)), "01:01:01");
        assert_eq!(
            duration_to_string(Duration::from_secs(100 * 3600 + 62)),
            "100:01:02"
        );
    }

    #[test]
    fn subsecond_precision_is_truncated() {
        assert_eq!(duration_to_string(Duration::from_millis(1999)), "00:00:01");
    }
}
