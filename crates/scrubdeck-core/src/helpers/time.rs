// crates/scrubdeck-core/src/helpers/time.rs
//
// Shared time-formatting utilities used by scrubdeck-ui and any future
// crate that needs human-readable timestamps.
//
// Canonical source for format_time() — previously duplicated across UI
// modules as `format_time`/`format_duration` with diverging formats.

use crate::time::RationalTime;

/// Format a timestamp as `MM:SS:FF` at the timestamp's own rate.
///
/// Used on the timeline ruler where frame-level precision matters.
///
/// ```
/// use scrubdeck_core::helpers::time::format_time;
/// use scrubdeck_core::time::RationalTime;
/// assert_eq!(format_time(RationalTime::new(0.0, 30.0)),    "00:00:00");
/// assert_eq!(format_time(RationalTime::new(1845.0, 30.0)), "01:01:15");
/// ```
pub fn format_time(t: RationalTime) -> String {
    let rate = t.rate.max(1.0);
    let s = t.to_seconds();
    let m  = (s / 60.0) as u32;
    let sc = (s % 60.0) as u32;
    let fr = ((s * rate) as u32) % rate as u32;
    format!("{m:02}:{sc:02}:{fr:02}")
}

/// Format a duration as a compact human-readable string.
///
/// Used in the library panel where frame-level precision is unnecessary.
///
/// | Range         | Format       | Example   |
/// |---------------|--------------|-----------|
/// | ≥ 3600 s      | `H:MM:SS`    | `1:04:35` |
/// | ≥ 60 s        | `M:SS`       | `3:07`    |
/// | < 60 s        | `S.Xs`       | `4.2s`    |
///
/// ```
/// use scrubdeck_core::helpers::time::format_duration;
/// use scrubdeck_core::time::RationalTime;
/// assert_eq!(format_duration(RationalTime::new(4.2, 1.0)),    "4.2s");
/// assert_eq!(format_duration(RationalTime::new(187.0, 1.0)),  "3:07");
/// ```
pub fn format_duration(t: RationalTime) -> String {
    let secs = t.to_seconds();
    if secs >= 3600.0 {
        format!(
            "{}:{:02}:{:02}",
            secs as u64 / 3600,
            (secs as u64 % 3600) / 60,
            secs as u64 % 60,
        )
    } else if secs >= 60.0 {
        format!("{}:{:02}", secs as u64 / 60, secs as u64 % 60)
    } else {
        format!("{secs:.1}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_switches_bucket_at_a_minute() {
        assert_eq!(format_duration(RationalTime::new(45.0, 1.0)), "45.0s");
        assert_eq!(format_duration(RationalTime::new(65.0, 1.0)), "1:05");
    }

    #[test]
    fn format_time_wraps_frames_at_the_rate() {
        assert_eq!(format_time(RationalTime::new(1.0, 24.0)), "00:00:01");
    }
}
