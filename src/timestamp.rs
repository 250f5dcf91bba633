// @module: Clock-style timestamps for subtitle cues

/// A seconds offset split into clock fields
///
/// Every field is truncated, never rounded, and hours are not wrapped at 24.
/// Negative or non-finite input is a caller error; it is clamped to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub millis: u64,
}

impl ClockTime {
    /// Split a seconds offset into clock fields
    pub fn from_seconds(seconds: f64) -> Self {
        let seconds = if seconds.is_finite() && seconds > 0.0 { seconds } else { 0.0 };

        ClockTime {
            hours: (seconds / 3600.0).floor() as u64,
            minutes: ((seconds % 3600.0) / 60.0).floor() as u64,
            seconds: (seconds % 60.0).floor() as u64,
            millis: ((seconds % 1.0) * 1000.0).floor() as u64,
        }
    }

    /// Total milliseconds represented by the fields
    pub fn total_millis(&self) -> u64 {
        self.hours * 3_600_000 + self.minutes * 60_000 + self.seconds * 1_000 + self.millis
    }

    fn format_with(&self, millis_separator: char) -> String {
        format!(
            "{:02}:{:02}:{:02}{}{:03}",
            self.hours, self.minutes, self.seconds, millis_separator, self.millis
        )
    }
}

/// Format seconds as an SRT timestamp (HH:MM:SS,mmm)
pub fn format_srt_timestamp(seconds: f64) -> String {
    ClockTime::from_seconds(seconds).format_with(',')
}

/// Format seconds as a WebVTT timestamp (HH:MM:SS.mmm)
pub fn format_vtt_timestamp(seconds: f64) -> String {
    ClockTime::from_seconds(seconds).format_with('.')
}
