use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TimeCodeError;

// @module: Time code formatting and parsing

// @const: `[hh:]mm:ss.mmm`, comma accepted as millisecond separator
static TIME_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+):)?([0-5]\d):([0-5]\d)[.,](\d{3})$").expect("valid time code regex")
});

struct Clock {
    hours: i64,
    minutes: i64,
    seconds: i64,
    millis: i64,
}

impl Clock {
    /// Negative times are clamped to zero
    fn from_ms(ms: i64) -> Self {
        let ms = ms.max(0);
        Self {
            hours: ms / 3_600_000,
            minutes: (ms % 3_600_000) / 60_000,
            seconds: (ms % 60_000) / 1_000,
            millis: ms % 1_000,
        }
    }
}

/// `mm:ss.mmm`, or `hh:mm:ss.mmm` once the hour is non-zero
pub fn format_webvtt_time(ms: i64) -> String {
    let clock = Clock::from_ms(ms);
    if clock.hours > 0 {
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            clock.hours, clock.minutes, clock.seconds, clock.millis
        )
    } else {
        format!("{:02}:{:02}.{:03}", clock.minutes, clock.seconds, clock.millis)
    }
}

/// `hh:mm:ss,mmm`
pub fn format_subrip_time(ms: i64) -> String {
    let clock = Clock::from_ms(ms);
    format!(
        "{:02}:{:02}:{:02},{:03}",
        clock.hours, clock.minutes, clock.seconds, clock.millis
    )
}

/// `hh:mm:ss.mmm`, the TTML clock-time form
pub fn format_clock_time(ms: i64) -> String {
    let clock = Clock::from_ms(ms);
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        clock.hours, clock.minutes, clock.seconds, clock.millis
    )
}

/// Parses `mm:ss.mmm`, `hh:mm:ss.mmm` or `hh:mm:ss,mmm` into milliseconds
pub fn parse_time_code(time_code: &str) -> Result<i64, TimeCodeError> {
    let invalid = || TimeCodeError::Invalid(time_code.to_string());
    let captures = TIME_CODE_REGEX.captures(time_code.trim()).ok_or_else(invalid)?;

    let field = |index: usize| -> Result<i64, TimeCodeError> {
        captures
            .get(index)
            .map_or(Ok(0), |m| m.as_str().parse::<i64>().map_err(|_| invalid()))
    };

    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;
    let millis = field(4)?;

    hours
        .checked_mul(3_600_000)
        .and_then(|total| total.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
        .ok_or_else(invalid)
}
