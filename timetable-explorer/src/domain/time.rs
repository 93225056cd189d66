//! Stop times within the abstract timetable day.
//!
//! Timetables give arrival and departure as `"HH:MM:SS"` on a single
//! abstract operating day anchored at day 0. Hours may exceed 23 to express
//! next-day arrivals; such values are kept as-is and never wrap.

use std::fmt;

use serde::Serialize;

/// Milliseconds in one day.
pub const MS_PER_DAY: u64 = 24 * 3600 * 1000;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day as milliseconds since midnight of operating day 0.
///
/// # Examples
///
/// ```
/// use timetable_explorer::domain::TimeOfDay;
///
/// let t = TimeOfDay::parse("08:15:30").unwrap();
/// assert_eq!(t.as_millis(), (8 * 3600 + 15 * 60 + 30) * 1000);
///
/// // Next-day arrivals do not wrap
/// let late = TimeOfDay::parse("25:10:00").unwrap();
/// assert!(late > t);
/// assert_eq!(late.to_string(), "25:10:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TimeOfDay(u64);

impl TimeOfDay {
    /// Midnight of day 0.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Create from milliseconds since midnight of day 0.
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Create from whole hours, minutes and seconds.
    pub const fn from_hms(hours: u64, minutes: u64, seconds: u64) -> Self {
        Self(((hours * 60 + minutes) * 60 + seconds) * 1000)
    }

    /// Parse `"HH:MM:SS"` (or `"HH:MM"`, seconds defaulting to zero).
    ///
    /// Hours may have more than two digits and exceed 23; minutes and
    /// seconds must be two digits below 60.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.trim().split(':');

        let hours = parts
            .next()
            .filter(|h| !h.is_empty() && h.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| TimeError::new("invalid hour digits"))?
            .parse::<u64>()
            .map_err(|_| TimeError::new("hour out of range"))?;

        let minutes = parts
            .next()
            .and_then(parse_two_digits)
            .ok_or_else(|| TimeError::new("expected HH:MM:SS format"))?;
        if minutes > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        let seconds = match parts.next() {
            Some(sec) => parse_two_digits(sec).ok_or_else(|| TimeError::new("invalid second digits"))?,
            None => 0,
        };
        if seconds > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }

        if parts.next().is_some() {
            return Err(TimeError::new("expected HH:MM:SS format"));
        }

        Self::checked_from_hms(hours, minutes, seconds)
            .ok_or_else(|| TimeError::new("hour out of range"))
    }

    fn checked_from_hms(hours: u64, minutes: u64, seconds: u64) -> Option<Self> {
        let total = hours
            .checked_mul(60)?
            .checked_add(minutes)?
            .checked_mul(60)?
            .checked_add(seconds)?;
        total.checked_mul(1000).map(Self)
    }

    /// Milliseconds since midnight of day 0.
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Whole hours since midnight of day 0 (may exceed 23).
    pub fn hours(self) -> u64 {
        self.0 / 3_600_000
    }

    /// Minute within the hour.
    pub fn minutes(self) -> u64 {
        self.0 / 60_000 % 60
    }

    /// Second within the minute.
    pub fn seconds(self) -> u64 {
        self.0 / 1000 % 60
    }

    /// Short `H:MM` label for sliders and tooltips.
    pub fn short_label(self) -> String {
        format!("{}:{:02}", self.hours(), self.minutes())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

/// Parse exactly two ASCII digits.
fn parse_two_digits(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(u64::from(d1 * 10 + d2))
}
