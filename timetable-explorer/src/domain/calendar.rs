//! Operating-day calendars.
//!
//! A calendar marks, for every day of the timetable validity window, whether
//! something operates on that day. Calendars from different windows are
//! compared by aligning on calendar dates, never on raw indices.
//!
//! All date arithmetic is date-only (`NaiveDate`), so there is no daylight
//! saving or timezone skew in the alignment.

use std::fmt;

use chrono::{Datelike, NaiveDate};

/// Glyph for an operating day in [`Calendar::glyphs`].
pub const ACTIVE_GLYPH: char = '\u{25A0}';

/// Glyph for a non-operating day in [`Calendar::glyphs`].
pub const INACTIVE_GLYPH: char = '\u{25A1}';

/// Errors from calendar construction and date access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// A date lies outside the calendar's validity window
    #[error("date {date} is outside the calendar window {start} to {end}")]
    OutOfRange {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// The bitmask length does not match the number of days in the window
    #[error("bitmask has {actual} days but the window spans {expected}")]
    Malformed { expected: usize, actual: usize },
}

/// Signed number of days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Number of days in the inclusive window `[start, end]`, zero if inverted.
pub fn window_len(start: NaiveDate, end: NaiveDate) -> usize {
    usize::try_from(days_between(start, end) + 1).unwrap_or(0)
}

/// A named operating-day calendar over a fixed date window.
///
/// Invariant: `bits.len() == window_len(start, end)`. Calendars are values:
/// every "mutation" returns a new calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    id: String,
    name: String,
    description: String,
    start: NaiveDate,
    end: NaiveDate,
    bits: Vec<bool>,
}

impl Calendar {
    /// Create a calendar from one flag per day of `[start, end]`.
    pub fn new(
        id: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        bits: Vec<bool>,
    ) -> Result<Self, CalendarError> {
        let expected = window_len(start, end);
        if bits.len() != expected {
            return Err(CalendarError::Malformed {
                expected,
                actual: bits.len(),
            });
        }
        Ok(Self {
            id: id.into(),
            name: String::new(),
            description: String::new(),
            start,
            end,
            bits,
        })
    }

    /// Create a calendar from a `'0'`/`'1'` mask string.
    ///
    /// Any character other than `'1'` reads as a non-operating day.
    ///
    /// # Examples
    ///
    /// ```
    /// use timetable_explorer::domain::Calendar;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    /// let cal = Calendar::parse("mon_wed_fri", start, end, "10101").unwrap();
    ///
    /// assert!(cal.get_bit(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()));
    /// assert!(!cal.get_bit(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()));
    ///
    /// // Length must match the window
    /// assert!(Calendar::parse("short", start, end, "101").is_err());
    /// ```
    pub fn parse(
        id: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        mask: &str,
    ) -> Result<Self, CalendarError> {
        Self::new(id, start, end, mask.chars().map(|c| c == '1').collect())
    }

    /// Create a calendar with every day set to `value`.
    pub fn filled(id: impl Into<String>, start: NaiveDate, end: NaiveDate, value: bool) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            description: String::new(),
            start,
            end,
            bits: vec![value; window_len(start, end)],
        }
    }

    /// Create a calendar operating on `date` only.
    pub fn single_day(
        id: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        date: NaiveDate,
    ) -> Result<Self, CalendarError> {
        Self::filled(id, start, end, false).set_bit(date, true)
    }

    /// Attach a display name and description.
    pub fn with_label(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.name = name.into();
        self.description = description.into();
        self
    }

    /// Replace the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// First day of the validity window.
    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the validity window (inclusive).
    pub fn end_date(&self) -> NaiveDate {
        self.end
    }

    /// One flag per day of the window.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Number of days in the window.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns whether the calendar operates on `date`.
    ///
    /// Dates outside the window are non-operating, not an error.
    pub fn get_bit(&self, date: NaiveDate) -> bool {
        self.bit_at_offset(days_between(self.start, date))
    }

    /// Returns a copy with the flag for `date` set to `value`.
    pub fn set_bit(&self, date: NaiveDate, value: bool) -> Result<Self, CalendarError> {
        let out_of_range = || CalendarError::OutOfRange {
            date,
            start: self.start,
            end: self.end,
        };
        if date < self.start || date > self.end {
            return Err(out_of_range());
        }
        let offset = usize::try_from(days_between(self.start, date)).map_err(|_| out_of_range())?;

        let mut bits = self.bits.clone();
        *bits.get_mut(offset).ok_or_else(out_of_range)? = value;
        Ok(Self {
            bits,
            ..self.clone()
        })
    }

    /// Day-by-day OR with `other`, on this calendar's window.
    pub fn union(&self, other: &Calendar) -> Calendar {
        self.combine(other, |a, b| a || b)
    }

    /// Day-by-day AND with `other`, on this calendar's window.
    pub fn intersect(&self, other: &Calendar) -> Calendar {
        self.combine(other, |a, b| a && b)
    }

    /// Returns true if both calendars operate on at least one common date.
    pub fn intersects_with(&self, other: &Calendar) -> bool {
        let shift = self.shift_into(other);
        self.bits
            .iter()
            .enumerate()
            .any(|(i, &active)| active && other.bit_at_offset(i as i64 + shift))
    }

    /// Returns true if every date `other` operates on is also a date this
    /// calendar operates on.
    ///
    /// Only dates inside this calendar's window are examined: days `other`
    /// operates on outside of it are ignored.
    pub fn contains(&self, other: &Calendar) -> bool {
        let shift = self.shift_into(other);
        self.bits
            .iter()
            .enumerate()
            .all(|(i, &active)| active || !other.bit_at_offset(i as i64 + shift))
    }

    /// Number of operating days.
    pub fn active_days(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Returns true if the calendar operates on any day.
    pub fn any_active(&self) -> bool {
        self.bits.iter().any(|&b| b)
    }

    /// Iterates over the operating dates in ascending order.
    pub fn active_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start
            .iter_days()
            .zip(self.bits.iter())
            .filter_map(|(date, &active)| active.then_some(date))
    }

    /// First operating date, if any.
    pub fn first_active(&self) -> Option<NaiveDate> {
        self.active_dates().next()
    }

    /// Last operating date, if any.
    pub fn last_active(&self) -> Option<NaiveDate> {
        let offset = self.bits.iter().rposition(|&b| b)?;
        self.start
            .checked_add_days(chrono::Days::new(offset as u64))
    }

    /// The calendar as a `'0'`/`'1'` mask string.
    pub fn mask(&self) -> String {
        self.bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
    }

    /// Fixed-width glyph strip, one filled or hollow square per day.
    pub fn glyphs(&self) -> String {
        self.bits
            .iter()
            .map(|&b| if b { ACTIVE_GLYPH } else { INACTIVE_GLYPH })
            .collect()
    }

    /// Index shift that maps an offset in `self` onto the same date in `other`.
    fn shift_into(&self, other: &Calendar) -> i64 {
        days_between(other.start, self.start)
    }

    fn bit_at_offset(&self, offset: i64) -> bool {
        usize::try_from(offset)
            .ok()
            .and_then(|i| self.bits.get(i).copied())
            .unwrap_or(false)
    }

    fn combine(&self, other: &Calendar, op: impl Fn(bool, bool) -> bool) -> Calendar {
        let shift = self.shift_into(other);
        let bits = self
            .bits
            .iter()
            .enumerate()
            .map(|(i, &a)| op(a, other.bit_at_offset(i as i64 + shift)))
            .collect();
        Calendar {
            bits,
            ..self.clone()
        }
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.glyphs())
    }
}

/// One calendar month clipped to a validity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSpan {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Split `[start, end]` into per-month spans, clipped at both ends.
///
/// Returns an empty list for an inverted window.
pub fn month_spans(start: NaiveDate, end: NaiveDate) -> Vec<MonthSpan> {
    let mut spans = Vec::new();
    let mut from = start;

    while from <= end {
        let month_end = first_of_next_month(from)
            .and_then(|d| d.pred_opt())
            .unwrap_or(end);
        let to = month_end.min(end);
        spans.push(MonthSpan { from, to });

        match to.succ_opt() {
            Some(next) if to < end => from = next,
            _ => break,
        }
    }

    spans
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn cal(mask: &str) -> Calendar {
        Calendar::parse("c", d(1, 1), d(1, 5), mask).unwrap()
    }

    #[test]
    fn get_bit_reads_by_date() {
        let c = cal("10101");
        assert!(c.get_bit(d(1, 1)));
        assert!(!c.get_bit(d(1, 2)));
        assert!(c.get_bit(d(1, 3)));
        assert!(c.get_bit(d(1, 5)));
    }

    #[test]
    fn get_bit_outside_window_is_false() {
        let c = cal("11111");
        assert!(!c.get_bit(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
        assert!(!c.get_bit(d(1, 6)));
    }

    #[test]
    fn set_bit_returns_new_calendar() {
        let c = cal("00000");
        let updated = c.set_bit(d(1, 2), true).unwrap();
        assert_eq!(updated.mask(), "01000");
        assert_eq!(c.mask(), "00000");
        assert_eq!(updated.id(), "c");
    }

    #[test]
    fn set_bit_out_of_range() {
        let c = cal("00000");
        let err = c.set_bit(d(1, 6), true).unwrap_err();
        assert_eq!(
            err,
            CalendarError::OutOfRange {
                date: d(1, 6),
                start: d(1, 1),
                end: d(1, 5),
            }
        );
        assert_eq!(
            err.to_string(),
            "date 2024-01-06 is outside the calendar window 2024-01-01 to 2024-01-05"
        );
        assert!(c.set_bit(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(), true).is_err());
    }

    #[test]
    fn malformed_length_rejected() {
        let err = Calendar::parse("c", d(1, 1), d(1, 5), "1010").unwrap_err();
        assert_eq!(
            err,
            CalendarError::Malformed {
                expected: 5,
                actual: 4
            }
        );
    }

    #[test]
    fn union_and_intersection_same_window() {
        let a = cal("10101");
        let b = cal("01010");
        assert_eq!(a.union(&b).mask(), "11111");
        assert_eq!(a.intersect(&b).mask(), "00000");
        assert!(!a.intersects_with(&b));
    }

    #[test]
    fn alignment_uses_dates_not_indices() {
        // b starts two days later: b[0] is Jan 3
        let a = cal("00100");
        let b = Calendar::parse("b", d(1, 3), d(1, 7), "10000").unwrap();
        assert!(a.intersects_with(&b));
        assert!(b.intersects_with(&a));
        assert_eq!(a.intersect(&b).mask(), "00100");
    }

    #[test]
    fn missing_counterpart_days_are_inactive() {
        let a = cal("11111");
        let short = Calendar::parse("s", d(1, 1), d(1, 3), "111").unwrap();
        assert_eq!(a.intersect(&short).mask(), "11100");
        assert_eq!(short.union(&a).mask(), "111");
        assert_eq!(a.union(&short).start_date(), d(1, 1));
    }

    #[test]
    fn contains_checks_other_active_days() {
        let wide = cal("11110");
        let narrow = cal("01100");
        assert!(wide.contains(&narrow));
        assert!(!narrow.contains(&wide));
        assert!(wide.contains(&cal("00000")));
    }

    #[test]
    fn contains_ignores_days_outside_own_window() {
        let own = Calendar::parse("o", d(1, 1), d(1, 3), "111").unwrap();
        let other = cal("00011");
        assert!(own.contains(&other));
    }

    #[test]
    fn single_day_calendar() {
        let c = Calendar::single_day("gen", d(1, 1), d(1, 5), d(1, 4)).unwrap();
        assert_eq!(c.mask(), "00010");
        assert!(Calendar::single_day("gen", d(1, 1), d(1, 5), d(2, 1)).is_err());
    }

    #[test]
    fn statistics() {
        let c = cal("01101");
        assert_eq!(c.active_days(), 3);
        assert_eq!(c.first_active(), Some(d(1, 2)));
        assert_eq!(c.last_active(), Some(d(1, 5)));
        assert_eq!(
            c.active_dates().collect::<Vec<_>>(),
            vec![d(1, 2), d(1, 3), d(1, 5)]
        );
        assert_eq!(cal("00000").first_active(), None);
        assert_eq!(cal("00000").last_active(), None);
    }

    #[test]
    fn glyph_strip() {
        let two_days = Calendar::parse("c", d(1, 1), d(1, 2), "10").unwrap();
        assert_eq!(two_days.len(), 2);
        assert_eq!(two_days.glyphs(), "\u{25A0}\u{25A1}");
        assert_eq!(cal("10100").glyphs(), "\u{25A0}\u{25A1}\u{25A0}\u{25A1}\u{25A1}");
        assert_eq!(cal("10100").to_string(), format!("c {}", cal("10100").glyphs()));
    }

    #[test]
    fn labels() {
        let c = cal("10101").with_label("Weekdays", "Mon-Fri").with_id("wd");
        assert_eq!(c.id(), "wd");
        assert_eq!(c.name(), "Weekdays");
        assert_eq!(c.description(), "Mon-Fri");
    }

    #[test]
    fn window_len_handles_inverted_window() {
        assert_eq!(window_len(d(1, 5), d(1, 1)), 0);
        assert_eq!(window_len(d(1, 1), d(1, 1)), 1);
        assert_eq!(window_len(d(1, 1), d(12, 31)), 366);
    }

    #[test]
    fn month_spans_clip_window() {
        let spans = month_spans(d(1, 15), d(3, 10));
        assert_eq!(
            spans,
            vec![
                MonthSpan { from: d(1, 15), to: d(1, 31) },
                MonthSpan { from: d(2, 1), to: d(2, 29) },
                MonthSpan { from: d(3, 1), to: d(3, 10) },
            ]
        );
    }

    #[test]
    fn month_spans_across_year_end() {
        let start = NaiveDate::from_ymd_opt(2023, 12, 10).unwrap();
        let spans = month_spans(start, d(1, 2));
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].to, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(spans[1].from, d(1, 1));
    }

    #[test]
    fn month_spans_single_day_and_inverted() {
        assert_eq!(month_spans(d(1, 1), d(1, 1)), vec![MonthSpan { from: d(1, 1), to: d(1, 1) }]);
        assert!(month_spans(d(1, 2), d(1, 1)).is_empty());
    }
}
