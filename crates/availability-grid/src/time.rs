//! Wall-clock times and same-day time windows, in their `HH:MM:SS` wire form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{GridError, Result};

const SECONDS_PER_DAY: u32 = 86_400;

/// A wall-clock time within one calendar day, `00:00:00` through `24:00:00`.
///
/// `24:00:00` means "end of day", not midnight of the following date. Ordering
/// follows elapsed seconds, which matches the lexicographic order of the
/// zero-padded wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(SECONDS_PER_DAY);

    /// Build a time from its fields.
    ///
    /// # Errors
    /// Returns `GridError::InvalidTimeOfDay` when hour exceeds 24, minute or
    /// second exceeds 59, or hour is 24 with non-zero minutes or seconds.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Result<Self> {
        if hour > 24 || minute > 59 || second > 59 || (hour == 24 && (minute, second) != (0, 0)) {
            return Err(GridError::InvalidTimeOfDay(format!(
                "{:02}:{:02}:{:02}",
                hour, minute, second
            )));
        }
        Ok(TimeOfDay(hour * 3600 + minute * 60 + second))
    }

    /// Build a time from a minute-of-day offset (`0..=1440`).
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes > SECONDS_PER_DAY / 60 {
            return Err(GridError::InvalidTimeOfDay(format!("{} minutes", minutes)));
        }
        Ok(TimeOfDay(minutes * 60))
    }

    /// Grid boundaries are always within `0..=1440` minutes.
    pub(crate) fn from_grid_minutes(minutes: u32) -> Self {
        debug_assert!(minutes <= SECONDS_PER_DAY / 60);
        TimeOfDay(minutes * 60)
    }

    /// Seconds elapsed since midnight.
    pub fn seconds(self) -> u32 {
        self.0
    }

    /// Whole minutes elapsed since midnight (seconds are truncated).
    pub fn minutes(self) -> u32 {
        self.0 / 60
    }

    pub fn hms(self) -> (u32, u32, u32) {
        (self.0 / 3600, self.0 / 60 % 60, self.0 % 60)
    }

    pub fn is_end_of_day(self) -> bool {
        self == Self::END_OF_DAY
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.hms();
        write!(f, "{:02}:{:02}:{:02}", h, m, s)
    }
}

impl FromStr for TimeOfDay {
    type Err = GridError;

    /// Parse a strict, zero-padded `HH:MM:SS` string. No partial repair is
    /// attempted: `9:00:00`, `09:00` and `09:00:00Z` are all rejected.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || GridError::InvalidTimeOfDay(s.to_string());

        let fields: Vec<&str> = s.split(':').collect();
        if fields.len() != 3 {
            return Err(invalid());
        }

        let mut parsed = [0u32; 3];
        for (slot, field) in parsed.iter_mut().zip(&fields) {
            if field.len() != 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = field.parse().map_err(|_| invalid())?;
        }

        TimeOfDay::from_hms(parsed[0], parsed[1], parsed[2]).map_err(|_| invalid())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A half-open interval `[start_time, end_time)` on one calendar date.
///
/// A window whose end is not after its start crosses midnight: it runs from
/// `start_time` to the end of the date and continues on the next date until
/// `end_time`. The normalizer splits such windows; canonical windows always
/// satisfy `start_time < end_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl TimeWindow {
    /// Build a validated window (see [`TimeWindow::validate`]).
    pub fn new(start_time: TimeOfDay, end_time: TimeOfDay) -> Result<Self> {
        let window = TimeWindow {
            start_time,
            end_time,
        };
        window.validate()?;
        Ok(window)
    }

    /// Parse both ends from `HH:MM:SS` strings and validate.
    pub fn parse(start_time: &str, end_time: &str) -> Result<Self> {
        TimeWindow::new(start_time.parse()?, end_time.parse()?)
    }

    /// Reject windows that no date can hold: a `24:00:00` start, or a start
    /// equal to the end.
    ///
    /// Reversed windows are valid; they cross midnight.
    pub fn validate(&self) -> Result<()> {
        if self.start_time.is_end_of_day() {
            return Err(GridError::SentinelAsStart);
        }
        if self.start_time == self.end_time {
            return Err(GridError::ZeroLengthWindow {
                date: None,
                time: self.start_time,
            });
        }
        Ok(())
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end_time <= self.start_time
    }

    /// Whether `other` lies entirely within this same-day window.
    pub fn contains(&self, other: &TimeWindow) -> bool {
        self.start_time <= other.start_time && other.end_time <= self.end_time
    }

    /// `end - start` in whole minutes for a same-day window, ignoring DST.
    ///
    /// Midnight-crossing windows count through to `end_time` on the next date.
    pub fn nominal_minutes(&self) -> u32 {
        if self.crosses_midnight() {
            (SECONDS_PER_DAY - self.start_time.seconds() + self.end_time.seconds()) / 60
        } else {
            (self.end_time.seconds() - self.start_time.seconds()) / 60
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start_time, self.end_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_zero_padded() {
        let t: TimeOfDay = "09:05:07".parse().unwrap();
        assert_eq!(t.hms(), (9, 5, 7));
        assert_eq!(t.to_string(), "09:05:07");
    }

    #[test]
    fn end_of_day_is_only_exact_24() {
        assert_eq!("24:00:00".parse::<TimeOfDay>().unwrap(), TimeOfDay::END_OF_DAY);
        assert!("24:00:01".parse::<TimeOfDay>().is_err());
        assert!("24:30:00".parse::<TimeOfDay>().is_err());
        assert!("25:00:00".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn rejects_loose_formats() {
        for bad in ["9:00:00", "09:00", "09:60:00", "09:00:60", "ab:cd:ef", "09:00:00Z", ""] {
            assert!(bad.parse::<TimeOfDay>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn ordering_matches_wire_order() {
        let a: TimeOfDay = "08:00:00".parse().unwrap();
        let b: TimeOfDay = "20:00:00".parse().unwrap();
        assert!(a < b);
        assert!(b < TimeOfDay::END_OF_DAY);
    }

    #[test]
    fn nominal_minutes_across_midnight() {
        let w = TimeWindow::parse("23:30:00", "01:00:00").unwrap();
        assert!(w.crosses_midnight());
        assert_eq!(w.nominal_minutes(), 90);
    }
}
