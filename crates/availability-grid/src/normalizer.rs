//! Canonicalize a `WeekSchedule`.
//!
//! Midnight-crossing windows are split at `24:00:00`, then each date's windows
//! are sorted by start time and swept into maximal merged runs. Adjacent
//! windows (one ends exactly where the next starts) merge; any gap, even one
//! second, keeps them apart.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{GridError, Result};
use crate::schedule::WeekSchedule;
use crate::time::{TimeOfDay, TimeWindow};

/// Normalize every date of `schedule` into canonical form.
///
/// The result holds, per date, windows that are sorted ascending, non-overlapping
/// and never adjacent. Dates present in the input are kept even if they end up
/// empty; a date that only receives the tail of a midnight-crossing window is
/// created.
///
/// # Errors
/// Returns `GridError::SentinelAsStart` if a window starts at `24:00:00`,
/// `GridError::ZeroLengthWindow` if a window starts where it ends, and
/// `GridError::DateOutOfRange` if a window crosses midnight on the last
/// representable date.
pub fn normalize_schedule(schedule: &WeekSchedule) -> Result<WeekSchedule> {
    let mut days: BTreeMap<NaiveDate, Vec<TimeWindow>> = BTreeMap::new();

    for (date, windows) in schedule.iter() {
        days.entry(date).or_default();

        for window in windows {
            window.validate().map_err(|e| e.on_date(date))?;

            let (head, tail) = split_at_midnight(*window);
            days.entry(date).or_default().push(head);

            if let Some(tail) = tail {
                let next = date.succ_opt().ok_or(GridError::DateOutOfRange(date))?;
                days.entry(next).or_default().push(tail);
            }
        }
    }

    let normalized: BTreeMap<NaiveDate, Vec<TimeWindow>> = days
        .into_iter()
        .map(|(date, windows)| {
            let merged = merge_windows(&windows);
            debug!(%date, input = windows.len(), output = merged.len(), "normalized day");
            (date, merged)
        })
        .collect();

    Ok(WeekSchedule::from(normalized))
}

/// Split a midnight-crossing window into its same-day head and next-day tail.
///
/// Windows with `start < end` (including those ending at `24:00:00`) come back
/// unchanged with no tail. A crossing window that ends exactly at `00:00:00`
/// has nothing left on the next day, so it also has no tail.
pub fn split_at_midnight(window: TimeWindow) -> (TimeWindow, Option<TimeWindow>) {
    if !window.crosses_midnight() {
        return (window, None);
    }

    let head = TimeWindow {
        start_time: window.start_time,
        end_time: TimeOfDay::END_OF_DAY,
    };
    let tail = (window.end_time > TimeOfDay::MIDNIGHT).then_some(TimeWindow {
        start_time: TimeOfDay::MIDNIGHT,
        end_time: window.end_time,
    });

    (head, tail)
}

/// Sort same-day windows by start time and merge overlapping or adjacent ones.
///
/// Windows fully contained in an earlier window are absorbed; coverage never
/// shrinks. Input windows are expected to satisfy `start < end`.
pub fn merge_windows(windows: &[TimeWindow]) -> Vec<TimeWindow> {
    let mut sorted = windows.to_vec();
    sorted.sort_by_key(|w| (w.start_time, w.end_time));

    let mut merged: Vec<TimeWindow> = Vec::with_capacity(sorted.len());
    for window in sorted {
        if let Some(last) = merged.last_mut() {
            if window.start_time <= last.end_time {
                last.end_time = last.end_time.max(window.end_time);
                continue;
            }
        }
        merged.push(window);
    }

    merged
}
