//! DST-aware day segments.
//!
//! Turns the windows of one calendar date into naive minute offsets plus the
//! real elapsed duration between the local start and end instants. On a
//! spring-forward date a window spanning the skipped hour is shorter than its
//! nominal length; on a fall-back date a window spanning the repeated hour is
//! longer.
//!
//! Local times are resolved the way browsers resolve them:
//! - ambiguous (repeated) times take the earlier instant,
//! - non-existent (skipped) times are pushed forward by the length of the gap.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::schedule::WeekSchedule;
use crate::time::{TimeOfDay, TimeWindow};

/// One window placed on a concrete date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySegment {
    pub date: NaiveDate,
    /// Minutes from the date's midnight to the window start.
    pub start_minutes: u32,
    /// Minutes from the date's midnight to the window end. `24:00:00` is 1440;
    /// a midnight-crossing window ends past 1440.
    pub end_minutes: u32,
    /// Wall-clock time that actually elapses between start and end.
    ///
    /// Signed because it is a difference of instants (`TimeDelta::num_minutes`),
    /// unlike the offsets above. Never negative for a valid window.
    pub duration_minutes: i64,
}

/// Build one segment per window on `date`, measured in `tz`.
///
/// Windows are not merged; each input window yields exactly one segment.
///
/// # Errors
/// Returns `GridError::SentinelAsStart` or `GridError::ZeroLengthWindow` for an
/// invalid window, and `GridError::DateOutOfRange` if a window ends past the
/// last representable date.
pub fn build_day_segments<Z: TimeZone>(
    date: NaiveDate,
    windows: &[TimeWindow],
    tz: &Z,
) -> Result<Vec<DaySegment>> {
    windows
        .iter()
        .map(|window| build_segment(date, window, tz))
        .collect()
}

/// Like [`build_day_segments`], with the timezone given as an IANA name.
///
/// # Errors
/// Returns `GridError::InvalidTimezone` if `timezone` is not a valid IANA
/// identifier, plus the errors of [`build_day_segments`].
pub fn build_day_segments_in(
    date: NaiveDate,
    windows: &[TimeWindow],
    timezone: &str,
) -> Result<Vec<DaySegment>> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| GridError::InvalidTimezone(timezone.to_string()))?;
    build_day_segments(date, windows, &tz)
}

/// Like [`build_day_segments`], measured in the host's local time.
pub fn build_local_day_segments(
    date: NaiveDate,
    windows: &[TimeWindow],
) -> Result<Vec<DaySegment>> {
    build_day_segments(date, windows, &Local)
}

/// Segments for every date of `schedule`, in ascending date order.
pub fn schedule_segments<Z: TimeZone>(schedule: &WeekSchedule, tz: &Z) -> Result<Vec<DaySegment>> {
    let mut segments = Vec::new();
    for (date, windows) in schedule.iter() {
        segments.extend(build_day_segments(date, windows, tz)?);
    }
    Ok(segments)
}

fn build_segment<Z: TimeZone>(date: NaiveDate, window: &TimeWindow, tz: &Z) -> Result<DaySegment> {
    window.validate().map_err(|e| e.on_date(date))?;

    let start_minutes = window.start_time.minutes();
    let (end_date, end_minutes) = if window.crosses_midnight() {
        let next = date.succ_opt().ok_or(GridError::DateOutOfRange(date))?;
        (next, window.end_time.minutes() + 24 * 60)
    } else {
        (date, window.end_time.minutes())
    };

    let start = resolve_instant(tz, local_datetime(date, window.start_time)?)?;
    let end = resolve_instant(tz, local_datetime(end_date, window.end_time)?)?;

    Ok(DaySegment {
        date,
        start_minutes,
        end_minutes,
        duration_minutes: (end - start).num_minutes(),
    })
}

/// Naive wall-clock datetime for `time` on `date`; `24:00:00` rolls to the
/// next date's midnight.
fn local_datetime(date: NaiveDate, time: TimeOfDay) -> Result<NaiveDateTime> {
    date.and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::seconds(i64::from(time.seconds())))
        .ok_or(GridError::DateOutOfRange(date))
}

/// Map a local wall-clock time to its UTC instant.
fn resolve_instant<Z: TimeZone>(tz: &Z, local: NaiveDateTime) -> Result<NaiveDateTime> {
    if let Some(dt) = tz.from_local_datetime(&local).earliest() {
        return Ok(dt.naive_utc());
    }

    // Inside a gap: apply the offset in force before the transition, which
    // lands the same distance past the gap as the time was into it.
    let offset_seconds = local
        .checked_sub_signed(Duration::days(1))
        .and_then(|before| tz.offset_from_local_datetime(&before).earliest())
        .map(|o| o.fix().local_minus_utc())
        .unwrap_or(0);
    local
        .checked_sub_signed(Duration::seconds(i64::from(offset_seconds)))
        .ok_or(GridError::DateOutOfRange(local.date()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;

    #[test]
    fn gap_time_shifts_forward() {
        // 02:30 does not exist on 2024-03-10 in New York; it reads as 03:30 EDT.
        let local = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap();
        assert_eq!(resolve_instant(&New_York, local).unwrap(), expected);
    }

    #[test]
    fn ambiguous_time_takes_earlier_instant() {
        // 01:30 happens twice on 2024-11-03; the first is EDT (UTC-4).
        let local = NaiveDate::from_ymd_opt(2024, 11, 3)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 11, 3)
            .unwrap()
            .and_hms_opt(5, 30, 0)
            .unwrap();
        assert_eq!(resolve_instant(&New_York, local).unwrap(), expected);
    }

    #[test]
    fn end_of_day_rolls_to_next_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            local_datetime(date, TimeOfDay::END_OF_DAY).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 10)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn end_of_day_on_last_date_is_out_of_range() {
        let end = TimeWindow::parse("09:00:00", "24:00:00").unwrap();
        let err = build_day_segments(NaiveDate::MAX, &[end], &chrono::Utc).unwrap_err();
        assert!(matches!(err, GridError::DateOutOfRange(d) if d == NaiveDate::MAX));

        let crossing = TimeWindow::parse("23:00:00", "01:00:00").unwrap();
        let err = build_day_segments(NaiveDate::MAX, &[crossing], &chrono::Utc).unwrap_err();
        assert!(matches!(err, GridError::DateOutOfRange(_)));
    }
}
