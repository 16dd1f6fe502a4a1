//! # availability-grid
//!
//! Weekly availability normalization and a per-day cell bitset for calendar editors.
//!
//! An instructor edits availability as clickable time cells, while everything
//! downstream reasons about canonical, non-overlapping time windows. This crate
//! keeps the three representations in agreement:
//!
//! - arbitrary, possibly overlapping `{start_time, end_time}` windows as entered,
//! - a canonical, merged, sorted window list per calendar date,
//! - a dense per-day bitset at a fixed [`Granularity`] for O(1) cell toggling.
//!
//! ## Quick start
//!
//! ```rust
//! use availability_grid::{normalize_schedule, DayBits, Granularity, WeekSchedule};
//!
//! let schedule = WeekSchedule::from_json(
//!     r#"{"2024-03-09":[{"start_time":"10:00:00","end_time":"11:30:00"},
//!                       {"start_time":"09:00:00","end_time":"10:00:00"}]}"#,
//! )
//! .unwrap();
//! let canonical = normalize_schedule(&schedule).unwrap();
//! let day = canonical.get("2024-03-09".parse().unwrap()).unwrap();
//! assert_eq!(day.len(), 1);
//!
//! let g = Granularity::DEFAULT;
//! let bits = DayBits::from_windows(day, g).toggle(g.idx(12, 0).unwrap(), true);
//! assert_eq!(bits.to_windows().len(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`time`] — `TimeOfDay` and `TimeWindow` wire types
//! - [`schedule`] — `WeekSchedule`, an ordered date → windows map
//! - [`normalizer`] — midnight split, sort and merge into canonical form
//! - [`segments`] — DST-aware minute offsets and elapsed durations
//! - [`bitset`] — `DayBits` cell grid and `Granularity`
//! - [`editor`] — single-editor session with undo/redo snapshots
//! - [`error`] — Error types

pub mod bitset;
pub mod editor;
pub mod error;
pub mod normalizer;
pub mod schedule;
pub mod segments;
pub mod time;

pub use bitset::{from_windows, idx, new_empty_bits, DayBits, Granularity};
pub use editor::EditorSession;
pub use error::GridError;
pub use normalizer::{merge_windows, normalize_schedule, split_at_midnight};
pub use schedule::WeekSchedule;
pub use segments::{
    build_day_segments, build_day_segments_in, build_local_day_segments, schedule_segments,
    DaySegment,
};
pub use time::{TimeOfDay, TimeWindow};
