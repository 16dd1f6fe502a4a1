//! Per-day availability as a packed bitset of fixed-width time cells.
//!
//! A day is divided into `1440 / granularity` cells. Cell `i` covers the
//! half-open interval `[i * g, (i + 1) * g)` minutes and is set iff that whole
//! interval lies inside some availability window. The editor toggles cells,
//! and [`DayBits::to_windows`] reads canonical windows back out, so the grid
//! and the window list cannot diverge.
//!
//! Every operation returns a new `DayBits`; earlier values stay valid as undo
//! snapshots.

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::{GridError, Result};
use crate::time::{TimeOfDay, TimeWindow};

const MINUTES_PER_DAY: u32 = 24 * 60;
const WORD_BITS: usize = u64::BITS as usize;

/// Width of one cell in minutes. Always divides a day evenly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Granularity(u32);

impl Granularity {
    /// Fifteen-minute cells, 96 per day.
    pub const DEFAULT: Granularity = Granularity(15);

    /// # Errors
    /// Returns `GridError::InvalidGranularity` if `minutes` is zero or does not
    /// divide 1440.
    pub fn new(minutes: u32) -> Result<Self> {
        if minutes == 0 || MINUTES_PER_DAY % minutes != 0 {
            return Err(GridError::InvalidGranularity(minutes));
        }
        Ok(Granularity(minutes))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn cells_per_day(self) -> usize {
        (MINUTES_PER_DAY / self.0) as usize
    }

    /// Index of the cell starting at `hour:minute`.
    ///
    /// Times that do not fall on a cell boundary are rejected rather than
    /// rounded, so a caller can never edit a cell it did not name.
    ///
    /// # Errors
    /// Returns `GridError::InvalidTimeOfDay` if `hour >= 24` or `minute >= 60`,
    /// and `GridError::MisalignedTime` if the time is not on a cell boundary.
    pub fn idx(self, hour: u32, minute: u32) -> Result<usize> {
        if hour >= 24 || minute >= 60 {
            return Err(GridError::InvalidTimeOfDay(format!("{:02}:{:02}", hour, minute)));
        }
        let minute_of_day = hour * 60 + minute;
        if minute_of_day % self.0 != 0 {
            return Err(GridError::MisalignedTime {
                hour,
                minute,
                granularity: self.0,
            });
        }
        Ok((minute_of_day / self.0) as usize)
    }

    /// Start time of cell `index`; `cells_per_day()` maps to `24:00:00`.
    pub fn boundary(self, index: usize) -> TimeOfDay {
        TimeOfDay::from_grid_minutes(index as u32 * self.0)
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// [`Granularity::idx`] at the default granularity.
pub fn idx(hour: u32, minute: u32) -> Result<usize> {
    Granularity::DEFAULT.idx(hour, minute)
}

/// [`DayBits::empty`] at the default granularity.
pub fn new_empty_bits() -> DayBits {
    DayBits::empty(Granularity::DEFAULT)
}

/// [`DayBits::from_windows`] at the default granularity.
pub fn from_windows(windows: &[TimeWindow]) -> DayBits {
    DayBits::from_windows(windows, Granularity::DEFAULT)
}

/// One calendar day of availability cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DayBits {
    words: Box<[u64]>,
    granularity: Granularity,
}

impl DayBits {
    /// All cells clear.
    pub fn empty(granularity: Granularity) -> Self {
        let words = granularity.cells_per_day().div_ceil(WORD_BITS);
        DayBits {
            words: vec![0u64; words].into_boxed_slice(),
            granularity,
        }
    }

    /// Set every cell whose interval is fully covered by one of `windows`.
    ///
    /// Partially covered cells stay clear. A midnight-crossing window covers
    /// this day from its start through `24:00:00`.
    ///
    /// `windows` must be valid (see [`TimeWindow::validate`]); a zero-length
    /// window would otherwise read as crossing midnight.
    pub fn from_windows(windows: &[TimeWindow], granularity: Granularity) -> Self {
        let mut bits = Self::empty(granularity);
        let cell_seconds = granularity.minutes() * 60;

        for window in windows {
            debug_assert!(window.validate().is_ok(), "invalid window {:?}", window);
            let start = window.start_time.seconds();
            let end = if window.crosses_midnight() {
                TimeOfDay::END_OF_DAY.seconds()
            } else {
                window.end_time.seconds()
            };

            let first = start.div_ceil(cell_seconds) as usize;
            let last = (end / cell_seconds) as usize;
            for index in first..last {
                bits.set(index, true);
            }
        }

        bits
    }

    /// Build from one flag per cell.
    ///
    /// # Errors
    /// Returns `GridError::CellCountMismatch` unless `cells` holds exactly one
    /// day's worth of cells.
    pub fn from_cells(cells: &[bool], granularity: Granularity) -> Result<Self> {
        let expected = granularity.cells_per_day();
        if cells.len() != expected {
            return Err(GridError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }

        let mut bits = Self::empty(granularity);
        for (index, _) in cells.iter().enumerate().filter(|(_, set)| **set) {
            bits.set(index, true);
        }
        Ok(bits)
    }

    /// Decode maximal runs of set cells into windows.
    ///
    /// Output is sorted and merged by construction: two windows are always
    /// separated by at least one clear cell.
    pub fn to_windows(&self) -> Vec<TimeWindow> {
        let mut windows = Vec::new();
        let mut run_start: Option<usize> = None;

        for (index, set) in self.iter().enumerate() {
            match (set, run_start) {
                (true, None) => run_start = Some(index),
                (false, Some(start)) => {
                    windows.push(self.window(start, index));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            windows.push(self.window(start, self.len()));
        }

        windows
    }

    /// Copy with cell `index` set to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`. Valid indices come from
    /// [`Granularity::idx`].
    pub fn toggle(&self, index: usize, value: bool) -> Self {
        let mut next = self.clone();
        next.set(index, value);
        next
    }

    /// Copy with every cell in `range` set to `value`, one toggle per cell, as
    /// a mouse drag across rows would produce.
    ///
    /// # Panics
    ///
    /// Panics if the range reaches past the last cell.
    pub fn fill(&self, range: RangeInclusive<usize>, value: bool) -> Self {
        range.fold(self.clone(), |bits, index| bits.toggle(index, value))
    }

    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn get(&self, index: usize) -> bool {
        self.check_bounds(index);
        self.words[index / WORD_BITS] & (1u64 << (index % WORD_BITS)) != 0
    }

    pub fn len(&self) -> usize {
        self.granularity.cells_per_day()
    }

    /// A day always has cells; this reports whether none of them are set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    pub fn count_set(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Total minutes covered by set cells.
    pub fn covered_minutes(&self) -> u32 {
        self.count_set() as u32 * self.granularity.minutes()
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(move |index| self.get(index))
    }

    fn set(&mut self, index: usize, value: bool) {
        self.check_bounds(index);
        let mask = 1u64 << (index % WORD_BITS);
        if value {
            self.words[index / WORD_BITS] |= mask;
        } else {
            self.words[index / WORD_BITS] &= !mask;
        }
    }

    fn check_bounds(&self, index: usize) {
        assert!(
            index < self.len(),
            "cell index {} out of range for {} cells",
            index,
            self.len()
        );
    }

    fn window(&self, start: usize, end: usize) -> TimeWindow {
        TimeWindow {
            start_time: self.granularity.boundary(start),
            end_time: self.granularity.boundary(end),
        }
    }
}

impl fmt::Display for DayBits {
    /// One character per cell: `#` set, `.` clear.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for set in self.iter() {
            f.write_str(if set { "#" } else { "." })?;
        }
        Ok(())
    }
}
