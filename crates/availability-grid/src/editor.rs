//! Single-editor availability session with undo/redo.
//!
//! The session holds one `DayBits` per date. Each edit replaces a day with a
//! new value and keeps the previous map as an undo snapshot, so undo and redo
//! are plain stack moves.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use tracing::trace;

use crate::bitset::{DayBits, Granularity};
use crate::error::Result;
use crate::normalizer::normalize_schedule;
use crate::schedule::WeekSchedule;

type Days = BTreeMap<NaiveDate, DayBits>;

#[derive(Debug, Clone)]
pub struct EditorSession {
    granularity: Granularity,
    days: Days,
    undo: Vec<Days>,
    redo: Vec<Days>,
}

impl EditorSession {
    /// Start a session from an arbitrary schedule.
    ///
    /// The schedule is normalized first; windows are then encoded cell by cell.
    /// Parts of a window that do not cover a whole cell are not representable
    /// and are dropped from the grid.
    pub fn from_schedule(schedule: &WeekSchedule, granularity: Granularity) -> Result<Self> {
        let days = normalize_schedule(schedule)?
            .iter()
            .map(|(date, windows)| (date, DayBits::from_windows(windows, granularity)))
            .collect();

        Ok(EditorSession {
            granularity,
            days,
            undo: Vec::new(),
            redo: Vec::new(),
        })
    }

    pub fn empty(granularity: Granularity) -> Self {
        EditorSession {
            granularity,
            days: Days::new(),
            undo: Vec::new(),
            redo: Vec::new(),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayBits> {
        self.days.get(&date)
    }

    /// Set one cell on `date`. See [`DayBits::toggle`] for the panic contract.
    pub fn toggle(&mut self, date: NaiveDate, index: usize, value: bool) {
        trace!(%date, index, value, "toggle cell");
        self.edit(date, |bits| bits.toggle(index, value));
    }

    /// Set every cell between `from` and `to` inclusive, in either direction.
    pub fn drag(&mut self, date: NaiveDate, from: usize, to: usize, value: bool) {
        let range: RangeInclusive<usize> = from.min(to)..=from.max(to);
        trace!(%date, ?range, value, "drag fill");
        self.edit(date, |bits| bits.fill(range, value));
    }

    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo.pop() {
            Some(previous) => {
                self.redo.push(std::mem::replace(&mut self.days, previous));
                true
            }
            None => false,
        }
    }

    /// Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.redo.pop() {
            Some(next) => {
                self.undo.push(std::mem::replace(&mut self.days, next));
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Current state as a canonical schedule. Days without any set cell are
    /// kept as empty entries.
    pub fn schedule(&self) -> WeekSchedule {
        self.days
            .iter()
            .map(|(date, bits)| (*date, bits.to_windows()))
            .collect()
    }

    fn edit(&mut self, date: NaiveDate, f: impl FnOnce(&DayBits) -> DayBits) {
        let current = self
            .days
            .get(&date)
            .cloned()
            .unwrap_or_else(|| DayBits::empty(self.granularity));
        let next = f(&current);

        let mut days = self.days.clone();
        days.insert(date, next);
        self.undo.push(std::mem::replace(&mut self.days, days));
        self.redo.clear();
    }
}
