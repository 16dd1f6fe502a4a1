//! `WeekSchedule` — availability windows keyed by calendar date.
//!
//! Wire format: a JSON object mapping `YYYY-MM-DD` keys to arrays of
//! `{start_time, end_time}` objects. Dates are held in an ordered map, so
//! iteration and serialization are always ascending by date regardless of the
//! order the keys arrived in.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::time::TimeWindow;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekSchedule(BTreeMap<NaiveDate, Vec<TimeWindow>>);

impl WeekSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON wire format. Malformed dates or times fail here.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns a copy with `windows` appended to the entry for `date`.
    pub fn with_windows(mut self, date: NaiveDate, windows: impl IntoIterator<Item = TimeWindow>) -> Self {
        self.0.entry(date).or_default().extend(windows);
        self
    }

    /// Returns a copy with the entry for `date` replaced.
    pub fn insert(mut self, date: NaiveDate, windows: Vec<TimeWindow>) -> Self {
        self.0.insert(date, windows);
        self
    }

    pub fn get(&self, date: NaiveDate) -> Option<&[TimeWindow]> {
        self.0.get(&date).map(Vec::as_slice)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[TimeWindow])> + '_ {
        self.0.iter().map(|(date, windows)| (*date, windows.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a copy without dates that hold no windows.
    pub fn without_empty_days(&self) -> Self {
        WeekSchedule(
            self.0
                .iter()
                .filter(|(_, windows)| !windows.is_empty())
                .map(|(date, windows)| (*date, windows.clone()))
                .collect(),
        )
    }

    /// Sum of nominal window lengths in minutes, ignoring DST.
    ///
    /// Only meaningful on a normalized schedule; overlapping windows are
    /// counted twice.
    pub fn total_minutes(&self) -> u64 {
        self.0
            .values()
            .flatten()
            .map(|w| u64::from(w.nominal_minutes()))
            .sum()
    }
}

impl From<BTreeMap<NaiveDate, Vec<TimeWindow>>> for WeekSchedule {
    fn from(map: BTreeMap<NaiveDate, Vec<TimeWindow>>) -> Self {
        WeekSchedule(map)
    }
}

impl FromIterator<(NaiveDate, Vec<TimeWindow>)> for WeekSchedule {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, Vec<TimeWindow>)>>(iter: I) -> Self {
        let mut map: BTreeMap<NaiveDate, Vec<TimeWindow>> = BTreeMap::new();
        for (date, windows) in iter {
            map.entry(date).or_default().extend(windows);
        }
        WeekSchedule(map)
    }
}
