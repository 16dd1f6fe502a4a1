//! Property-based tests for normalization and the cell bitset using proptest.
//!
//! These check invariants that must hold for *any* schedule, not just the
//! hand-picked cases in the other test files.

use availability_grid::{
    merge_windows, normalize_schedule, DayBits, Granularity, TimeOfDay, TimeWindow, WeekSchedule,
};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Any valid wire window at minute resolution, crossing midnight or not.
fn arb_window() -> impl Strategy<Value = TimeWindow> {
    (0u32..1440, 1u32..=1440)
        .prop_filter("zero-length", |(start, end)| start != end)
        .prop_map(|(start, end)| TimeWindow {
            start_time: TimeOfDay::from_minutes(start).unwrap(),
            end_time: TimeOfDay::from_minutes(end).unwrap(),
        })
}

fn arb_schedule() -> impl Strategy<Value = WeekSchedule> {
    prop::collection::vec((0i64..7, prop::collection::vec(arb_window(), 0..6)), 0..5).prop_map(
        |days| {
            let base = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
            days.into_iter()
                .map(|(offset, windows)| (base + Duration::days(offset), windows))
                .collect()
        },
    )
}

fn arb_granularity() -> impl Strategy<Value = Granularity> {
    prop_oneof![Just(5u32), Just(15), Just(30), Just(60)]
        .prop_map(|minutes| Granularity::new(minutes).unwrap())
}

/// Same-day windows whose ends sit on cell boundaries of `g`.
fn arb_aligned_windows(g: Granularity) -> impl Strategy<Value = Vec<TimeWindow>> {
    let cells = g.cells_per_day();
    prop::collection::vec((0..cells, 1..=cells), 0..8).prop_map(move |pairs| {
        pairs
            .into_iter()
            .filter(|(start, end)| start < end)
            .map(|(start, end)| TimeWindow {
                start_time: g.boundary(start),
                end_time: g.boundary(end),
            })
            .collect()
    })
}

fn is_canonical(windows: &[TimeWindow]) -> bool {
    windows.iter().all(|w| w.start_time < w.end_time)
        && windows.windows(2).all(|pair| pair[0].end_time < pair[1].start_time)
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn normalization_is_idempotent(schedule in arb_schedule()) {
        let once = normalize_schedule(&schedule).unwrap();
        let twice = normalize_schedule(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalized_days_are_canonical(schedule in arb_schedule()) {
        let normalized = normalize_schedule(&schedule).unwrap();
        for (date, windows) in normalized.iter() {
            prop_assert!(is_canonical(windows), "{} is not canonical: {:?}", date, windows);
        }
    }

    #[test]
    fn normalization_never_drops_input_dates(schedule in arb_schedule()) {
        let normalized = normalize_schedule(&schedule).unwrap();
        for date in schedule.dates() {
            prop_assert!(normalized.get(date).is_some());
        }
    }

    #[test]
    fn merge_preserves_coverage(windows in arb_aligned_windows(Granularity::new(1).unwrap())) {
        let g = Granularity::new(1).unwrap();
        let merged = merge_windows(&windows);
        prop_assert!(is_canonical(&merged));
        prop_assert_eq!(
            DayBits::from_windows(&merged, g),
            DayBits::from_windows(&windows, g)
        );
    }
}

// ---------------------------------------------------------------------------
// Bitset
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn canonical_windows_round_trip(
        (g, windows) in arb_granularity().prop_flat_map(|g| (Just(g), arb_aligned_windows(g)))
    ) {
        let canonical = merge_windows(&windows);
        let decoded = DayBits::from_windows(&canonical, g).to_windows();
        prop_assert_eq!(decoded, canonical);
    }

    #[test]
    fn decoded_windows_are_canonical(cells in prop::collection::vec(any::<bool>(), 96)) {
        let bits = DayBits::from_cells(&cells, Granularity::DEFAULT).unwrap();
        let windows = bits.to_windows();
        prop_assert!(is_canonical(&windows));
        prop_assert_eq!(DayBits::from_windows(&windows, Granularity::DEFAULT), bits);
    }

    #[test]
    fn drag_fill_is_one_window(from in 0usize..96, to in 0usize..96) {
        let (first, last) = (from.min(to), from.max(to));
        let g = Granularity::DEFAULT;

        let windows = DayBits::empty(g).fill(first..=last, true).to_windows();

        prop_assert_eq!(
            windows,
            vec![TimeWindow { start_time: g.boundary(first), end_time: g.boundary(last + 1) }]
        );
    }

    #[test]
    fn toggle_changes_exactly_one_cell(
        cells in prop::collection::vec(any::<bool>(), 96),
        index in 0usize..96,
        value in any::<bool>(),
    ) {
        let before = DayBits::from_cells(&cells, Granularity::DEFAULT).unwrap();
        let after = before.toggle(index, value);

        prop_assert_eq!(after.get(index), value);
        for i in (0..96).filter(|i| *i != index) {
            prop_assert_eq!(after.get(i), before.get(i));
        }
    }
}
