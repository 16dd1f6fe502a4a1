//! Tests for the editing session: toggles, drags, undo and redo.

use availability_grid::{EditorSession, Granularity, TimeWindow, WeekSchedule};
use chrono::NaiveDate;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn w(start: &str, end: &str) -> TimeWindow {
    TimeWindow::parse(start, end).unwrap()
}

fn session() -> EditorSession {
    let schedule = WeekSchedule::from_json(
        r#"{
            "2024-03-11": [
                {"start_time": "10:00:00", "end_time": "11:00:00"},
                {"start_time": "09:00:00", "end_time": "10:00:00"}
            ],
            "2024-03-12": [
                {"start_time": "23:00:00", "end_time": "01:00:00"}
            ]
        }"#,
    )
    .unwrap();
    EditorSession::from_schedule(&schedule, Granularity::DEFAULT).unwrap()
}

#[test]
fn session_starts_from_normalized_schedule() {
    let session = session();
    let schedule = session.schedule();

    assert_eq!(schedule.get(date("2024-03-11")).unwrap(), &[w("09:00:00", "11:00:00")]);
    assert_eq!(schedule.get(date("2024-03-12")).unwrap(), &[w("23:00:00", "24:00:00")]);
    assert_eq!(schedule.get(date("2024-03-13")).unwrap(), &[w("00:00:00", "01:00:00")]);
    assert!(!session.can_undo());
}

#[test]
fn toggle_updates_only_that_day() {
    let mut session = session();
    let g = session.granularity();

    session.toggle(date("2024-03-11"), g.idx(11, 0).unwrap(), true);

    let schedule = session.schedule();
    assert_eq!(schedule.get(date("2024-03-11")).unwrap(), &[w("09:00:00", "11:15:00")]);
    assert_eq!(schedule.get(date("2024-03-12")).unwrap(), &[w("23:00:00", "24:00:00")]);
}

#[test]
fn drag_works_in_either_direction() {
    let g = Granularity::new(30).unwrap();
    let mut forward = EditorSession::empty(g);
    let mut backward = EditorSession::empty(g);
    let from = g.idx(8, 0).unwrap();
    let to = g.idx(11, 0).unwrap();

    forward.drag(date("2024-03-11"), from, to, true);
    backward.drag(date("2024-03-11"), to, from, true);

    assert_eq!(forward.schedule(), backward.schedule());
    assert_eq!(
        forward.schedule().get(date("2024-03-11")).unwrap(),
        &[w("08:00:00", "11:30:00")]
    );
}

#[test]
fn editing_a_new_date_creates_it() {
    let mut session = EditorSession::empty(Granularity::DEFAULT);
    assert!(session.day(date("2024-03-14")).is_none());

    session.toggle(date("2024-03-14"), 0, true);

    assert_eq!(session.day(date("2024-03-14")).unwrap().count_set(), 1);
}

#[test]
fn undo_and_redo_walk_snapshots() {
    let mut session = session();
    let original = session.schedule();
    let g = session.granularity();

    session.drag(date("2024-03-11"), g.idx(12, 0).unwrap(), g.idx(12, 45).unwrap(), true);
    let edited = session.schedule();
    assert_ne!(edited, original);

    assert!(session.undo());
    assert_eq!(session.schedule(), original);
    assert!(!session.undo());

    assert!(session.redo());
    assert_eq!(session.schedule(), edited);
    assert!(!session.redo());
}

#[test]
fn new_edit_discards_redo_history() {
    let mut session = session();
    session.toggle(date("2024-03-11"), 0, true);
    session.undo();
    assert!(session.can_redo());

    session.toggle(date("2024-03-11"), 1, true);

    assert!(!session.can_redo());
    assert!(session.can_undo());
}

#[test]
fn clearing_every_cell_keeps_an_empty_day() {
    let mut session = session();
    let g = session.granularity();

    session.drag(date("2024-03-11"), g.idx(9, 0).unwrap(), g.idx(10, 45).unwrap(), false);

    let schedule = session.schedule();
    assert!(schedule.get(date("2024-03-11")).unwrap().is_empty());
    assert_eq!(schedule.without_empty_days().len(), 2);
}
