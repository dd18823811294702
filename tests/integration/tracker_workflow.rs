use chrono::NaiveDate;
use habit_streak::*;
use tempfile::TempDir;

fn start() -> Day {
    NaiveDate::from_ymd_opt(2024, 1, 29).unwrap()
}

fn open(dir: &TempDir) -> SqliteStorage {
    SqliteStorage::new(dir.path().join("habits.db")).expect("open database")
}

fn tracker<'a>(dir: &TempDir, clock: &'a FixedClock) -> HabitTracker<SqliteStorage, &'a FixedClock> {
    HabitTracker::new(open(dir), clock, Calendar::utc(), OwnerId::new("local").unwrap())
}

#[test]
fn test_week_of_habit_tracking_survives_restart() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at_day(start());

    let habit_id = {
        let tracker = tracker(&dir, &clock);
        let habit = tracker.create_habit("Meditate", None).unwrap();

        for day in 0..5 {
            clock.set_day(shift_days(start(), day));
            if day != 2 {
                tracker.toggle_completion(&habit.id, tracker.today()).unwrap();
            }
        }
        habit.id
    };

    // reopen the same file a day later
    clock.advance_days(1);
    let tracker = tracker(&dir, &clock);
    let habits = tracker.load_habits().unwrap();
    assert_eq!(habits.len(), 1);

    let habit = &habits[0];
    assert_eq!(habit.id, habit_id);
    assert_eq!(habit.completions.len(), 5);
    assert!(!habit.is_completed_on(shift_days(start(), 2)));
    assert_eq!(habit.current_streak, 2);
    assert_eq!(habit.best_streak, 2);
    assert_eq!(habit.last_completed, Some(shift_days(start(), 4)));

    let stats = tracker.statistics(&habit_id).unwrap();
    assert_eq!(stats.completed_days, 4);
    assert_eq!(stats.total_days, 5);
    assert_eq!(stats.success_rate, 80);
}

#[test]
fn test_gap_in_usage_is_backfilled_and_saved() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at_day(start());
    let tracker = tracker(&dir, &clock);
    let habit = tracker.create_habit("Stretch", Some(Swatch::Purple)).unwrap();
    tracker.toggle_completion(&habit.id, start()).unwrap();

    clock.advance_days(10);
    let loaded = tracker.load_habits().unwrap();
    assert_eq!(loaded[0].completions.len(), 10);
    assert_eq!(loaded[0].current_streak, 0);
    assert_eq!(loaded[0].best_streak, 1);

    let stored = open(&dir).get_habit(&habit.id).unwrap();
    assert_eq!(stored.completions, loaded[0].completions);
    assert_eq!(stored.current_streak, 0);
}

#[test]
fn test_overall_counters() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at_day(start());
    let tracker = tracker(&dir, &clock);

    let read = tracker.create_habit("Read", None).unwrap();
    let walk = tracker.create_habit("Walk", None).unwrap();
    assert_eq!(read.color, Swatch::Green);
    assert_eq!(walk.color, Swatch::Blue);

    clock.advance_days(2);
    for offset in [-2, -1, 0] {
        tracker.toggle_completion(&read.id, shift_days(tracker.today(), offset)).unwrap();
    }
    tracker.toggle_completion(&walk.id, tracker.today()).unwrap();

    let stats = tracker.stats().unwrap();
    assert_eq!(stats.total_habits, 2);
    assert_eq!(stats.total_completions, 4);
    // read: 3 of 3 recorded, walk: 1 of 3 recorded
    assert_eq!(stats.avg_success_rate, 67);
    assert_eq!(stats.best_streak, 3);
}

#[test]
fn test_rename_delete_and_history_cleanup() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at_day(start());
    let tracker = tracker(&dir, &clock);

    let habit = tracker.create_habit("Jog", None).unwrap();
    tracker.toggle_completion(&habit.id, start()).unwrap();

    let renamed = tracker
        .update_details(&habit.id, Some("Evening jog"), Some(Swatch::Yellow))
        .unwrap();
    assert_eq!(renamed.name, "Evening jog");
    assert_eq!(renamed.current_streak, 1);

    tracker.delete_habit(&habit.id).unwrap();
    assert!(tracker.load_habits().unwrap().is_empty());
    assert!(matches!(
        tracker.storage().get_habit(&habit.id),
        Err(StorageError::HabitNotFound { .. })
    ));
    assert!(matches!(
        tracker.toggle_completion(&habit.id, start()),
        Err(TrackerError::HabitNotFound { .. })
    ));
}

#[test]
fn test_day_boundary_follows_calendar_offset() {
    let dir = TempDir::new().unwrap();
    // 12:00 UTC is already the next day at UTC+13
    let clock = FixedClock::at_day(start());
    let tracker = HabitTracker::new(
        open(&dir),
        &clock,
        Calendar::with_offset_minutes(13 * 60).unwrap(),
        OwnerId::new("local").unwrap(),
    );

    assert_eq!(tracker.today(), shift_days(start(), 1));
    let habit = tracker.create_habit("Journal", None).unwrap();
    assert_eq!(habit.created_on, shift_days(start(), 1));
}

#[test]
fn test_observers_see_changes() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at_day(start());
    let tracker = tracker(&dir, &clock);
    let mut updates = tracker.subscribe();

    let habit = tracker.create_habit("Read", None).unwrap();
    tokio_test::block_on(updates.changed()).unwrap();
    assert_eq!(updates.borrow_and_update().stats.total_habits, 1);

    tracker.toggle_completion(&habit.id, start()).unwrap();
    tokio_test::block_on(updates.changed()).unwrap();
    let snapshot = updates.borrow_and_update().clone();
    assert_eq!(snapshot.habits[0].current_streak, 1);
    assert_eq!(snapshot.stats.best_streak, 1);
}

#[test]
fn test_reopened_tracker_publishes_whole_list_on_first_toggle() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::at_day(start());
    let walk = {
        let tracker = tracker(&dir, &clock);
        tracker.create_habit("Read", None).unwrap();
        let walk = tracker.create_habit("Walk", None).unwrap();
        tracker.create_habit("Floss", None).unwrap();
        walk
    };

    let tracker = tracker(&dir, &clock);
    let mut updates = tracker.subscribe();
    tracker.toggle_completion(&walk.id, start()).unwrap();

    tokio_test::block_on(updates.changed()).unwrap();
    let snapshot = updates.borrow_and_update().clone();
    assert_eq!(snapshot.habits.len(), 3);
    assert_eq!(snapshot.stats.total_habits, 3);
    assert!(snapshot.habits.iter().any(|h| h.id == walk.id && h.current_streak == 1));
}
