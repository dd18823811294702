use chrono::{Datelike, NaiveDate};
use habit_streak::*;

fn day(d: u32) -> Day {
    NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
}

fn new_habit(name: &str) -> Result<Habit, DomainError> {
    Habit::new(OwnerId::new("tester").unwrap(), name.to_string(), Swatch::Green, day(1))
}

#[test]
fn test_habit_creation() {
    let habit = new_habit("  Morning run  ").unwrap();
    assert_eq!(habit.name, "Morning run");
    assert_eq!(habit.streak(), Streak::default());
    assert!(habit.completions.is_empty());
    assert_eq!(habit.last_completed, None);
}

#[test]
fn test_habit_name_validation() {
    assert!(matches!(new_habit("   "), Err(DomainError::InvalidHabitName(_))));
    assert!(new_habit(&"x".repeat(100)).is_ok());
    assert!(new_habit(&"x".repeat(101)).is_err());
}

#[test]
fn test_owner_must_not_be_empty() {
    assert!(OwnerId::new("").is_err());
    assert_eq!(OwnerId::new("local").unwrap().as_str(), "local");
}

#[test]
fn test_toggle_round_trip_across_days() {
    let mut habit = new_habit("Read").unwrap();
    let today = day(5);

    for d in 2..=5 {
        assert!(habit.toggle_completion(day(d), today));
    }
    assert_eq!(habit.streak(), Streak { current: 4, best: 4 });
    assert_eq!(habit.last_completed, Some(today));

    assert!(!habit.toggle_completion(day(3), today));
    assert_eq!(habit.streak(), Streak { current: 2, best: 2 });
    assert!(habit.has_streak(2));
    assert!(!habit.has_streak(3));

    // un-checking leaves an explicit missed entry rather than removing the day
    assert!(habit.completions.contains(&CompletionEntry::missed(day(3))));
    let dates: Vec<Day> = habit.completions.iter().map(|e| e.date).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
}

#[test]
fn test_toggle_out_of_order_keeps_history_sorted() {
    let mut habit = new_habit("Read").unwrap();
    let today = day(10);
    for d in [9, 2, 6, 4] {
        habit.toggle_completion(day(d), today);
    }
    let dates: Vec<u32> = habit.completions.iter().map(|e| e.date.day()).collect();
    assert_eq!(dates, vec![2, 4, 6, 9]);
    assert_eq!(habit.current_streak, 1);
}

#[test]
fn test_snapshot_carries_engine_fields() {
    let mut habit = new_habit("Read").unwrap();
    habit.toggle_completion(day(1), day(2));

    let snapshot = habit.snapshot();
    assert_eq!(snapshot.creation_day, day(1));
    assert_eq!(snapshot.completions, vec![CompletionEntry::done(day(1))]);
    assert_eq!(snapshot.current_streak, 1);
    assert_eq!(snapshot.best_streak, 1);
}

#[test]
fn test_reconcile_then_toggle_today() {
    let mut habit = new_habit("Read").unwrap();
    let today = day(4);

    assert!(habit.reconcile(today));
    assert_eq!(habit.completions.len(), 3);
    assert!(!habit.reconcile(today));

    assert!(habit.toggle_completion(today, today));
    assert_eq!(habit.completions.len(), 4);
    assert_eq!(habit.streak(), Streak { current: 1, best: 1 });
}

#[test]
fn test_swatch_parsing() {
    assert_eq!(Swatch::parse("Purple").unwrap(), Swatch::Purple);
    assert_eq!(Swatch::parse("#3B82F6").unwrap(), Swatch::Blue);
    assert_eq!(Swatch::parse("#123abc").unwrap(), Swatch::Custom("#123abc".to_string()));
    assert!(Swatch::parse("teal").is_err());
    assert!(Swatch::parse("#12345").is_err());
}

#[test]
fn test_default_colors_rotate_through_palette() {
    assert_eq!(Swatch::default_for(0), Swatch::Green);
    assert_eq!(Swatch::default_for(1), Swatch::Blue);
    assert_eq!(Swatch::default_for(PALETTE.len()), Swatch::Green);
}

#[test]
fn test_rename_and_recolor() {
    let mut habit = new_habit("Read").unwrap();
    habit.rename("Read 20 pages").unwrap();
    habit.recolor(Swatch::Orange).unwrap();
    assert_eq!(habit.name, "Read 20 pages");
    assert_eq!(habit.color.hex(), "#f97316");

    assert!(habit.rename("").is_err());
    assert_eq!(habit.name, "Read 20 pages");
    assert!(habit.recolor(Swatch::Custom("red-ish".to_string())).is_err());
}
