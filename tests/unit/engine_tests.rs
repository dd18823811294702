use chrono::{NaiveDate, TimeZone, Utc, Weekday};
use habit_streak::analytics::{
    aggregate_counters, cross_habit_average, habit_success_rate, week_view,
};
use habit_streak::*;

fn today() -> Day {
    NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
}

fn t(offset: i64) -> Day {
    shift_days(today(), offset)
}

fn done(offsets: &[i64]) -> Vec<CompletionEntry> {
    offsets.iter().map(|&o| CompletionEntry::done(t(o))).collect()
}

fn habit_created(offset: i64) -> Habit {
    Habit::new(OwnerId::new("tester").unwrap(), "Walk".to_string(), Swatch::Blue, t(offset)).unwrap()
}

#[test]
fn test_day_keys_sort_like_days() {
    let days = [t(-400), t(-31), t(-1), t(0), t(9)];
    let keys: Vec<String> = days.iter().map(|&d| day_key(d)).collect();

    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(day_key(today()), "2024-05-15");
    assert_eq!(parse_day_key("2024-05-15").unwrap(), today());
}

#[test]
fn test_days_between_across_dst_change() {
    // US daylight saving started on 2024-03-10
    let before = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    let after = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
    assert_eq!(days_between(after, before), 2);
    assert_eq!(days_between(before, after), -2);
}

#[test]
fn test_normalize_day_uses_one_offset() {
    let late_evening = Utc.with_ymd_and_hms(2024, 5, 15, 23, 30, 0).unwrap();

    assert_eq!(Calendar::utc().normalize_day(late_evening), today());
    let tokyo = Calendar::with_offset_minutes(9 * 60).unwrap();
    assert_eq!(tokyo.normalize_day(late_evening), t(1));
    let new_york = Calendar::with_offset_minutes(-4 * 60).unwrap();
    assert_eq!(new_york.normalize_day(late_evening), today());
}

#[test]
fn test_iterate_days_is_restartable() {
    let range = iterate_days(t(-3), t(0));
    let first: Vec<Day> = range.iter().collect();
    let second: Vec<Day> = range.into_iter().collect();

    assert_eq!(first, vec![t(-3), t(-2), t(-1)]);
    assert_eq!(first, second);
    assert!(iterate_days(t(0), t(0)).is_empty());
    assert!(iterate_days(t(1), t(0)).is_empty());
}

#[test]
fn test_reconcile_from_nothing_fills_every_past_day() {
    for age in 0..40 {
        let result = reconcile(Some(t(-age)), today(), &[]);
        assert_eq!(result.history.len() as i64, age);
        assert!(result.history.iter().all(|e| !e.completed));
        assert_eq!(result.was_modified, age > 0);

        let dates: Vec<Day> = result.history.iter().map(|e| e.date).collect();
        let expected: Vec<Day> = iterate_days(t(-age), today()).iter().collect();
        assert_eq!(dates, expected);
    }
}

#[test]
fn test_reconcile_twice_changes_nothing() {
    let history = done(&[-6, -2, 0, 3]);
    let first = reconcile(Some(t(-8)), today(), &history);
    let second = reconcile(Some(t(-8)), today(), &first.history);

    assert!(first.was_modified);
    assert!(!second.was_modified);
    assert_eq!(first.history, second.history);
    // future entry kept as-is
    assert!(second.history.contains(&CompletionEntry::done(t(3))));
}

#[test]
fn test_reconcile_without_creation_day() {
    let history = done(&[-5, -1]);
    let result = reconcile(None, today(), &history);
    assert!(!result.was_modified);
    assert_eq!(result.history, history);
}

#[test]
fn test_consecutive_run_through_today() {
    let streak = compute_streaks(&done(&[0, -1, -2]), today());
    assert_eq!(streak, Streak { current: 3, best: 3 });
}

#[test]
fn test_broken_streak() {
    let streak = compute_streaks(&done(&[-3, -4]), today());
    assert_eq!(streak, Streak { current: 0, best: 2 });
}

#[test]
fn test_single_day_streaks() {
    assert_eq!(compute_streaks(&done(&[0]), today()), Streak { current: 1, best: 1 });
    assert_eq!(compute_streaks(&done(&[-1]), today()), Streak { current: 1, best: 1 });
    assert_eq!(compute_streaks(&done(&[-2]), today()), Streak { current: 0, best: 1 });
    assert_eq!(compute_streaks(&[], today()), Streak::default());
}

#[test]
fn test_missed_entries_do_not_count() {
    let mut history = done(&[-1]);
    history.push(CompletionEntry::missed(t(-2)));
    history.push(CompletionEntry::missed(t(0)));
    assert_eq!(compute_streaks(&history, today()), Streak { current: 1, best: 1 });
}

#[test]
fn test_duplicate_days_do_not_inflate_streaks() {
    let history = done(&[0, 0, -1, -1, -1]);
    assert_eq!(compute_streaks(&history, today()), Streak { current: 2, best: 2 });
}

#[test]
fn test_best_never_below_current() {
    let patterns: [&[i64]; 6] = [
        &[0, -1, -2, -5, -6],
        &[-1, -3, -4, -5, -6],
        &[0, -2, -4, -6],
        &[2, 1, 0, -1],
        &[-10, -11, -12, -13],
        &[0],
    ];
    for offsets in patterns {
        let streak = compute_streaks(&done(offsets), today());
        assert!(streak.best >= streak.current, "{:?} gave {:?}", offsets, streak);
    }
}

#[test]
fn test_created_five_days_ago_scenario() {
    let mut habit = habit_created(-5);
    habit.completions = done(&[-4, -3, -2]);

    assert!(habit.reconcile(today()));

    let completed: Vec<Day> = habit
        .completions
        .iter()
        .filter(|e| e.completed)
        .map(|e| e.date)
        .collect();
    assert_eq!(completed, vec![t(-4), t(-3), t(-2)]);
    assert!(habit.completions.contains(&CompletionEntry::missed(t(-1))));
    assert!(!habit.completions.iter().any(|e| e.date == today()));
    assert_eq!(habit.current_streak, 0);
    assert_eq!(habit.best_streak, 3);
}

#[test]
fn test_success_rate_is_clamped() {
    let mut habit = habit_created(-2);
    habit.completions = done(&[-2, -1, 0, 1, 2]);
    assert_eq!(habit_success_rate(&habit, today()), 100);

    let same_day = habit_created(0);
    assert_eq!(habit_success_rate(&same_day, today()), 0);
}

#[test]
fn test_two_averages_differ() {
    // 1 of 1 days and 1 of 5 days
    let mut short = habit_created(-1);
    short.completions = done(&[-1]);
    let mut long = habit_created(-5);
    long.completions = reconcile(Some(t(-5)), today(), &done(&[-5])).history;
    let habits = vec![short, long];

    // (100 + 20) / 2
    assert_eq!(cross_habit_average(&habits, today()), 60);
    // 2 completed of 6 recorded
    assert_eq!(aggregate_counters(&habits).avg_success_rate, 33);
    assert_eq!(aggregate_counters(&habits).total_completions, 2);
    assert_eq!(cross_habit_average(&[], today()), 0);
    assert_eq!(aggregate_counters(&[]), HabitStats::default());
}

#[test]
fn test_week_view_shape() {
    let history = done(&[-3, -1]);
    for start in [t(-6), t(-3), t(0), t(20)] {
        let view = week_view(&history, start);
        assert_eq!(view.days.len(), 7);
        for (i, day) in view.iter().enumerate() {
            assert_eq!(day.date, shift_days(start, i as i64));
        }
    }

    let view = week_view(&history, t(-6));
    let flags: Vec<bool> = view.iter().map(|d| d.completed).collect();
    assert_eq!(flags, vec![false, false, false, true, false, true, false]);
}

#[test]
fn test_week_alignment_is_the_callers_choice() {
    // 2024-05-15 is a Wednesday
    assert_eq!(start_of_week(today(), Weekday::Sun), t(-3));
    assert_eq!(start_of_week(today(), Weekday::Mon), t(-2));
    assert_eq!(start_of_week(t(-3), Weekday::Sun), t(-3));
}
