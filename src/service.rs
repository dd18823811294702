/// The caller side of the engine
///
/// `HabitTracker` is where storage, the clock and the pure engine meet.
/// Every operation reads "now" once, fetches the latest stored state, runs it
/// through the engine, writes the result back with a single update and then
/// publishes the new state on one watch channel.
///
/// Known limitation: this is a plain read-modify-write. Two sessions
/// toggling the same habit at the same time can lose one of the updates;
/// preventing that needs optimistic concurrency or a single writer at the
/// storage layer.

use std::cell::Cell;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;

use crate::analytics::{self, HabitStatistics, HabitStats, WeekView};
use crate::clock::Clock;
use crate::domain::{days_between, Calendar, Day, DomainError, Habit, HabitId, OwnerId, Swatch};
use crate::storage::{HabitStorage, HabitUpdate, StorageError};

/// Errors surfaced by tracker operations
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },
}

/// What observers see after every change
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackerSnapshot {
    pub habits: Vec<Habit>,
    pub stats: HabitStats,
}

/// A habit together with whether it was done on a particular day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitDay {
    pub habit: Habit,
    pub completed: bool,
}

/// Counters, cross-habit average and an optional per-habit panel, all
/// computed from one load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackerOverview {
    pub counters: HabitStats,
    pub average_success_rate: u8,
    pub selected: Option<HabitStatistics>,
}

/// Habit tracking for one owner
pub struct HabitTracker<S, C> {
    storage: S,
    clock: C,
    calendar: Calendar,
    owner: OwnerId,
    updates: watch::Sender<TrackerSnapshot>,
    /// Whether the published snapshot holds every stored habit
    synced: Cell<bool>,
}

impl<S: HabitStorage, C: Clock> HabitTracker<S, C> {
    pub fn new(storage: S, clock: C, calendar: Calendar, owner: OwnerId) -> Self {
        let (updates, _) = watch::channel(TrackerSnapshot::default());
        Self {
            storage,
            clock,
            calendar,
            owner,
            updates,
            synced: Cell::new(false),
        }
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Today according to the injected clock and the calendar's day boundary
    pub fn today(&self) -> Day {
        self.calendar.normalize_day(self.clock.now())
    }

    /// Receive a new snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<TrackerSnapshot> {
        self.updates.subscribe()
    }

    /// The last published state
    pub fn snapshot(&self) -> TrackerSnapshot {
        self.updates.borrow().clone()
    }

    /// Fetch all habits, backfill missed days, and publish
    ///
    /// Habits that gained backfilled days are written back; the others are
    /// only refreshed in memory.
    pub fn load_habits(&self) -> Result<Vec<Habit>, TrackerError> {
        self.load_habits_on(self.today())
    }

    fn load_habits_on(&self, today: Day) -> Result<Vec<Habit>, TrackerError> {
        let mut habits = self.storage.fetch_habits_by_owner(&self.owner)?;

        for habit in &mut habits {
            if habit.reconcile(today) {
                tracing::debug!("Writing back backfilled history for habit {}", habit.id);
                self.storage.update_habit(&habit.id, &HabitUpdate::progress(habit))?;
            }
        }

        self.publish(habits.clone());
        Ok(habits)
    }

    /// Create a habit starting today
    ///
    /// Without a color the next palette swatch is used.
    pub fn create_habit(&self, name: &str, color: Option<Swatch>) -> Result<Habit, TrackerError> {
        let today = self.today();
        let color = match color {
            Some(color) => color,
            None => {
                let existing = self.storage.fetch_habits_by_owner(&self.owner)?.len();
                Swatch::default_for(existing)
            }
        };

        let habit = Habit::new(self.owner.clone(), name.to_string(), color, today)?;
        self.storage.create_habit(&habit)?;
        tracing::info!("Created habit '{}' ({})", habit.name, habit.id);

        self.publish_with(today, |habits| habits.push(habit.clone()));
        Ok(habit)
    }

    /// Rename and/or recolor a habit
    pub fn update_details(
        &self,
        habit_id: &HabitId,
        name: Option<&str>,
        color: Option<Swatch>,
    ) -> Result<Habit, TrackerError> {
        let mut habit = self.owned_habit(habit_id)?;
        if let Some(name) = name {
            habit.rename(name)?;
        }
        if let Some(color) = color {
            habit.recolor(color)?;
        }

        self.storage.update_habit(habit_id, &HabitUpdate::details(&habit))?;
        self.publish_replacing(self.today(), &habit);
        Ok(habit)
    }

    /// Flip whether `day` counts as done for a habit
    ///
    /// The history is re-read from storage first, then written back together
    /// with the recomputed streaks in one update.
    pub fn toggle_completion(&self, habit_id: &HabitId, day: Day) -> Result<Habit, TrackerError> {
        let today = self.today();
        let mut habit = self.owned_habit(habit_id)?;

        let completed = habit.toggle_completion(day, today);
        self.storage.update_habit(habit_id, &HabitUpdate::progress(&habit))?;
        tracing::info!(
            "Marked habit {} {} on {} (streak {}, best {})",
            habit.id,
            if completed { "done" } else { "not done" },
            day,
            habit.current_streak,
            habit.best_streak
        );

        self.publish_replacing(today, &habit);
        Ok(habit)
    }

    /// Delete a habit for good
    pub fn delete_habit(&self, habit_id: &HabitId) -> Result<(), TrackerError> {
        self.owned_habit(habit_id)?;
        self.storage.delete_habit(habit_id)?;
        tracing::info!("Deleted habit {}", habit_id);

        self.publish_with(self.today(), |habits| habits.retain(|h| &h.id != habit_id));
        Ok(())
    }

    /// One reconciled habit, without writing anything back
    pub fn habit(&self, habit_id: &HabitId) -> Result<Habit, TrackerError> {
        let mut habit = self.owned_habit(habit_id)?;
        habit.reconcile(self.today());
        Ok(habit)
    }

    /// Every habit and whether it was done on `day`
    pub fn habits_on(&self, day: Day) -> Result<Vec<HabitDay>, TrackerError> {
        Ok(self
            .load_habits()?
            .into_iter()
            .map(|habit| {
                let completed = habit.is_completed_on(day);
                HabitDay { habit, completed }
            })
            .collect())
    }

    /// The week starting at `week_start` for one habit
    pub fn week_view(&self, habit_id: &HabitId, week_start: Day) -> Result<WeekView, TrackerError> {
        if days_between(Day::MAX, week_start) < 6 {
            return Err(DomainError::InvalidDate(format!("No full week starts on {}", week_start)).into());
        }
        let habit = self.habit(habit_id)?;
        Ok(analytics::week_view(&habit.completions, week_start))
    }

    /// Statistics panel for one habit
    pub fn statistics(&self, habit_id: &HabitId) -> Result<HabitStatistics, TrackerError> {
        let overview = self.overview(Some(habit_id))?;
        overview.selected.ok_or_else(|| TrackerError::HabitNotFound {
            habit_id: habit_id.to_string(),
        })
    }

    /// Counters across all habits
    pub fn stats(&self) -> Result<HabitStats, TrackerError> {
        Ok(self.overview(None)?.counters)
    }

    /// Everything the statistics screen shows, from a single fetch
    ///
    /// A `habit_id` that is not one of this owner's habits is an error.
    pub fn overview(&self, habit_id: Option<&HabitId>) -> Result<TrackerOverview, TrackerError> {
        let today = self.today();
        let habits = self.load_habits_on(today)?;

        let selected = match habit_id {
            Some(id) => {
                let habit = habits
                    .iter()
                    .find(|h| &h.id == id)
                    .ok_or_else(|| TrackerError::HabitNotFound {
                        habit_id: id.to_string(),
                    })?;
                Some(analytics::habit_statistics(habit, &habits, today))
            }
            None => None,
        };

        Ok(TrackerOverview {
            counters: analytics::aggregate_counters(&habits),
            average_success_rate: analytics::cross_habit_average(&habits, today),
            selected,
        })
    }

    /// Fetch a habit, treating other owners' habits as missing
    fn owned_habit(&self, habit_id: &HabitId) -> Result<Habit, TrackerError> {
        let not_found = || TrackerError::HabitNotFound {
            habit_id: habit_id.to_string(),
        };

        let habit = match self.storage.get_habit(habit_id) {
            Ok(habit) => habit,
            Err(StorageError::HabitNotFound { .. }) => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };

        if habit.owner_id != self.owner {
            return Err(not_found());
        }
        Ok(habit)
    }

    fn publish(&self, habits: Vec<Habit>) {
        let stats = analytics::aggregate_counters(&habits);
        self.updates.send_replace(TrackerSnapshot { habits, stats });
        self.synced.set(true);
    }

    /// Publish after a write, patching the last snapshot in place
    ///
    /// Before the first full load the snapshot is not a complete picture, so
    /// the owner's habits are loaded from storage instead. The write has
    /// already happened by then and `change` is not applied.
    fn publish_with(&self, today: Day, change: impl FnOnce(&mut Vec<Habit>)) {
        if !self.synced.get() {
            if let Err(e) = self.load_habits_on(today) {
                tracing::warn!("Could not load habits to publish: {}", e);
            }
            return;
        }

        let mut habits = self.updates.borrow().habits.clone();
        change(&mut habits);
        self.publish(habits);
    }

    fn publish_replacing(&self, today: Day, habit: &Habit) {
        self.publish_with(today, |habits| match habits.iter_mut().find(|h| h.id == habit.id) {
            Some(slot) => *slot = habit.clone(),
            None => habits.push(habit.clone()),
        });
    }
}
