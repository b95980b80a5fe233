//! In-memory habit store and the operations over it.
//!
//! Habits and their completion sets live behind one lock, so every
//! operation sees and leaves both maps consistent: a completion set never
//! outlives its habit.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::types::{
    Completion, CompletionStatus, Habit, HabitFilter, HabitPage, HabitSummary, LogCompletion,
    NewHabit,
};
use crate::error::{HabitError, HabitResult};
use crate::metrics;

#[derive(Debug, Default)]
struct StoreInner {
    habits: HashMap<Uuid, Habit>,
    /// Habit ids in insertion order.
    order: Vec<Uuid>,
    completions: HashMap<Uuid, HashSet<String>>,
}

impl StoreInner {
    fn completed_days(&self, id: &Uuid) -> usize {
        self.completions.get(id).map_or(0, HashSet::len)
    }

    fn completed_on(&self, id: &Uuid, date: &str) -> bool {
        self.completions
            .get(id)
            .is_some_and(|dates| dates.contains(date))
    }
}

/// Process-lifetime habit storage.
#[derive(Debug, Default)]
pub struct HabitStore {
    inner: RwLock<StoreInner>,
}

impl HabitStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a new habit.
    pub async fn create(&self, new: NewHabit) -> HabitResult<Habit> {
        let habit = new.into_habit()?;

        let mut inner = self.inner.write().await;
        inner.order.push(habit.id);
        inner.habits.insert(habit.id, habit.clone());
        metrics::inc_habits_created();
        metrics::set_habits_active(inner.habits.len());

        info!(habit_id = %habit.id, name = %habit.name, "Habit created");
        Ok(habit)
    }

    /// Record a completion date for the habit `id`.
    ///
    /// Input is checked before the habit is looked up; an id that is not a
    /// UUID cannot name a habit and is reported as not found.
    pub async fn log_completion(&self, id: &str, request: LogCompletion) -> HabitResult<Completion> {
        let date = request
            .date
            .filter(|d| !d.is_empty())
            .ok_or_else(|| HabitError::Validation("Invalid input data.".to_string()))?;
        let id = Uuid::parse_str(id).map_err(|_| HabitError::NotFound)?;

        let mut inner = self.inner.write().await;
        if !inner.habits.contains_key(&id) {
            return Err(HabitError::NotFound);
        }

        let dates = inner.completions.entry(id).or_default();
        if !dates.insert(date.clone()) {
            metrics::inc_completion_conflicts();
            debug!(habit_id = %id, date = %date, "Completion already logged");
            return Err(HabitError::Conflict);
        }
        metrics::inc_completions_logged();

        info!(habit_id = %id, date = %date, "Completion logged");
        Ok(Completion { id, date })
    }

    /// List habits matching `filter`, one page at a time.
    ///
    /// `today` is the `YYYY-MM-DD` date the status filter compares against.
    pub async fn list(&self, filter: &HabitFilter, today: &str) -> HabitPage {
        let inner = self.inner.read().await;
        let needle = filter.name.as_ref().map(|n| n.to_lowercase());

        let matches: Vec<&Habit> = inner
            .order
            .iter()
            .filter_map(|id| inner.habits.get(id))
            .filter(|habit| match &needle {
                Some(needle) => habit.name.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .filter(|habit| match filter.status {
                Some(CompletionStatus::Completed) => inner.completed_on(&habit.id, today),
                Some(CompletionStatus::NotCompleted) => !inner.completed_on(&habit.id, today),
                None => true,
            })
            .collect();

        let total = matches.len();
        let habits = matches
            .into_iter()
            .skip(filter.offset())
            .take(filter.limit)
            .map(|habit| HabitSummary {
                habit: habit.clone(),
                completed_days: inner.completed_days(&habit.id),
            })
            .collect::<Vec<_>>();

        debug!(
            total,
            returned = habits.len(),
            page = filter.page,
            limit = filter.limit,
            "Listed habits"
        );

        HabitPage {
            habits,
            total,
            page: filter.page,
            limit: filter.limit,
        }
    }

    /// Remove the habit `id` together with its completion set.
    pub async fn delete(&self, id: &str) -> HabitResult<Habit> {
        let id = Uuid::parse_str(id).map_err(|_| HabitError::NotFound)?;

        let mut inner = self.inner.write().await;
        let habit = inner.habits.remove(&id).ok_or(HabitError::NotFound)?;
        inner.order.retain(|existing| *existing != id);
        inner.completions.remove(&id);
        metrics::inc_habits_deleted();
        metrics::set_habits_active(inner.habits.len());

        info!(habit_id = %id, "Habit deleted");
        Ok(habit)
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.read().await.habits.len()
    }

    #[cfg(test)]
    async fn is_empty(&self) -> bool {
        self.inner.read().await.habits.is_empty()
    }
}
