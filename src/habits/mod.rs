//! Habit records, the in-memory store, and the operations over it.

pub mod store;
pub mod types;

pub use store::HabitStore;
pub use types::{
    Completion, CompletionStatus, Habit, HabitFilter, HabitPage, HabitSummary, ListQuery,
    LogCompletion, NewHabit,
};
