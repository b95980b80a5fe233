//! In-memory habit tracking service.
//!
//! Clients create habits, log daily completions, list habits with
//! name/status filters and pagination, and delete habits. State lives in a
//! [`habits::HabitStore`] owned by the router state and disappears with the
//! process.
//!
//! ```text
//! POST   /api/habits            create a habit
//! GET    /api/habits            list (page, limit, status, name)
//! POST   /api/habits/:id/log    log a completion date
//! DELETE /api/habits/:id        delete a habit and its completions
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`habits`]: Habit types, store and operations
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod habits;
pub mod metrics;
pub mod utils;

pub use config::Config;
pub use error::{AppError, HabitError, Result};
