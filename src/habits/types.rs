//! Habit records and the request/response shapes of habit operations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::error::{HabitError, HabitResult};

/// Default page when a list request has no usable `page`.
pub const DEFAULT_PAGE: usize = 1;

/// A trackable recurring activity with a weekly target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Server-generated identifier, immutable once assigned.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// How many days per week the habit should be performed.
    pub target_days_per_week: u32,
}

/// Body of a create request. Fields are optional so presence can be
/// checked here rather than by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewHabit {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_days_per_week: Option<u32>,
}

impl NewHabit {
    /// Build a request with every field present.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        target_days_per_week: u32,
    ) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
            target_days_per_week: Some(target_days_per_week),
        }
    }

    /// Turn the request into a habit with a fresh id.
    ///
    /// Empty strings and a zero target count as missing.
    pub fn into_habit(self) -> HabitResult<Habit> {
        let missing = || HabitError::Validation("Missing required fields".to_string());

        let name = self.name.filter(|n| !n.is_empty()).ok_or_else(missing)?;
        let description = self
            .description
            .filter(|d| !d.is_empty())
            .ok_or_else(missing)?;
        let target_days_per_week = self
            .target_days_per_week
            .filter(|t| *t > 0)
            .ok_or_else(missing)?;

        Ok(Habit {
            id: Uuid::new_v4(),
            name,
            description,
            target_days_per_week,
        })
    }
}

/// Body of a log-completion request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogCompletion {
    #[serde(default)]
    pub date: Option<String>,
}

impl LogCompletion {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
        }
    }
}

/// A completion that was just recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub id: Uuid,
    pub date: String,
}

/// Completion filter for listing, relative to today's date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum CompletionStatus {
    /// Habit has a completion logged for today.
    #[strum(serialize = "completed")]
    Completed,
    /// Habit has no completion logged for today.
    #[strum(serialize = "not_completed")]
    NotCompleted,
}

/// Raw list query string. Every value stays a string so that unparsable
/// input falls back to defaults instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub name: Option<String>,
}

impl ListQuery {
    /// Build a query from decoded key/value pairs.
    ///
    /// A repeated key keeps its first value; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                "status" => &mut query.status,
                "name" => &mut query.name,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }

    /// Resolve the query into a filter.
    ///
    /// Non-numeric, zero or negative `page`/`limit` use the defaults,
    /// `limit` is capped only when `max_limit` is set, unknown `status`
    /// values and an empty `name` apply no filter.
    pub fn into_filter(self, default_limit: usize, max_limit: Option<usize>) -> HabitFilter {
        let page = parse_positive(self.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let requested = parse_positive(self.limit.as_deref()).unwrap_or(default_limit);
        let limit = match max_limit {
            Some(max) => requested.min(max.max(1)),
            None => requested,
        };

        let status = self
            .status
            .as_deref()
            .and_then(|s| s.parse::<CompletionStatus>().ok());
        let name = self.name.filter(|n| !n.is_empty());

        HabitFilter {
            page,
            limit,
            status,
            name,
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
}

/// Resolved list parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitFilter {
    /// 1-based page number.
    pub page: usize,
    /// Page size.
    pub limit: usize,
    pub status: Option<CompletionStatus>,
    /// Case-insensitive substring of the habit name.
    pub name: Option<String>,
}

impl Default for HabitFilter {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: 10,
            status: None,
            name: None,
        }
    }
}

impl HabitFilter {
    /// Index of the first item on the requested page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// A habit as it appears in list output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitSummary {
    #[serde(flatten)]
    pub habit: Habit,
    /// Number of distinct dates logged for the habit.
    pub completed_days: usize,
}

/// One page of list output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitPage {
    pub habits: Vec<HabitSummary>,
    /// Matches across all pages.
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}
