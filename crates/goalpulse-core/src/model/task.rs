//! Task and daily entry types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// How a task is measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskKind {
    /// Done or not done each day.
    Checkbox,
    /// A numeric amount per day, measured against `target`.
    Number { target: f64 },
}

impl TaskKind {
    pub fn is_checkbox(&self) -> bool {
        matches!(self, TaskKind::Checkbox)
    }

    pub fn target(&self) -> Option<f64> {
        match self {
            TaskKind::Checkbox => None,
            TaskKind::Number { target } => Some(*target),
        }
    }
}

/// One day of a task's history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    /// Used by checkbox tasks
    #[serde(default)]
    pub completed: bool,
    /// Used by number tasks, never negative
    #[serde(default)]
    pub value: f64,
}

impl DailyEntry {
    pub fn checked(date: NaiveDate, completed: bool) -> Self {
        Self {
            date,
            completed,
            value: 0.0,
        }
    }

    pub fn valued(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            completed: false,
            value,
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

/// A trackable task owned by a goal.
///
/// The owner is referenced by id only; the goal keeps the matching set of
/// task ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub goal_id: String,
    #[serde(flatten)]
    pub kind: TaskKind,
    pub created_at: NaiveDate,
    /// Relative weight inside the owning goal (default 1.0).
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Ordered by date, strictly increasing.
    #[serde(default)]
    pub history: Vec<DailyEntry>,
}

impl Task {
    pub fn checkbox(
        id: impl Into<String>,
        goal_id: impl Into<String>,
        created_at: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            goal_id: goal_id.into(),
            kind: TaskKind::Checkbox,
            created_at,
            weight: default_weight(),
            history: Vec::new(),
        }
    }

    pub fn number(
        id: impl Into<String>,
        goal_id: impl Into<String>,
        target: f64,
        created_at: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            goal_id: goal_id.into(),
            kind: TaskKind::Number { target },
            created_at,
            weight: default_weight(),
            history: Vec::new(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_history(mut self, history: Vec<DailyEntry>) -> Self {
        self.history = history;
        self
    }

    /// Append an entry, or amend it in place when it is for the latest date.
    pub fn record(&mut self, entry: DailyEntry) -> Result<()> {
        match self.history.last_mut() {
            Some(last) if last.date == entry.date => {
                *last = entry;
                Ok(())
            }
            Some(last) if last.date > entry.date => Err(CoreError::invalid(
                "history",
                format!(
                    "task '{}': cannot record {} before latest entry {}",
                    self.id, entry.date, last.date
                ),
            )),
            _ => {
                self.history.push(entry);
                Ok(())
            }
        }
    }

    /// Entry for `date`, if one was reported.
    pub fn entry_on(&self, date: NaiveDate) -> Option<&DailyEntry> {
        self.history
            .binary_search_by_key(&date, |e| e.date)
            .ok()
            .map(|idx| &self.history[idx])
    }

    /// Validated target of a number task.
    pub fn checked_target(&self) -> Result<Option<f64>> {
        match self.kind {
            TaskKind::Checkbox => Ok(None),
            TaskKind::Number { target } if target.is_finite() && target > 0.0 => Ok(Some(target)),
            TaskKind::Number { target } => Err(CoreError::invalid(
                "target",
                format!("task '{}': target must be positive, got {target}", self.id),
            )),
        }
    }

    /// Check the per-task invariants: positive target and weight, strictly
    /// ascending history, non-negative values.
    pub fn validate(&self) -> Result<()> {
        self.checked_target()?;

        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err(CoreError::invalid(
                "weight",
                format!("task '{}': weight must be positive, got {}", self.id, self.weight),
            ));
        }

        for pair in self.history.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(CoreError::invalid(
                    "history",
                    format!(
                        "task '{}': dates must be strictly ascending ({} then {})",
                        self.id, pair[0].date, pair[1].date
                    ),
                ));
            }
        }

        if let Some(bad) = self.history.iter().find(|e| e.value.is_nan() || e.value < 0.0) {
            return Err(CoreError::invalid(
                "value",
                format!("task '{}': negative value {} on {}", self.id, bad.value, bad.date),
            ));
        }

        Ok(())
    }
}
