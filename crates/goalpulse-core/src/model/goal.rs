//! Goal and priority types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{CoreError, Result};

/// Goal priority, 1 (highest) through 5 (lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const HIGHEST: Priority = Priority(1);
    pub const LOWEST: Priority = Priority(5);

    pub fn new(level: u8) -> Result<Self> {
        if (1..=5).contains(&level) {
            Ok(Self(level))
        } else {
            Err(CoreError::invalid(
                "priority",
                format!("must be between 1 and 5, got {level}"),
            ))
        }
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    /// Weight in a cross-goal rollup: priority 1 weighs 5, priority 5 weighs 1.
    pub fn weight(&self) -> f64 {
        f64::from(6 - self.0)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority(3)
    }
}

impl TryFrom<u8> for Priority {
    type Error = CoreError;

    fn try_from(level: u8) -> Result<Self> {
        Priority::new(level)
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p.0
    }
}

/// A goal: a priority plus the ids of the tasks it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub task_ids: BTreeSet<String>,
    pub created_at: NaiveDate,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    /// Percent a day must reach to extend a streak. Ignored for
    /// checkbox-only goals, which always require 100.
    #[serde(default)]
    pub streak_threshold: Option<f64>,
}

impl Goal {
    pub fn new(id: impl Into<String>, priority: Priority, created_at: NaiveDate) -> Self {
        Self {
            id: id.into(),
            priority,
            task_ids: BTreeSet::new(),
            created_at,
            deadline: None,
            streak_threshold: None,
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_streak_threshold(mut self, threshold: f64) -> Self {
        self.streak_threshold = Some(threshold);
        self
    }

    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_ids.insert(task_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_weights() {
        assert_eq!(Priority::HIGHEST.weight(), 5.0);
        assert_eq!(Priority::new(3).unwrap().weight(), 3.0);
        assert_eq!(Priority::LOWEST.weight(), 1.0);
    }

    #[test]
    fn test_priority_bounds() {
        assert!(Priority::new(0).is_err());
        assert!(Priority::new(6).is_err());
        assert!(serde_json::from_str::<Priority>("7").is_err());
        assert_eq!(serde_json::from_str::<Priority>("2").unwrap().level(), 2);
    }
}
