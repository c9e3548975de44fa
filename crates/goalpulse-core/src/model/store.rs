//! Flat, id-keyed snapshot of goals and tasks.
//!
//! Goals reference tasks through `task_ids` and tasks reference their goal
//! through `goal_id`. Neither owns the other.
//!
//! Every way of building a store checks those references. Deserialized
//! snapshots also link each task into its goal's `task_ids`. Per-task data
//! (targets, history order, values) is checked by each metric when it runs,
//! so one malformed task only fails the metrics that read it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::{Goal, Task};
use crate::error::{CoreError, Result};
use crate::score::{goal_score, goal_series, rollup, ScoreSnapshot};

/// An immutable snapshot handed to the engine by the data-access layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoreSnapshot")]
pub struct GoalStore {
    #[serde(default)]
    goals: BTreeMap<String, Goal>,
    #[serde(default)]
    tasks: BTreeMap<String, Task>,
}

/// Overall score on one date, and the goals that could not be scored.
#[derive(Debug, Clone, PartialEq)]
pub struct Rollup {
    pub percent: f64,
    /// Goal id and the error that kept it out of `percent`
    pub skipped: Vec<(String, CoreError)>,
}

/// Wire shape of a store before its references are checked.
#[derive(Deserialize)]
struct StoreSnapshot {
    #[serde(default)]
    goals: BTreeMap<String, Goal>,
    #[serde(default)]
    tasks: BTreeMap<String, Task>,
}

impl TryFrom<StoreSnapshot> for GoalStore {
    type Error = CoreError;

    fn try_from(snapshot: StoreSnapshot) -> Result<Self> {
        let StoreSnapshot { mut goals, tasks } = snapshot;

        for (key, goal) in &goals {
            check_key("goals", key, &goal.id)?;
        }

        for (key, task) in &tasks {
            check_key("tasks", key, &task.id)?;
            let goal = goals
                .get_mut(&task.goal_id)
                .ok_or_else(|| CoreError::NotFound {
                    kind: "goal",
                    id: task.goal_id.clone(),
                })?;
            goal.task_ids.insert(task.id.clone());
        }

        for goal in goals.values() {
            for task_id in &goal.task_ids {
                let task = tasks.get(task_id).ok_or_else(|| CoreError::NotFound {
                    kind: "task",
                    id: task_id.clone(),
                })?;
                if task.goal_id != goal.id {
                    return Err(CoreError::invalid(
                        "task_ids",
                        format!(
                            "goal '{}' lists task '{}', which belongs to goal '{}'",
                            goal.id, task_id, task.goal_id
                        ),
                    ));
                }
            }
        }

        Ok(Self { goals, tasks })
    }
}

fn check_key(field: &str, key: &str, id: &str) -> Result<()> {
    if key == id {
        Ok(())
    } else {
        Err(CoreError::invalid(
            field,
            format!("entry keyed '{key}' has id '{id}'"),
        ))
    }
}

impl GoalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loose collections, linking every task to its goal.
    pub fn from_parts(
        goals: impl IntoIterator<Item = Goal>,
        tasks: impl IntoIterator<Item = Task>,
    ) -> Result<Self> {
        let mut store = Self::new();
        for goal in goals {
            store.insert_goal(goal);
        }
        for task in tasks {
            store.insert_task(task)?;
        }
        Ok(store)
    }

    pub fn insert_goal(&mut self, goal: Goal) {
        self.goals.insert(goal.id.clone(), goal);
    }

    /// Insert a task and add its id to the owning goal.
    pub fn insert_task(&mut self, task: Task) -> Result<()> {
        task.validate()?;
        let goal = self
            .goals
            .get_mut(&task.goal_id)
            .ok_or_else(|| CoreError::NotFound {
                kind: "goal",
                id: task.goal_id.clone(),
            })?;
        goal.task_ids.insert(task.id.clone());
        self.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    pub fn goal(&self, id: &str) -> Result<&Goal> {
        self.goals.get(id).ok_or_else(|| CoreError::NotFound {
            kind: "goal",
            id: id.to_string(),
        })
    }

    pub fn task(&self, id: &str) -> Result<&Task> {
        self.tasks.get(id).ok_or_else(|| CoreError::NotFound {
            kind: "task",
            id: id.to_string(),
        })
    }

    pub fn goals(&self) -> impl Iterator<Item = &Goal> {
        self.goals.values()
    }

    /// Tasks belonging to a goal, in id order.
    pub fn tasks_of(&self, goal_id: &str) -> Result<Vec<&Task>> {
        let goal = self.goal(goal_id)?;
        goal.task_ids.iter().map(|id| self.task(id)).collect()
    }

    /// Streak threshold for a goal: 100 when every task is a checkbox,
    /// otherwise the goal's own setting, otherwise `fallback`.
    pub fn streak_threshold(&self, goal_id: &str, fallback: f64) -> Result<f64> {
        let goal = self.goal(goal_id)?;
        let tasks = self.tasks_of(goal_id)?;
        let checkbox_only = !tasks.is_empty() && tasks.iter().all(|t| t.kind.is_checkbox());

        if checkbox_only {
            Ok(100.0)
        } else {
            Ok(goal.streak_threshold.unwrap_or(fallback))
        }
    }

    /// Score of one goal on `date`, in percent.
    pub fn goal_score(&self, goal_id: &str, date: NaiveDate, today: NaiveDate) -> Result<f64> {
        let goal = self.goal(goal_id)?;
        let tasks = self.tasks_of(goal_id)?;
        goal_score(goal, &tasks, date, today)
    }

    /// Reported-day series for a goal over `[from, to]`.
    pub fn goal_series(
        &self,
        goal_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        today: NaiveDate,
    ) -> Result<Vec<ScoreSnapshot>> {
        let goal = self.goal(goal_id)?;
        let tasks = self.tasks_of(goal_id)?;
        goal_series(goal, &tasks, from, to, today)
    }

    /// Priority-weighted score across every goal that exists on `date`.
    ///
    /// A goal whose score fails is left out of the weights and listed in
    /// [`Rollup::skipped`].
    pub fn rollup(&self, date: NaiveDate, today: NaiveDate) -> Result<Rollup> {
        let mut scored = Vec::new();
        let mut skipped = Vec::new();
        for goal in self.goals.values().filter(|g| g.created_at <= date) {
            let score = self
                .tasks_of(&goal.id)
                .and_then(|tasks| goal_score(goal, &tasks, date, today));
            match score {
                Ok(percent) => scored.push((goal.priority, percent)),
                Err(err) => {
                    debug!(goal_id = %goal.id, %date, error = %err, "goal left out of rollup");
                    skipped.push((goal.id.clone(), err));
                }
            }
        }
        Ok(Rollup {
            percent: rollup(&scored)?,
            skipped,
        })
    }
}
