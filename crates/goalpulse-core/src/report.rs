//! Dashboard reports.
//!
//! Gathers every number a goal card shows into one serializable value. A
//! metric that fails is recorded as a [`MetricFailure`] next to the metrics
//! that succeeded, so one bad task never blanks the whole dashboard.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{CoreError, Result};
use crate::model::{GoalStore, Priority};
use crate::score::{goal_score, goal_series, rollup, ScoreSnapshot, Tier};
use crate::stats::{consistency, project_completion, streak, Projection, StreakState};

/// One consistency figure for a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyScore {
    pub window_days: i64,
    /// Set for recency-weighted figures
    pub half_life_days: Option<f64>,
    pub percent: f64,
}

/// Projection for one number task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskProjection {
    pub task_id: String,
    pub projection: Projection,
}

/// A metric that could not be computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricFailure {
    pub entity_id: String,
    pub metric: String,
    pub kind: String,
    pub message: String,
}

impl MetricFailure {
    fn new(entity_id: &str, metric: &str, err: &CoreError) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            metric: metric.to_string(),
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Everything a goal card renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalReport {
    pub goal_id: String,
    pub priority: Priority,
    pub date: NaiveDate,
    /// Today's score, absent if it failed
    pub today: Option<ScoreSnapshot>,
    pub streak_threshold: f64,
    pub streak: Option<StreakState>,
    pub consistency: Vec<ConsistencyScore>,
    pub projections: Vec<TaskProjection>,
    pub failures: Vec<MetricFailure>,
}

/// Every goal plus the priority-weighted overall score.
///
/// Goals without a score for the day are left out of `overall_percent`;
/// the reason is in their failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub date: NaiveDate,
    pub goals: Vec<GoalReport>,
    /// Goals whose report could not be built at all
    pub unreported: Vec<MetricFailure>,
    pub overall_percent: f64,
    pub overall_tier: Tier,
}

impl DashboardReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// All failures across goals.
    pub fn failures(&self) -> impl Iterator<Item = &MetricFailure> {
        self.unreported
            .iter()
            .chain(self.goals.iter().flat_map(|g| g.failures.iter()))
    }
}

/// Overall score per day, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollupHistory {
    pub points: Vec<ScoreSnapshot>,
    /// One entry per goal and day left out of a point
    pub failures: Vec<MetricFailure>,
}

/// Builds goal and dashboard reports from a store snapshot.
#[derive(Debug, Clone, Default)]
pub struct ProgressAnalyzer {
    config: EngineConfig,
}

impl ProgressAnalyzer {
    /// Create an analyzer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with custom configuration
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Report for one goal as of `today`.
    ///
    /// # Errors
    /// Only `NotFound` for an unknown goal or task id. Every other failure is
    /// recorded in [`GoalReport::failures`].
    pub fn goal_report(
        &self,
        store: &GoalStore,
        goal_id: &str,
        today: NaiveDate,
    ) -> Result<GoalReport> {
        let goal = store.goal(goal_id)?;
        let tasks = store.tasks_of(goal_id)?;
        let threshold = store.streak_threshold(goal_id, self.config.streak.default_threshold)?;

        let mut failures = Vec::new();

        let today_score = match goal_score(goal, &tasks, today, today) {
            Ok(percent) => Some(ScoreSnapshot::new(today, percent)),
            Err(err) => {
                failures.push(MetricFailure::new(goal_id, "score", &err));
                None
            }
        };

        let series = match goal_series(goal, &tasks, goal.created_at, today, today) {
            Ok(series) => series,
            Err(err) => {
                failures.push(MetricFailure::new(goal_id, "series", &err));
                Vec::new()
            }
        };

        let streak_state = match streak(&series, threshold, today) {
            Ok(state) => Some(state),
            Err(err) => {
                failures.push(MetricFailure::new(goal_id, "streak", &err));
                None
            }
        };

        let mut consistency_scores = Vec::new();
        for params in self.config.consistency_params(threshold) {
            match consistency(&series, &params, goal.created_at, today) {
                Ok(percent) => consistency_scores.push(ConsistencyScore {
                    window_days: params.window_days,
                    half_life_days: params.half_life_days,
                    percent,
                }),
                Err(err) => failures.push(MetricFailure::new(goal_id, "consistency", &err)),
            }
        }

        let mut projections = Vec::new();
        if goal.deadline.is_some() {
            for task in tasks.iter().filter(|t| !t.kind.is_checkbox()) {
                match project_completion(task, today, goal.deadline) {
                    Ok(projection) => projections.push(TaskProjection {
                        task_id: task.id.clone(),
                        projection,
                    }),
                    Err(CoreError::NotApplicable { .. }) => {}
                    Err(err) => failures.push(MetricFailure::new(&task.id, "projection", &err)),
                }
            }
        }

        if !failures.is_empty() {
            warn!(goal_id, failures = failures.len(), "goal report has failed metrics");
        }

        Ok(GoalReport {
            goal_id: goal.id.clone(),
            priority: goal.priority,
            date: today,
            today: today_score,
            streak_threshold: threshold,
            streak: streak_state,
            consistency: consistency_scores,
            projections,
            failures,
        })
    }

    /// Report for every goal created on or before `today`.
    ///
    /// A goal whose report fails is listed in
    /// [`DashboardReport::unreported`] and the rest still render.
    pub fn dashboard(&self, store: &GoalStore, today: NaiveDate) -> Result<DashboardReport> {
        let mut goals = Vec::new();
        let mut unreported = Vec::new();
        for goal in store.goals().filter(|g| g.created_at <= today) {
            match self.goal_report(store, &goal.id, today) {
                Ok(report) => goals.push(report),
                Err(err) => {
                    warn!(goal_id = %goal.id, error = %err, "goal left out of dashboard");
                    unreported.push(MetricFailure::new(&goal.id, "report", &err));
                }
            }
        }

        let scored: Vec<(Priority, f64)> = goals
            .iter()
            .filter_map(|r| r.today.map(|s| (r.priority, s.percent)))
            .collect();
        let overall_percent = rollup(&scored)?;

        debug!(
            %today,
            goals = goals.len(),
            overall_percent,
            "dashboard computed"
        );

        Ok(DashboardReport {
            date: today,
            goals,
            unreported,
            overall_percent,
            overall_tier: Tier::from_percent(overall_percent),
        })
    }

    /// Overall score for each of the last `days` days, oldest first.
    ///
    /// Goals that fail on a day are left out of that day's point and
    /// recorded in [`RollupHistory::failures`].
    pub fn rollup_history(
        &self,
        store: &GoalStore,
        days: u64,
        today: NaiveDate,
    ) -> Result<RollupHistory> {
        let mut points = Vec::new();
        let mut failures = Vec::new();
        for days_ago in (0..days).rev() {
            let Some(date) = today.checked_sub_days(Days::new(days_ago)) else {
                continue;
            };
            let rollup = store.rollup(date, today)?;
            points.push(ScoreSnapshot::new(date, rollup.percent));
            failures.extend(
                rollup
                    .skipped
                    .iter()
                    .map(|(goal_id, err)| MetricFailure::new(goal_id, "rollup", err)),
            );
        }

        if !failures.is_empty() {
            warn!(failures = failures.len(), "rollup history has skipped goals");
        }
        Ok(RollupHistory { points, failures })
    }
}
