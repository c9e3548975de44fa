//! # Goalpulse Core Library
//!
//! This library is the calculation engine behind Goalpulse's progress rings,
//! streak rings and tier-colored badges. It turns a snapshot of per-day task
//! records into derived metrics and nothing else: it never fetches, caches or
//! persists data, and every call is a pure function of its inputs. "Today" is
//! always passed in by the caller.
//!
//! ## Architecture
//!
//! - **Model**: plain goal/task snapshots in a flat, id-keyed [`GoalStore`]
//! - **Score**: per-task fractions, weighted goal scores, priority rollups,
//!   and the [`Tier`] classifier that owns every display color
//! - **Stats**: streaks, rolling consistency and deadline projections
//! - **Report**: [`ProgressAnalyzer`] assembles everything a dashboard shows
//!
//! ## Key Components
//!
//! - [`fraction`]: one task's completion on one day
//! - [`goal_score`] / [`rollup`]: goal and cross-goal scores
//! - [`tier`]: percent to tier name and color
//! - [`streak`]: current and longest qualifying-day runs
//! - [`consistency`]: simple or recency-weighted adherence
//! - [`project_completion`]: on-track probability for number tasks

pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod score;
pub mod stats;

pub use config::{ConsistencyConfig, EngineConfig, StreakConfig};
pub use error::{ConfigError, CoreError, Result};
pub use model::{DailyEntry, Goal, GoalStore, Priority, Rollup, Task, TaskKind};
pub use report::{
    ConsistencyScore, DashboardReport, GoalReport, MetricFailure, ProgressAnalyzer,
    RollupHistory, TaskProjection,
};
pub use score::{
    fraction, goal_color, goal_score, goal_series, rollup, task_series, tier, ScoreSnapshot,
    Tier, TierInfo,
};
pub use stats::{
    consistency, project_completion, streak, ConsistencyParams, Projection, StreakState,
    MIN_PROJECTION_POINTS,
};
