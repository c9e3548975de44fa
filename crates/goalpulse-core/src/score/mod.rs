//! Daily scoring: task fractions, goal scores, rollups and tiers.

mod aggregator;
mod normalizer;
mod series;
mod tier;

pub use aggregator::{goal_score, rollup};
pub use normalizer::fraction;
pub use series::{goal_series, task_series};
pub use tier::{goal_color, tier, Tier, TierInfo};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A task or goal score on one date.
///
/// Deserializing goes through [`ScoreSnapshot::new`], so a stored tier is
/// ignored and rederived from the percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredSnapshot")]
pub struct ScoreSnapshot {
    pub date: NaiveDate,
    /// 0.0 to 100.0
    pub percent: f64,
    pub tier: Tier,
}

impl ScoreSnapshot {
    /// Snapshot with the percent clamped to [0, 100] and its tier derived.
    pub fn new(date: NaiveDate, percent: f64) -> Self {
        let percent = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 100.0)
        };
        Self {
            date,
            percent,
            tier: Tier::from_percent(percent),
        }
    }

    pub fn qualifies(&self, threshold: f64) -> bool {
        self.percent >= threshold
    }
}

#[derive(Deserialize)]
struct StoredSnapshot {
    date: NaiveDate,
    percent: f64,
}

impl From<StoredSnapshot> for ScoreSnapshot {
    fn from(stored: StoredSnapshot) -> Self {
        Self::new(stored.date, stored.percent)
    }
}
