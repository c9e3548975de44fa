//! Score tiers and their display colors.
//!
//! | Range      | Tier      |
//! |------------|-----------|
//! | [0, 25)    | critical  |
//! | [25, 50)   | low       |
//! | [50, 75)   | medium    |
//! | [75, 90)   | high      |
//! | [90, 100]  | excellent |
//!
//! Every ring, card and badge takes its color from [`Tier::color`].

use serde::{Deserialize, Serialize};

/// One of five score brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Critical,
    Low,
    Medium,
    High,
    Excellent,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Critical,
        Tier::Low,
        Tier::Medium,
        Tier::High,
        Tier::Excellent,
    ];

    /// Classify a percent. Values outside [0, 100] are clamped; NaN is
    /// critical.
    pub fn from_percent(percent: f64) -> Tier {
        if percent.is_nan() {
            return Tier::Critical;
        }
        match percent.clamp(0.0, 100.0) {
            p if p >= 90.0 => Tier::Excellent,
            p if p >= 75.0 => Tier::High,
            p if p >= 50.0 => Tier::Medium,
            p if p >= 25.0 => Tier::Low,
            _ => Tier::Critical,
        }
    }

    /// Inclusive lower bound of the tier, in percent.
    pub fn lower_bound(&self) -> f64 {
        match self {
            Tier::Critical => 0.0,
            Tier::Low => 25.0,
            Tier::Medium => 50.0,
            Tier::High => 75.0,
            Tier::Excellent => 90.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Critical => "critical",
            Tier::Low => "low",
            Tier::Medium => "medium",
            Tier::High => "high",
            Tier::Excellent => "excellent",
        }
    }

    /// Display color token (hex).
    pub fn color(&self) -> &'static str {
        match self {
            Tier::Critical => "#ef4444",
            Tier::Low => "#f97316",
            Tier::Medium => "#eab308",
            Tier::High => "#22c55e",
            Tier::Excellent => "#3b82f6",
        }
    }

    pub fn info(&self) -> TierInfo {
        TierInfo {
            tier: *self,
            name: self.name(),
            color: self.color(),
        }
    }
}

/// Name and color of a tier, as consumed by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierInfo {
    pub tier: Tier,
    pub name: &'static str,
    pub color: &'static str,
}

/// Tier name and color for a percent.
pub fn tier(percent: f64) -> TierInfo {
    Tier::from_percent(percent).info()
}

/// Badge color for a goal's score.
pub fn goal_color(percent: f64) -> &'static str {
    Tier::from_percent(percent).color()
}
