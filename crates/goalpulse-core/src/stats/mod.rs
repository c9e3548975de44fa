//! Derived statistics over daily score series
//!
//! This module provides streaks, rolling consistency and deadline
//! projections. All of them are recomputed from the inputs on every call.

mod consistency;
mod projection;
mod streak;

pub use consistency::{consistency, ConsistencyParams};
pub use projection::{project_completion, Projection, MIN_PROJECTION_POINTS};
pub use streak::{streak, StreakState};

use crate::error::{CoreError, Result};
use crate::score::ScoreSnapshot;

fn check_threshold(threshold: f64) -> Result<()> {
    if (0.0..=100.0).contains(&threshold) {
        Ok(())
    } else {
        Err(CoreError::invalid(
            "threshold",
            format!("must be within 0..=100, got {threshold}"),
        ))
    }
}

fn check_ordered(series: &[ScoreSnapshot]) -> Result<()> {
    match series.windows(2).find(|w| w[1].date <= w[0].date) {
        Some(w) => Err(CoreError::invalid(
            "series",
            format!(
                "dates must be strictly ascending ({} then {})",
                w[0].date, w[1].date
            ),
        )),
        None => Ok(()),
    }
}
