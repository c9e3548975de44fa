//! Rolling-window adherence.
//!
//! Two modes share one window definition: the last `window_days` days ending
//! today, cut off at the entity's creation date so a young goal is not
//! penalized for days before it existed.
//!
//! - **Simple**: share of available days that qualified.
//! - **Recency-weighted**: each day weighs `2^(-days_ago / half_life)`,
//!   normalized by the weight of the available days.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use super::{check_ordered, check_threshold};
use crate::error::{CoreError, Result};
use crate::score::ScoreSnapshot;

/// Window, optional half-life and qualifying threshold for one
/// consistency figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyParams {
    pub window_days: i64,
    /// Enables recency weighting when set.
    pub half_life_days: Option<f64>,
    /// Percent a day must reach to count (0.0 to 100.0).
    pub threshold: f64,
}

impl ConsistencyParams {
    pub fn simple(window_days: i64, threshold: f64) -> Self {
        Self {
            window_days,
            half_life_days: None,
            threshold,
        }
    }

    pub fn weighted(window_days: i64, half_life_days: f64, threshold: f64) -> Self {
        Self {
            window_days,
            half_life_days: Some(half_life_days),
            threshold,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_days <= 0 {
            return Err(CoreError::invalid(
                "window_days",
                format!("must be positive, got {}", self.window_days),
            ));
        }
        if let Some(h) = self.half_life_days {
            if !(h.is_finite() && h > 0.0) {
                return Err(CoreError::invalid(
                    "half_life_days",
                    format!("must be positive, got {h}"),
                ));
            }
        }
        check_threshold(self.threshold)
    }
}

/// Consistency percent in [0, 100] over the window ending `today`.
///
/// Days missing from `series` count as non-qualifying. When the window holds
/// no day on or after `created_at` the result is `0.0`.
///
/// # Errors
/// `InvalidConfiguration` for a non-positive window or half-life, a
/// threshold outside [0, 100], or an unordered series.
pub fn consistency(
    series: &[ScoreSnapshot],
    params: &ConsistencyParams,
    created_at: NaiveDate,
    today: NaiveDate,
) -> Result<f64> {
    params.validate()?;
    check_ordered(series)?;

    let qualifying: HashSet<NaiveDate> = series
        .iter()
        .filter(|s| s.qualifies(params.threshold))
        .map(|s| s.date)
        .collect();

    let mut earned = 0.0;
    let mut available = 0.0;

    for days_ago in 0..params.window_days {
        let Some(date) = today.checked_sub_days(Days::new(days_ago as u64)) else {
            break;
        };
        if date < created_at {
            break;
        }

        let weight = match params.half_life_days {
            Some(h) => (-(days_ago as f64) / h).exp2(),
            None => 1.0,
        };

        available += weight;
        if qualifying.contains(&date) {
            earned += weight;
        }
    }

    if available == 0.0 {
        return Ok(0.0);
    }

    let percent = (earned / available * 100.0).clamp(0.0, 100.0);
    debug!(
        window_days = params.window_days,
        half_life_days = ?params.half_life_days,
        percent,
        "consistency computed"
    );
    Ok(percent)
}
