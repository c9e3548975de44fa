//! Qualifying-day streaks.
//!
//! Streaks are recomputed from the full series on every call. There are no
//! stored counters, so replaying or backfilling history cannot corrupt them.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{check_ordered, check_threshold};
use crate::error::Result;
use crate::score::ScoreSnapshot;

/// Current and longest streak of qualifying days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    /// Run ending at the latest snapshot, if that snapshot is from today or
    /// yesterday. Zero otherwise.
    pub current: u32,
    /// Longest run anywhere in the series.
    pub longest: u32,
    pub last_qualifying_date: Option<NaiveDate>,
}

/// Compute the streak of days scoring at least `threshold` percent.
///
/// A day missing from the series breaks the run just like a day below the
/// threshold. `current` survives one day of grace: a series whose latest
/// snapshot is yesterday still reports its run, since today's entry may not
/// exist yet.
///
/// # Errors
/// `InvalidConfiguration` if `threshold` is outside [0, 100] or the series
/// is not strictly ascending by date.
pub fn streak(series: &[ScoreSnapshot], threshold: f64, today: NaiveDate) -> Result<StreakState> {
    check_threshold(threshold)?;
    check_ordered(series)?;

    let mut state = StreakState::default();
    let mut run: u32 = 0;
    let mut previous: Option<NaiveDate> = None;

    for snapshot in series {
        let contiguous = previous.is_some_and(|p| snapshot.date - p == Duration::days(1));
        if !contiguous {
            run = 0;
        }

        if snapshot.qualifies(threshold) {
            run += 1;
            state.last_qualifying_date = Some(snapshot.date);
        } else {
            run = 0;
        }

        state.longest = state.longest.max(run);
        previous = Some(snapshot.date);
    }

    let recent = previous.is_some_and(|last| last <= today && today - last <= Duration::days(1));
    state.current = if recent { run } else { 0 };

    debug!(
        current = state.current,
        longest = state.longest,
        threshold,
        "streak computed"
    );
    Ok(state)
}
