//! Daily score series for streaks and consistency.
//!
//! Only dates with at least one reported entry produce a snapshot. Silent
//! days are left out so the streak and consistency engines see them as
//! non-qualifying gaps.

use chrono::NaiveDate;

use super::{goal_score, fraction, ScoreSnapshot};
use crate::error::Result;
use crate::model::{Goal, Task};

/// Snapshots for `task` on each reported date in `[from, to]`, clipped to
/// the task's lifetime and `today`.
pub fn task_series(
    task: &Task,
    from: NaiveDate,
    to: NaiveDate,
    today: NaiveDate,
) -> Result<Vec<ScoreSnapshot>> {
    let start = from.max(task.created_at);
    let end = to.min(today);

    let mut series = Vec::new();
    for entry in task
        .history
        .iter()
        .filter(|e| e.date >= start && e.date <= end)
    {
        if let Some(f) = fraction(task, entry.date, today)? {
            series.push(ScoreSnapshot::new(entry.date, f * 100.0));
        }
    }
    Ok(series)
}

/// Snapshots for `goal` on each date in `[from, to]` where at least one of
/// its tasks reported, clipped to the goal's lifetime and `today`.
pub fn goal_series(
    goal: &Goal,
    tasks: &[&Task],
    from: NaiveDate,
    to: NaiveDate,
    today: NaiveDate,
) -> Result<Vec<ScoreSnapshot>> {
    let start = from.max(goal.created_at);
    let end = to.min(today);

    let mut dates: Vec<NaiveDate> = tasks
        .iter()
        .flat_map(|&t| {
            let created_at = t.created_at;
            t.history
                .iter()
                .map(|e| e.date)
                .filter(move |d| *d >= created_at)
        })
        .filter(|d| *d >= start && *d <= end)
        .collect();
    dates.sort_unstable();
    dates.dedup();

    dates
        .into_iter()
        .map(|date| Ok(ScoreSnapshot::new(date, goal_score(goal, tasks, date, today)?)))
        .collect()
}
