//! Per-task daily completion fraction.

use chrono::NaiveDate;
use tracing::trace;

use crate::error::{CoreError, Result};
use crate::model::Task;

/// Completion fraction of `task` on `date`, in [0, 1].
///
/// Returns `Ok(None)` when the task has no entry for `date`. An unreported
/// day is not a zero: aggregation leaves it out of the denominator.
///
/// # Errors
/// * `OutOfRange` if `date` is before the task was created or after `today`
/// * `InvalidConfiguration` if the task breaks its own invariants: a target
///   that is not positive, history out of date order, or a negative value
pub fn fraction(task: &Task, date: NaiveDate, today: NaiveDate) -> Result<Option<f64>> {
    task.validate()?;

    if date < task.created_at || date > today {
        return Err(CoreError::OutOfRange {
            entity_id: task.id.clone(),
            date,
            start: task.created_at,
            end: today,
        });
    }

    let target = task.kind.target();

    let Some(entry) = task.entry_on(date) else {
        trace!(task_id = %task.id, %date, "no entry reported");
        return Ok(None);
    };

    let value = match target {
        None => {
            if entry.completed {
                1.0
            } else {
                0.0
            }
        }
        Some(target) => (entry.value / target).min(1.0),
    };

    Ok(Some(value))
}
