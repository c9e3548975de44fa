//! Goal scores and the cross-goal rollup.

use chrono::NaiveDate;
use tracing::{debug, trace};

use super::normalizer::fraction;
use crate::error::{CoreError, Result};
use crate::model::{Goal, Priority, Task};

/// Score of `goal` on `date` as a percent in [0, 100].
///
/// A weighted mean of the fractions of every task that reported on `date`.
/// Tasks created after `date`, and tasks with no entry for it, are left out
/// of both numerator and denominator. When no task reported the score is
/// `0.0`.
///
/// # Errors
/// * `OutOfRange` if `date` is before the goal was created or after `today`
/// * `InvalidConfiguration` for a task with a bad target or weight
pub fn goal_score(goal: &Goal, tasks: &[&Task], date: NaiveDate, today: NaiveDate) -> Result<f64> {
    if date < goal.created_at || date > today {
        return Err(CoreError::OutOfRange {
            entity_id: goal.id.clone(),
            date,
            start: goal.created_at,
            end: today,
        });
    }

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for task in tasks.iter().filter(|t| t.created_at <= date) {
        if !(task.weight.is_finite() && task.weight > 0.0) {
            return Err(CoreError::invalid(
                "weight",
                format!("task '{}': weight must be positive, got {}", task.id, task.weight),
            ));
        }

        if let Some(f) = fraction(task, date, today)? {
            weighted_sum += task.weight * f;
            total_weight += task.weight;
        }
    }

    if total_weight == 0.0 {
        trace!(goal_id = %goal.id, %date, "no task reported, scoring 0");
        return Ok(0.0);
    }

    let percent = (weighted_sum / total_weight * 100.0).clamp(0.0, 100.0);
    debug!(goal_id = %goal.id, %date, percent, "goal score");
    Ok(percent)
}

/// Priority-weighted mean of goal scores.
///
/// Each goal weighs `6 - priority`; weights are normalized to sum to 1.
/// An empty rollup scores `0.0`.
pub fn rollup(scores: &[(Priority, f64)]) -> Result<f64> {
    if let Some((_, bad)) = scores
        .iter()
        .find(|(_, p)| !(p.is_finite() && (0.0..=100.0).contains(p)))
    {
        return Err(CoreError::invalid(
            "percent",
            format!("goal score must be within 0..=100, got {bad}"),
        ));
    }

    let total_weight: f64 = scores.iter().map(|(p, _)| p.weight()).sum();
    if total_weight == 0.0 {
        return Ok(0.0);
    }

    let percent = scores
        .iter()
        .map(|(priority, score)| priority.weight() / total_weight * score)
        .sum::<f64>();

    Ok(percent.clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DailyEntry;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    #[test]
    fn test_only_reporting_tasks_count() {
        let goal = Goal::new("health", Priority::HIGHEST, day(1));
        let water = Task::number("water", "health", 8.0, day(1))
            .with_history(vec![DailyEntry::valued(day(2), 6.0)]);
        let stretch = Task::checkbox("stretch", "health", day(1));
        let walk = Task::checkbox("walk", "health", day(1));

        let score = goal_score(&goal, &[&water, &stretch, &walk], day(2), day(2)).unwrap();
        assert!((score - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_day_scores_zero() {
        let goal = Goal::new("health", Priority::HIGHEST, day(1));
        let walk = Task::checkbox("walk", "health", day(1));
        assert_eq!(goal_score(&goal, &[&walk], day(1), day(1)).unwrap(), 0.0);
        assert_eq!(goal_score(&goal, &[], day(1), day(1)).unwrap(), 0.0);
    }

    #[test]
    fn test_task_weights() {
        let goal = Goal::new("study", Priority::HIGHEST, day(1));
        let heavy = Task::checkbox("lecture", "study", day(1))
            .with_weight(3.0)
            .with_history(vec![DailyEntry::checked(day(1), true)]);
        let light = Task::checkbox("flashcards", "study", day(1))
            .with_history(vec![DailyEntry::checked(day(1), false)]);

        let score = goal_score(&goal, &[&heavy, &light], day(1), day(1)).unwrap();
        assert!((score - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_task_created_later_is_not_due() {
        let goal = Goal::new("study", Priority::HIGHEST, day(1));
        let early = Task::checkbox("a", "study", day(1))
            .with_history(vec![DailyEntry::checked(day(2), true)]);
        let late = Task::checkbox("b", "study", day(5));

        assert_eq!(goal_score(&goal, &[&early, &late], day(2), day(6)).unwrap(), 100.0);
    }

    #[test]
    fn test_goal_date_range() {
        let goal = Goal::new("study", Priority::HIGHEST, day(3));
        assert!(matches!(
            goal_score(&goal, &[], day(2), day(5)),
            Err(CoreError::OutOfRange { .. })
        ));
        assert!(matches!(
            goal_score(&goal, &[], day(6), day(5)),
            Err(CoreError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_rollup_weights_by_priority() {
        let p1 = Priority::new(1).unwrap();
        let p5 = Priority::new(5).unwrap();

        // weights 5 and 1 -> (5 * 100 + 1 * 40) / 6 = 90
        let score = rollup(&[(p1, 100.0), (p5, 40.0)]).unwrap();
        assert!((score - 90.0).abs() < 1e-9);

        assert_eq!(rollup(&[]).unwrap(), 0.0);
        assert!(rollup(&[(p1, 120.0)]).is_err());
    }
}
