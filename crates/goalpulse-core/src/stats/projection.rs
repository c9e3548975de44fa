//! On-track estimate for number tasks.
//!
//! A number task's `value` is cumulative progress toward its target. Fits an
//! ordinary least squares line to those values against days since creation, extrapolates it to the deadline, and
//! turns the residual spread into a one-sided probability of reaching the
//! target. The result is an estimate, not a guarantee.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::model::Task;

/// Points needed to fit a line.
pub const MIN_PROJECTION_POINTS: usize = 2;

/// Relative size below which the residual spread is treated as zero.
const RESIDUAL_EPSILON: f64 = 1e-9;

/// Trend extrapolation for one task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Chance of reaching the target by the deadline (0.0 to 1.0)
    pub probability: f64,
    /// Value the trend predicts at the deadline
    pub projected_value: f64,
    /// Fitted growth of the value per day
    pub slope_per_day: f64,
    /// Standard error of the fit, 0 for an exact line
    pub residual_std_dev: f64,
    /// Number of history points used
    pub points: usize,
}

impl Projection {
    pub fn is_on_track(&self) -> bool {
        self.probability >= 0.5
    }
}

/// Estimate whether `task` reaches its target by `deadline`, using history
/// up to and including `as_of`.
///
/// # Errors
/// * `NotApplicable` for checkbox tasks or when there is no deadline
/// * `InvalidConfiguration` if the task breaks its own invariants
/// * `OutOfRange` if `as_of` is before the task was created
/// * `InsufficientData` with fewer than two history points
pub fn project_completion(
    task: &Task,
    as_of: NaiveDate,
    deadline: Option<NaiveDate>,
) -> Result<Projection> {
    if task.kind.is_checkbox() {
        return Err(CoreError::not_applicable(
            &task.id,
            "checkbox tasks have no numeric target",
        ));
    }
    let Some(deadline) = deadline else {
        return Err(CoreError::not_applicable(&task.id, "no deadline set"));
    };
    task.validate()?;
    let target = task.checked_target()?.ok_or_else(|| {
        CoreError::not_applicable(&task.id, "task has no numeric target")
    })?;

    if as_of < task.created_at {
        return Err(CoreError::OutOfRange {
            entity_id: task.id.clone(),
            date: as_of,
            start: task.created_at,
            end: deadline.max(task.created_at),
        });
    }

    let points: Vec<(f64, f64)> = task
        .history
        .iter()
        .filter(|e| e.date >= task.created_at && e.date <= as_of)
        .map(|e| ((e.date - task.created_at).num_days() as f64, e.value))
        .collect();

    if points.len() < MIN_PROJECTION_POINTS {
        return Err(CoreError::InsufficientData {
            entity_id: task.id.clone(),
            points: points.len(),
            required: MIN_PROJECTION_POINTS,
        });
    }

    let fit = LinearFit::from_points(&points);
    let x_deadline = (deadline - task.created_at).num_days() as f64;
    let projected_value = fit.predict(x_deadline);

    let scale = target.abs().max(projected_value.abs()).max(1.0);
    let probability = if fit.residual_std_dev <= RESIDUAL_EPSILON * scale {
        if projected_value >= target - RESIDUAL_EPSILON * scale {
            1.0
        } else {
            0.0
        }
    } else {
        normal_cdf((projected_value - target) / fit.residual_std_dev)
    };

    debug!(
        task_id = %task.id,
        %as_of,
        %deadline,
        projected_value,
        probability,
        "projection computed"
    );

    Ok(Projection {
        probability: probability.clamp(0.0, 1.0),
        projected_value,
        slope_per_day: fit.slope,
        residual_std_dev: fit.residual_std_dev,
        points: points.len(),
    })
}

/// Ordinary least squares line `y = intercept + slope * x`.
struct LinearFit {
    slope: f64,
    intercept: f64,
    residual_std_dev: f64,
}

impl LinearFit {
    /// Requires at least two points with distinct x.
    fn from_points(points: &[(f64, f64)]) -> Self {
        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let (sxx, sxy) = points.iter().fold((0.0, 0.0), |(sxx, sxy), (x, y)| {
            let dx = x - mean_x;
            (sxx + dx * dx, sxy + dx * (y - mean_y))
        });

        let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
        let intercept = mean_y - slope * mean_x;

        // n - 2 degrees of freedom; two points always fit exactly.
        let residual_std_dev = if points.len() > 2 {
            let ssr: f64 = points
                .iter()
                .map(|(x, y)| {
                    let r = y - (intercept + slope * x);
                    r * r
                })
                .sum();
            (ssr / (n - 2.0)).sqrt()
        } else {
            0.0
        };

        Self {
            slope,
            intercept,
            residual_std_dev,
        }
    }

    fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Standard normal CDF.
fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// Abramowitz & Stegun 7.1.26, absolute error below 1.5e-7.
fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DailyEntry;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn savings(values: &[(u32, f64)], target: f64) -> Task {
        Task::number("save", "money", target, day(1)).with_history(
            values
                .iter()
                .map(|(d, v)| DailyEntry::valued(day(*d), *v))
                .collect(),
        )
    }

    #[test]
    fn test_normal_cdf_reference_points() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-6);
        assert!((normal_cdf(1.96) - 0.975).abs() < 1e-3);
        assert!((normal_cdf(-1.96) - 0.025).abs() < 1e-3);
        assert!(normal_cdf(8.0) > 0.999_999);
    }

    #[test]
    fn test_exact_line_hits_target() {
        // value = 2 * (x + 1) on days 0..=3
        let task = savings(&[(1, 2.0), (2, 4.0), (3, 6.0), (4, 8.0)], 20.0);
        // day 10 is x = 9 -> 2 * 9 + 2 = 20
        let p = project_completion(&task, day(4), Some(day(10))).unwrap();
        assert!((p.projected_value - 20.0).abs() < 1e-9);
        assert!((p.slope_per_day - 2.0).abs() < 1e-9);
        assert!(p.probability >= 0.5);
        assert!(p.is_on_track());
    }

    #[test]
    fn test_exact_line_falls_short() {
        let task = savings(&[(1, 1.0), (2, 2.0), (3, 3.0)], 100.0);
        let p = project_completion(&task, day(3), Some(day(10))).unwrap();
        assert_eq!(p.probability, 0.0);
    }

    #[test]
    fn test_noisy_history_gives_partial_confidence() {
        // trend 1.4 + 0.3x predicts 4.1 on day 10, residual spread about 1.74
        let task = savings(&[(1, 1.0), (2, 3.0), (3, 0.0), (4, 4.0), (5, 2.0)], 5.0);
        let p = project_completion(&task, day(5), Some(day(10))).unwrap();
        assert!(p.residual_std_dev > 0.0);
        assert!(p.probability > 0.0 && p.probability < 1.0);
    }

    #[test]
    fn test_history_after_as_of_is_ignored() {
        let task = savings(&[(1, 2.0), (2, 4.0), (3, 50.0)], 20.0);
        let p = project_completion(&task, day(2), Some(day(10))).unwrap();
        assert_eq!(p.points, 2);
        assert!((p.slope_per_day - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_not_applicable_shapes() {
        let checkbox = Task::checkbox("walk", "health", day(1));
        assert!(matches!(
            project_completion(&checkbox, day(2), Some(day(10))),
            Err(CoreError::NotApplicable { .. })
        ));

        let no_deadline = savings(&[(1, 2.0), (2, 2.0)], 20.0);
        assert!(matches!(
            project_completion(&no_deadline, day(2), None),
            Err(CoreError::NotApplicable { .. })
        ));
    }

    #[test]
    fn test_steady_value_is_not_on_track() {
        // Holding at 5 never reaches 30.
        let task = savings(&[(1, 5.0), (2, 5.0), (3, 5.0), (4, 5.0)], 30.0);
        let p = project_completion(&task, day(4), Some(day(20))).unwrap();
        assert!((p.projected_value - 5.0).abs() < 1e-9);
        assert_eq!(p.probability, 0.0);
        assert!(!p.is_on_track());
    }

    #[test]
    fn test_ramp_projects_linear_value() {
        let task = savings(&[(1, 5.0), (2, 10.0), (3, 15.0), (4, 20.0)], 30.0);
        let p = project_completion(&task, day(4), Some(day(6))).unwrap();
        assert!((p.projected_value - 30.0).abs() < 1e-9);
        assert!(p.is_on_track());
    }

    #[test]
    fn test_malformed_history_is_rejected() {
        let duplicated = savings(&[(1, 2.0), (1, 4.0), (2, 6.0)], 20.0);
        assert!(matches!(
            project_completion(&duplicated, day(2), Some(day(10))),
            Err(CoreError::InvalidConfiguration { ref field, .. }) if field == "history"
        ));

        let negative = savings(&[(1, 2.0), (2, -4.0)], 20.0);
        assert!(matches!(
            project_completion(&negative, day(2), Some(day(10))),
            Err(CoreError::InvalidConfiguration { ref field, .. }) if field == "value"
        ));
    }

    #[test]
    fn test_insufficient_data() {
        let task = savings(&[(1, 2.0)], 20.0);
        assert_eq!(
            project_completion(&task, day(5), Some(day(10))).unwrap_err(),
            CoreError::InsufficientData {
                entity_id: "save".into(),
                points: 1,
                required: 2,
            }
        );
    }

    #[test]
    fn test_as_of_before_creation() {
        let task = Task::number("save", "money", 20.0, day(5));
        assert!(matches!(
            project_completion(&task, day(4), Some(day(10))),
            Err(CoreError::OutOfRange { .. })
        ));
    }
}
