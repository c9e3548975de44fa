//! Integration tests for end-to-end metric scenarios.
//!
//! Each test builds a small goal/task snapshot, runs it through the
//! normalizer, aggregator and stats engines, and checks the numbers a
//! dashboard would draw.

use chrono::{Days, NaiveDate};
use goalpulse_core::{
    consistency, fraction, goal_score, project_completion, streak, task_series, tier,
    ConsistencyParams, CoreError, DailyEntry, Goal, GoalStore, Priority, Task, Tier,
};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

fn nth(n: u64) -> NaiveDate {
    start() + Days::new(n)
}

#[test]
fn test_checkbox_goal_completed_every_day() {
    let history: Vec<DailyEntry> = (0..10).map(|n| DailyEntry::checked(nth(n), true)).collect();
    let store = GoalStore::from_parts(
        vec![Goal::new("morning", Priority::HIGHEST, start())],
        vec![
            Task::checkbox("stretch", "morning", start()).with_history(history.clone()),
            Task::checkbox("journal", "morning", start()).with_history(history),
        ],
    )
    .unwrap();
    let today = nth(9);

    for n in 0..10 {
        assert_eq!(store.goal_score("morning", nth(n), today).unwrap(), 100.0);
    }

    let series = store.goal_series("morning", start(), today, today).unwrap();
    assert_eq!(series.len(), 10);

    let threshold = store.streak_threshold("morning", 80.0).unwrap();
    assert_eq!(threshold, 100.0);

    let state = streak(&series, threshold, today).unwrap();
    assert_eq!(state.current, 10);
    assert_eq!(state.longest, 10);
    assert_eq!(state.last_qualifying_date, Some(today));
}

#[test]
fn test_number_task_ramping_to_target() {
    let values = [5.0, 10.0, 15.0, 20.0, 25.0, 30.0];
    let task = Task::number("pages", "reading", 30.0, start()).with_history(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| DailyEntry::valued(nth(i as u64), *v))
            .collect(),
    );
    let today = nth(5);

    let expected = [1.0 / 6.0, 2.0 / 6.0, 0.5, 4.0 / 6.0, 5.0 / 6.0, 1.0];
    for (i, want) in expected.iter().enumerate() {
        let got = fraction(&task, nth(i as u64), today).unwrap().unwrap();
        assert!((got - want).abs() < 1e-9, "day {}: {got} != {want}", i + 1);
    }
    assert!((fraction(&task, nth(0), today).unwrap().unwrap() - 0.167).abs() < 1e-3);

    let series = task_series(&task, start(), today, today).unwrap();
    let qualifying: Vec<_> = series
        .iter()
        .filter(|s| s.qualifies(100.0))
        .map(|s| s.date)
        .collect();
    assert_eq!(qualifying, vec![nth(5)]);

    let state = streak(&series, 100.0, today).unwrap();
    assert_eq!(state.current, 1);
    assert_eq!(state.longest, 1);
}

#[test]
fn test_single_reporting_task_is_not_diluted() {
    let goal = Goal::new("health", Priority::new(2).unwrap(), start());
    let water = Task::number("water", "health", 8.0, start())
        .with_history(vec![DailyEntry::valued(nth(0), 6.0)]);
    let walk = Task::checkbox("walk", "health", start());
    let sleep = Task::checkbox("sleep", "health", start());

    let score = goal_score(&goal, &[&water, &walk, &sleep], nth(0), nth(0)).unwrap();
    let single = fraction(&water, nth(0), nth(0)).unwrap().unwrap() * 100.0;
    assert!((score - single).abs() < 1e-9);
    assert!((score - 75.0).abs() < 1e-9);
    assert_eq!(tier(score).tier, Tier::High);
}

#[test]
fn test_consistency_for_young_goal() {
    let today = nth(40);
    let created = today - Days::new(4);
    let task = Task::checkbox("floss", "teeth", created).with_history(vec![
        DailyEntry::checked(created, true),
        DailyEntry::checked(created + Days::new(1), true),
        DailyEntry::checked(created + Days::new(2), false),
        DailyEntry::checked(created + Days::new(3), true),
        DailyEntry::checked(today, true),
    ]);

    let series = task_series(&task, created, today, today).unwrap();
    let pct = consistency(&series, &ConsistencyParams::simple(30, 100.0), created, today).unwrap();
    assert!((pct - 80.0).abs() < 1e-9);
}

#[test]
fn test_linear_history_projects_to_target() {
    // value = 2 * day, counting the creation date as day 1
    let task = Task::number("savings", "money", 60.0, start()).with_history(
        (0..10)
            .map(|n| DailyEntry::valued(nth(n), 2.0 * (n as f64 + 1.0)))
            .collect(),
    );

    // 2 * (29 + 1) = 60 on day index 29
    let projection = project_completion(&task, nth(9), Some(nth(29))).unwrap();
    assert!((projection.projected_value - 60.0).abs() < 1e-9);
    assert!(projection.probability >= 0.5);
}

#[test]
fn test_errors_are_local_to_one_metric() {
    let checkbox = Task::checkbox("walk", "health", start())
        .with_history(vec![DailyEntry::checked(nth(0), true)]);

    let projection = project_completion(&checkbox, nth(0), Some(nth(10)));
    assert!(matches!(projection, Err(CoreError::NotApplicable { .. })));

    // The same task still scores and streaks normally.
    assert_eq!(fraction(&checkbox, nth(0), nth(0)).unwrap(), Some(1.0));
    let series = task_series(&checkbox, start(), nth(0), nth(0)).unwrap();
    assert_eq!(streak(&series, 100.0, nth(0)).unwrap().current, 1);
}
