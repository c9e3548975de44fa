//! Plain data handed to the engine by the data-access layer.
//!
//! Everything here is a snapshot: the engine reads it and never mutates it.

mod goal;
mod store;
mod task;

pub use goal::{Goal, Priority};
pub use store::{GoalStore, Rollup};
pub use task::{DailyEntry, Task, TaskKind};
