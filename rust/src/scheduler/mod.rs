//! Dependency-resolution scheduler for curriculum ordering.
//!
//! Drains a bucket/frequency-sorted backlog into an emission order where every
//! unit follows its structural prerequisites, applying pull-forward,
//! compound-prefix and opportunistic-unlock reorderings along the way.

mod core;
mod queue;
mod state;

pub use self::core::{schedule, CurriculumScheduler, ScheduleError, ScheduleResult};
