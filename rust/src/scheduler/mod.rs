//! Shift-coverage scheduler.
//!
//! For every day of the week and every slot of the day, employees are resolved
//! to an availability status, the available pool is split across the active
//! coverage period's tasks, lunch is forced on top, and each employee's row is
//! merged into events. Blocked intervals are passed through as External events.

mod availability;
mod blocked;
mod core;
mod coverage;
mod events;
mod lunch;
mod state;

pub use availability::{resolve, SlotStatus};
pub use blocked::{external_event, BlockedIndex};
pub use self::core::{generate, ScheduleError, ShiftScheduler};
pub use coverage::{active_period, allocate, task_order, Shortfall, SlotAllocation};
pub use events::{runs, synthesize, Run};
pub use state::DayMatrix;
