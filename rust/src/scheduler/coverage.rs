//! Coverage allocation for a single slot.
//!
//! Tasks claim employees from the slot's pool one task at a time. A task takes
//! the first `target` employees (in pool order) who can perform it; whoever is
//! left afterwards goes to their own fallback task. No load balancing, no
//! memory of earlier slots.

use crate::config::AllocationOrder;
use crate::grid::Minute;
use crate::models::{CoveragePeriod, Employee};

pub const DISPATCH: &str = "Dispatch";
pub const RESERVATIONS: &str = "Reservations";

/// Task order used by `AllocationOrder::Fixed`.
pub const FIXED_TASK_ORDER: [&str; 2] = [DISPATCH, RESERVATIONS];

/// The coverage period governing a slot, if any.
///
/// Primary applies inside its window; evening applies from its start onwards.
/// Slots before both have no requirements.
pub fn active_period<'r>(
    primary: &'r CoveragePeriod,
    evening: &'r CoveragePeriod,
    minute: Minute,
) -> Option<&'r CoveragePeriod> {
    if primary.window.contains(minute) {
        Some(primary)
    } else if minute >= evening.window.start {
        Some(evening)
    } else {
        None
    }
}

/// Tasks of `period` in the order they claim employees.
pub fn task_order<'r>(
    order: AllocationOrder,
    period: &'r CoveragePeriod,
    priority_order: &'r [String],
) -> Vec<&'r str> {
    match order {
        AllocationOrder::Fixed => FIXED_TASK_ORDER.to_vec(),
        AllocationOrder::Configured => {
            let mut tasks: Vec<&str> = Vec::with_capacity(period.requirements.len());
            for task in priority_order {
                if period.requirements.contains_key(task) && !tasks.contains(&task.as_str()) {
                    tasks.push(task);
                }
            }
            // BTreeMap keys: remaining tasks come out alphabetically
            for task in period.requirements.keys() {
                if !tasks.contains(&task.as_str()) {
                    tasks.push(task);
                }
            }
            tasks
        }
    }
}

/// A task whose eligible supply fell below its target in one slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shortfall<'a> {
    pub task: &'a str,
    pub target: u32,
    pub assigned: u32,
}

/// Outcome of allocating one slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotAllocation<'a> {
    /// (employee index, task label), coverage assignments first.
    pub assignments: Vec<(usize, &'a str)>,
    pub shortfalls: Vec<Shortfall<'a>>,
}

/// Partition `pool` (indices into `employees`, in roster order) across the
/// period's tasks, then send everyone left to their fallback task.
pub fn allocate<'a>(
    pool: &[usize],
    employees: &'a [Employee],
    period: Option<&CoveragePeriod>,
    tasks: &[&'a str],
) -> SlotAllocation<'a> {
    let mut result = SlotAllocation::default();
    let mut remaining: Vec<usize> = pool.to_vec();

    if let Some(period) = period {
        for &task in tasks {
            let target = period.target(task);
            if target == 0 {
                continue;
            }

            let mut assigned = 0u32;
            remaining.retain(|&idx| {
                if assigned < target && employees[idx].has_ability(task) {
                    result.assignments.push((idx, task));
                    assigned += 1;
                    false
                } else {
                    true
                }
            });

            if assigned < target {
                result.shortfalls.push(Shortfall {
                    task,
                    target,
                    assigned,
                });
            }
        }
    }

    for idx in remaining {
        result
            .assignments
            .push((idx, employees[idx].fallback_task.as_str()));
    }

    result
}
