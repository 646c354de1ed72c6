//! Per-slot availability of an employee.

use chrono::NaiveDateTime;

use crate::grid::Minute;
use crate::models::{BlockedInterval, Employee};

/// Why an employee can or cannot take coverage work in a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotStatus {
    Available,
    OnLunch,
    Blocked,
    OffShift,
}

/// Resolve an employee's status for the slot starting at `at` (minute `minute` of its day).
///
/// Precedence: off shift, then blocked, then lunch. Malformed windows never match.
pub fn resolve(
    employee: &Employee,
    blocked: &[&BlockedInterval],
    at: NaiveDateTime,
    minute: Minute,
) -> SlotStatus {
    if !employee.shift.contains(minute) {
        return SlotStatus::OffShift;
    }
    if blocked.iter().any(|interval| interval.covers(at)) {
        return SlotStatus::Blocked;
    }
    if employee
        .lunch_window()
        .is_some_and(|lunch| lunch.contains(minute))
    {
        return SlotStatus::OnLunch;
    }
    SlotStatus::Available
}
