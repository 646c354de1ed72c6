//! Lunch post-pass.
//!
//! Runs after coverage allocation and overwrites every grid slot inside an
//! employee's lunch window with the lunch label. It does not look at shift,
//! blocks, or whatever was assigned before.

use crate::grid::TimeGrid;
use crate::interner::LabelId;
use crate::models::Employee;

use super::state::DayMatrix;

/// Force `lunch_label` onto each employee's lunch slots. Returns the number of cells written.
pub fn apply(
    matrix: &mut DayMatrix,
    employees: &[Employee],
    grid: &TimeGrid,
    lunch_label: LabelId,
) -> usize {
    let mut written = 0;
    for (emp_idx, employee) in employees.iter().enumerate() {
        let Some(lunch) = employee.lunch_window() else {
            continue;
        };
        for (slot, minute) in grid.slots() {
            if lunch.contains(minute) {
                matrix.assign(emp_idx, slot, lunch_label);
                written += 1;
            }
        }
    }
    written
}
