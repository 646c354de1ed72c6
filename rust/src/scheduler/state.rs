//! Dense per-day assignment matrix.

use crate::interner::LabelId;

/// Employee x slot grid of task labels for one day.
///
/// Every cell holds at most one label; `None` means the slot is unassigned
/// (off shift or blocked). Built and dropped within a single day.
#[derive(Clone, Debug)]
pub struct DayMatrix {
    slots_per_day: usize,
    cells: Vec<Option<LabelId>>,
}

impl DayMatrix {
    pub fn new(employees: usize, slots_per_day: usize) -> Self {
        Self {
            slots_per_day,
            cells: vec![None; employees * slots_per_day],
        }
    }

    /// Set (or overwrite) the label of one cell.
    #[inline]
    pub fn assign(&mut self, employee: usize, slot: usize, label: LabelId) {
        let idx = employee * self.slots_per_day + slot;
        self.cells[idx] = Some(label);
    }

    /// All slots of one employee, in time order.
    pub fn row(&self, employee: usize) -> &[Option<LabelId>] {
        let start = employee * self.slots_per_day;
        &self.cells[start..start + self.slots_per_day]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_overwrites_single_cell() {
        let mut m = DayMatrix::new(2, 4);
        m.assign(1, 2, 7);
        m.assign(1, 2, 9);
        assert_eq!(m.row(1), &[None, None, Some(9), None]);
        assert_eq!(m.row(0), &[None; 4]);
    }

    #[test]
    fn test_rows_do_not_bleed() {
        let mut m = DayMatrix::new(3, 2);
        m.assign(0, 1, 4);
        m.assign(1, 0, 5);
        m.assign(2, 1, 4);
        assert_eq!(m.row(0), &[None, Some(4)]);
        assert_eq!(m.row(1), &[Some(5), None]);
        assert_eq!(m.row(2), &[None, Some(4)]);
    }
}
