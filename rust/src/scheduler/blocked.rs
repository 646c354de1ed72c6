//! Blocked intervals: per-employee lookup and External event pass-through.

use rustc_hash::FxHashMap;

use crate::models::{BlockedInterval, EventCategory, ScheduleEvent};
use crate::palette::EXTERNAL_COLOR;

/// Blocked intervals grouped by employee identity, in input order.
#[derive(Debug, Default)]
pub struct BlockedIndex<'a> {
    by_employee: FxHashMap<&'a str, Vec<&'a BlockedInterval>>,
}

impl<'a> BlockedIndex<'a> {
    pub fn new(blocked: &'a [BlockedInterval]) -> Self {
        let mut by_employee: FxHashMap<&'a str, Vec<&'a BlockedInterval>> = FxHashMap::default();
        for interval in blocked {
            by_employee
                .entry(interval.employee_id.as_str())
                .or_default()
                .push(interval);
        }
        Self { by_employee }
    }

    pub fn for_employee(&self, employee_id: &str) -> &[&'a BlockedInterval] {
        self.by_employee
            .get(employee_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// The External event for a blocked interval. Times and label pass through unchanged.
pub fn external_event(interval: &BlockedInterval) -> ScheduleEvent {
    let id = if interval.id.is_empty() {
        format!(
            "blocked-{}-{}",
            interval.employee_id,
            interval.start.format("%Y-%m-%dT%H:%M")
        )
    } else {
        format!("{}-{}", interval.id, interval.employee_id)
    };
    ScheduleEvent {
        id,
        employee_id: interval.employee_id.clone(),
        task: interval.label.clone(),
        start: interval.start,
        end: interval.end,
        category: EventCategory::External,
        color_hint: EXTERNAL_COLOR.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn interval(id: &str, employee: &str, label: &str) -> BlockedInterval {
        BlockedInterval {
            id: id.to_string(),
            employee_id: employee.to_string(),
            start: at(15, 10, 0),
            end: at(15, 11, 0),
            label: label.to_string(),
            all_day: false,
        }
    }

    #[test]
    fn test_index_groups_by_employee() {
        let blocked = vec![
            interval("a", "Adam", "Dentist"),
            interval("b", "Beth", "PTO"),
            interval("c", "Adam", "Training"),
        ];
        let index = BlockedIndex::new(&blocked);

        let adam: Vec<&str> = index
            .for_employee("Adam")
            .iter()
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(adam, vec!["Dentist", "Training"]);
        assert_eq!(index.for_employee("Beth").len(), 1);
        assert!(index.for_employee("Zed").is_empty());
    }

    #[test]
    fn test_external_event_passthrough() {
        let event = external_event(&interval("evt42", "Adam", "Team Meeting"));
        assert_eq!(event.id, "evt42-Adam");
        assert_eq!(event.task, "Team Meeting");
        assert_eq!(event.start, at(15, 10, 0));
        assert_eq!(event.end, at(15, 11, 0));
        assert_eq!(event.category, EventCategory::External);
        assert_eq!(event.color_hint, "#dc3545");
    }

    #[test]
    fn test_external_event_without_id() {
        let event = external_event(&interval("", "Beth", "PTO"));
        assert_eq!(event.id, "blocked-Beth-2025-07-15T10:00");
    }
}
