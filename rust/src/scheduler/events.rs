//! Run-length merge of a day's assignment row into generated events.

use chrono::NaiveDate;

use crate::config::GapPolicy;
use crate::grid::{format_hhmm, Minute, TimeGrid};
use crate::interner::{LabelId, LabelInterner};
use crate::models::{EventCategory, ScheduleEvent};
use crate::palette::task_color;

/// A maximal stretch of one label, in minutes of the day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    pub label: LabelId,
    pub start: Minute,
    pub end: Minute,
}

/// Collapse one employee's row into runs.
///
/// Under `Split` an unassigned slot closes the open run. Under `Bridge` unassigned
/// slots are skipped entirely: equal labels across a gap stay one run, and a label
/// change closes the previous run at the start of the new label's slot. Either way
/// the last run ends one slot after its final assigned slot.
pub fn runs(row: &[Option<LabelId>], grid: &TimeGrid, policy: GapPolicy) -> Vec<Run> {
    let mut out = Vec::new();
    // (label, first slot start, last assigned slot)
    let mut open: Option<(LabelId, Minute, usize)> = None;

    for (slot, cell) in row.iter().enumerate() {
        let Some(label) = *cell else {
            if policy == GapPolicy::Split {
                if let Some((label, start, last)) = open.take() {
                    out.push(Run {
                        label,
                        start,
                        end: grid.slot_start(last) + grid.slot_minutes,
                    });
                }
            }
            continue;
        };

        if let Some((current, start, last)) = open {
            if current == label {
                open = Some((current, start, slot));
                continue;
            }
            let end = match policy {
                GapPolicy::Split => grid.slot_start(last) + grid.slot_minutes,
                GapPolicy::Bridge => grid.slot_start(slot),
            };
            out.push(Run {
                label: current,
                start,
                end,
            });
        }
        open = Some((label, grid.slot_start(slot), slot));
    }

    if let Some((label, start, last)) = open {
        out.push(Run {
            label,
            start,
            end: grid.slot_start(last) + grid.slot_minutes,
        });
    }
    out
}

/// Generated events for one employee on one day.
///
/// Runs whose label is empty are dropped unless `emit_unlabeled` is set.
pub fn synthesize(
    row: &[Option<LabelId>],
    grid: &TimeGrid,
    date: NaiveDate,
    employee_id: &str,
    interner: &LabelInterner,
    policy: GapPolicy,
    emit_unlabeled: bool,
) -> Vec<ScheduleEvent> {
    runs(row, grid, policy)
        .into_iter()
        .filter_map(|run| {
            let task = interner.resolve(run.label)?;
            if task.is_empty() && !emit_unlabeled {
                return None;
            }
            Some(ScheduleEvent {
                id: format!(
                    "{}-{}-{}-{}",
                    task,
                    employee_id,
                    date.format("%Y-%m-%d"),
                    format_hhmm(run.start)
                ),
                employee_id: employee_id.to_string(),
                task: task.to_string(),
                start: grid.at(date, run.start),
                end: grid.at(date, run.end),
                category: EventCategory::Generated,
                color_hint: task_color(task).to_string(),
            })
        })
        .collect()
}
