//! Weekly schedule orchestration.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use std::collections::HashMap;
use thiserror::Error;

use crate::config::{AllocationOrder, EngineConfig, GapPolicy};
use crate::grid::{day_date, format_hhmm, TimeGrid, DAYS_PER_WEEK};
use crate::interner::LabelInterner;
use crate::models::{
    BlockedInterval, CoveragePeriod, CoverageShortfall, Employee, EventCategory, ScheduleEvent,
    ScheduleResult, SchedulingRules,
};
use crate::{log_changes, log_checks, log_debug};

use super::availability::{resolve, SlotStatus};
use super::blocked::{external_event, BlockedIndex};
use super::coverage::{active_period, allocate, task_order};
use super::events::synthesize;
use super::lunch;
use super::state::DayMatrix;

/// Errors that abort a whole generation request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Missing {0} coverage period in scheduling rules")]
    MissingCoveragePeriod(&'static str),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Unknown scheduling strategy: {0}")]
    UnknownStrategy(String),
}

/// One week's schedule over an immutable input snapshot.
pub struct ShiftScheduler<'a> {
    employees: &'a [Employee],
    primary: &'a CoveragePeriod,
    evening: &'a CoveragePeriod,
    priority_order: &'a [String],
    blocked: &'a [BlockedInterval],
    week_start: NaiveDate,

    grid: TimeGrid,
    allocation_order: AllocationOrder,
    gap_policy: GapPolicy,
    lunch_task: &'a str,
    emit_unlabeled: bool,
    report_shortfalls: bool,
    verbosity: u8,
}

impl<'a> ShiftScheduler<'a> {
    /// Validate the rules and config and build a scheduler.
    pub fn new(
        employees: &'a [Employee],
        rules: &'a SchedulingRules,
        blocked: &'a [BlockedInterval],
        week_start: NaiveDate,
        config: &'a EngineConfig,
    ) -> Result<Self, ScheduleError> {
        let primary = rules
            .primary
            .as_ref()
            .ok_or(ScheduleError::MissingCoveragePeriod("primary"))?;
        let evening = rules
            .evening
            .as_ref()
            .ok_or(ScheduleError::MissingCoveragePeriod("evening"))?;

        // Validate strategies upfront
        let allocation_order: AllocationOrder = config
            .allocation_order
            .parse()
            .map_err(ScheduleError::UnknownStrategy)?;
        let gap_policy: GapPolicy = config
            .gap_policy
            .parse()
            .map_err(ScheduleError::UnknownStrategy)?;

        let grid = TimeGrid::new(config.day_start, config.day_end, config.slot_minutes)
            .map_err(ScheduleError::InvalidConfig)?;

        Ok(Self {
            employees,
            primary,
            evening,
            priority_order: &rules.priority_order,
            blocked,
            week_start,
            grid,
            allocation_order,
            gap_policy,
            lunch_task: &config.lunch_task,
            emit_unlabeled: config.emit_unlabeled,
            report_shortfalls: config.report_shortfalls,
            verbosity: config.verbosity,
        })
    }

    /// Run all seven days and merge in the External events.
    pub fn generate(&self) -> ScheduleResult {
        let verbosity = self.verbosity;
        let index = BlockedIndex::new(self.blocked);
        let mut interner = LabelInterner::default();

        let mut events: Vec<ScheduleEvent> = Vec::new();
        let mut shortfalls: Vec<CoverageShortfall> = Vec::new();

        for day in 0..DAYS_PER_WEEK {
            let date = day_date(self.week_start, day);
            let (day_events, day_shortfalls) = self.schedule_day(date, &index, &mut interner);
            log_changes!(
                verbosity,
                "{}: {} events, {} shortfalls",
                date,
                day_events.len(),
                day_shortfalls.len()
            );
            events.extend(day_events);
            shortfalls.extend(day_shortfalls);
        }

        let generated_count = events.len();
        events.extend(self.blocked.iter().map(external_event));
        self.sort_events(&mut events);

        let mut metadata = HashMap::new();
        metadata.insert(
            "allocation_order".to_string(),
            self.allocation_order.as_str().to_string(),
        );
        metadata.insert("gap_policy".to_string(), self.gap_policy.as_str().to_string());
        metadata.insert("days".to_string(), DAYS_PER_WEEK.to_string());
        metadata.insert("employees".to_string(), self.employees.len().to_string());
        metadata.insert("generated_events".to_string(), generated_count.to_string());
        metadata.insert("external_events".to_string(), self.blocked.len().to_string());
        if self.report_shortfalls {
            metadata.insert("shortfalls".to_string(), shortfalls.len().to_string());
        }

        ScheduleResult {
            events,
            shortfalls,
            metadata,
        }
    }

    /// Availability, allocation, lunch and merge for one day.
    fn schedule_day(
        &self,
        date: NaiveDate,
        index: &BlockedIndex<'_>,
        interner: &mut LabelInterner,
    ) -> (Vec<ScheduleEvent>, Vec<CoverageShortfall>) {
        let verbosity = self.verbosity;
        let mut matrix = DayMatrix::new(self.employees.len(), self.grid.slot_count());
        let mut shortfalls = Vec::new();
        let mut pool: Vec<usize> = Vec::with_capacity(self.employees.len());

        for (slot, minute) in self.grid.slots() {
            let at = self.grid.at(date, minute);

            pool.clear();
            pool.extend(self.employees.iter().enumerate().filter_map(|(idx, emp)| {
                let status = resolve(emp, index.for_employee(&emp.id), at, minute);
                (status == SlotStatus::Available).then_some(idx)
            }));

            let period = active_period(self.primary, self.evening, minute);
            let tasks = period
                .map(|p| task_order(self.allocation_order, p, self.priority_order))
                .unwrap_or_default();

            log_debug!(
                verbosity,
                "  {} {}: pool={} period={}",
                date,
                format_hhmm(minute),
                pool.len(),
                match period {
                    Some(p) if std::ptr::eq(p, self.primary) => "primary",
                    Some(_) => "evening",
                    None => "none",
                }
            );

            let allocation = allocate(&pool, self.employees, period, &tasks);
            for (emp_idx, task) in allocation.assignments {
                matrix.assign(emp_idx, slot, interner.intern(task));
            }
            for shortfall in allocation.shortfalls {
                let shortfall = CoverageShortfall {
                    date,
                    slot_start: at,
                    task: shortfall.task.to_string(),
                    target: shortfall.target,
                    assigned: shortfall.assigned,
                };
                log_checks!(
                    verbosity,
                    "  Understaffed {} at {} {}: {}/{}, {} missing",
                    shortfall.task,
                    date,
                    format_hhmm(minute),
                    shortfall.assigned,
                    shortfall.target,
                    shortfall.missing()
                );
                if self.report_shortfalls {
                    shortfalls.push(shortfall);
                }
            }
        }

        let lunch_id = interner.intern(self.lunch_task);
        lunch::apply(&mut matrix, self.employees, &self.grid, lunch_id);

        let mut events = Vec::new();
        for (emp_idx, employee) in self.employees.iter().enumerate() {
            events.extend(synthesize(
                matrix.row(emp_idx),
                &self.grid,
                date,
                &employee.id,
                interner,
                self.gap_policy,
                self.emit_unlabeled,
            ));
        }
        (events, shortfalls)
    }

    /// Day, roster position, start, Generated before External. Stable.
    fn sort_events(&self, events: &mut [ScheduleEvent]) {
        let mut rank: FxHashMap<&str, usize> = FxHashMap::default();
        for (idx, employee) in self.employees.iter().enumerate() {
            rank.entry(employee.id.as_str()).or_insert(idx);
        }
        // identities outside the roster, by first appearance
        let mut next = self.employees.len();
        for interval in self.blocked {
            rank.entry(interval.employee_id.as_str()).or_insert_with(|| {
                next += 1;
                next - 1
            });
        }

        let last_day = i64::from(DAYS_PER_WEEK) - 1;
        let week_start = self.week_start;
        events.sort_by_key(|event| {
            let day = (event.start.date() - week_start)
                .num_days()
                .clamp(0, last_day);
            let category = match event.category {
                EventCategory::Generated => 0u8,
                EventCategory::External => 1,
            };
            (
                day,
                rank.get(event.employee_id.as_str()).copied().unwrap_or(usize::MAX),
                event.start,
                category,
            )
        });
    }
}

/// Generate one week of events starting at `week_start`.
///
/// A missing coverage period or an invalid config aborts the whole request: the
/// caller gets the error and no events.
pub fn generate(
    employees: &[Employee],
    rules: &SchedulingRules,
    blocked: &[BlockedInterval],
    week_start: NaiveDate,
    config: &EngineConfig,
) -> Result<ScheduleResult, ScheduleError> {
    match ShiftScheduler::new(employees, rules, blocked, week_start, config) {
        Ok(scheduler) => Ok(scheduler.generate()),
        Err(err) => {
            log_changes!(config.verbosity, "Schedule generation aborted: {}", err);
            Err(err)
        }
    }
}
