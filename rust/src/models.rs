//! Core data types for the shift-coverage engine.
//!
//! Inputs (`Employee`, `SchedulingRules`, `BlockedInterval`) are read-only
//! snapshots for a single generation call; outputs (`ScheduleEvent`,
//! `ScheduleResult`) belong to the caller once returned.

use chrono::{NaiveDate, NaiveDateTime};
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::grid::{format_hhmm, TimeWindow};

// Note: std collections here for PyO3 interface compatibility

/// A schedulable staff member.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct Employee {
    /// Unique identity (the roster name).
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub shift: TimeWindow,
    /// `None` or an empty window means no lunch.
    #[pyo3(get, set)]
    pub lunch: Option<TimeWindow>,
    /// Informational only.
    #[pyo3(get, set)]
    pub weekly_hours: f64,
    #[pyo3(get, set)]
    pub abilities: Vec<String>,
    /// Task performed whenever coverage does not need this employee.
    #[pyo3(get, set)]
    pub fallback_task: String,
    /// Informational only, never enforced.
    #[pyo3(get, set)]
    pub specialist_target: f64,
    #[pyo3(get, set)]
    pub email: Option<String>,
}

impl Employee {
    pub fn has_ability(&self, task: &str) -> bool {
        self.abilities.iter().any(|a| a == task)
    }

    /// The lunch window if it can match any minute.
    pub fn lunch_window(&self) -> Option<TimeWindow> {
        self.lunch.filter(|w| !w.is_empty())
    }
}

#[pymethods]
impl Employee {
    #[new]
    #[pyo3(signature = (
        id,
        shift,
        abilities,
        fallback_task,
        lunch=None,
        weekly_hours=0.0,
        specialist_target=0.0,
        email=None
    ))]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        shift: TimeWindow,
        abilities: Vec<String>,
        fallback_task: String,
        lunch: Option<TimeWindow>,
        weekly_hours: f64,
        specialist_target: f64,
        email: Option<String>,
    ) -> Self {
        Self {
            id,
            shift,
            lunch,
            weekly_hours,
            abilities,
            fallback_task,
            specialist_target,
            email,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Employee(id={:?}, shift={}-{}, abilities={}, fallback={:?})",
            self.id,
            format_hhmm(self.shift.start),
            format_hhmm(self.shift.end),
            self.abilities.len(),
            self.fallback_task
        )
    }
}

/// A time-of-day window with per-task headcount targets.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct CoveragePeriod {
    #[pyo3(get, set)]
    pub window: TimeWindow,
    /// task -> target headcount
    #[pyo3(get, set)]
    pub requirements: BTreeMap<String, u32>,
}

impl CoveragePeriod {
    /// Target headcount for `task` (0 when the period does not mention it).
    pub fn target(&self, task: &str) -> u32 {
        self.requirements.get(task).copied().unwrap_or(0)
    }
}

#[pymethods]
impl CoveragePeriod {
    #[new]
    #[pyo3(signature = (window, requirements=None))]
    pub fn new(window: TimeWindow, requirements: Option<BTreeMap<String, u32>>) -> Self {
        Self {
            window,
            requirements: requirements.unwrap_or_default(),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "CoveragePeriod({}-{}, requirements={:?})",
            format_hhmm(self.window.start),
            format_hhmm(self.window.end),
            self.requirements
        )
    }
}

/// Advisory per-task limits. Carried with the rules but not consulted by the allocator.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskLimits {
    #[pyo3(get, set)]
    pub min: Option<u32>,
    #[pyo3(get, set)]
    pub max: Option<u32>,
}

#[pymethods]
impl TaskLimits {
    #[new]
    #[pyo3(signature = (min=None, max=None))]
    fn new(min: Option<u32>, max: Option<u32>) -> Self {
        Self { min, max }
    }
}

/// Staffing policy snapshot.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchedulingRules {
    #[pyo3(get, set)]
    pub primary: Option<CoveragePeriod>,
    #[pyo3(get, set)]
    pub evening: Option<CoveragePeriod>,
    #[pyo3(get, set)]
    pub limits: BTreeMap<String, TaskLimits>,
    /// Ordered priority list. Only read when the allocation order is "configured".
    #[pyo3(get, set)]
    pub priority_order: Vec<String>,
}

#[pymethods]
impl SchedulingRules {
    #[new]
    #[pyo3(signature = (primary=None, evening=None, limits=None, priority_order=None))]
    pub fn new(
        primary: Option<CoveragePeriod>,
        evening: Option<CoveragePeriod>,
        limits: Option<BTreeMap<String, TaskLimits>>,
        priority_order: Option<Vec<String>>,
    ) -> Self {
        Self {
            primary,
            evening,
            limits: limits.unwrap_or_default(),
            priority_order: priority_order.unwrap_or_default(),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "SchedulingRules(primary={}, evening={}, priority_order={:?})",
            self.primary.is_some(),
            self.evening.is_some(),
            self.priority_order
        )
    }
}

/// A range during which an employee is unavailable (PTO, meeting).
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct BlockedInterval {
    /// Upstream calendar id; may be empty.
    #[pyo3(get, set)]
    pub id: String,
    /// Already-resolved employee identity.
    #[pyo3(get, set)]
    pub employee_id: String,
    #[pyo3(get, set)]
    pub start: NaiveDateTime,
    #[pyo3(get, set)]
    pub end: NaiveDateTime,
    #[pyo3(get, set)]
    pub label: String,
    #[pyo3(get, set)]
    pub all_day: bool,
}

impl BlockedInterval {
    #[inline]
    pub fn covers(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at < self.end
    }
}

#[pymethods]
impl BlockedInterval {
    #[new]
    #[pyo3(signature = (employee_id, start, end, label, all_day=false, id=None))]
    pub fn new(
        employee_id: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
        label: String,
        all_day: bool,
        id: Option<String>,
    ) -> Self {
        Self {
            id: id.unwrap_or_default(),
            employee_id,
            start,
            end,
            label,
            all_day,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "BlockedInterval(employee_id={:?}, start={}, end={}, label={:?})",
            self.employee_id, self.start, self.end, self.label
        )
    }
}

/// Origin of an output event.
#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Generated,
    External,
}

/// An output task interval.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub employee_id: String,
    #[pyo3(get, set)]
    pub task: String,
    #[pyo3(get, set)]
    pub start: NaiveDateTime,
    #[pyo3(get, set)]
    pub end: NaiveDateTime,
    #[pyo3(get, set)]
    pub category: EventCategory,
    #[pyo3(get, set)]
    pub color_hint: String,
}

#[pymethods]
impl ScheduleEvent {
    fn __repr__(&self) -> String {
        format!(
            "ScheduleEvent(employee_id={:?}, task={:?}, start={}, end={}, category={:?})",
            self.employee_id, self.task, self.start, self.end, self.category
        )
    }
}

/// A (slot, task) pair where fewer eligible employees were available than the target.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageShortfall {
    #[pyo3(get)]
    pub date: NaiveDate,
    #[pyo3(get)]
    pub slot_start: NaiveDateTime,
    #[pyo3(get)]
    pub task: String,
    #[pyo3(get)]
    pub target: u32,
    #[pyo3(get)]
    pub assigned: u32,
}

impl CoverageShortfall {
    pub fn missing(&self) -> u32 {
        self.target.saturating_sub(self.assigned)
    }
}

#[pymethods]
impl CoverageShortfall {
    fn __repr__(&self) -> String {
        format!(
            "CoverageShortfall(slot_start={}, task={:?}, assigned={}/{})",
            self.slot_start, self.task, self.assigned, self.target
        )
    }
}

/// Result of one generation call.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleResult {
    #[pyo3(get)]
    pub events: Vec<ScheduleEvent>,
    #[pyo3(get)]
    pub shortfalls: Vec<CoverageShortfall>,
    #[pyo3(get)]
    pub metadata: HashMap<String, String>,
}

impl ScheduleResult {
    /// Events belonging to one employee, in output order.
    pub fn events_for<'a>(&'a self, employee_id: &'a str) -> impl Iterator<Item = &'a ScheduleEvent> {
        self.events
            .iter()
            .filter(move |e| e.employee_id == employee_id)
    }
}

#[pymethods]
impl ScheduleResult {
    fn __repr__(&self) -> String {
        format!(
            "ScheduleResult(events={}, shortfalls={}, metadata_keys={})",
            self.events.len(),
            self.shortfalls.len(),
            self.metadata.len()
        )
    }
}
