//! Configuration types for the engine.

use pyo3::prelude::*;
use std::str::FromStr;

use crate::grid::{format_hhmm, Minute};

/// Engine tunables. Staffing policy lives in `SchedulingRules`, not here.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// First slot start (minute of day)
    #[pyo3(get, set)]
    pub day_start: Minute,
    /// Slots start strictly before this minute
    #[pyo3(get, set)]
    pub day_end: Minute,
    /// Slot length in minutes
    #[pyo3(get, set)]
    pub slot_minutes: Minute,
    /// Label forced onto lunch windows
    #[pyo3(get, set)]
    pub lunch_task: String,
    /// Coverage task order: "fixed" or "configured"
    #[pyo3(get, set)]
    pub allocation_order: String,
    /// Treatment of absent slots between equal labels: "split" or "bridge"
    #[pyo3(get, set)]
    pub gap_policy: String,
    /// Emit events whose task label is empty
    #[pyo3(get, set)]
    pub emit_unlabeled: bool,
    /// Collect understaffed (slot, task) pairs into `ScheduleResult.shortfalls`
    #[pyo3(get, set)]
    pub report_shortfalls: bool,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            day_start: 7 * 60,
            day_end: 22 * 60,
            slot_minutes: 30,
            lunch_task: "Lunch".to_string(),
            allocation_order: "fixed".to_string(),
            gap_policy: "split".to_string(),
            emit_unlabeled: true,
            report_shortfalls: false,
            verbosity: 0,
        }
    }
}

#[pymethods]
impl EngineConfig {
    #[new]
    #[pyo3(signature = (
        day_start=None,
        day_end=None,
        slot_minutes=None,
        lunch_task=None,
        allocation_order=None,
        gap_policy=None,
        emit_unlabeled=None,
        report_shortfalls=None,
        verbosity=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        day_start: Option<Minute>,
        day_end: Option<Minute>,
        slot_minutes: Option<Minute>,
        lunch_task: Option<String>,
        allocation_order: Option<String>,
        gap_policy: Option<String>,
        emit_unlabeled: Option<bool>,
        report_shortfalls: Option<bool>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            day_start: day_start.unwrap_or(defaults.day_start),
            day_end: day_end.unwrap_or(defaults.day_end),
            slot_minutes: slot_minutes.unwrap_or(defaults.slot_minutes),
            lunch_task: lunch_task.unwrap_or(defaults.lunch_task),
            allocation_order: allocation_order.unwrap_or(defaults.allocation_order),
            gap_policy: gap_policy.unwrap_or(defaults.gap_policy),
            emit_unlabeled: emit_unlabeled.unwrap_or(defaults.emit_unlabeled),
            report_shortfalls: report_shortfalls.unwrap_or(defaults.report_shortfalls),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "EngineConfig(day={}-{}, slot_minutes={}, allocation_order={:?}, gap_policy={:?})",
            format_hhmm(self.day_start),
            format_hhmm(self.day_end),
            self.slot_minutes,
            self.allocation_order,
            self.gap_policy
        )
    }
}

/// Order in which coverage tasks claim employees from a slot's pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocationOrder {
    /// Dispatch, then Reservations. The rules' priority list is ignored.
    Fixed,
    /// The rules' priority list, then any other required task alphabetically.
    Configured,
}

impl AllocationOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Configured => "configured",
        }
    }
}

impl FromStr for AllocationOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "configured" => Ok(Self::Configured),
            other => Err(other.to_string()),
        }
    }
}

/// How the event synthesizer treats slots with no assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GapPolicy {
    /// An absent slot always ends the current run.
    Split,
    /// Absent slots are skipped, so equal labels on both sides merge into one
    /// event and a label change closes the previous event at the new slot.
    Bridge,
}

impl GapPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Split => "split",
            Self::Bridge => "bridge",
        }
    }
}

impl FromStr for GapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "split" => Ok(Self::Split),
            "bridge" => Ok(Self::Bridge),
            other => Err(other.to_string()),
        }
    }
}
