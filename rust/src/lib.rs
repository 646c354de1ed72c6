//! Shift-coverage scheduling engine with Python bindings.
//!
//! Given employee profiles, staffing rules and externally blocked intervals,
//! the engine assigns every employee a task for each half-hour slot of a week
//! and compresses the result into task intervals.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDate;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

mod config;
pub mod grid;
mod interner;
pub mod logging;
mod models;
mod palette;
pub mod records;
pub mod scheduler;

pub use config::{AllocationOrder, EngineConfig, GapPolicy};
pub use grid::{TimeGrid, TimeWindow};
pub use interner::{LabelId, LabelInterner};
pub use models::{
    BlockedInterval, CoveragePeriod, CoverageShortfall, Employee, EventCategory, ScheduleEvent,
    ScheduleResult, SchedulingRules, TaskLimits,
};
pub use palette::{task_color, DEFAULT_COLOR, EXTERNAL_COLOR};
pub use records::RecordError;
pub use scheduler::{generate, ScheduleError, ShiftScheduler};

/// Generate one week of schedule events.
///
/// # Arguments
/// * `employees` - Roster in display order
/// * `rules` - Coverage periods and priority list
/// * `blocked` - Blocked intervals already resolved to employee ids
/// * `week_start` - First day of the week
/// * `config` - Engine configuration (defaults when omitted)
///
/// # Returns
/// * ScheduleResult with ordered events, coverage shortfalls and metadata
///
/// # Raises
/// * ValueError if a coverage period is missing or the config is invalid
#[pyfunction]
#[pyo3(signature = (employees, rules, blocked, week_start, config=None))]
fn generate_schedule(
    employees: Vec<Employee>,
    rules: SchedulingRules,
    blocked: Vec<BlockedInterval>,
    week_start: NaiveDate,
    config: Option<EngineConfig>,
) -> PyResult<ScheduleResult> {
    let config = config.unwrap_or_default();
    generate(&employees, &rules, &blocked, week_start, &config)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Generate one week of schedule events from JSON records.
///
/// Accepts the persisted store shapes or flat records for employees and rules,
/// and an array of blocked intervals.
///
/// # Returns
/// * JSON object `{events, shortfalls, metadata}`
///
/// # Raises
/// * ValueError on malformed records, a missing coverage period or an invalid config
#[pyfunction]
#[pyo3(signature = (employees_json, rules_json, blocked_json, week_start, config=None))]
fn generate_schedule_json(
    employees_json: &str,
    rules_json: &str,
    blocked_json: &str,
    week_start: NaiveDate,
    config: Option<EngineConfig>,
) -> PyResult<String> {
    let to_py = |e: RecordError| PyValueError::new_err(e.to_string());

    let employees = records::parse_employees(employees_json).map_err(to_py)?;
    let rules = records::parse_rules(rules_json).map_err(to_py)?;
    let blocked = records::parse_blocked_intervals(blocked_json).map_err(to_py)?;
    let config = config.unwrap_or_default();

    let result = generate(&employees, &rules, &blocked, week_start, &config)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    records::result_to_json(&result).map_err(to_py)
}

/// The shiftgrid.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<TimeWindow>()?;
    m.add_class::<Employee>()?;
    m.add_class::<CoveragePeriod>()?;
    m.add_class::<TaskLimits>()?;
    m.add_class::<SchedulingRules>()?;
    m.add_class::<BlockedInterval>()?;
    m.add_class::<EventCategory>()?;
    m.add_class::<ScheduleEvent>()?;
    m.add_class::<CoverageShortfall>()?;
    m.add_class::<ScheduleResult>()?;

    // Config types
    m.add_class::<EngineConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(generate_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(generate_schedule_json, m)?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_pipeline_matches_typed_pipeline() {
        let employees_json = r#"{
            "Adam": {"shift": {"start": "09:00", "end": "17:00"},
                     "lunch": {"start": "12:00", "end": "13:00"},
                     "abilities": ["Reservations"], "specialistTask": "Reservations"}
        }"#;
        let rules_json = r#"{"coverage": {
            "primary": {"start": "08:00", "end": "17:00", "requirements": {"Reservations": 1}},
            "evening": {"start": "17:00", "end": "22:00", "requirements": {}}
        }}"#;
        let blocked_json = r#"[{"id": "evt1", "employeeId": "Adam",
            "start": "2025-07-14T10:00:00", "end": "2025-07-14T10:30:00", "title": "Dentist"}]"#;
        let week_start = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();

        let employees = records::parse_employees(employees_json).unwrap();
        let rules = records::parse_rules(rules_json).unwrap();
        let blocked = records::parse_blocked_intervals(blocked_json).unwrap();
        let result =
            generate(&employees, &rules, &blocked, week_start, &EngineConfig::default()).unwrap();

        let monday: Vec<(&str, String, String)> = result
            .events
            .iter()
            .filter(|e| e.start.date() == week_start)
            .map(|e| {
                (
                    e.task.as_str(),
                    e.start.format("%H:%M").to_string(),
                    e.end.format("%H:%M").to_string(),
                )
            })
            .collect();
        assert_eq!(
            monday,
            vec![
                ("Reservations", "09:00".to_string(), "10:00".to_string()),
                ("Dentist", "10:00".to_string(), "10:30".to_string()),
                ("Reservations", "10:30".to_string(), "12:00".to_string()),
                ("Lunch", "12:00".to_string(), "13:00".to_string()),
                ("Reservations", "13:00".to_string(), "17:00".to_string()),
            ]
        );

        let json = generate_schedule_json(
            employees_json,
            rules_json,
            blocked_json,
            week_start,
            None,
        )
        .unwrap();
        assert_eq!(json, records::result_to_json(&result).unwrap());
    }

    #[test]
    fn test_missing_period_from_records() {
        let rules = records::parse_rules(r#"{"coverage": {"evening": {"requirements": {}}}}"#)
            .unwrap();
        let week_start = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
        let err = generate(&[], &rules, &[], week_start, &EngineConfig::default()).unwrap_err();
        assert_eq!(err, ScheduleError::MissingCoveragePeriod("primary"));
        assert_eq!(
            err.to_string(),
            "Missing primary coverage period in scheduling rules"
        );
    }
}
