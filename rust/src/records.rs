//! JSON records at the collaborator boundary.
//!
//! Two input dialects are accepted for employees and rules: the persisted
//! store shape (employees keyed by name, rules nested under `coverage`) and a
//! flat record shape. Missing or malformed fields are defaulted or rejected
//! here so the engine only ever sees well-formed values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::grid::{parse_hhmm, Minute, TimeWindow};
use crate::models::{
    BlockedInterval, CoveragePeriod, CoverageShortfall, Employee, ScheduleEvent, ScheduleResult,
    SchedulingRules, TaskLimits,
};

const PRIMARY_WINDOW: (&str, &str) = ("08:00", "17:00");
const EVENING_WINDOW: (&str, &str) = ("17:00", "22:00");

/// Errors raised while reading input records.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid time for {field}: {value:?}")]
    InvalidTime { field: String, value: String },
    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
    #[error("Expected {0}")]
    UnexpectedShape(&'static str),
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct WindowRecord {
    #[serde(default)]
    start: String,
    #[serde(default)]
    end: String,
}

/// Employee as kept in the persisted store, keyed by name.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEmployee {
    shift: WindowRecord,
    #[serde(default)]
    hours: f64,
    #[serde(default)]
    lunch: Option<WindowRecord>,
    #[serde(default)]
    abilities: Vec<String>,
    #[serde(default)]
    specialist_task: String,
    #[serde(default)]
    specialist_target: f64,
    #[serde(default)]
    email: Option<String>,
}

impl StoredEmployee {
    fn into_employee(self, id: String) -> Result<Employee, RecordError> {
        let lunch = self.lunch.unwrap_or_default();
        Ok(Employee {
            shift: required_window("shift", &self.shift.start, &self.shift.end)?,
            lunch: optional_window("lunch", Some(lunch.start.as_str()), Some(lunch.end.as_str()))?,
            weekly_hours: self.hours,
            abilities: self.abilities,
            fallback_task: self.specialist_task,
            specialist_target: self.specialist_target,
            email: non_blank(self.email),
            id,
        })
    }
}

/// Employee as a flat record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatEmployee {
    id: String,
    shift_start: String,
    shift_end: String,
    #[serde(default)]
    lunch_start: Option<String>,
    #[serde(default)]
    lunch_end: Option<String>,
    #[serde(default)]
    abilities: Vec<String>,
    #[serde(default)]
    fallback_task: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    weekly_hours: f64,
    #[serde(default)]
    specialist_target: f64,
}

impl FlatEmployee {
    fn into_employee(self) -> Result<Employee, RecordError> {
        Ok(Employee {
            shift: required_window("shift", &self.shift_start, &self.shift_end)?,
            lunch: optional_window(
                "lunch",
                self.lunch_start.as_deref(),
                self.lunch_end.as_deref(),
            )?,
            weekly_hours: self.weekly_hours,
            abilities: self.abilities,
            fallback_task: self.fallback_task,
            specialist_target: self.specialist_target,
            email: non_blank(self.email),
            id: self.id,
        })
    }
}

/// Parse employees from either a name-keyed object or an array of flat records.
///
/// Object keys keep their document order, which becomes roster order.
pub fn parse_employees(json: &str) -> Result<Vec<Employee>, RecordError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(map) => map
            .into_iter()
            .map(|(name, value)| {
                let record: StoredEmployee = serde_json::from_value(value)?;
                record.into_employee(name)
            })
            .collect(),
        Value::Array(items) => items
            .into_iter()
            .map(|value| {
                let record: FlatEmployee = serde_json::from_value(value)?;
                record.into_employee()
            })
            .collect(),
        _ => Err(RecordError::UnexpectedShape(
            "employees as an object or an array",
        )),
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct LimitsRecord {
    #[serde(default)]
    min: Option<u32>,
    #[serde(default)]
    max: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct PeriodRecord {
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    requirements: BTreeMap<String, u32>,
    #[serde(default)]
    limits: BTreeMap<String, LimitsRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct CoverageRecord {
    #[serde(default)]
    primary: Option<PeriodRecord>,
    #[serde(default)]
    evening: Option<PeriodRecord>,
}

/// Rules as kept in the persisted store.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRules {
    #[serde(default)]
    coverage: CoverageRecord,
    #[serde(default)]
    priority_hierarchy: Vec<String>,
    #[serde(default)]
    limits: BTreeMap<String, LimitsRecord>,
}

/// Rules as a flat record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatRules {
    #[serde(default)]
    primary: Option<PeriodRecord>,
    #[serde(default)]
    evening: Option<PeriodRecord>,
    #[serde(default)]
    priority_order: Vec<String>,
    #[serde(default)]
    limits: BTreeMap<String, LimitsRecord>,
}

fn build_rules(
    primary: Option<PeriodRecord>,
    evening: Option<PeriodRecord>,
    priority_order: Vec<String>,
    top_limits: BTreeMap<String, LimitsRecord>,
) -> Result<SchedulingRules, RecordError> {
    // top-level limits first, then per-period limits fill the gaps
    let mut limits: BTreeMap<String, TaskLimits> = top_limits
        .into_iter()
        .map(|(task, l)| (task, TaskLimits { min: l.min, max: l.max }))
        .collect();

    let mut period = |name: &str, record: Option<PeriodRecord>, default: (&str, &str)| {
        record
            .map(|p| -> Result<CoveragePeriod, RecordError> {
                let start = p.start.as_deref().unwrap_or(default.0);
                let end = p.end.as_deref().unwrap_or(default.1);
                for (task, l) in p.limits {
                    limits
                        .entry(task)
                        .or_insert(TaskLimits { min: l.min, max: l.max });
                }
                Ok(CoveragePeriod {
                    window: required_window(name, start, end)?,
                    requirements: p.requirements,
                })
            })
            .transpose()
    };

    let primary = period("coverage.primary", primary, PRIMARY_WINDOW)?;
    let evening = period("coverage.evening", evening, EVENING_WINDOW)?;

    Ok(SchedulingRules {
        primary,
        evening,
        limits,
        priority_order,
    })
}

/// Parse scheduling rules from the persisted shape (`coverage`, `priorityHierarchy`)
/// or the flat shape (`primary`, `evening`, `priorityOrder`).
///
/// An absent period stays `None`; generation rejects it later.
pub fn parse_rules(json: &str) -> Result<SchedulingRules, RecordError> {
    let value: Value = serde_json::from_str(json)?;
    let Some(object) = value.as_object() else {
        return Err(RecordError::UnexpectedShape("rules as an object"));
    };

    if object.contains_key("coverage") {
        let stored: StoredRules = serde_json::from_value(value)?;
        build_rules(
            stored.coverage.primary,
            stored.coverage.evening,
            stored.priority_hierarchy,
            stored.limits,
        )
    } else {
        let flat: FlatRules = serde_json::from_value(value)?;
        build_rules(flat.primary, flat.evening, flat.priority_order, flat.limits)
    }
}

// ---------------------------------------------------------------------------
// Blocked intervals
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockedRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(alias = "resourceId")]
    employee_id: String,
    start: String,
    end: String,
    #[serde(default, alias = "title")]
    label: String,
    #[serde(default)]
    all_day: bool,
}

/// Parse an array of already-resolved blocked intervals.
pub fn parse_blocked_intervals(json: &str) -> Result<Vec<BlockedInterval>, RecordError> {
    let records: Vec<BlockedRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .map(|r| {
            Ok(BlockedInterval {
                id: r.id.unwrap_or_default(),
                employee_id: r.employee_id,
                start: parse_timestamp(&r.start)?,
                end: parse_timestamp(&r.end)?,
                label: r.label,
                all_day: r.all_day,
            })
        })
        .collect()
}

/// Parse a calendar timestamp.
///
/// Accepts naive `YYYY-MM-DDTHH:MM[:SS]` (a space separator works too), RFC 3339
/// with an offset (the local wall time is kept), or a bare date meaning midnight.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, RecordError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    const FORMATS: [&str; 5] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| RecordError::InvalidTimestamp(s.to_string()))
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Serialize events as `{id, employeeId, task, start, end, category, colorHint}` records.
pub fn events_to_json(events: &[ScheduleEvent]) -> Result<String, RecordError> {
    Ok(serde_json::to_string(events)?)
}

#[derive(Serialize)]
struct ResultRecord<'a> {
    events: &'a [ScheduleEvent],
    shortfalls: &'a [CoverageShortfall],
    metadata: BTreeMap<&'a str, &'a str>,
}

/// Serialize a whole result. Metadata keys come out sorted.
pub fn result_to_json(result: &ScheduleResult) -> Result<String, RecordError> {
    let record = ResultRecord {
        events: &result.events,
        shortfalls: &result.shortfalls,
        metadata: result
            .metadata
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect(),
    };
    Ok(serde_json::to_string(&record)?)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn time_field(field: String, value: &str) -> Result<Minute, RecordError> {
    parse_hhmm(value).ok_or_else(|| RecordError::InvalidTime {
        field,
        value: value.to_string(),
    })
}

fn required_window(prefix: &str, start: &str, end: &str) -> Result<TimeWindow, RecordError> {
    Ok(TimeWindow {
        start: time_field(format!("{}.start", prefix), start)?,
        end: time_field(format!("{}.end", prefix), end)?,
    })
}

/// A window that is absent when either bound is missing or blank.
fn optional_window(
    prefix: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Option<TimeWindow>, RecordError> {
    match (start, end) {
        (Some(s), Some(e)) if !s.trim().is_empty() && !e.trim().is_empty() => {
            required_window(prefix, s, e).map(Some)
        }
        _ => Ok(None),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventCategory;

    const STORE_EMPLOYEES: &str = r#"{
        "Antje": {
            "shift": {"start": "07:30", "end": "13:30"},
            "hours": 30,
            "lunch": {"start": "", "end": ""},
            "abilities": ["Journey Desk"],
            "specialistTask": "Journey Desk",
            "specialistTarget": 30,
            "pto": [],
            "email": "antje@example.com"
        },
        "Adam": {
            "shift": {"start": "07:30", "end": "17:00"},
            "hours": 40,
            "lunch": {"start": "12:30", "end": "14:00"},
            "abilities": ["Reservations", "Dispatch", "Network"],
            "specialistTask": "Network",
            "specialistTarget": 2,
            "pto": [],
            "email": ""
        }
    }"#;

    #[test]
    fn test_store_employees_keep_document_order() {
        let employees = parse_employees(STORE_EMPLOYEES).unwrap();
        assert_eq!(employees.len(), 2);

        let antje = &employees[0];
        assert_eq!(antje.id, "Antje");
        assert_eq!(antje.shift, TimeWindow::new(450, 810));
        assert_eq!(antje.lunch, None);
        assert_eq!(antje.weekly_hours, 30.0);
        assert_eq!(antje.fallback_task, "Journey Desk");
        assert_eq!(antje.email.as_deref(), Some("antje@example.com"));

        let adam = &employees[1];
        assert_eq!(adam.id, "Adam");
        assert_eq!(adam.lunch, Some(TimeWindow::new(750, 840)));
        assert!(adam.has_ability("Dispatch"));
        assert_eq!(adam.specialist_target, 2.0);
        assert_eq!(adam.email, None);
    }

    #[test]
    fn test_flat_employees() {
        let json = r#"[
            {"id": "Beth", "shiftStart": "09:00", "shiftEnd": "17:00",
             "lunchStart": "12:00", "lunchEnd": "13:00",
             "abilities": ["Reservations"], "fallbackTask": "Reservations",
             "email": "beth@example.com"},
            {"id": "Cara", "shiftStart": "17:00", "shiftEnd": "22:00",
             "abilities": ["Dispatch"], "fallbackTask": "Security"}
        ]"#;
        let employees = parse_employees(json).unwrap();
        assert_eq!(employees[0].lunch, Some(TimeWindow::new(720, 780)));
        assert_eq!(employees[1].id, "Cara");
        assert_eq!(employees[1].lunch, None);
        assert_eq!(employees[1].shift, TimeWindow::new(1020, 1320));
        assert_eq!(employees[1].fallback_task, "Security");
    }

    #[test]
    fn test_bad_employee_time() {
        let json = r#"{"Dana": {"shift": {"start": "7am", "end": "15:00"}}}"#;
        match parse_employees(json) {
            Err(RecordError::InvalidTime { field, value }) => {
                assert_eq!(field, "shift.start");
                assert_eq!(value, "7am");
            }
            other => panic!("expected InvalidTime, got {:?}", other),
        }
        let json = r#"{"Dana": {"shift": {"start": "99999999:00", "end": "15:00"}}}"#;
        match parse_employees(json) {
            Err(RecordError::InvalidTime { field, value }) => {
                assert_eq!(field, "shift.start");
                assert_eq!(value, "99999999:00");
            }
            other => panic!("expected InvalidTime, got {:?}", other),
        }
        assert!(matches!(
            parse_employees("42"),
            Err(RecordError::UnexpectedShape(_))
        ));
        assert!(matches!(
            parse_employees(r#"[{"id": "Eve"}]"#),
            Err(RecordError::Json(_))
        ));
    }

    #[test]
    fn test_store_rules() {
        let json = r#"{
            "coverage": {
                "primary": {"start": "08:00", "end": "17:00",
                            "requirements": {"Reservations": 3, "Dispatch": 1},
                            "limits": {"Reservations": {"min": 2, "max": 4}}},
                "evening": {"start": "17:00", "end": "22:00",
                            "requirements": {"Reservations": 2, "Dispatch": 1}}
            },
            "lunches": {"standardWindows": []},
            "priorityHierarchy": ["EXACT_COVERAGE_FIRST", "DISPATCH_CONTINUITY"]
        }"#;
        let rules = parse_rules(json).unwrap();

        let primary = rules.primary.unwrap();
        assert_eq!(primary.window, TimeWindow::new(480, 1020));
        assert_eq!(primary.target("Reservations"), 3);
        let evening = rules.evening.unwrap();
        assert_eq!(evening.window, TimeWindow::new(1020, 1320));
        assert_eq!(evening.target("Dispatch"), 1);
        assert_eq!(
            rules.priority_order,
            vec!["EXACT_COVERAGE_FIRST", "DISPATCH_CONTINUITY"]
        );
        assert_eq!(
            rules.limits.get("Reservations"),
            Some(&TaskLimits {
                min: Some(2),
                max: Some(4)
            })
        );
    }

    #[test]
    fn test_flat_rules_default_windows_and_missing_period() {
        let json = r#"{
            "primary": {"requirements": {"Reservations": 1}},
            "priorityOrder": ["Reservations", "Dispatch"]
        }"#;
        let rules = parse_rules(json).unwrap();
        assert_eq!(rules.primary.unwrap().window, TimeWindow::new(480, 1020));
        assert!(rules.evening.is_none());
        assert_eq!(rules.priority_order, vec!["Reservations", "Dispatch"]);

        assert!(matches!(
            parse_rules("[]"),
            Err(RecordError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_blocked_intervals() {
        let json = r#"[
            {"id": "evt1", "employeeId": "Adam", "start": "2025-07-14T10:00:00",
             "end": "2025-07-14T10:30", "label": "Dentist"},
            {"resourceId": "Beth", "start": "2025-07-15", "end": "2025-07-16",
             "title": "PTO", "allDay": true},
            {"employeeId": "Cara", "start": "2025-07-16T09:00:00-04:00",
             "end": "2025-07-16 11:00", "title": "Training"}
        ]"#;
        let blocked = parse_blocked_intervals(json).unwrap();
        let d = |day: u32, h: u32, m: u32| {
            NaiveDate::from_ymd_opt(2025, 7, day)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap()
        };

        assert_eq!(blocked[0].id, "evt1");
        assert_eq!(blocked[0].start, d(14, 10, 0));
        assert_eq!(blocked[0].end, d(14, 10, 30));
        assert!(!blocked[0].all_day);

        assert_eq!(blocked[1].id, "");
        assert_eq!(blocked[1].employee_id, "Beth");
        assert_eq!(blocked[1].label, "PTO");
        assert_eq!(blocked[1].start, d(15, 0, 0));
        assert!(blocked[1].all_day);

        // offset dropped, wall time kept
        assert_eq!(blocked[2].start, d(16, 9, 0));
        assert_eq!(blocked[2].end, d(16, 11, 0));
    }

    #[test]
    fn test_bad_timestamp() {
        let json = r#"[{"employeeId": "Adam", "start": "tomorrow", "end": "2025-07-14"}]"#;
        assert!(matches!(
            parse_blocked_intervals(json),
            Err(RecordError::InvalidTimestamp(s)) if s == "tomorrow"
        ));
    }

    #[test]
    fn test_events_to_json() {
        let start = NaiveDate::from_ymd_opt(2025, 7, 14)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let event = ScheduleEvent {
            id: "Dispatch-Adam-2025-07-14-09:00".to_string(),
            employee_id: "Adam".to_string(),
            task: "Dispatch".to_string(),
            start,
            end: start + chrono::Duration::minutes(30),
            category: EventCategory::Generated,
            color_hint: "#28a745".to_string(),
        };
        let json = events_to_json(&[event]).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["employeeId"], "Adam");
        assert_eq!(value[0]["start"], "2025-07-14T09:00:00");
        assert_eq!(value[0]["end"], "2025-07-14T09:30:00");
        assert_eq!(value[0]["category"], "generated");
        assert_eq!(value[0]["colorHint"], "#28a745");
    }

    #[test]
    fn test_result_to_json() {
        let mut result = ScheduleResult::default();
        result
            .metadata
            .insert("gap_policy".to_string(), "split".to_string());
        result.metadata.insert("days".to_string(), "7".to_string());
        let json = result_to_json(&result).unwrap();
        assert_eq!(
            json,
            r#"{"events":[],"shortfalls":[],"metadata":{"days":"7","gap_policy":"split"}}"#
        );
    }
}
