//! Half-hour slot lattice over the scheduling day.
//!
//! All times of day are minutes since midnight (`Minute`). A day is cut into
//! fixed-length slots starting at `day_start`; a slot exists for every start
//! minute strictly before `day_end`.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

/// Minute of the day (0..1440).
pub type Minute = u32;

/// Number of days generated per request.
pub const DAYS_PER_WEEK: u32 = 7;

const MINUTES_PER_DAY: Minute = 24 * 60;

/// Half-open window `[start, end)` in minutes of the day.
///
/// A window with `start >= end` is empty and never matches.
#[pyclass]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[pyo3(get, set)]
    pub start: Minute,
    #[pyo3(get, set)]
    pub end: Minute,
}

impl TimeWindow {
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    #[inline]
    pub fn contains(&self, minute: Minute) -> bool {
        self.start <= minute && minute < self.end
    }
}

#[pymethods]
impl TimeWindow {
    #[new]
    pub fn new(start: Minute, end: Minute) -> Self {
        Self { start, end }
    }

    fn __repr__(&self) -> String {
        format!(
            "TimeWindow({}-{})",
            format_hhmm(self.start),
            format_hhmm(self.end)
        )
    }
}

/// Parse `HH:MM` into minutes since midnight. `24:00` is accepted as end of day.
pub fn parse_hhmm(s: &str) -> Option<Minute> {
    let (h, m) = s.trim().split_once(':')?;
    let h: Minute = h.parse().ok()?;
    let m: Minute = m.parse().ok()?;
    if m >= 60 || h > 24 {
        return None;
    }
    let total = h * 60 + m;
    (total <= MINUTES_PER_DAY).then_some(total)
}

/// Format minutes since midnight as zero-padded `HH:MM`.
pub fn format_hhmm(minute: Minute) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// The slot lattice for one day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeGrid {
    pub day_start: Minute,
    pub day_end: Minute,
    pub slot_minutes: Minute,
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self {
            day_start: 7 * 60,
            day_end: 22 * 60,
            slot_minutes: 30,
        }
    }
}

impl TimeGrid {
    /// Build a grid, rejecting lattices with no slots or slots longer than the day.
    pub fn new(day_start: Minute, day_end: Minute, slot_minutes: Minute) -> Result<Self, String> {
        if slot_minutes == 0 {
            return Err("slot length must be positive".to_string());
        }
        if day_end > MINUTES_PER_DAY {
            return Err(format!("day end {} is past midnight", format_hhmm(day_end)));
        }
        if day_start >= day_end {
            return Err(format!(
                "day window {}-{} is empty",
                format_hhmm(day_start),
                format_hhmm(day_end)
            ));
        }
        if slot_minutes > day_end - day_start {
            return Err(format!(
                "slot length {} exceeds day window {}-{}",
                slot_minutes,
                format_hhmm(day_start),
                format_hhmm(day_end)
            ));
        }
        Ok(Self {
            day_start,
            day_end,
            slot_minutes,
        })
    }

    pub fn slot_count(&self) -> usize {
        (self.day_end - self.day_start).div_ceil(self.slot_minutes) as usize
    }

    #[inline]
    pub fn slot_start(&self, slot: usize) -> Minute {
        self.day_start + slot as Minute * self.slot_minutes
    }

    /// Slot whose start is exactly `minute`, if it lies on the lattice.
    pub fn slot_at(&self, minute: Minute) -> Option<usize> {
        if minute < self.day_start || minute >= self.day_end {
            return None;
        }
        let offset = minute - self.day_start;
        (offset % self.slot_minutes == 0).then_some((offset / self.slot_minutes) as usize)
    }

    /// `(slot index, start minute)` for every slot of the day.
    pub fn slots(&self) -> impl Iterator<Item = (usize, Minute)> + '_ {
        (0..self.slot_count()).map(move |slot| (slot, self.slot_start(slot)))
    }

    /// Wall-clock timestamp of `minute` on `date`.
    pub fn at(&self, date: NaiveDate, minute: Minute) -> NaiveDateTime {
        // minute may be 1440 for an end bound; roll into the next day
        let (date, minute) = if minute >= MINUTES_PER_DAY {
            (
                date.checked_add_days(Days::new(1)).unwrap_or(date),
                minute - MINUTES_PER_DAY,
            )
        } else {
            (date, minute)
        };
        let time = NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).unwrap_or(NaiveTime::MIN);
        date.and_time(time)
    }
}

/// Date of the `day`-th day of the week starting at `week_start`.
pub fn day_date(week_start: NaiveDate, day: u32) -> NaiveDate {
    week_start
        .checked_add_days(Days::new(u64::from(day)))
        .unwrap_or(week_start)
}
