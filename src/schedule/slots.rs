use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::ScheduleError;

/// Day of the week a slot occupies. Short labels follow the roster wire
/// format ("mon", "tue", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mon => "mon",
            Self::Tue => "tue",
            Self::Wed => "wed",
            Self::Thu => "thu",
            Self::Fri => "fri",
            Self::Sat => "sat",
            Self::Sun => "sun",
        }
    }

    pub fn parse(label: &str) -> Result<Self, ScheduleError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "mon" => Ok(Self::Mon),
            "tue" => Ok(Self::Tue),
            "wed" => Ok(Self::Wed),
            "thu" => Ok(Self::Thu),
            "fri" => Ok(Self::Fri),
            "sat" => Ok(Self::Sat),
            "sun" => Ok(Self::Sun),
            other => Err(ScheduleError::UnknownWeekday(other.to_string())),
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn opening_hour() -> NaiveTime {
    NaiveTime::from_hms_opt(6, 0, 0).expect("literal in range")
}

fn closing_hour() -> NaiveTime {
    NaiveTime::from_hms_opt(22, 0, 0).expect("literal in range")
}

/// Half-open interval `[start, end)` within the institutional day
/// (06:00-22:00).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ScheduleError> {
        if start >= end {
            return Err(ScheduleError::EmptyInterval);
        }
        if start < opening_hour() || end > closing_hour() {
            return Err(ScheduleError::OutOfBounds);
        }
        Ok(Self { start, end })
    }

    /// Parses the roster wire format, e.g. `"19:00-21:00"`.
    pub fn parse(interval: &str) -> Result<Self, ScheduleError> {
        let malformed = || ScheduleError::MalformedInterval(interval.to_string());
        let (start_raw, end_raw) = interval.trim().split_once('-').ok_or_else(malformed)?;
        let start =
            NaiveTime::parse_from_str(start_raw.trim(), "%H:%M").map_err(|_| malformed())?;
        let end = NaiveTime::parse_from_str(end_raw.trim(), "%H:%M").map_err(|_| malformed())?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Half-open overlap test; back-to-back slots (`end_a == start_b`) do
    /// not collide.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        !(self.end <= other.start || other.end <= self.start)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Weekly schedule of a section: at most one slot per weekday.
pub type SlotMap = BTreeMap<Weekday, TimeSlot>;

/// Builds a slot map from `(weekday label, "HH:MM-HH:MM")` pairs.
pub fn parse_slot_map(pairs: &[(&str, &str)]) -> Result<SlotMap, ScheduleError> {
    let mut slots = SlotMap::new();
    for (day, interval) in pairs {
        slots.insert(Weekday::parse(day)?, TimeSlot::parse(interval)?);
    }
    if slots.is_empty() {
        return Err(ScheduleError::NoSlots);
    }
    Ok(slots)
}

/// Single source of truth for schedule conflicts: two slot maps collide
/// when any weekday present in both carries overlapping intervals.
pub fn slots_overlap(a: &SlotMap, b: &SlotMap) -> bool {
    a.iter().any(|(day, slot)| {
        b.get(day)
            .map(|other| slot.overlaps(other))
            .unwrap_or(false)
    })
}
