mod section;
mod slots;

pub use section::{Section, SectionStatus};
pub use slots::{parse_slot_map, slots_overlap, SlotMap, TimeSlot, Weekday};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for scheduled course offerings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectionId(pub String);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validation errors for time slots, slot maps, and section construction.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("unknown weekday label: {0}")]
    UnknownWeekday(String),
    #[error("malformed time interval '{0}': expected HH:MM-HH:MM")]
    MalformedInterval(String),
    #[error("time slot must start before it ends")]
    EmptyInterval,
    #[error("time slots must fall within 06:00-22:00")]
    OutOfBounds,
    #[error("section id cannot be empty")]
    EmptySectionId,
    #[error("period label cannot be empty")]
    EmptyPeriod,
    #[error("a section needs at least one weekly time slot")]
    NoSlots,
    #[error("seat capacity must be a positive integer")]
    NonPositiveCapacity,
    #[error("capacity {requested} is below the {taken} seats already taken")]
    CapacityBelowRoster { requested: u32, taken: usize },
}
