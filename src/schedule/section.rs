use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::slots::{slots_overlap, SlotMap};
use super::{ScheduleError, SectionId};
use crate::catalog::CourseId;
use crate::enrollment::EnrollmentId;

/// Publication state of a section. Derived from capacity and live roster
/// size, except that an administrative force-close always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Open,
    Full,
    Closed,
}

impl SectionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Full => "full",
            Self::Closed => "closed",
        }
    }
}

/// A scheduled offering of one course for one academic period.
///
/// The roster holds only in-progress enrollment ids; a finalized enrollment
/// releases its seat and never re-occupies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    id: SectionId,
    course_id: CourseId,
    period: String,
    capacity: u32,
    slots: SlotMap,
    location: Option<String>,
    force_closed: bool,
    status: SectionStatus,
    roster: BTreeSet<EnrollmentId>,
}

impl Section {
    pub fn new(
        id: SectionId,
        course_id: CourseId,
        period: &str,
        capacity: u32,
        slots: SlotMap,
        location: Option<&str>,
    ) -> Result<Self, ScheduleError> {
        if id.0.trim().is_empty() {
            return Err(ScheduleError::EmptySectionId);
        }
        if period.trim().is_empty() {
            return Err(ScheduleError::EmptyPeriod);
        }
        if capacity == 0 {
            return Err(ScheduleError::NonPositiveCapacity);
        }
        if slots.is_empty() {
            return Err(ScheduleError::NoSlots);
        }

        Ok(Self {
            id: SectionId(id.0.trim().to_string()),
            course_id,
            period: period.trim().to_string(),
            capacity,
            slots,
            location: location
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            force_closed: false,
            status: SectionStatus::Open,
            roster: BTreeSet::new(),
        })
    }

    pub fn id(&self) -> &SectionId {
        &self.id
    }

    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn slots(&self) -> &SlotMap {
        &self.slots
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn status(&self) -> SectionStatus {
        self.status
    }

    pub fn is_force_closed(&self) -> bool {
        self.force_closed
    }

    /// True when the weekly schedules collide on any shared weekday.
    pub fn overlaps(&self, other: &SlotMap) -> bool {
        slots_overlap(&self.slots, other)
    }

    /// Seats occupied by in-progress enrollments only.
    pub fn seats_taken(&self) -> usize {
        self.roster.len()
    }

    pub fn seats_available(&self) -> usize {
        (self.capacity as usize).saturating_sub(self.roster.len())
    }

    pub fn is_open_for_enrollment(&self) -> bool {
        self.status == SectionStatus::Open
    }

    /// Occupancy as a percentage of capacity, rounded to two decimals.
    pub fn occupancy_rate(&self) -> f64 {
        let rate = self.roster.len() as f64 / self.capacity as f64 * 100.0;
        (rate * 100.0).round() / 100.0
    }

    pub fn roster(&self) -> impl Iterator<Item = &EnrollmentId> {
        self.roster.iter()
    }

    /// Claims a seat for a freshly created enrollment.
    pub fn register_enrollment(&mut self, enrollment_id: EnrollmentId) {
        self.roster.insert(enrollment_id);
        self.recompute_status();
    }

    /// Frees the seat held by `enrollment_id`; returns whether it was held.
    pub fn release_enrollment(&mut self, enrollment_id: &EnrollmentId) -> bool {
        let released = self.roster.remove(enrollment_id);
        if released {
            self.recompute_status();
        }
        released
    }

    /// Capacity may never drop below the live roster: the seat identity
    /// `seats_taken + seats_available == capacity` must keep holding.
    pub fn set_capacity(&mut self, capacity: u32) -> Result<(), ScheduleError> {
        if capacity == 0 {
            return Err(ScheduleError::NonPositiveCapacity);
        }
        if (capacity as usize) < self.roster.len() {
            return Err(ScheduleError::CapacityBelowRoster {
                requested: capacity,
                taken: self.roster.len(),
            });
        }
        self.capacity = capacity;
        self.recompute_status();
        Ok(())
    }

    pub fn force_close(&mut self) {
        self.force_closed = true;
        self.recompute_status();
    }

    pub fn reopen(&mut self) {
        self.force_closed = false;
        self.recompute_status();
    }

    pub fn recompute_status(&mut self) {
        self.status = if self.force_closed {
            SectionStatus::Closed
        } else if self.seats_available() == 0 {
            SectionStatus::Full
        } else {
            SectionStatus::Open
        };
    }
}
