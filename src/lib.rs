//! Enrollment eligibility and academic progress engine.
//!
//! The crate decides whether a student may enroll in a section, tracks each
//! enrollment from in-progress to its terminal academic outcome, maintains
//! the derived CR (credit-hour weighted grade average), and keeps the
//! course catalog's prerequisite graph acyclic. Transport, persistence, and
//! input-schema validation live with the caller: the engine consumes
//! already-validated data through the store traits in
//! [`enrollment::repository`] and returns typed errors for the caller to
//! translate.

pub mod catalog;
pub mod config;
pub mod enrollment;
pub mod records;
pub mod report;
pub mod schedule;
pub mod telemetry;

pub use catalog::{Catalog, CatalogError, Course, CourseId};
pub use config::{AcademicPolicy, ConfigError};
pub use enrollment::{
    AdmissionController, AdmissionError, CatalogStore, Enrollment, EnrollmentError, EnrollmentId,
    EnrollmentStatus, EnrollmentSummary, RecordStore, RosterStore, StoreError,
};
pub use records::{CompletionEntry, CompletionOutcome, RecordError, StudentId, StudentRecord};
pub use schedule::{
    parse_slot_map, ScheduleError, Section, SectionId, SectionStatus, SlotMap, TimeSlot, Weekday,
};
