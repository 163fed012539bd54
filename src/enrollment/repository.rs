use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{Enrollment, EnrollmentId, EnrollmentStatus};
use crate::catalog::{Course, CourseId};
use crate::records::{CompletionEntry, StudentId, StudentRecord};
use crate::schedule::{Section, SectionId};

/// Error enumeration for store failures at the persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Status snapshot of one enrollment, enough for the admission pipeline's
/// duplicate and per-period cap checks without loading full aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentSummary {
    pub enrollment_id: EnrollmentId,
    pub section_id: SectionId,
    pub course_id: CourseId,
    pub period: String,
    pub status: EnrollmentStatus,
}

impl EnrollmentSummary {
    pub fn of(enrollment: &Enrollment) -> Self {
        Self {
            enrollment_id: enrollment.id().clone(),
            section_id: enrollment.section_id().clone(),
            course_id: enrollment.course_id().clone(),
            period: enrollment.period().to_string(),
            status: enrollment.status(),
        }
    }
}

/// Read access to the course catalog. [`crate::catalog::Catalog`] is the
/// in-process implementation; a SQL-backed one lives with the caller.
pub trait CatalogStore: Send + Sync {
    fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StoreError>;
    fn direct_prerequisites(&self, id: &CourseId) -> Result<BTreeSet<CourseId>, StoreError>;
}

/// Sections and enrollments. Callers serialize writes against one section
/// (per-section lock or row-level transaction) so two concurrent
/// admissions cannot both observe the last free seat.
pub trait RosterStore: Send + Sync {
    fn get_section(&self, id: &SectionId) -> Result<Option<Section>, StoreError>;
    fn update_section(&self, section: Section) -> Result<(), StoreError>;
    fn insert_enrollment(&self, enrollment: Enrollment) -> Result<(), StoreError>;
    fn get_enrollment(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, StoreError>;
    fn update_enrollment(&self, enrollment: Enrollment) -> Result<(), StoreError>;
    fn count_active_enrollments(&self, section_id: &SectionId) -> Result<usize, StoreError>;
    fn list_student_active_sections(
        &self,
        student_id: &StudentId,
        period: &str,
    ) -> Result<Vec<Section>, StoreError>;
    fn list_student_enrollments(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<EnrollmentSummary>, StoreError>;
}

/// Student academic records.
pub trait RecordStore: Send + Sync {
    fn get_student(&self, id: &StudentId) -> Result<Option<StudentRecord>, StoreError>;
    fn append_completion(
        &self,
        student_id: &StudentId,
        entry: CompletionEntry,
    ) -> Result<(), StoreError>;
}
