use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::domain::{Enrollment, EnrollmentError, EnrollmentId, EnrollmentStatus};
use super::repository::{CatalogStore, RecordStore, RosterStore, StoreError};
use crate::catalog::CourseId;
use crate::config::AcademicPolicy;
use crate::records::{CompletionEntry, StudentId};
use crate::schedule::SectionId;

/// Errors raised by the admission pipeline and the lifecycle operations it
/// fronts. Every variant is a recoverable decision outcome carrying enough
/// detail for a precise user-facing message.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    #[error("student {0} not found")]
    StudentNotFound(StudentId),
    #[error("section {0} not found")]
    SectionNotFound(SectionId),
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    #[error("enrollment {0} not found")]
    EnrollmentNotFound(EnrollmentId),
    #[error("student {student} already has an enrollment in section {section}")]
    DuplicateEnrollment {
        student: StudentId,
        section: SectionId,
    },
    #[error("section {0} has no seats available")]
    Capacity(SectionId),
    #[error("prerequisites not satisfied: {}", join_ids(.missing))]
    Prerequisite { missing: Vec<CourseId> },
    #[error("schedule conflict with section {section}")]
    ScheduleConflict { section: SectionId },
    #[error("student {student} already holds {limit} enrollments in period {period}")]
    EnrollmentCap {
        student: StudentId,
        period: String,
        limit: u32,
    },
    #[error("student {student} is already enrolled in course {course} for period {period}")]
    DuplicateCourse {
        student: StudentId,
        course: CourseId,
        period: String,
    },
    #[error(transparent)]
    Enrollment(#[from] EnrollmentError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn join_ids(ids: &[CourseId]) -> String {
    ids.iter()
        .map(|id| id.0.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

static ENROLLMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_enrollment_id() -> EnrollmentId {
    let id = ENROLLMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EnrollmentId(format!("enr-{id:06}"))
}

/// Sequences the enrollment eligibility pipeline over the injected stores
/// and fronts the lifecycle writes so section seats, enrollment state, and
/// student history stay consistent.
pub struct AdmissionController<C, R, S> {
    catalog: Arc<C>,
    roster: Arc<R>,
    records: Arc<S>,
    policy: AcademicPolicy,
}

impl<C, R, S> AdmissionController<C, R, S>
where
    C: CatalogStore + 'static,
    R: RosterStore + 'static,
    S: RecordStore + 'static,
{
    pub fn new(catalog: Arc<C>, roster: Arc<R>, records: Arc<S>, policy: AcademicPolicy) -> Self {
        Self {
            catalog,
            roster,
            records,
            policy,
        }
    }

    pub fn policy(&self) -> &AcademicPolicy {
        &self.policy
    }

    /// Runs the fixed-order eligibility pipeline and, only if every check
    /// passes, creates an in-progress enrollment and registers it with the
    /// section. The first failing check aborts with that one violation;
    /// nothing is persisted on a failed attempt.
    pub fn attempt_enroll(
        &self,
        student_id: &StudentId,
        section_id: &SectionId,
    ) -> Result<Enrollment, AdmissionError> {
        // 1. All three entities must resolve.
        let student = self
            .records
            .get_student(student_id)?
            .ok_or_else(|| AdmissionError::StudentNotFound(student_id.clone()))?;
        let mut section = self
            .roster
            .get_section(section_id)?
            .ok_or_else(|| AdmissionError::SectionNotFound(section_id.clone()))?;
        let course = self
            .catalog
            .get_course(section.course_id())?
            .ok_or_else(|| AdmissionError::CourseNotFound(section.course_id().clone()))?;

        let enrollments = self.roster.list_student_enrollments(student_id)?;

        // 2. A withdrawn enrollment may be retried; anything else in this
        // section is a duplicate.
        if enrollments.iter().any(|summary| {
            summary.section_id == *section_id && summary.status != EnrollmentStatus::Withdrawn
        }) {
            debug!(student = %student_id, section = %section_id, "admission rejected: duplicate enrollment");
            return Err(AdmissionError::DuplicateEnrollment {
                student: student_id.clone(),
                section: section_id.clone(),
            });
        }

        // 3. Seats, with force-close winning over free seats.
        if !section.is_open_for_enrollment() || section.seats_available() == 0 {
            debug!(section = %section_id, status = section.status().label(), "admission rejected: no seats");
            return Err(AdmissionError::Capacity(section_id.clone()));
        }

        // 4. Direct prerequisites against the approved history.
        let missing = course.missing_prerequisites(&student.approved_course_ids());
        if !missing.is_empty() {
            debug!(student = %student_id, course = %course.id(), missing = %join_ids(&missing), "admission rejected: prerequisites");
            return Err(AdmissionError::Prerequisite { missing });
        }

        // 5. Schedule conflicts against the student's active sections in
        // the same period.
        for other in self
            .roster
            .list_student_active_sections(student_id, section.period())?
        {
            if other.id() != section_id && section.overlaps(other.slots()) {
                debug!(student = %student_id, conflicting = %other.id(), "admission rejected: schedule conflict");
                return Err(AdmissionError::ScheduleConflict {
                    section: other.id().clone(),
                });
            }
        }

        // 6. Per-period enrollment cap (0 = unlimited).
        let cap = self.policy.max_sections_per_period;
        if cap > 0 {
            let active = enrollments
                .iter()
                .filter(|summary| summary.period == section.period() && summary.status.is_active())
                .count();
            if active >= cap as usize {
                debug!(student = %student_id, period = section.period(), limit = cap, "admission rejected: enrollment cap");
                return Err(AdmissionError::EnrollmentCap {
                    student: student_id.clone(),
                    period: section.period().to_string(),
                    limit: cap,
                });
            }
        }

        // 7. One enrollment per course per period, counting active and
        // already-approved attempts.
        if enrollments.iter().any(|summary| {
            summary.course_id == *course.id()
                && summary.period == section.period()
                && (summary.status.is_active() || summary.status == EnrollmentStatus::Approved)
        }) {
            debug!(student = %student_id, course = %course.id(), period = section.period(), "admission rejected: duplicate course");
            return Err(AdmissionError::DuplicateCourse {
                student: student_id.clone(),
                course: course.id().clone(),
                period: section.period().to_string(),
            });
        }

        let enrollment = Enrollment::new(
            next_enrollment_id(),
            student_id.clone(),
            &section,
            Utc::now().naive_utc(),
        );
        section.register_enrollment(enrollment.id().clone());
        self.roster.insert_enrollment(enrollment.clone())?;
        self.roster.update_section(section)?;

        info!(enrollment = %enrollment.id(), student = %student_id, section = %section_id, "enrollment accepted");
        Ok(enrollment)
    }

    /// Records a grade/attendance pair, finalizing the enrollment, freeing
    /// its seat, and appending the completion row to the student's record.
    pub fn record_outcome(
        &self,
        enrollment_id: &EnrollmentId,
        grade: f64,
        attendance: f64,
    ) -> Result<CompletionEntry, AdmissionError> {
        let mut enrollment = self
            .roster
            .get_enrollment(enrollment_id)?
            .ok_or_else(|| AdmissionError::EnrollmentNotFound(enrollment_id.clone()))?;
        let mut section = self
            .roster
            .get_section(enrollment.section_id())?
            .ok_or_else(|| AdmissionError::SectionNotFound(enrollment.section_id().clone()))?;
        let course = self
            .catalog
            .get_course(enrollment.course_id())?
            .ok_or_else(|| AdmissionError::CourseNotFound(enrollment.course_id().clone()))?;
        let mut record = self
            .records
            .get_student(enrollment.student_id())?
            .ok_or_else(|| AdmissionError::StudentNotFound(enrollment.student_id().clone()))?;

        let entry = enrollment.record_outcome(
            grade,
            attendance,
            &self.policy,
            &course,
            &mut record,
            Utc::now().naive_utc(),
        )?;

        section.release_enrollment(enrollment.id());
        self.records
            .append_completion(enrollment.student_id(), entry.clone())?;
        self.roster.update_enrollment(enrollment.clone())?;
        self.roster.update_section(section)?;

        info!(enrollment = %enrollment.id(), outcome = entry.outcome.label(), "outcome recorded");
        Ok(entry)
    }

    /// Withdraws an in-progress enrollment, freeing its seat. No history
    /// row is written.
    pub fn withdraw(&self, enrollment_id: &EnrollmentId) -> Result<Enrollment, AdmissionError> {
        let mut enrollment = self
            .roster
            .get_enrollment(enrollment_id)?
            .ok_or_else(|| AdmissionError::EnrollmentNotFound(enrollment_id.clone()))?;
        let mut section = self
            .roster
            .get_section(enrollment.section_id())?
            .ok_or_else(|| AdmissionError::SectionNotFound(enrollment.section_id().clone()))?;

        enrollment.withdraw(&self.policy, Utc::now().naive_utc())?;

        section.release_enrollment(enrollment.id());
        self.roster.update_enrollment(enrollment.clone())?;
        self.roster.update_section(section)?;

        info!(enrollment = %enrollment.id(), "enrollment withdrawn");
        Ok(enrollment)
    }

    /// Applies an administrative drop decided outside the core.
    pub fn administrative_drop(
        &self,
        enrollment_id: &EnrollmentId,
    ) -> Result<Enrollment, AdmissionError> {
        let mut enrollment = self
            .roster
            .get_enrollment(enrollment_id)?
            .ok_or_else(|| AdmissionError::EnrollmentNotFound(enrollment_id.clone()))?;
        let mut section = self
            .roster
            .get_section(enrollment.section_id())?
            .ok_or_else(|| AdmissionError::SectionNotFound(enrollment.section_id().clone()))?;

        enrollment.administrative_drop(Utc::now().naive_utc())?;

        section.release_enrollment(enrollment.id());
        self.roster.update_enrollment(enrollment.clone())?;
        self.roster.update_section(section)?;

        info!(enrollment = %enrollment.id(), "enrollment administratively dropped");
        Ok(enrollment)
    }
}
