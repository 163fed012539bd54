use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::policy::derive_outcome;
use crate::catalog::{Course, CourseId};
use crate::config::AcademicPolicy;
use crate::records::{CompletionEntry, CompletionOutcome, RecordError, StudentId, StudentRecord};
use crate::schedule::{Section, SectionId};

/// Identifier wrapper for enrollments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnrollmentId(pub String);

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of an enrollment. `InProgress` is the only non-terminal
/// state; no transition is defined out of any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    InProgress,
    Approved,
    FailedByGrade,
    FailedByAttendance,
    Withdrawn,
    AdministrativelyDropped,
}

impl EnrollmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Approved => "approved",
            Self::FailedByGrade => "failed_by_grade",
            Self::FailedByAttendance => "failed_by_attendance",
            Self::Withdrawn => "withdrawn",
            Self::AdministrativelyDropped => "administratively_dropped",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// Active enrollments are the only ones occupying a section seat.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl From<CompletionOutcome> for EnrollmentStatus {
    fn from(outcome: CompletionOutcome) -> Self {
        match outcome {
            CompletionOutcome::Approved => Self::Approved,
            CompletionOutcome::FailedByGrade => Self::FailedByGrade,
            CompletionOutcome::FailedByAttendance => Self::FailedByAttendance,
            CompletionOutcome::Withdrawn => Self::Withdrawn,
            CompletionOutcome::AdministrativelyDropped => Self::AdministrativelyDropped,
        }
    }
}

/// Errors raised by enrollment state transitions.
#[derive(Debug, thiserror::Error)]
pub enum EnrollmentError {
    #[error("grade must be between 0 and 10, got {0}")]
    GradeOutOfRange(f64),
    #[error("attendance must be between 0 and 100, got {0}")]
    AttendanceOutOfRange(f64),
    #[error("enrollment {0} is already finalized")]
    AlreadyFinalized(EnrollmentId),
    #[error("withdrawal deadline {0} has passed")]
    DeadlinePassed(NaiveDate),
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Binds one student to one section and owns its own state transitions.
///
/// Grade and attendance are `None` exactly while the status is
/// `InProgress`; once both are recorded the terminal status is derived and
/// the enrollment becomes immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    id: EnrollmentId,
    student_id: StudentId,
    section_id: SectionId,
    course_id: CourseId,
    period: String,
    grade: Option<f64>,
    attendance: Option<f64>,
    status: EnrollmentStatus,
    created_at: NaiveDateTime,
    completed_at: Option<NaiveDateTime>,
}

impl Enrollment {
    pub fn new(
        id: EnrollmentId,
        student_id: StudentId,
        section: &Section,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            student_id,
            section_id: section.id().clone(),
            course_id: section.course_id().clone(),
            period: section.period().to_string(),
            grade: None,
            attendance: None,
            status: EnrollmentStatus::InProgress,
            created_at,
            completed_at: None,
        }
    }

    pub fn id(&self) -> &EnrollmentId {
        &self.id
    }

    pub fn student_id(&self) -> &StudentId {
        &self.student_id
    }

    pub fn section_id(&self) -> &SectionId {
        &self.section_id
    }

    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn grade(&self) -> Option<f64> {
        self.grade
    }

    pub fn attendance(&self) -> Option<f64> {
        self.attendance
    }

    pub fn status(&self) -> EnrollmentStatus {
        self.status
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<NaiveDateTime> {
        self.completed_at
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Records grade and attendance, derives the terminal status, and
    /// pushes the completion row into the student's record. Callable at
    /// most once per enrollment.
    ///
    /// Attendance is checked before grade: failing attendance pre-empts a
    /// passing grade.
    pub fn record_outcome(
        &mut self,
        grade: f64,
        attendance: f64,
        policy: &AcademicPolicy,
        course: &Course,
        record: &mut StudentRecord,
        at: NaiveDateTime,
    ) -> Result<CompletionEntry, EnrollmentError> {
        if self.status.is_terminal() {
            return Err(EnrollmentError::AlreadyFinalized(self.id.clone()));
        }
        if !(0.0..=10.0).contains(&grade) {
            return Err(EnrollmentError::GradeOutOfRange(grade));
        }
        if !(0.0..=100.0).contains(&attendance) {
            return Err(EnrollmentError::AttendanceOutOfRange(attendance));
        }

        let outcome = derive_outcome(grade, attendance, policy);
        let entry = CompletionEntry {
            course_id: self.course_id.clone(),
            grade,
            attendance,
            credit_hours: course.credit_hours(),
            outcome,
            period: self.period.clone(),
        };
        record.record_completion(entry.clone())?;

        self.grade = Some(grade);
        self.attendance = Some(attendance);
        self.status = EnrollmentStatus::from(outcome);
        self.completed_at = Some(at);
        Ok(entry)
    }

    /// Withdraws an in-progress enrollment inside the institutional
    /// window. Withdrawal leaves no history row: it reaches neither CR nor
    /// prerequisite satisfaction.
    pub fn withdraw(
        &mut self,
        policy: &AcademicPolicy,
        at: NaiveDateTime,
    ) -> Result<(), EnrollmentError> {
        if self.status.is_terminal() {
            return Err(EnrollmentError::AlreadyFinalized(self.id.clone()));
        }
        if !policy.can_withdraw_on(at.date()) {
            return Err(EnrollmentError::DeadlinePassed(policy.withdrawal_deadline));
        }
        self.status = EnrollmentStatus::Withdrawn;
        self.completed_at = Some(at);
        Ok(())
    }

    /// Administrative removal. What triggers it lives outside the core;
    /// the transition itself follows the same terminal-state rules.
    pub fn administrative_drop(&mut self, at: NaiveDateTime) -> Result<(), EnrollmentError> {
        if self.status.is_terminal() {
            return Err(EnrollmentError::AlreadyFinalized(self.id.clone()));
        }
        self.status = EnrollmentStatus::AdministrativelyDropped;
        self.completed_at = Some(at);
        Ok(())
    }
}
