//! Pure academic decision rules. Institutional thresholds come in as an
//! explicit [`AcademicPolicy`] so every function here is independently
//! testable.

use crate::config::AcademicPolicy;
use crate::records::{CompletionOutcome, StudentRecord};

/// Derives the terminal outcome from a recorded grade and attendance.
///
/// Attendance below the institutional minimum fails the enrollment before
/// the grade is even considered; this precedence is institutional policy
/// (attendance failure is not a measure of academic quality and must not
/// be masked by a passing grade).
pub fn derive_outcome(grade: f64, attendance: f64, policy: &AcademicPolicy) -> CompletionOutcome {
    if attendance < policy.min_attendance {
        CompletionOutcome::FailedByAttendance
    } else if grade < policy.min_passing_grade {
        CompletionOutcome::FailedByGrade
    } else {
        CompletionOutcome::Approved
    }
}

/// Institutional pass criterion over a whole record: CR at or above the
/// minimum passing grade.
pub fn student_passes(record: &StudentRecord, policy: &AcademicPolicy) -> bool {
    record.cr() >= policy.min_passing_grade
}
