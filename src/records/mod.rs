mod student;

pub use student::{CompletionEntry, CompletionOutcome, StudentId, StudentRecord};

/// Validation errors for student records and completion entries.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("student id cannot be empty")]
    EmptyStudentId,
    #[error("student name cannot be empty")]
    EmptyStudentName,
    #[error("grade must be between 0 and 10, got {0}")]
    GradeOutOfRange(f64),
    #[error("attendance must be between 0 and 100, got {0}")]
    AttendanceOutOfRange(f64),
    #[error("credit hours must be a positive integer")]
    NonPositiveCreditHours,
}

/// Rounds to two decimal places, the precision the institution publishes
/// for CR and report percentages.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
