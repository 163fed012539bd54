use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{round2, RecordError};
use crate::catalog::CourseId;

/// Identifier wrapper for students (the institutional registration number).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final academic outcome of one enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionOutcome {
    Approved,
    FailedByGrade,
    FailedByAttendance,
    Withdrawn,
    AdministrativelyDropped,
}

impl CompletionOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::FailedByGrade => "failed_by_grade",
            Self::FailedByAttendance => "failed_by_attendance",
            Self::Withdrawn => "withdrawn",
            Self::AdministrativelyDropped => "administratively_dropped",
        }
    }

    /// Institutional rule: grade failures are an academic measure and count
    /// toward CR; attendance failures, withdrawals, and administrative
    /// drops do not.
    pub const fn counts_toward_cr(self) -> bool {
        matches!(self, Self::Approved | Self::FailedByGrade)
    }

    pub const fn is_failure(self) -> bool {
        matches!(self, Self::FailedByGrade | Self::FailedByAttendance)
    }
}

/// One concluded-course row in a student's academic history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEntry {
    pub course_id: CourseId,
    pub grade: f64,
    pub attendance: f64,
    pub credit_hours: u32,
    pub outcome: CompletionOutcome,
    pub period: String,
}

/// A student's completed-course history and derived CR (credit-hour
/// weighted grade average). CR is recomputed synchronously on every
/// history mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    id: StudentId,
    name: String,
    email: String,
    history: Vec<CompletionEntry>,
    cr: f64,
}

impl StudentRecord {
    pub fn new(id: StudentId, name: &str, email: &str) -> Result<Self, RecordError> {
        if id.0.trim().is_empty() {
            return Err(RecordError::EmptyStudentId);
        }
        if name.trim().is_empty() {
            return Err(RecordError::EmptyStudentName);
        }

        Ok(Self {
            id: StudentId(id.0.trim().to_string()),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            history: Vec::new(),
            cr: 0.0,
        })
    }

    pub fn id(&self) -> &StudentId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn history(&self) -> &[CompletionEntry] {
        &self.history
    }

    pub fn cr(&self) -> f64 {
        self.cr
    }

    /// Appends a concluded-course entry, replacing any previous entry for
    /// the same `(course, period)` pair, then recomputes CR.
    pub fn record_completion(&mut self, entry: CompletionEntry) -> Result<(), RecordError> {
        validate_entry(&entry)?;

        match self
            .history
            .iter_mut()
            .find(|row| row.course_id == entry.course_id && row.period == entry.period)
        {
            Some(row) => *row = entry,
            None => self.history.push(entry),
        }
        self.recompute_cr();
        Ok(())
    }

    /// Removes every history row for `course_id`; returns how many were
    /// dropped. CR is recomputed when anything changed.
    pub fn remove_course_history(&mut self, course_id: &CourseId) -> usize {
        let before = self.history.len();
        self.history.retain(|row| &row.course_id != course_id);
        let removed = before - self.history.len();
        if removed > 0 {
            self.recompute_cr();
        }
        removed
    }

    /// CR = round(Σ(grade·hours) / Σ(hours), 2) over entries whose outcome
    /// counts academically; 0.0 when nothing qualifies. Idempotent.
    pub fn recompute_cr(&mut self) -> f64 {
        let mut weighted = 0.0;
        let mut hours: u64 = 0;
        for entry in &self.history {
            if entry.outcome.counts_toward_cr() {
                weighted += entry.grade * f64::from(entry.credit_hours);
                hours += u64::from(entry.credit_hours);
            }
        }
        self.cr = if hours > 0 {
            round2(weighted / hours as f64)
        } else {
            0.0
        };
        self.cr
    }

    pub fn approved_course_ids(&self) -> BTreeSet<CourseId> {
        self.history
            .iter()
            .filter(|entry| entry.outcome == CompletionOutcome::Approved)
            .map(|entry| entry.course_id.clone())
            .collect()
    }

    pub fn has_approved(&self, course_id: &CourseId) -> bool {
        self.history.iter().any(|entry| {
            &entry.course_id == course_id && entry.outcome == CompletionOutcome::Approved
        })
    }

    /// At risk: CR below the institutional threshold, or two or more
    /// failures of either kind on record.
    pub fn is_at_risk(&self, min_cr: f64) -> bool {
        if self.cr < min_cr {
            return true;
        }
        let failures = self
            .history
            .iter()
            .filter(|entry| entry.outcome.is_failure())
            .count();
        failures >= 2
    }
}

fn validate_entry(entry: &CompletionEntry) -> Result<(), RecordError> {
    if !(0.0..=10.0).contains(&entry.grade) {
        return Err(RecordError::GradeOutOfRange(entry.grade));
    }
    if !(0.0..=100.0).contains(&entry.attendance) {
        return Err(RecordError::AttendanceOutOfRange(entry.attendance));
    }
    if entry.credit_hours == 0 {
        return Err(RecordError::NonPositiveCreditHours);
    }
    Ok(())
}
