//! Aggregate views over sections and student populations: approval rates,
//! outcome distributions, CR rankings, and at-risk listings.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::AcademicPolicy;
use crate::enrollment::{Enrollment, EnrollmentStatus};
use crate::records::{round2, StudentRecord};
use crate::schedule::{Section, SectionId};

/// Snapshot of one section's academic results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionReport {
    pub section_id: SectionId,
    pub period: String,
    pub total_enrollments: usize,
    pub active_enrollments: usize,
    /// Percentage of academically concluded enrollments (withdrawals and
    /// administrative drops excluded) that approved. 0.0 when nothing has
    /// concluded.
    pub approval_rate: f64,
    pub outcome_distribution: BTreeMap<&'static str, usize>,
    pub average_grade: Option<f64>,
    pub average_attendance: Option<f64>,
}

impl SectionReport {
    pub fn for_section(section: &Section, enrollments: &[Enrollment]) -> Self {
        let rows: Vec<&Enrollment> = enrollments
            .iter()
            .filter(|enrollment| enrollment.section_id() == section.id())
            .collect();

        let mut distribution: BTreeMap<&'static str, usize> = BTreeMap::new();
        for enrollment in &rows {
            *distribution.entry(enrollment.status().label()).or_insert(0) += 1;
        }

        let concluded = rows
            .iter()
            .filter(|e| {
                matches!(
                    e.status(),
                    EnrollmentStatus::Approved
                        | EnrollmentStatus::FailedByGrade
                        | EnrollmentStatus::FailedByAttendance
                )
            })
            .count();
        let approved = rows
            .iter()
            .filter(|e| e.status() == EnrollmentStatus::Approved)
            .count();
        let approval_rate = if concluded > 0 {
            round2(approved as f64 / concluded as f64 * 100.0)
        } else {
            0.0
        };

        let grades: Vec<f64> = rows.iter().filter_map(|e| e.grade()).collect();
        let attendances: Vec<f64> = rows.iter().filter_map(|e| e.attendance()).collect();

        Self {
            section_id: section.id().clone(),
            period: section.period().to_string(),
            total_enrollments: rows.len(),
            active_enrollments: rows.iter().filter(|e| e.is_active()).count(),
            approval_rate,
            outcome_distribution: distribution,
            average_grade: mean(&grades),
            average_attendance: mean(&attendances),
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(round2(values.iter().sum::<f64>() / values.len() as f64))
    }
}

/// Top students by CR, name as the tiebreak, truncated to `top_n`.
pub fn ranking(records: &[StudentRecord], top_n: usize) -> Vec<&StudentRecord> {
    let mut ranked: Vec<&StudentRecord> = records.iter().collect();
    ranked.sort_by(|a, b| {
        b.cr()
            .partial_cmp(&a.cr())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name().cmp(b.name()))
    });
    ranked.truncate(top_n);
    ranked
}

/// Students flagged by the institutional at-risk rule.
pub fn at_risk<'a>(
    records: &'a [StudentRecord],
    policy: &AcademicPolicy,
) -> Vec<&'a StudentRecord> {
    records
        .iter()
        .filter(|record| record.is_at_risk(policy.min_passing_grade))
        .collect()
}
