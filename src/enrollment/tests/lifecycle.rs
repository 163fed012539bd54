use chrono::NaiveDate;

use super::common::*;
use crate::config::AcademicPolicy;
use crate::enrollment::admission::AdmissionError;
use crate::enrollment::domain::{EnrollmentError, EnrollmentStatus};
use crate::records::CompletionOutcome;

fn enrolled_harness(policy: AcademicPolicy) -> (Harness, crate::enrollment::EnrollmentId) {
    let harness = harness(default_catalog(), policy);
    harness.records.insert(student("2025001", "Ana"));
    harness
        .roster
        .insert_section(section("MAT-A", "MAT", "2025.2", 2, &[("wed", "10:00-12:00")]));
    let enrollment = harness
        .controller
        .attempt_enroll(&sid("2025001"), &sec("MAT-A"))
        .expect("clean admission");
    let id = enrollment.id().clone();
    (harness, id)
}

#[test]
fn attendance_failure_preempts_a_passing_grade() {
    let (harness, id) = enrolled_harness(AcademicPolicy::default());

    let entry = harness
        .controller
        .record_outcome(&id, 7.0, 60.0)
        .expect("outcome recorded");
    assert_eq!(entry.outcome, CompletionOutcome::FailedByAttendance);

    let stored = harness.roster.enrollment(&id).expect("enrollment present");
    assert_eq!(stored.status(), EnrollmentStatus::FailedByAttendance);
    assert_eq!(stored.grade(), Some(7.0));
    assert_eq!(stored.attendance(), Some(60.0));
    assert!(stored.completed_at().is_some());
}

#[test]
fn finalizing_frees_the_seat() {
    let (harness, id) = enrolled_harness(AcademicPolicy::default());
    assert_eq!(
        harness
            .roster
            .section(&sec("MAT-A"))
            .expect("section present")
            .seats_taken(),
        1
    );

    harness
        .controller
        .record_outcome(&id, 8.0, 90.0)
        .expect("outcome recorded");

    let section = harness
        .roster
        .section(&sec("MAT-A"))
        .expect("section present");
    assert_eq!(section.seats_taken(), 0);
    assert_eq!(section.seats_available(), 2);
}

#[test]
fn outcome_is_recorded_at_most_once() {
    let (harness, id) = enrolled_harness(AcademicPolicy::default());

    harness
        .controller
        .record_outcome(&id, 6.0, 80.0)
        .expect("first outcome");

    match harness.controller.record_outcome(&id, 9.0, 90.0) {
        Err(AdmissionError::Enrollment(EnrollmentError::AlreadyFinalized(_))) => {}
        other => panic!("expected already-finalized, got {other:?}"),
    }

    // The student's history keeps exactly the first outcome.
    let record = harness
        .records
        .student(&sid("2025001"))
        .expect("record present");
    assert_eq!(record.history().len(), 1);
    assert_eq!(record.history()[0].grade, 6.0);
    assert_eq!(record.history()[0].outcome, CompletionOutcome::Approved);
}

#[test]
fn outcome_updates_the_student_cr_in_the_store() {
    let (harness, id) = enrolled_harness(AcademicPolicy::default());

    harness
        .controller
        .record_outcome(&id, 7.5, 90.0)
        .expect("outcome recorded");

    let record = harness
        .records
        .student(&sid("2025001"))
        .expect("record present");
    assert_eq!(record.cr(), 7.5);
}

#[test]
fn out_of_range_marks_stay_in_progress() {
    let (harness, id) = enrolled_harness(AcademicPolicy::default());

    assert!(matches!(
        harness.controller.record_outcome(&id, 11.0, 90.0),
        Err(AdmissionError::Enrollment(EnrollmentError::GradeOutOfRange(_)))
    ));
    assert!(matches!(
        harness.controller.record_outcome(&id, 8.0, 120.0),
        Err(AdmissionError::Enrollment(
            EnrollmentError::AttendanceOutOfRange(_)
        ))
    ));

    let stored = harness.roster.enrollment(&id).expect("enrollment present");
    assert_eq!(stored.status(), EnrollmentStatus::InProgress);
    assert_eq!(stored.grade(), None);
}

#[test]
fn withdrawal_leaves_no_history_and_frees_the_seat() {
    let (harness, id) = enrolled_harness(AcademicPolicy {
        withdrawal_deadline: NaiveDate::from_ymd_opt(2099, 12, 31).expect("date in range"),
        ..AcademicPolicy::default()
    });

    let withdrawn = harness.controller.withdraw(&id).expect("inside the window");
    assert_eq!(withdrawn.status(), EnrollmentStatus::Withdrawn);
    assert!(withdrawn.completed_at().is_some());

    let record = harness
        .records
        .student(&sid("2025001"))
        .expect("record present");
    assert!(record.history().is_empty());
    assert_eq!(record.cr(), 0.0);

    assert_eq!(
        harness
            .roster
            .section(&sec("MAT-A"))
            .expect("section present")
            .seats_taken(),
        0
    );
}

#[test]
fn withdrawal_after_the_deadline_is_rejected() {
    let (harness, id) = enrolled_harness(AcademicPolicy {
        withdrawal_deadline: NaiveDate::from_ymd_opt(2000, 1, 1).expect("date in range"),
        ..AcademicPolicy::default()
    });

    match harness.controller.withdraw(&id) {
        Err(AdmissionError::Enrollment(EnrollmentError::DeadlinePassed(deadline))) => {
            assert_eq!(deadline, NaiveDate::from_ymd_opt(2000, 1, 1).expect("date in range"));
        }
        other => panic!("expected deadline violation, got {other:?}"),
    }

    let stored = harness.roster.enrollment(&id).expect("enrollment present");
    assert_eq!(stored.status(), EnrollmentStatus::InProgress);
}

#[test]
fn finalized_enrollments_cannot_be_withdrawn() {
    let (harness, id) = enrolled_harness(AcademicPolicy::default());
    harness
        .controller
        .record_outcome(&id, 8.0, 90.0)
        .expect("outcome recorded");

    assert!(matches!(
        harness.controller.withdraw(&id),
        Err(AdmissionError::Enrollment(EnrollmentError::AlreadyFinalized(_)))
    ));
}

#[test]
fn administrative_drop_is_terminal_and_skips_the_history() {
    let (harness, id) = enrolled_harness(AcademicPolicy::default());

    let dropped = harness
        .controller
        .administrative_drop(&id)
        .expect("drop accepted");
    assert_eq!(dropped.status(), EnrollmentStatus::AdministrativelyDropped);

    assert!(matches!(
        harness.controller.record_outcome(&id, 8.0, 90.0),
        Err(AdmissionError::Enrollment(EnrollmentError::AlreadyFinalized(_)))
    ));
    assert!(harness
        .records
        .student(&sid("2025001"))
        .expect("record present")
        .history()
        .is_empty());
    assert_eq!(
        harness
            .roster
            .section(&sec("MAT-A"))
            .expect("section present")
            .seats_taken(),
        0
    );
}

#[test]
fn unknown_enrollment_ids_are_reported() {
    let harness = harness(default_catalog(), AcademicPolicy::default());
    let ghost = crate::enrollment::EnrollmentId("enr-999999".to_string());

    assert!(matches!(
        harness.controller.record_outcome(&ghost, 8.0, 90.0),
        Err(AdmissionError::EnrollmentNotFound(_))
    ));
    assert!(matches!(
        harness.controller.withdraw(&ghost),
        Err(AdmissionError::EnrollmentNotFound(_))
    ));
}
