use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::catalog::{Catalog, Course, CourseId};
use crate::config::AcademicPolicy;
use crate::enrollment::admission::AdmissionController;
use crate::enrollment::domain::{Enrollment, EnrollmentId};
use crate::enrollment::repository::{EnrollmentSummary, RecordStore, RosterStore, StoreError};
use crate::records::{CompletionEntry, CompletionOutcome, StudentId, StudentRecord};
use crate::schedule::{parse_slot_map, Section, SectionId};

#[derive(Default)]
pub(super) struct MemoryRoster {
    sections: Mutex<HashMap<SectionId, Section>>,
    enrollments: Mutex<HashMap<EnrollmentId, Enrollment>>,
}

impl MemoryRoster {
    pub fn insert_section(&self, section: Section) {
        self.sections
            .lock()
            .expect("roster lock")
            .insert(section.id().clone(), section);
    }

    pub fn section(&self, id: &SectionId) -> Option<Section> {
        self.sections.lock().expect("roster lock").get(id).cloned()
    }

    pub fn enrollment(&self, id: &EnrollmentId) -> Option<Enrollment> {
        self.enrollments
            .lock()
            .expect("roster lock")
            .get(id)
            .cloned()
    }
}

impl RosterStore for MemoryRoster {
    fn get_section(&self, id: &SectionId) -> Result<Option<Section>, StoreError> {
        Ok(self.sections.lock().expect("roster lock").get(id).cloned())
    }

    fn update_section(&self, section: Section) -> Result<(), StoreError> {
        self.sections
            .lock()
            .expect("roster lock")
            .insert(section.id().clone(), section);
        Ok(())
    }

    fn insert_enrollment(&self, enrollment: Enrollment) -> Result<(), StoreError> {
        let mut enrollments = self.enrollments.lock().expect("roster lock");
        if enrollments.contains_key(enrollment.id()) {
            return Err(StoreError::Conflict);
        }
        enrollments.insert(enrollment.id().clone(), enrollment);
        Ok(())
    }

    fn get_enrollment(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, StoreError> {
        Ok(self
            .enrollments
            .lock()
            .expect("roster lock")
            .get(id)
            .cloned())
    }

    fn update_enrollment(&self, enrollment: Enrollment) -> Result<(), StoreError> {
        let mut enrollments = self.enrollments.lock().expect("roster lock");
        if !enrollments.contains_key(enrollment.id()) {
            return Err(StoreError::NotFound);
        }
        enrollments.insert(enrollment.id().clone(), enrollment);
        Ok(())
    }

    fn count_active_enrollments(&self, section_id: &SectionId) -> Result<usize, StoreError> {
        Ok(self
            .enrollments
            .lock()
            .expect("roster lock")
            .values()
            .filter(|e| e.section_id() == section_id && e.is_active())
            .count())
    }

    fn list_student_active_sections(
        &self,
        student_id: &StudentId,
        period: &str,
    ) -> Result<Vec<Section>, StoreError> {
        let sections = self.sections.lock().expect("roster lock");
        Ok(self
            .enrollments
            .lock()
            .expect("roster lock")
            .values()
            .filter(|e| e.student_id() == student_id && e.is_active() && e.period() == period)
            .filter_map(|e| sections.get(e.section_id()).cloned())
            .collect())
    }

    fn list_student_enrollments(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<EnrollmentSummary>, StoreError> {
        Ok(self
            .enrollments
            .lock()
            .expect("roster lock")
            .values()
            .filter(|e| e.student_id() == student_id)
            .map(EnrollmentSummary::of)
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryRecords {
    students: Mutex<HashMap<StudentId, StudentRecord>>,
}

impl MemoryRecords {
    pub fn insert(&self, record: StudentRecord) {
        self.students
            .lock()
            .expect("records lock")
            .insert(record.id().clone(), record);
    }

    pub fn student(&self, id: &StudentId) -> Option<StudentRecord> {
        self.students.lock().expect("records lock").get(id).cloned()
    }
}

impl RecordStore for MemoryRecords {
    fn get_student(&self, id: &StudentId) -> Result<Option<StudentRecord>, StoreError> {
        Ok(self.students.lock().expect("records lock").get(id).cloned())
    }

    fn append_completion(
        &self,
        student_id: &StudentId,
        entry: CompletionEntry,
    ) -> Result<(), StoreError> {
        let mut students = self.students.lock().expect("records lock");
        let record = students.get_mut(student_id).ok_or(StoreError::NotFound)?;
        record
            .record_completion(entry)
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }
}

pub(super) struct Harness {
    pub roster: Arc<MemoryRoster>,
    pub records: Arc<MemoryRecords>,
    pub controller: AdmissionController<Catalog, MemoryRoster, MemoryRecords>,
}

pub(super) fn course(id: &str, credit_hours: u32) -> Course {
    Course::new(CourseId(id.to_string()), id, credit_hours, "").expect("valid course")
}

pub(super) fn section(
    id: &str,
    course: &str,
    period: &str,
    capacity: u32,
    slots: &[(&str, &str)],
) -> Section {
    Section::new(
        SectionId(id.to_string()),
        CourseId(course.to_string()),
        period,
        capacity,
        parse_slot_map(slots).expect("valid slots"),
        None,
    )
    .expect("valid section")
}

pub(super) fn student(id: &str, name: &str) -> StudentRecord {
    StudentRecord::new(StudentId(id.to_string()), name, "student@campus.edu")
        .expect("valid record")
}

pub(super) fn approved_entry(course: &str, credit_hours: u32, period: &str) -> CompletionEntry {
    CompletionEntry {
        course_id: CourseId(course.to_string()),
        grade: 8.0,
        attendance: 90.0,
        credit_hours,
        outcome: CompletionOutcome::Approved,
        period: period.to_string(),
    }
}

/// Catalog shared by most scenarios: `POO` requires `INP`; `MAT` and `BD`
/// are free-standing.
pub(super) fn default_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    for (id, hours) in [("INP", 60), ("POO", 60), ("MAT", 30), ("BD", 45)] {
        catalog.add_course(course(id, hours)).expect("unique id");
    }
    catalog
        .add_prerequisite(&CourseId("POO".to_string()), &CourseId("INP".to_string()))
        .expect("acyclic edge");
    catalog
}

pub(super) fn harness(catalog: Catalog, policy: AcademicPolicy) -> Harness {
    let roster = Arc::new(MemoryRoster::default());
    let records = Arc::new(MemoryRecords::default());
    let controller = AdmissionController::new(
        Arc::new(catalog),
        roster.clone(),
        records.clone(),
        policy,
    );
    Harness {
        roster,
        records,
        controller,
    }
}

pub(super) fn sid(raw: &str) -> StudentId {
    StudentId(raw.to_string())
}

pub(super) fn sec(raw: &str) -> SectionId {
    SectionId(raw.to_string())
}
