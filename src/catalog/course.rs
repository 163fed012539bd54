use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::CatalogError;

/// Identifier wrapper for catalog courses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CourseId(pub String);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog course: identity, credit-hour weight, syllabus, and the set of
/// direct prerequisite course ids.
///
/// Prerequisite edges are mutated through [`super::Catalog`] so the acyclic
/// invariant is enforced against the whole graph, not one course at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    id: CourseId,
    name: String,
    credit_hours: u32,
    syllabus: String,
    prerequisites: BTreeSet<CourseId>,
}

impl Course {
    pub fn new(
        id: CourseId,
        name: &str,
        credit_hours: u32,
        syllabus: &str,
    ) -> Result<Self, CatalogError> {
        if id.0.trim().is_empty() {
            return Err(CatalogError::EmptyCourseId);
        }
        if name.trim().is_empty() {
            return Err(CatalogError::EmptyCourseName);
        }
        if credit_hours == 0 {
            return Err(CatalogError::NonPositiveCreditHours);
        }

        Ok(Self {
            id: CourseId(id.0.trim().to_string()),
            name: name.trim().to_string(),
            credit_hours,
            syllabus: syllabus.trim().to_string(),
            prerequisites: BTreeSet::new(),
        })
    }

    pub fn id(&self) -> &CourseId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn credit_hours(&self) -> u32 {
        self.credit_hours
    }

    pub fn syllabus(&self) -> &str {
        &self.syllabus
    }

    pub fn prerequisites(&self) -> &BTreeSet<CourseId> {
        &self.prerequisites
    }

    pub fn has_prerequisite(&self, id: &CourseId) -> bool {
        self.prerequisites.contains(id)
    }

    /// Direct prerequisites absent from `completed`, in stable id order.
    /// Transitive closure is never consulted: a completed prerequisite
    /// already had its own prerequisites enforced at its own enrollment.
    pub fn missing_prerequisites(&self, completed: &BTreeSet<CourseId>) -> Vec<CourseId> {
        self.prerequisites
            .iter()
            .filter(|prereq| !completed.contains(prereq))
            .cloned()
            .collect()
    }

    pub(super) fn insert_prerequisite(&mut self, prereq: CourseId) {
        self.prerequisites.insert(prereq);
    }

    pub(super) fn remove_prerequisite(&mut self, prereq: &CourseId) -> bool {
        self.prerequisites.remove(prereq)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({}h)", self.id, self.name, self.credit_hours)
    }
}
