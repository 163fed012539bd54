use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{CatalogError, Course, CourseId};
use crate::enrollment::{CatalogStore, StoreError};

/// Owns every course and guards the prerequisite relation, which must stay
/// a directed acyclic graph over course ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    courses: BTreeMap<CourseId, Course>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_course(&mut self, course: Course) -> Result<(), CatalogError> {
        if self.courses.contains_key(course.id()) {
            return Err(CatalogError::DuplicateCourse(course.id().clone()));
        }
        self.courses.insert(course.id().clone(), course);
        Ok(())
    }

    pub fn get(&self, id: &CourseId) -> Option<&Course> {
        self.courses.get(id)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    /// Adds `prereq` as a direct prerequisite of `course`.
    ///
    /// Rejected when the edge is a self-reference, already present, or would
    /// close a cycle (`course` already reachable from `prereq` over existing
    /// edges). The graph is left untouched on any failure.
    pub fn add_prerequisite(
        &mut self,
        course: &CourseId,
        prereq: &CourseId,
    ) -> Result<(), CatalogError> {
        if course == prereq {
            return Err(CatalogError::SelfReference);
        }
        if !self.courses.contains_key(prereq) {
            return Err(CatalogError::UnknownCourse(prereq.clone()));
        }
        let existing = self
            .courses
            .get(course)
            .ok_or_else(|| CatalogError::UnknownCourse(course.clone()))?;
        if existing.has_prerequisite(prereq) {
            return Err(CatalogError::DuplicateEdge {
                course: course.clone(),
                prereq: prereq.clone(),
            });
        }
        if self.reaches(prereq, course) {
            return Err(CatalogError::Cycle {
                course: course.clone(),
                prereq: prereq.clone(),
            });
        }

        if let Some(entry) = self.courses.get_mut(course) {
            entry.insert_prerequisite(prereq.clone());
        }
        Ok(())
    }

    /// Removes the edge if present; unknown courses or absent edges are a
    /// no-op returning `false`.
    pub fn remove_prerequisite(&mut self, course: &CourseId, prereq: &CourseId) -> bool {
        self.courses
            .get_mut(course)
            .map(|entry| entry.remove_prerequisite(prereq))
            .unwrap_or(false)
    }

    /// Direct prerequisites of `course` not covered by `completed`.
    pub fn missing_prerequisites(
        &self,
        course: &CourseId,
        completed: &BTreeSet<CourseId>,
    ) -> Result<Vec<CourseId>, CatalogError> {
        self.courses
            .get(course)
            .map(|entry| entry.missing_prerequisites(completed))
            .ok_or_else(|| CatalogError::UnknownCourse(course.clone()))
    }

    /// Deletes a course, refusing while any other course still lists it as
    /// a prerequisite. Protection against deleting courses with live
    /// enrollments belongs to the persistence boundary.
    pub fn remove_course(&mut self, id: &CourseId) -> Result<Course, CatalogError> {
        let dependents: Vec<CourseId> = self
            .courses
            .values()
            .filter(|course| course.has_prerequisite(id))
            .map(|course| course.id().clone())
            .collect();
        if !dependents.is_empty() {
            return Err(CatalogError::CourseInUse {
                course: id.clone(),
                dependents,
            });
        }
        self.courses
            .remove(id)
            .ok_or_else(|| CatalogError::UnknownCourse(id.clone()))
    }

    /// Depth-first reachability over prerequisite edges, visited set scoped
    /// to this call. O(V+E), acceptable for catalog-sized graphs on an
    /// infrequent write path.
    fn reaches(&self, from: &CourseId, target: &CourseId) -> bool {
        let mut visited: BTreeSet<&CourseId> = BTreeSet::new();
        let mut stack: Vec<&CourseId> = vec![from];

        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(course) = self.courses.get(current) {
                stack.extend(course.prerequisites().iter());
            }
        }
        false
    }
}

impl CatalogStore for Catalog {
    fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StoreError> {
        Ok(self.courses.get(id).cloned())
    }

    fn direct_prerequisites(&self, id: &CourseId) -> Result<BTreeSet<CourseId>, StoreError> {
        self.courses
            .get(id)
            .map(|course| course.prerequisites().clone())
            .ok_or(StoreError::NotFound)
    }
}
