mod course;
mod graph;

pub use course::{Course, CourseId};
pub use graph::Catalog;

/// Errors raised while maintaining the course catalog and its acyclic
/// prerequisite graph.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("course id cannot be empty")]
    EmptyCourseId,
    #[error("course name cannot be empty")]
    EmptyCourseName,
    #[error("credit hours must be a positive integer")]
    NonPositiveCreditHours,
    #[error("course {0} is already registered")]
    DuplicateCourse(CourseId),
    #[error("unknown course: {0}")]
    UnknownCourse(CourseId),
    #[error("a course cannot be its own prerequisite")]
    SelfReference,
    #[error("{prereq} is already a prerequisite of {course}")]
    DuplicateEdge { course: CourseId, prereq: CourseId },
    #[error("{course} already depends on {prereq}; adding the edge would close a cycle")]
    Cycle { course: CourseId, prereq: CourseId },
    #[error("course {course} is still a prerequisite of {dependents:?}")]
    CourseInUse {
        course: CourseId,
        dependents: Vec<CourseId>,
    },
}
