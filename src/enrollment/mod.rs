//! Enrollment lifecycle and admission control.
//!
//! [`domain`] holds the enrollment state machine, [`policy`] the pure
//! grade/attendance decision rules, [`repository`] the store traits the
//! engine consumes from its collaborators, and [`admission`] the service
//! sequencing the eligibility pipeline.

pub mod admission;
pub mod domain;
pub mod policy;
pub mod repository;

#[cfg(test)]
mod tests;

pub use admission::{AdmissionController, AdmissionError};
pub use domain::{Enrollment, EnrollmentError, EnrollmentId, EnrollmentStatus};
pub use repository::{CatalogStore, EnrollmentSummary, RecordStore, RosterStore, StoreError};
