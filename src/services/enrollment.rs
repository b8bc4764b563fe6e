//! Enrollment rules for course student sets.
//!
//! Everything here is pure: the ceiling is passed in by the caller, which reads
//! it from [`EnrollmentSettings`](crate::config::EnrollmentSettings) at request
//! time.

use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrollmentError {
    #[error("A course can hold at most {limit} students, got {requested}")]
    TooManyStudents { limit: usize, requested: usize },

    #[error("Invalid student id: {0}")]
    InvalidStudentId(i64),

    #[error("Unknown student ids: {}", format_ids(.0))]
    UnknownStudents(Vec<i64>),
}

impl EnrollmentError {
    /// Short label used for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            EnrollmentError::TooManyStudents { .. } => "too_many_students",
            EnrollmentError::InvalidStudentId(_) => "invalid_student_id",
            EnrollmentError::UnknownStudents(_) => "unknown_students",
        }
    }
}

fn format_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Normalize a requested student list into a set and enforce the ceiling.
///
/// Duplicates collapse before counting. Returns the ids in ascending order.
pub fn validate_student_set(
    requested: &[i64],
    max_students: usize,
) -> Result<BTreeSet<i64>, EnrollmentError> {
    if let Some(&bad) = requested.iter().find(|&&id| id <= 0) {
        return Err(EnrollmentError::InvalidStudentId(bad));
    }

    let students: BTreeSet<i64> = requested.iter().copied().collect();
    if students.len() > max_students {
        return Err(EnrollmentError::TooManyStudents {
            limit: max_students,
            requested: students.len(),
        });
    }

    Ok(students)
}

/// Ids from `requested` that are absent from `existing`
pub fn missing_students(requested: &BTreeSet<i64>, existing: &BTreeSet<i64>) -> Vec<i64> {
    requested.difference(existing).copied().collect()
}
