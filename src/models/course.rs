//! Course Models
//!
//! API representations and internal change sets for courses

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeSet;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A course as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Course {
    pub id: i64,
    pub name: String,
    /// Ids of enrolled students, ascending
    pub students: Vec<i64>,
}

/// A course row without its enrollments
#[derive(Debug, Clone, FromRow)]
pub struct CourseRow {
    pub id: i64,
    pub name: String,
}

impl CourseRow {
    pub fn with_students(self, students: Vec<i64>) -> Course {
        Course {
            id: self.id,
            name: self.name,
            students,
        }
    }
}

/// Request to create (POST) or fully replace (PUT) a course
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 255, message = "name must be between 1 and 255 characters"))]
    pub name: String,
    #[serde(default)]
    pub students: Vec<i64>,
}

/// Partial update (PATCH); absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, max = 255, message = "name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    pub students: Option<Vec<i64>>,
}

/// Query params for listing courses.
///
/// Both are kept as raw strings so that a malformed `id` narrows the result
/// to nothing instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseListQuery {
    /// Exact course id
    pub id: Option<String>,
    /// Exact, case-sensitive course name
    pub name: Option<String>,
}

/// Validated input for inserting a course
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub name: String,
    pub students: BTreeSet<i64>,
}

/// Validated change set for an existing course
#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub name: Option<String>,
    pub students: Option<BTreeSet<i64>>,
}

impl CourseChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.students.is_none()
    }
}
