//! Course service: listing, CRUD and enrollment enforcement.

pub mod filter;

use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::config::EnrollmentSettings;
use crate::database::{CourseRepository, DatabasePool, Repository};
use crate::error::{ApiError, Result};
use crate::models::{
    Course, CourseChanges, CreateCourseRequest, NewCourse, UpdateCourseRequest,
};
use crate::middleware::metrics::{track_course_operation, track_enrollment_rejection};
use crate::services::enrollment::{validate_student_set, EnrollmentError};

pub use filter::{CourseFilter, CoursePredicate, IdFilter};

#[derive(Clone, Debug)]
pub struct CourseService {
    repository: CourseRepository,
    settings: EnrollmentSettings,
}

impl CourseService {
    pub fn new(db: DatabasePool, settings: EnrollmentSettings) -> Self {
        Self {
            repository: CourseRepository::new(db),
            settings,
        }
    }

    /// List courses matching the filter, in insertion order.
    ///
    /// A malformed `id` or a repeated filter key yields an empty list rather
    /// than an error.
    pub async fn list(&self, filter: &CourseFilter) -> Result<Vec<Course>> {
        if let IdFilter::Malformed(raw) = &filter.id {
            debug!(id = %raw, "Ignoring non-integer course id filter");
        }
        if !filter.repeated.is_empty() {
            debug!(keys = ?filter.repeated, "Repeated course filter keys match nothing");
        }

        let predicate = CoursePredicate::from_filter(filter);
        self.repository.find_all(&predicate).await
    }

    pub async fn get(&self, id: i64) -> Result<Course> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Course", id))
    }

    pub async fn create(&self, request: CreateCourseRequest) -> Result<Course> {
        let max_students = self.settings.max_students_per_course().await;
        let students = checked_students(&request.students, max_students)?;

        let course = self
            .repository
            .create(NewCourse {
                name: request.name,
                students,
            })
            .await;
        track_course_operation("create", course.is_ok());
        let course = course?;

        info!(course_id = course.id, name = %course.name, "Course created via API");
        Ok(course)
    }

    /// Apply a partial update; the enrollment ceiling is checked only when the
    /// student set is part of the payload. An unknown id is reported before
    /// any payload problem.
    pub async fn update(&self, id: i64, request: UpdateCourseRequest) -> Result<Course> {
        if !self.repository.exists(id).await? {
            return Err(ApiError::not_found("Course", id));
        }

        let students = match &request.students {
            Some(requested) => {
                let max_students = self.settings.max_students_per_course().await;
                Some(checked_students(requested, max_students)?)
            }
            None => None,
        };

        let changes = CourseChanges {
            name: request.name,
            students,
        };
        if changes.is_empty() {
            return self.get(id).await;
        }

        let course = self.repository.update(id, changes).await;
        track_course_operation("update", course.is_ok());
        course
    }

    /// Full replacement: omitted students mean an empty set.
    pub async fn replace(&self, id: i64, request: CreateCourseRequest) -> Result<Course> {
        self.update(
            id,
            UpdateCourseRequest {
                name: Some(request.name),
                students: Some(request.students),
            },
        )
        .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let deleted = self.repository.delete(id).await?;
        track_course_operation("delete", deleted);
        if !deleted {
            return Err(ApiError::not_found("Course", id));
        }
        Ok(())
    }

    pub async fn count(&self) -> Result<i64> {
        self.repository.count().await
    }
}

fn checked_students(requested: &[i64], max_students: usize) -> Result<BTreeSet<i64>> {
    validate_student_set(requested, max_students).map_err(|err: EnrollmentError| {
        track_enrollment_rejection(err.reason());
        debug!(error = %err, "Student set rejected");
        ApiError::from(err)
    })
}
