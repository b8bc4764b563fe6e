//! Database repository pattern for clean data access.
//!
//! This module provides:
//! - Generic repository trait for CRUD operations
//! - Shared helpers for the course/student join table

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use std::collections::{BTreeSet, HashMap};

use crate::error::ApiError;
use crate::services::enrollment::{missing_students, EnrollmentError};

/// Generic repository trait for database operations
#[async_trait]
pub trait Repository<T, CreateDto, UpdateDto>: Send + Sync
where
    T: Send + Sync,
    CreateDto: Send + Sync,
    UpdateDto: Send + Sync,
{
    /// Listing criteria understood by `find_all`
    type Filter: Send + Sync;

    /// Find entity by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<T>, ApiError>;

    /// Find all entities matching the filter, in insertion order
    async fn find_all(&self, filter: &Self::Filter) -> Result<Vec<T>, ApiError>;

    /// Create a new entity
    async fn create(&self, dto: CreateDto) -> Result<T, ApiError>;

    /// Update an existing entity
    async fn update(&self, id: i64, dto: UpdateDto) -> Result<T, ApiError>;

    /// Delete an entity by ID
    async fn delete(&self, id: i64) -> Result<bool, ApiError>;

    /// Check if entity exists
    async fn exists(&self, id: i64) -> Result<bool, ApiError>;

    /// Count all entities
    async fn count(&self) -> Result<i64, ApiError>;
}

#[derive(Debug, sqlx::FromRow)]
struct EnrollmentRow {
    course_id: i64,
    student_id: i64,
}

/// Student ids per course, ascending, for the given courses
pub(crate) async fn load_enrollments(
    conn: &mut SqliteConnection,
    course_ids: &[i64],
) -> Result<HashMap<i64, Vec<i64>>, ApiError> {
    let mut enrollments: HashMap<i64, Vec<i64>> = HashMap::new();
    if course_ids.is_empty() {
        return Ok(enrollments);
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT course_id, student_id FROM course_students WHERE course_id IN (",
    );
    let mut separated = qb.separated(", ");
    for id in course_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY course_id, student_id");

    let rows: Vec<EnrollmentRow> = qb.build_query_as().fetch_all(&mut *conn).await?;
    for row in rows {
        enrollments.entry(row.course_id).or_default().push(row.student_id);
    }

    Ok(enrollments)
}

/// Fail with `UnknownStudents` unless every requested id has a student row
pub(crate) async fn ensure_students_exist(
    conn: &mut SqliteConnection,
    students: &BTreeSet<i64>,
) -> Result<(), ApiError> {
    if students.is_empty() {
        return Ok(());
    }

    let mut qb = QueryBuilder::<Sqlite>::new("SELECT id FROM students WHERE id IN (");
    let mut separated = qb.separated(", ");
    for id in students {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let existing: BTreeSet<i64> = qb
        .build_query_scalar::<i64>()
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .collect();

    let missing = missing_students(students, &existing);
    if !missing.is_empty() {
        return Err(EnrollmentError::UnknownStudents(missing).into());
    }
    Ok(())
}

/// Replace the student set of one course
pub(crate) async fn replace_enrollments(
    conn: &mut SqliteConnection,
    course_id: i64,
    students: &BTreeSet<i64>,
) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM course_students WHERE course_id = ?")
        .bind(course_id)
        .execute(&mut *conn)
        .await?;

    if students.is_empty() {
        return Ok(());
    }

    let mut qb =
        QueryBuilder::<Sqlite>::new("INSERT INTO course_students (course_id, student_id) ");
    qb.push_values(students.iter(), |mut row, student_id| {
        row.push_bind(course_id).push_bind(*student_id);
    });
    qb.build().execute(&mut *conn).await?;

    Ok(())
}
