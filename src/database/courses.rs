use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};
use tracing::{debug, info};

use super::repository::{ensure_students_exist, load_enrollments, replace_enrollments, Repository};
use super::DatabasePool;
use crate::error::ApiError;
use crate::models::{Course, CourseChanges, CourseRow, NewCourse};
use crate::services::course::filter::CoursePredicate;

/// Courses and their enrollments, stored as `courses` + `course_students`
#[derive(Clone, Debug)]
pub struct CourseRepository {
    pool: DatabasePool,
}

impl CourseRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn attach_students(&self, rows: Vec<CourseRow>) -> Result<Vec<Course>, ApiError> {
        let mut conn = self.pool.acquire().await?;
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut enrollments = load_enrollments(&mut conn, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let students = enrollments.remove(&row.id).unwrap_or_default();
                row.with_students(students)
            })
            .collect())
    }

    async fn fetch_existing(&self, id: i64) -> Result<Course, ApiError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Course", id))
    }
}

#[async_trait]
impl Repository<Course, NewCourse, CourseChanges> for CourseRepository {
    type Filter = CoursePredicate;

    async fn find_by_id(&self, id: i64) -> Result<Option<Course>, ApiError> {
        let courses = self.find_all(&CoursePredicate::IdEq(id)).await?;
        Ok(courses.into_iter().next())
    }

    async fn find_all(&self, filter: &CoursePredicate) -> Result<Vec<Course>, ApiError> {
        if filter.is_nothing() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT id, name FROM courses");
        filter.push_where(&mut qb);
        qb.push(" ORDER BY id");

        let rows: Vec<CourseRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        debug!(?filter, matched = rows.len(), "Courses fetched");

        self.attach_students(rows).await
    }

    async fn create(&self, dto: NewCourse) -> Result<Course, ApiError> {
        let mut tx = self.pool.begin().await?;

        ensure_students_exist(&mut tx, &dto.students).await?;

        let id = sqlx::query("INSERT INTO courses (name) VALUES (?)")
            .bind(&dto.name)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        replace_enrollments(&mut tx, id, &dto.students).await?;
        tx.commit().await?;

        info!(course_id = id, students = dto.students.len(), "Course created");
        self.fetch_existing(id).await
    }

    async fn update(&self, id: i64, dto: CourseChanges) -> Result<Course, ApiError> {
        let mut tx = self.pool.begin().await?;

        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM courses WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if found.is_none() {
            return Err(ApiError::not_found("Course", id));
        }

        if let Some(name) = &dto.name {
            sqlx::query("UPDATE courses SET name = ? WHERE id = ?")
                .bind(name)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(students) = &dto.students {
            ensure_students_exist(&mut tx, students).await?;
            replace_enrollments(&mut tx, id, students).await?;
        }

        tx.commit().await?;

        info!(
            course_id = id,
            name_changed = dto.name.is_some(),
            students_changed = dto.students.is_some(),
            "Course updated"
        );
        self.fetch_existing(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(course_id = id, "Course deleted");
        }
        Ok(deleted)
    }

    async fn exists(&self, id: i64) -> Result<bool, ApiError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM courses WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    async fn count(&self) -> Result<i64, ApiError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
