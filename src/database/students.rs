use async_trait::async_trait;
use tracing::info;

use super::repository::Repository;
use super::DatabasePool;
use crate::error::ApiError;
use crate::models::{Student, UpdateStudentRequest};

#[derive(Clone, Debug)]
pub struct StudentRepository {
    pool: DatabasePool,
}

impl StudentRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Student, String, UpdateStudentRequest> for StudentRepository {
    /// Exact name, or every student when `None`
    type Filter = Option<String>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Student>, ApiError> {
        let student = sqlx::query_as::<_, Student>("SELECT id, name FROM students WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(student)
    }

    async fn find_all(&self, filter: &Option<String>) -> Result<Vec<Student>, ApiError> {
        let students = match filter {
            Some(name) => {
                sqlx::query_as::<_, Student>(
                    "SELECT id, name FROM students WHERE name = ? ORDER BY id",
                )
                .bind(name)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Student>("SELECT id, name FROM students ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(students)
    }

    async fn create(&self, name: String) -> Result<Student, ApiError> {
        let id = sqlx::query("INSERT INTO students (name) VALUES (?)")
            .bind(&name)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        info!(student_id = id, "Student created");
        Ok(Student { id, name })
    }

    async fn update(&self, id: i64, dto: UpdateStudentRequest) -> Result<Student, ApiError> {
        if let Some(name) = &dto.name {
            let result = sqlx::query("UPDATE students SET name = ? WHERE id = ?")
                .bind(name)
                .bind(id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(ApiError::not_found("Student", id));
            }
            info!(student_id = id, "Student updated");
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Student", id))
    }

    /// Enrollments go with the student through `ON DELETE CASCADE`
    async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(student_id = id, "Student deleted");
        }
        Ok(deleted)
    }

    async fn exists(&self, id: i64) -> Result<bool, ApiError> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    async fn count(&self) -> Result<i64, ApiError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
