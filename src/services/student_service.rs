use crate::database::{DatabasePool, Repository, StudentRepository};
use crate::error::{ApiError, Result};
use crate::models::{CreateStudentRequest, Student, StudentListQuery, UpdateStudentRequest};

/// Student CRUD on top of [`StudentRepository`]
#[derive(Clone, Debug)]
pub struct StudentService {
    repository: StudentRepository,
}

impl StudentService {
    pub fn new(db: DatabasePool) -> Self {
        Self {
            repository: StudentRepository::new(db),
        }
    }

    pub async fn list(&self, query: &StudentListQuery) -> Result<Vec<Student>> {
        let filter = query.name_filter().map(str::to_string);
        self.repository.find_all(&filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Student> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Student", id))
    }

    pub async fn create(&self, request: CreateStudentRequest) -> Result<Student> {
        self.repository.create(request.name).await
    }

    pub async fn update(&self, id: i64, request: UpdateStudentRequest) -> Result<Student> {
        self.repository.update(id, request).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.repository.delete(id).await? {
            return Err(ApiError::not_found("Student", id));
        }
        Ok(())
    }
}
