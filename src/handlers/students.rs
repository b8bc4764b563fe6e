use axum::{
    extract::{Query, State},
    response::Json,
};

use super::extractors::{ResourceId, ValidatedBody};
use super::response::{Created, NoContent};
use crate::error::Result;
use crate::models::{CreateStudentRequest, Student, StudentListQuery, UpdateStudentRequest};
use crate::services::StudentService;

/// GET /students/
#[utoipa::path(
    get,
    path = "/students/",
    tag = "students",
    params(StudentListQuery),
    responses((status = 200, description = "Students in creation order", body = Vec<Student>))
)]
pub async fn list_students(
    State(students): State<StudentService>,
    Query(params): Query<StudentListQuery>,
) -> Result<Json<Vec<Student>>> {
    Ok(Json(students.list(&params).await?))
}

/// POST /students/
#[utoipa::path(
    post,
    path = "/students/",
    tag = "students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Missing or empty name")
    )
)]
pub async fn create_student(
    State(students): State<StudentService>,
    ValidatedBody(request): ValidatedBody<CreateStudentRequest>,
) -> Result<Created<Student>> {
    Ok(Created(students.create(request).await?))
}

/// GET /students/{id}/
#[utoipa::path(
    get,
    path = "/students/{id}/",
    tag = "students",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(
    State(students): State<StudentService>,
    ResourceId(id): ResourceId,
) -> Result<Json<Student>> {
    Ok(Json(students.get(id).await?))
}

/// PATCH /students/{id}/
#[utoipa::path(
    patch,
    path = "/students/{id}/",
    tag = "students",
    params(("id" = i64, Path, description = "Student ID")),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Updated student", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn update_student(
    State(students): State<StudentService>,
    ResourceId(id): ResourceId,
    ValidatedBody(request): ValidatedBody<UpdateStudentRequest>,
) -> Result<Json<Student>> {
    Ok(Json(students.update(id, request).await?))
}

/// DELETE /students/{id}/
///
/// The student is also dropped from every course.
#[utoipa::path(
    delete,
    path = "/students/{id}/",
    tag = "students",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn delete_student(
    State(students): State<StudentService>,
    ResourceId(id): ResourceId,
) -> Result<NoContent> {
    students.delete(id).await?;
    Ok(NoContent)
}
