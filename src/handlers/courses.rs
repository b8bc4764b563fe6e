//! Courses Handler
//!
//! Listing with `id`/`name` filters plus create, retrieve, update and delete.

use axum::{
    extract::{RawQuery, State},
    response::Json,
};

use super::extractors::{ResourceId, ValidatedBody};
use super::response::{Created, NoContent};
use crate::error::Result;
use crate::models::{Course, CourseListQuery, CreateCourseRequest, UpdateCourseRequest};
use crate::services::course::CourseFilter;
use crate::services::CourseService;

/// List courses, optionally filtered by exact id and/or name
/// GET /courses/
///
/// The query string is parsed leniently: a malformed or repeated filter
/// narrows the result instead of failing the request.
#[utoipa::path(
    get,
    path = "/courses/",
    tag = "courses",
    params(CourseListQuery),
    responses(
        (status = 200, description = "Matching courses in creation order", body = Vec<Course>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_courses(
    State(courses): State<CourseService>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<Course>>> {
    let filter = CourseFilter::from_raw_query(query.as_deref());
    let courses = courses.list(&filter).await?;
    Ok(Json(courses))
}

/// Create a course
/// POST /courses/
#[utoipa::path(
    post,
    path = "/courses/",
    tag = "courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Missing name, unknown students or too many students")
    )
)]
pub async fn create_course(
    State(courses): State<CourseService>,
    ValidatedBody(request): ValidatedBody<CreateCourseRequest>,
) -> Result<Created<Course>> {
    let course = courses.create(request).await?;
    Ok(Created(course))
}

/// Retrieve one course
/// GET /courses/{id}/
#[utoipa::path(
    get,
    path = "/courses/{id}/",
    tag = "courses",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course", body = Course),
        (status = 404, description = "Course not found")
    )
)]
pub async fn get_course(
    State(courses): State<CourseService>,
    ResourceId(id): ResourceId,
) -> Result<Json<Course>> {
    Ok(Json(courses.get(id).await?))
}

/// Partially update a course
/// PATCH /courses/{id}/
#[utoipa::path(
    patch,
    path = "/courses/{id}/",
    tag = "courses",
    params(("id" = i64, Path, description = "Course ID")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Updated course", body = Course),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn update_course(
    State(courses): State<CourseService>,
    ResourceId(id): ResourceId,
    ValidatedBody(request): ValidatedBody<UpdateCourseRequest>,
) -> Result<Json<Course>> {
    Ok(Json(courses.update(id, request).await?))
}

/// Replace a course
/// PUT /courses/{id}/
#[utoipa::path(
    put,
    path = "/courses/{id}/",
    tag = "courses",
    params(("id" = i64, Path, description = "Course ID")),
    request_body = CreateCourseRequest,
    responses(
        (status = 200, description = "Replaced course", body = Course),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn replace_course(
    State(courses): State<CourseService>,
    ResourceId(id): ResourceId,
    ValidatedBody(request): ValidatedBody<CreateCourseRequest>,
) -> Result<Json<Course>> {
    Ok(Json(courses.replace(id, request).await?))
}

/// Delete a course; enrolled students are kept
/// DELETE /courses/{id}/
#[utoipa::path(
    delete,
    path = "/courses/{id}/",
    tag = "courses",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn delete_course(
    State(courses): State<CourseService>,
    ResourceId(id): ResourceId,
) -> Result<NoContent> {
    courses.delete(id).await?;
    Ok(NoContent)
}
