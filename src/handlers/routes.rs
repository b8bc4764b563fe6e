//! Route tables for the resource handlers.
//!
//! Every path is registered with and without a trailing slash.

use axum::{routing::get, Router};

use super::{courses, students};
use crate::AppState;

/// Build course routes
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/courses",
            get(courses::list_courses).post(courses::create_course),
        )
        .route(
            "/courses/",
            get(courses::list_courses).post(courses::create_course),
        )
        .route(
            "/courses/{id}",
            get(courses::get_course)
                .patch(courses::update_course)
                .put(courses::replace_course)
                .delete(courses::delete_course),
        )
        .route(
            "/courses/{id}/",
            get(courses::get_course)
                .patch(courses::update_course)
                .put(courses::replace_course)
                .delete(courses::delete_course),
        )
}

/// Build student routes
pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/students",
            get(students::list_students).post(students::create_student),
        )
        .route(
            "/students/",
            get(students::list_students).post(students::create_student),
        )
        .route(
            "/students/{id}",
            get(students::get_student)
                .patch(students::update_student)
                .delete(students::delete_student),
        )
        .route(
            "/students/{id}/",
            get(students::get_student)
                .patch(students::update_student)
                .delete(students::delete_student),
        )
}
