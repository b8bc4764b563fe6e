use utoipa::OpenApi;

use crate::models::{
    Course, CreateCourseRequest, CreateStudentRequest, Student, UpdateCourseRequest,
    UpdateStudentRequest,
};
use crate::services::health_check::{DependencyHealth, HealthCheckStatus, HealthStatus};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Course API",
        description = "Courses, students and enrollment limits"
    ),
    paths(
        // Health
        crate::handlers::health::health_check,
        crate::handlers::metrics::get_prometheus_metrics,

        // Courses
        crate::handlers::courses::list_courses,
        crate::handlers::courses::create_course,
        crate::handlers::courses::get_course,
        crate::handlers::courses::update_course,
        crate::handlers::courses::replace_course,
        crate::handlers::courses::delete_course,

        // Students
        crate::handlers::students::list_students,
        crate::handlers::students::create_student,
        crate::handlers::students::get_student,
        crate::handlers::students::update_student,
        crate::handlers::students::delete_student,
    ),
    components(schemas(
        Course,
        CreateCourseRequest,
        UpdateCourseRequest,
        Student,
        CreateStudentRequest,
        UpdateStudentRequest,
        HealthStatus,
        DependencyHealth,
        HealthCheckStatus,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "metrics", description = "Prometheus metrics"),
        (name = "courses", description = "Course listing and management"),
        (name = "students", description = "Student management"),
    )
)]
pub struct ApiDoc;
