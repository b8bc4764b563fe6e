// Business logic services
// Course listing/CRUD, enrollment rules, students, health

pub mod course;
pub mod enrollment;
pub mod health_check;
pub mod student_service;

pub use course::CourseService;
pub use enrollment::{validate_student_set, EnrollmentError};
pub use health_check::HealthChecker;
pub use student_service::StudentService;
