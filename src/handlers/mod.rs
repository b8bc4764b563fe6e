pub mod courses;
pub mod extractors;
pub mod health;
pub mod metrics;
pub mod response;
pub mod routes;
pub mod students;

// Re-export commonly used types
pub use extractors::{ResourceId, ValidatedBody};
pub use response::{Created, NoContent};
pub use routes::{course_routes, student_routes};
