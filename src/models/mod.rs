// Data models and DTOs
// API request/response models and database rows

pub mod course;
pub mod student;

pub use course::{
    Course, CourseChanges, CourseListQuery, CourseRow, CreateCourseRequest, NewCourse,
    UpdateCourseRequest,
};
pub use student::{CreateStudentRequest, Student, StudentListQuery, UpdateStudentRequest};
