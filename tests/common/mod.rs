#![allow(dead_code)]

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use course_api::config::{Config, EnrollmentConfig};
use course_api::database::setup_in_memory;
use course_api::models::{Course, CreateCourseRequest, CreateStudentRequest, Student};
use course_api::router::build_router;
use course_api::AppState;

/// Router plus the state behind it, backed by a fresh in-memory database
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        Self::with_config(Config::for_testing()).await
    }

    pub async fn with_max_students(max_students: usize) -> Result<Self> {
        let mut config = Config::for_testing();
        config.enrollment = EnrollmentConfig::new(max_students)?;
        Self::with_config(config).await
    }

    pub async fn with_config(config: Config) -> Result<Self> {
        let pool = setup_in_memory().await?;
        Ok(Self::from_state(AppState::new(pool, config, None)))
    }

    pub fn from_state(state: AppState) -> Self {
        let router = build_router(state.clone());
        Self { state, router }
    }

    /// Send a request and return the status and decoded JSON body
    /// (`Value::Null` for an empty body).
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let (status, bytes) = self.send_raw(method, uri, body).await?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, json))
    }

    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Result<(StatusCode, Vec<u8>)> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes().to_vec();
        Ok((status, bytes))
    }

    /// Send an `application/x-www-form-urlencoded` body
    pub async fn send_form(&self, method: Method, uri: &str, form: &str) -> Result<(StatusCode, Value)> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))?;

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, json))
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PATCH, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, uri, None).await
    }

    /// Insert `count` courses named `course-0`, `course-1`, ...
    pub async fn make_courses(&self, count: usize) -> Result<Vec<Course>> {
        self.make_courses_with_students(count, &[]).await
    }

    pub async fn make_courses_with_students(
        &self,
        count: usize,
        students: &[i64],
    ) -> Result<Vec<Course>> {
        let mut courses = Vec::with_capacity(count);
        for i in 0..count {
            let course = self
                .state
                .course_service
                .create(CreateCourseRequest {
                    name: format!("course-{}", i),
                    students: students.to_vec(),
                })
                .await?;
            courses.push(course);
        }
        Ok(courses)
    }

    /// Insert `count` students named `student-0`, `student-1`, ...
    pub async fn make_students(&self, count: usize) -> Result<Vec<Student>> {
        let mut students = Vec::with_capacity(count);
        for i in 0..count {
            let student = self
                .state
                .student_service
                .create(CreateStudentRequest {
                    name: format!("student-{}", i),
                })
                .await?;
            students.push(student);
        }
        Ok(students)
    }
}

pub fn ids(students: &[Student]) -> Vec<i64> {
    students.iter().map(|s| s.id).collect()
}
