//! Application state shared across all handlers.
//!
//! This module defines the `AppState` struct which holds all shared services
//! and connections needed by the API.

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::{Config, EnrollmentSettings};
use crate::database::DatabasePool;
use crate::services;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub db: DatabasePool,
    /// Application configuration
    pub config: Config,
    /// Enrollment ceiling, readable and adjustable at runtime
    pub enrollment: EnrollmentSettings,
    pub course_service: services::CourseService,
    pub student_service: services::StudentService,
    pub health_checker: services::HealthChecker,
    /// Prometheus handle; `None` when metrics are disabled
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(db: DatabasePool, config: Config, metrics_handle: Option<PrometheusHandle>) -> Self {
        let enrollment = EnrollmentSettings::new(config.enrollment);

        Self {
            course_service: services::CourseService::new(db.clone(), enrollment.clone()),
            student_service: services::StudentService::new(db.clone()),
            health_checker: services::HealthChecker::new(db.clone(), config.environment.clone()),
            db,
            config,
            enrollment,
            metrics_handle,
        }
    }
}

// Implement FromRef for services that need to be extracted from AppState
impl axum::extract::FromRef<AppState> for services::CourseService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.course_service.clone()
    }
}

impl axum::extract::FromRef<AppState> for services::StudentService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.student_service.clone()
    }
}

impl axum::extract::FromRef<AppState> for services::HealthChecker {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.health_checker.clone()
    }
}
