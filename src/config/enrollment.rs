use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Environment variable holding the enrollment ceiling
pub const MAX_STUDENTS_ENV: &str = "MAX_STUDENTS_PER_COURSE";

/// Ceiling applied when the environment does not override it
pub const DEFAULT_MAX_STUDENTS_PER_COURSE: usize = 20;

/// Enrollment rules applied to course student sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentConfig {
    /// Maximum number of students a single course may hold (default: 20)
    pub max_students_per_course: usize,
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self {
            max_students_per_course: DEFAULT_MAX_STUDENTS_PER_COURSE,
        }
    }
}

impl EnrollmentConfig {
    pub fn new(max_students_per_course: usize) -> Result<Self, ConfigError> {
        let config = Self {
            max_students_per_course,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// `from_env` is this with `std::env::var`; tests pass a closure instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup(MAX_STUDENTS_ENV) {
            let max = val.trim().parse::<usize>().map_err(|_| {
                ConfigError::MissingVariable(format!("{} (got '{}')", MAX_STUDENTS_ENV, val))
            })?;
            config.max_students_per_course = max;
            info!("Using custom max students per course: {}", max);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_students_per_course == 0 {
            return Err(ConfigError::ValidationFailed(format!(
                "{} must be at least 1",
                MAX_STUDENTS_ENV
            )));
        }
        Ok(())
    }
}

/// Shared, runtime-adjustable handle on the enrollment rules.
///
/// Handlers read the current value on every request, so an update is seen by
/// the next request without restarting the server.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentSettings {
    inner: Arc<RwLock<EnrollmentConfig>>,
}

impl EnrollmentSettings {
    pub fn new(config: EnrollmentConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Snapshot of the rules in force right now
    pub async fn current(&self) -> EnrollmentConfig {
        *self.inner.read().await
    }

    pub async fn max_students_per_course(&self) -> usize {
        self.inner.read().await.max_students_per_course
    }

    /// Replace the enrollment ceiling, rejecting invalid values
    pub async fn set_max_students_per_course(&self, max: usize) -> Result<(), ConfigError> {
        let updated = EnrollmentConfig::new(max)?;
        let mut guard = self.inner.write().await;
        info!(
            old = guard.max_students_per_course,
            new = max,
            "Enrollment ceiling updated"
        );
        *guard = updated;
        Ok(())
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is missing or invalid")]
    MissingVariable(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}
