use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

pub mod enrollment;
pub use enrollment::{ConfigError, EnrollmentConfig, EnrollmentSettings};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub request_timeout: u64,
    pub log_level: String,
    pub log_format: LogFormat,
    pub metrics_enabled: bool,
    pub enrollment: EnrollmentConfig,
}

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::MissingVariable(format!(
                "LOG_FORMAT (got '{}')",
                other
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            database_url: "sqlite://courses.db".to_string(),
            max_connections: 5,
            request_timeout: 30,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            enrollment: EnrollmentConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Ok(Config {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: parse_or(&lookup, "MAX_CONNECTIONS", defaults.max_connections)?,
            request_timeout: parse_or(&lookup, "REQUEST_TIMEOUT", defaults.request_timeout)?,
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format: parse_or(&lookup, "LOG_FORMAT", defaults.log_format)?,
            metrics_enabled: parse_or(&lookup, "METRICS_ENABLED", defaults.metrics_enabled)?,
            enrollment: EnrollmentConfig::from_lookup(&lookup)
                .map_err(|e| anyhow::anyhow!("Failed to load enrollment config: {}", e))?,
        })
    }

    /// Configuration for tests: in-memory database, metrics off
    pub fn for_testing() -> Self {
        Self {
            environment: "test".to_string(),
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            metrics_enabled: false,
            ..Default::default()
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} environment variable is invalid: '{}'", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_environment() {
        let config = Config::from_lookup(|_| None).expect("Failed to build config");
        assert_eq!(config.port, 8000);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.enrollment.max_students_per_course, 20);
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = Config::from_lookup(|key| match key {
            "PORT" => Some("9090".to_string()),
            "LOG_FORMAT" => Some("JSON".to_string()),
            "METRICS_ENABLED" => Some("false".to_string()),
            "MAX_STUDENTS_PER_COURSE" => Some("7".to_string()),
            _ => None,
        })
        .expect("Failed to build config");

        assert_eq!(config.port, 9090);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(!config.metrics_enabled);
        assert_eq!(config.enrollment.max_students_per_course, 7);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let result = Config::from_lookup(|key| (key == "PORT").then(|| "eighty".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_enrollment_ceiling_is_an_error() {
        let result =
            Config::from_lookup(|key| (key == "MAX_STUDENTS_PER_COURSE").then(|| "0".to_string()));
        assert!(result.is_err());
    }
}
