use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use utoipa::ToSchema;

use crate::database::DatabasePool;

/// Overall health with per-dependency detail
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: HealthCheckStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub environment: String,
    pub uptime_seconds: u64,
    pub dependencies: Vec<DependencyHealth>,
}

/// Dependency health information
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DependencyHealth {
    pub name: String,
    pub status: HealthCheckStatus,
    pub response_time_ms: Option<u64>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthCheckStatus {
    Healthy,
    Unhealthy,
}

/// Health checker service
#[derive(Clone, Debug)]
pub struct HealthChecker {
    start_time: Arc<Instant>,
    db_pool: DatabasePool,
    environment: String,
}

impl HealthChecker {
    pub fn new(db_pool: DatabasePool, environment: impl Into<String>) -> Self {
        Self {
            start_time: Arc::new(Instant::now()),
            db_pool,
            environment: environment.into(),
        }
    }

    /// Get uptime in seconds
    pub fn get_uptime(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    async fn check_database(&self) -> DependencyHealth {
        let start = Instant::now();

        match sqlx::query("SELECT 1").execute(&self.db_pool).await {
            Ok(_) => DependencyHealth {
                name: "database".to_string(),
                status: HealthCheckStatus::Healthy,
                response_time_ms: Some(start.elapsed().as_millis() as u64),
                error_message: None,
            },
            Err(e) => DependencyHealth {
                name: "database".to_string(),
                status: HealthCheckStatus::Unhealthy,
                response_time_ms: Some(start.elapsed().as_millis() as u64),
                error_message: Some(e.to_string()),
            },
        }
    }

    pub async fn check(&self) -> HealthStatus {
        let dependencies = vec![self.check_database().await];
        let status = if dependencies
            .iter()
            .all(|d| d.status == HealthCheckStatus::Healthy)
        {
            HealthCheckStatus::Healthy
        } else {
            HealthCheckStatus::Unhealthy
        };

        HealthStatus {
            status,
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: self.environment.clone(),
            uptime_seconds: self.get_uptime(),
            dependencies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::setup_in_memory;

    #[tokio::test]
    async fn test_healthy_database() {
        let pool = setup_in_memory().await.expect("Failed to set up database");
        let checker = HealthChecker::new(pool, "test");

        let health = checker.check().await;
        assert_eq!(health.status, HealthCheckStatus::Healthy);
        assert_eq!(health.environment, "test");
        assert_eq!(health.dependencies.len(), 1);
    }

    #[tokio::test]
    async fn test_closed_pool_is_unhealthy() {
        let pool = setup_in_memory().await.expect("Failed to set up database");
        pool.close().await;
        let checker = HealthChecker::new(pool, "test");

        let health = checker.check().await;
        assert_eq!(health.status, HealthCheckStatus::Unhealthy);
        assert!(health.dependencies[0].error_message.is_some());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&HealthCheckStatus::Healthy).unwrap();
        assert_eq!(json, "\"healthy\"");
    }
}
