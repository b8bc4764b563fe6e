//! Application startup and initialization logic.

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::{Config, LogFormat};
use crate::database;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `LOG_LEVEL` when both are set.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "course_api={level},tower_http={level},sqlx=warn",
            level = config.log_level
        ))
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match config.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    if let Err(e) = installed {
        eprintln!("Tracing subscriber already installed: {}", e);
    }
}

/// Connect to the database, run migrations and create the AppState.
pub async fn initialize_app(config: &Config) -> Result<AppState> {
    info!("🚀 Starting course API ({})", config.environment);

    let metrics_handle = if config.metrics_enabled {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;
        info!("✅ Prometheus metrics initialized");
        Some(handle)
    } else {
        info!("Metrics disabled");
        None
    };

    let db_pool = database::setup_database(&config.database_url, config.max_connections).await?;
    info!("✅ Database connection established");

    database::run_migrations(&db_pool).await?;
    info!("✅ Database migrations completed");

    let state = AppState::new(db_pool, config.clone(), metrics_handle);

    let enrollment = state.enrollment.current().await;
    info!(
        max_students_per_course = enrollment.max_students_per_course,
        "✅ Enrollment limit configured"
    );

    Ok(state)
}

/// Wait for shutdown signal.
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_app_with_in_memory_database() {
        let config = Config::for_testing();
        let state = initialize_app(&config)
            .await
            .expect("Failed to initialize app");

        assert!(state.metrics_handle.is_none());
        assert_eq!(
            state.course_service.count().await.expect("count failed"),
            0
        );
    }
}
