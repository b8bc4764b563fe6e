use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;

use course_api::config::Config;
use course_api::router::build_router;
use course_api::startup::{init_tracing, initialize_app, shutdown_signal};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (.env first)
    let config = Config::from_env()?;
    init_tracing(&config);
    info!("Loaded configuration for environment: {}", config.environment);

    let app_state = initialize_app(&config).await?;
    let app = build_router(app_state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("🌐 Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
