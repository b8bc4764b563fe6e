mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use metrics_exporter_prometheus::PrometheusBuilder;

use common::TestApp;
use course_api::config::Config;
use course_api::database::setup_in_memory;
use course_api::AppState;

#[tokio::test]
async fn test_health_reports_database() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, data) = app.get("/health").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["status"], "healthy");
    assert_eq!(data["environment"], "test");
    assert_eq!(data["dependencies"][0]["name"], "database");
    Ok(())
}

#[tokio::test]
async fn test_health_unhealthy_when_pool_closed() -> Result<()> {
    let app = TestApp::new().await?;
    app.state.db.close().await;

    let (status, data) = app.get("/health").await?;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(data["status"], "unhealthy");
    Ok(())
}

#[tokio::test]
async fn test_metrics_disabled_is_not_found() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, _) = app.get("/metrics").await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_metrics_rendered_when_enabled() -> Result<()> {
    // Local recorder; nothing is installed globally.
    let handle = PrometheusBuilder::new().build_recorder().handle();
    let pool = setup_in_memory().await?;
    let app = TestApp::from_state(AppState::new(pool, Config::for_testing(), Some(handle)));

    let (status, body) = app.send_raw(Method::GET, "/metrics", None).await?;

    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).is_ok());
    Ok(())
}

#[tokio::test]
async fn test_openapi_document() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, doc) = app.get("/api-docs/openapi.json").await?;

    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/courses/"]["get"].is_object());
    assert!(doc["paths"]["/courses/{id}/"]["patch"].is_object());
    Ok(())
}

#[tokio::test]
async fn test_unknown_route_uses_error_format() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, data) = app.get("/nowhere").await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(data["error"]["code"], "RES_4001");
    assert!(data["request_id"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_invalid_json_body() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, data) = app
        .post("/courses/", serde_json::json!({ "name": 5 }))
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data["error"]["code"], "VAL_3001");
    Ok(())
}
