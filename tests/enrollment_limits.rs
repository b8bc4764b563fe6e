mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{ids, TestApp};

#[tokio::test]
async fn test_courses_with_students_within_limit() -> Result<()> {
    let app = TestApp::with_max_students(20).await?;
    let students = app.make_students(15).await?;
    let courses = app.make_courses_with_students(10, &ids(&students)).await?;

    let (status, data) = app.get(&format!("/courses/?id={}", courses[3].id)).await?;

    assert_eq!(status, StatusCode::OK);
    let enrolled = data[0]["students"].as_array().expect("students array");
    assert_eq!(enrolled.len(), students.len());
    assert!(enrolled.len() <= app.state.config.enrollment.max_students_per_course);
    Ok(())
}

#[tokio::test]
async fn test_create_exactly_at_limit() -> Result<()> {
    let app = TestApp::with_max_students(3).await?;
    let students = app.make_students(3).await?;

    let (status, data) = app
        .post("/courses/", json!({ "name": "Full", "students": ids(&students) }))
        .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(data["students"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn test_create_over_limit_is_rejected() -> Result<()> {
    let app = TestApp::with_max_students(3).await?;
    let students = app.make_students(4).await?;

    let (status, data) = app
        .post("/courses/", json!({ "name": "Over", "students": ids(&students) }))
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data["error"]["code"], "VAL_3009");
    assert_eq!(data["error"]["field"], "students");
    assert_eq!(app.state.course_service.count().await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_duplicates_do_not_count_against_limit() -> Result<()> {
    let app = TestApp::with_max_students(2).await?;
    let students = app.make_students(2).await?;
    let (a, b) = (students[0].id, students[1].id);

    let (status, data) = app
        .post("/courses/", json!({ "name": "Dupes", "students": [a, b, a, b] }))
        .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(data["students"], json!([a, b]));
    Ok(())
}

#[tokio::test]
async fn test_patch_over_limit_leaves_course_unchanged() -> Result<()> {
    let app = TestApp::with_max_students(2).await?;
    let students = app.make_students(3).await?;
    let courses = app
        .make_courses_with_students(1, &ids(&students[..2]))
        .await?;

    let uri = format!("/courses/{}/", courses[0].id);
    let (status, _) = app
        .patch(&uri, json!({ "name": "Renamed", "students": ids(&students) }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let stored = app.state.course_service.get(courses[0].id).await?;
    assert_eq!(stored, courses[0]);
    Ok(())
}

#[tokio::test]
async fn test_patch_unknown_course_over_limit_is_not_found() -> Result<()> {
    let app = TestApp::with_max_students(1).await?;
    let students = app.make_students(2).await?;

    let (status, data) = app
        .patch("/courses/999/", json!({ "students": ids(&students) }))
        .await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(data["error"]["code"], "RES_4001");
    Ok(())
}

#[tokio::test]
async fn test_limit_change_applies_to_next_request() -> Result<()> {
    let app = TestApp::with_max_students(1).await?;
    let students = app.make_students(2).await?;
    let body = json!({ "name": "Pair", "students": ids(&students) });

    let (status, _) = app.post("/courses/", body.clone()).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.state.enrollment.set_max_students_per_course(2).await?;

    let (status, _) = app.post("/courses/", body).await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn test_non_positive_student_id_is_rejected() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, data) = app
        .post("/courses/", json!({ "name": "Bad", "students": [0] }))
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(data["error"]["code"], "VAL_3001");
    Ok(())
}
