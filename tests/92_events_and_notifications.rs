// Runs only when TEST_DATABASE_URL points at a disposable Postgres database.

mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn event_registration_counts_and_rejects_duplicates() -> Result<()> {
    let Some(common::DbApp { app, .. }) = common::database_app().await? else {
        return Ok(());
    };

    let email = common::unique_email("attendee");
    let user_id = common::register(&app, &email, "pw").await?;
    let event_id = common::create(&app, "/api/v1/events", &json!({ "title": "Aptitude Drill" })).await?;
    let register_uri = format!("/api/v1/events/{}/register", event_id);

    let (status, body) = common::send(&app, common::json_request(Method::POST, &register_uri, &json!({ "user_id": user_id }))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["registration_status"], "registered");

    let (_, body) = common::send(&app, common::get(&format!("/api/v1/events/{}", event_id))).await?;
    assert_eq!(body["data"]["registered_count"], 1);

    // Same person, identified by email this time
    let (status, body) = common::send(&app, common::json_request(Method::POST, &register_uri, &json!({ "email": email }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already registered for this event");

    let (status, body) = common::send(&app, common::json_request(Method::POST, &register_uri, &json!({}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Either user_id or email is required");

    let unknown = json!({ "email": common::unique_email("ghost") });
    let (status, _) = common::send(&app, common::json_request(Method::POST, &register_uri, &unknown)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = common::send(&app, common::get(&format!("/api/v1/events/{}", event_id))).await?;
    assert_eq!(body["data"]["registered_count"], 1);
    Ok(())
}

#[tokio::test]
async fn marking_read_sets_and_clears_read_at() -> Result<()> {
    let Some(common::DbApp { app, .. }) = common::database_app().await? else {
        return Ok(());
    };

    let user_id = common::register(&app, &common::unique_email("reader"), "pw").await?;
    let id = common::create(
        &app,
        "/api/v1/notifications",
        &json!({ "user_id": user_id, "title": "Drive", "message": "Tomorrow 9am" }),
    )
    .await?;
    let uri = format!("/api/v1/notifications/{}", id);

    let (status, body) = common::send(&app, common::json_request(Method::PUT, &uri, &json!({ "is_read": true }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_read"], true);
    assert!(body["data"]["read_at"].is_string());

    let (_, body) = common::send(&app, common::json_request(Method::PUT, &uri, &json!({ "is_read": false }))).await?;
    assert_eq!(body["data"]["is_read"], false);
    assert!(body["data"]["read_at"].is_null());
    Ok(())
}

#[tokio::test]
async fn broadcast_honours_degree_and_year_filters() -> Result<()> {
    let Some(common::DbApp { app, .. }) = common::database_app().await? else {
        return Ok(());
    };

    // A degree nobody else uses keeps the counts independent of other tests
    let degree = format!("B.Tech-{}", uuid::Uuid::new_v4().simple());
    let mut students = Vec::new();
    for year in ["2025", "2026"] {
        let id = common::register(&app, &common::unique_email("cohort"), "pw").await?;
        let profile = json!({ "degree": degree, "year": year });
        let (status, _) = common::send(&app, common::json_request(Method::POST, &format!("/api/v1/users/{}/profile", id), &profile)).await?;
        assert_eq!(status, StatusCode::OK);
        students.push(id);
    }

    let narrow = json!({ "title": "Final years", "message": "Resume deadline", "filters": { "degree": degree, "year": "2025" } });
    let (status, body) = common::send(&app, common::json_request(Method::POST, "/api/v1/tpo/notifications/broadcast", &narrow)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["message"], "Sent to 1 students");

    let wide = json!({ "title": "Whole cohort", "message": "Orientation", "filters": { "degree": degree, "year": "" } });
    let (_, body) = common::send(&app, common::json_request(Method::POST, "/api/v1/tpo/notifications/broadcast", &wide)).await?;
    assert_eq!(body["data"]["count"], 2);

    let (_, body) = common::send(&app, common::get(&format!("/api/v1/notifications/user/{}", students[1]))).await?;
    let titles: Vec<_> = body["data"].as_array().cloned().unwrap_or_default().into_iter().map(|n| n["title"].clone()).collect();
    assert!(titles.contains(&json!("Whole cohort")));
    assert!(!titles.contains(&json!("Final years")));
    Ok(())
}
