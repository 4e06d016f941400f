// Runs only when TEST_DATABASE_URL points at a disposable Postgres database.

mod common;

use anyhow::{Context, Result};
use axum::http::{Method, StatusCode};
use axum::Router;
use serde_json::{json, Value};

async fn upload_resume(app: &Router, user_id: i64, name: &str) -> Result<i64> {
    let body = json!({
        "user_id": user_id,
        "file_name": name,
        "mime_type": "application/pdf",
        "file_type": "resume",
        "content_base64": "JVBERi0xLjQ=",
    });
    common::create(app, "/api/v1/files/upload", &body).await
}

async fn new_job(app: &Router) -> Result<i64> {
    let job = json!({
        "title": "Graduate Engineer",
        "company": "Initech",
        "location": "Chennai",
        "description": "Platform team",
        "requirements": "Any language",
    });
    common::create(app, "/api/v1/jobs", &job).await
}

async fn apply(app: &Router, job_id: i64, user_id: i64) -> Result<Value> {
    let uri = format!("/api/v1/jobs/{}/apply", job_id);
    let (status, body) = common::send(app, common::json_request(Method::POST, &uri, &json!({ "user_id": user_id }))).await?;
    anyhow::ensure!(status == StatusCode::CREATED, "apply returned {}: {}", status, body);
    Ok(body["data"]["resume_id"].clone())
}

async fn notifications_for(app: &Router, user_id: i64) -> Result<Vec<Value>> {
    let (_, body) = common::send(app, common::get(&format!("/api/v1/notifications/user/{}", user_id))).await?;
    body["data"].as_array().cloned().context("notification list")
}

#[tokio::test]
async fn apply_prefers_verified_then_latest_resume() -> Result<()> {
    let Some(common::DbApp { app, .. }) = common::database_app().await? else {
        return Ok(());
    };

    let user_id = common::register(&app, &common::unique_email("applicant"), "pw").await?;

    assert!(apply(&app, new_job(&app).await?, user_id).await?.is_null());

    let older = upload_resume(&app, user_id, "cv-v1.pdf").await?;
    let newer = upload_resume(&app, user_id, "cv-v2.pdf").await?;
    assert_eq!(apply(&app, new_job(&app).await?, user_id).await?, newer);

    let verify = json!({ "is_verified": true });
    let (status, _) = common::send(&app, common::json_request(Method::PUT, &format!("/api/v1/files/{}/verify", older), &verify)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(apply(&app, new_job(&app).await?, user_id).await?, older);
    Ok(())
}

#[tokio::test]
async fn verify_and_reject_update_status_and_notify_owner() -> Result<()> {
    let Some(common::DbApp { app, .. }) = common::database_app().await? else {
        return Ok(());
    };

    let user_id = common::register(&app, &common::unique_email("owner"), "pw").await?;
    let kept = upload_resume(&app, user_id, "keep.pdf").await?;
    let dropped = upload_resume(&app, user_id, "drop.pdf").await?;

    let verify = json!({ "is_verified": true, "verification_notes": "Looks good" });
    let (_, body) = common::send(&app, common::json_request(Method::PUT, &format!("/api/v1/files/{}/verify", kept), &verify)).await?;
    assert_eq!(body["data"]["status"], "Verified");
    assert_eq!(body["data"]["is_verified"], true);

    let reject = json!({ "reason": "Missing signature" });
    let (_, body) = common::send(&app, common::json_request(Method::PUT, &format!("/api/v1/files/{}/reject", dropped), &reject)).await?;
    assert_eq!(body["data"]["status"], "Rejected");
    assert_eq!(body["data"]["verification_notes"], "Missing signature");

    let notices = notifications_for(&app, user_id).await?;
    let about = |file_id: i64| notices.iter().find(|n| n["related_type"] == "file" && n["related_id"] == file_id).cloned();

    assert_eq!(about(kept).context("verify notice")?["notification_type"], "SYSTEM");
    let rejection = about(dropped).context("reject notice")?;
    assert_eq!(rejection["notification_type"], "PROFILE_REJECTED");
    assert_eq!(rejection["message"], "Missing signature");
    Ok(())
}

#[tokio::test]
async fn job_status_word_overrides_is_active() -> Result<()> {
    let Some(common::DbApp { app, .. }) = common::database_app().await? else {
        return Ok(());
    };

    let uri = format!("/api/v1/jobs/{}", new_job(&app).await?);
    let update = |body: Value| common::json_request(Method::PUT, &uri, &body);

    let (_, body) = common::send(&app, update(json!({ "status": "Closed", "is_active": true }))).await?;
    assert_eq!(body["data"]["is_active"], false);
    assert_eq!(body["data"]["status"], "Inactive");

    let (_, body) = common::send(&app, update(json!({ "status": "  OPEN " }))).await?;
    assert_eq!(body["data"]["status"], "Active");

    let (_, body) = common::send(&app, update(json!({ "is_active": false }))).await?;
    assert_eq!(body["data"]["status"], "Inactive");

    // Title-only edits leave the flag alone
    let (_, body) = common::send(&app, update(json!({ "title": "Graduate Engineer II" }))).await?;
    assert_eq!(body["data"]["status"], "Inactive");
    assert_eq!(body["data"]["title"], "Graduate Engineer II");
    Ok(())
}

#[tokio::test]
async fn local_uploads_stream_back_through_download() -> Result<()> {
    let Some(common::DbApp { app, .. }) = common::database_app().await? else {
        return Ok(());
    };

    let user_id = common::register(&app, &common::unique_email("downloader"), "pw").await?;
    let file_id = upload_resume(&app, user_id, "my_uploads.pdf").await?;

    let (status, body) = common::send(&app, common::get(&format!("/api/v1/files/{}/presigned", file_id))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["url"], format!("/api/v1/files/{}/download", file_id));

    let response = tower::ServiceExt::oneshot(app.clone(), common::get(&format!("/api/v1/files/{}/download", file_id))).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[axum::http::header::CONTENT_TYPE], "application/pdf");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&bytes[..], b"%PDF-1.4");
    Ok(())
}
