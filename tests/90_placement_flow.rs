// Runs only when TEST_DATABASE_URL points at a disposable Postgres database.

mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn register_login_apply_and_summarize() -> Result<()> {
    let Some(common::DbApp { app, .. }) = common::database_app().await? else {
        return Ok(());
    };

    let email = common::unique_email("student");
    let register = json!({
        "email": email,
        "password": "correct horse",
        "first_name": "Asha",
        "last_name": "Rao",
    });
    let (status, body) = common::send(&app, common::json_request(Method::POST, "/api/v1/users/register", &register)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "STUDENT");
    let student_id = body["data"]["id"].as_i64().expect("student id");

    // Second registration with the same address
    let (status, body) = common::send(&app, common::json_request(Method::POST, "/api/v1/users/register", &register)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already registered");

    let wrong = json!({ "email": email, "password": "wrong" });
    let (status, body) = common::send(&app, common::json_request(Method::POST, "/api/v1/users/login", &wrong)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");

    let login = json!({ "email": email, "password": "correct horse" });
    let (status, body) = common::send(&app, common::json_request(Method::POST, "/api/v1/users/login", &login)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "bearer");
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));

    let job = json!({
        "title": "Backend Intern",
        "company": "Acme",
        "location": "Pune",
        "description": "APIs",
        "requirements": "Rust",
    });
    let (status, body) = common::send(&app, common::json_request(Method::POST, "/api/v1/jobs", &job)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "Active");
    let job_id = body["data"]["id"].as_i64().expect("job id");

    let apply_uri = format!("/api/v1/jobs/{}/apply", job_id);
    let application = json!({ "user_id": student_id });
    let (status, _) = common::send(&app, common::json_request(Method::POST, &apply_uri, &application)).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = common::send(&app, common::json_request(Method::POST, &apply_uri, &application)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Already applied to this job");

    let (status, body) = common::send(&app, common::get("/api/v1/tpo/stats/summary")).await?;
    assert_eq!(status, StatusCode::OK);
    let counts = body["data"]["applications_by_job"].as_array().cloned().unwrap_or_default();
    assert!(counts.iter().any(|c| c["job_id"] == job_id && c["count"] == 1));

    let (status, _) = common::send(&app, common::get(&format!("/api/v1/jobs/{}", job_id + 1_000_000))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn forgot_password_answers_the_same_for_unknown_accounts() -> Result<()> {
    let Some(common::DbApp { app, .. }) = common::database_app().await? else {
        return Ok(());
    };

    let request = json!({ "email": common::unique_email("nobody") });
    let (status, body) = common::send(&app, common::json_request(Method::POST, "/api/v1/users/forgot-password", &request)).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["message"].is_string());

    let reset = json!({ "token": "not-a-real-token", "new_password": "whatever" });
    let (status, body) = common::send(&app, common::json_request(Method::POST, "/api/v1/users/reset-password", &reset)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired reset token");
    Ok(())
}
