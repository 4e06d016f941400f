mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;

#[tokio::test]
async fn register_requires_email_and_password() -> Result<()> {
    let app = common::test_app(common::test_config())?;
    let request = common::json_request(Method::POST, "/api/v1/users/register", &json!({ "email": "a@example.com" }));
    let (status, body) = common::send(&app, request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["password"], "This field is required");
    Ok(())
}

#[tokio::test]
async fn login_requires_credentials() -> Result<()> {
    let app = common::test_app(common::test_config())?;
    let request = common::json_request(Method::POST, "/api/v1/users/login", &json!({ "password": "x" }));
    let (status, body) = common::send(&app, request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["email"].is_string());
    Ok(())
}

#[tokio::test]
async fn reset_password_requires_token() -> Result<()> {
    let app = common::test_app(common::test_config())?;
    let request = common::json_request(
        Method::POST,
        "/api/v1/users/reset-password",
        &json!({ "token": "  ", "new_password": "secret" }),
    );
    let (status, body) = common::send(&app, request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["token"].is_string());
    Ok(())
}

fn upload_body(content_base64: &str) -> serde_json::Value {
    json!({
        "user_id": 1,
        "file_name": "resume.pdf",
        "mime_type": "application/pdf",
        "file_type": "resume",
        "content_base64": content_base64,
    })
}

#[tokio::test]
async fn upload_rejects_missing_fields() -> Result<()> {
    let app = common::test_app(common::test_config())?;
    let mut body = upload_body("aGVsbG8=");
    body.as_object_mut().map(|o| o.remove("file_type"));

    let (status, response) = common::send(&app, common::json_request(Method::POST, "/api/v1/files/upload", &body)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["field_errors"]["file_type"].is_string());
    Ok(())
}

#[tokio::test]
async fn upload_rejects_invalid_base64() -> Result<()> {
    let app = common::test_app(common::test_config())?;
    let request = common::json_request(Method::POST, "/api/v1/files/upload-r2", &upload_body("%%%not-base64%%%"));
    let (status, body) = common::send(&app, request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid base64 content");
    Ok(())
}

#[tokio::test]
async fn upload_enforces_size_before_touching_the_database() -> Result<()> {
    let config = common::test_config();
    let oversized = STANDARD.encode(vec![0u8; config.storage.max_file_size + 1]);
    let app = common::test_app(config)?;

    let request = common::json_request(Method::POST, "/api/v1/files/upload", &upload_body(&oversized));
    let (status, body) = common::send(&app, request).await?;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(body["message"], "File too large. Maximum size is 1 KB");
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_rejected_by_the_extractor() -> Result<()> {
    let app = common::test_app(common::test_config())?;
    let request = common::json_request(Method::POST, "/api/v1/jobs/1/apply", &json!({ "cover_letter": "hi" }));
    let (status, _) = common::send(&app, request).await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test]
async fn local_files_must_be_a_single_segment() -> Result<()> {
    let app = common::test_app(common::test_config())?;
    let (status, body) = common::send(&app, common::get("/api/v1/files/local/..")).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    Ok(())
}
