// Runs only when TEST_DATABASE_URL points at a disposable Postgres database.

mod common;

use anyhow::{Context, Result};
use axum::http::{Method, StatusCode};
use axum::Router;
use serde_json::json;
use sqlx::PgPool;

async fn request_reset(app: &Router, email: &str) -> Result<()> {
    let body = json!({ "email": email });
    let (status, _) = common::send(app, common::json_request(Method::POST, "/api/v1/users/forgot-password", &body)).await?;
    anyhow::ensure!(status == StatusCode::OK, "forgot-password returned {}", status);
    Ok(())
}

async fn live_token(pool: &PgPool, user_id: i64) -> Result<String> {
    let (token,): (String,) = sqlx::query_as(
        "SELECT token FROM password_reset_tokens WHERE user_id = $1 AND used = FALSE ORDER BY id DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .context("no outstanding reset token")?;
    Ok(token)
}

async fn reset(app: &Router, token: &str, new_password: &str) -> Result<(StatusCode, serde_json::Value)> {
    let body = json!({ "token": token, "new_password": new_password });
    common::send(app, common::json_request(Method::POST, "/api/v1/users/reset-password", &body)).await
}

async fn login_status(app: &Router, email: &str, password: &str) -> Result<StatusCode> {
    let body = json!({ "email": email, "password": password });
    let (status, _) = common::send(app, common::json_request(Method::POST, "/api/v1/users/login", &body)).await?;
    Ok(status)
}

#[tokio::test]
async fn reset_token_is_single_use() -> Result<()> {
    let Some(common::DbApp { app, pool, .. }) = common::database_app().await? else {
        return Ok(());
    };

    let email = common::unique_email("reset");
    let user_id = common::register(&app, &email, "first password").await?;

    request_reset(&app, &email).await?;
    let token = live_token(&pool, user_id).await?;

    let (status, _) = reset(&app, &token, "second password").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login_status(&app, &email, "second password").await?, StatusCode::OK);
    assert_eq!(login_status(&app, &email, "first password").await?, StatusCode::UNAUTHORIZED);

    let (used,): (bool,) = sqlx::query_as("SELECT used FROM password_reset_tokens WHERE token = $1")
        .bind(&token)
        .fetch_one(&pool)
        .await?;
    assert!(used);

    let (status, body) = reset(&app, &token, "third password").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired reset token");
    assert_eq!(login_status(&app, &email, "second password").await?, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn concurrent_redemptions_only_succeed_once() -> Result<()> {
    let Some(common::DbApp { app, pool, .. }) = common::database_app().await? else {
        return Ok(());
    };

    let email = common::unique_email("race");
    let user_id = common::register(&app, &email, "original").await?;
    request_reset(&app, &email).await?;
    let token = live_token(&pool, user_id).await?;

    let (a, b) = tokio::join!(reset(&app, &token, "from-a"), reset(&app, &token, "from-b"));
    let statuses = [a?.0, b?.0];

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1, "{:?}", statuses);
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::BAD_REQUEST).count(), 1, "{:?}", statuses);
    Ok(())
}

#[tokio::test]
async fn expired_tokens_are_refused() -> Result<()> {
    let Some(common::DbApp { app, pool, .. }) = common::database_app().await? else {
        return Ok(());
    };

    let email = common::unique_email("expired");
    let user_id = common::register(&app, &email, "original").await?;
    request_reset(&app, &email).await?;
    let token = live_token(&pool, user_id).await?;

    sqlx::query("UPDATE password_reset_tokens SET expires_at = NOW() - INTERVAL '1 minute' WHERE token = $1")
        .bind(&token)
        .execute(&pool)
        .await?;

    let (status, _) = reset(&app, &token, "too late").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(login_status(&app, &email, "original").await?, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn a_new_request_replaces_the_outstanding_token() -> Result<()> {
    let Some(common::DbApp { app, pool, .. }) = common::database_app().await? else {
        return Ok(());
    };

    let email = common::unique_email("reissue");
    let user_id = common::register(&app, &email, "original").await?;

    request_reset(&app, &email).await?;
    let first = live_token(&pool, user_id).await?;
    request_reset(&app, &email).await?;
    let second = live_token(&pool, user_id).await?;
    assert_ne!(first, second);

    let (status, _) = reset(&app, &first, "stale").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = reset(&app, &second, "fresh").await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
