mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestApp;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.client.get(app.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_banner_is_public() -> Result<()> {
    let app = TestApp::spawn().await?;

    let body = app.client.get(app.url("/")).send().await?.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Creations API");
    Ok(())
}

#[tokio::test]
async fn missing_token_is_unauthorized() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .client
        .post(app.url("/api/ai/generate-article"))
        .json(&json!({"prompt": "Rust", "length": 500}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Unauthorized");
    Ok(())
}

#[tokio::test]
async fn forged_token_is_unauthorized() -> Result<()> {
    let app = TestApp::spawn().await?;
    let forged = creations_api::auth::issue_token("some-other-secret", "u1", chrono::Duration::hours(1))?;

    let res = app
        .client
        .get(app.url("/api/user/user-creations"))
        .bearer_auth(forged)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn user_unknown_to_identity_service_is_unauthorized() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .post_json("ghost", "/api/ai/generate-blog-title", json!({"prompt": "rust"}))
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(app.ledger.is_empty().await);
    Ok(())
}
