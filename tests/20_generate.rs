mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{TestApp, GENERATED_TEXT};
use creations_api::types::{CreationKind, Plan};

#[tokio::test]
async fn free_user_at_nine_gets_one_more_article() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.user("u1", Plan::Free, Some(9)).await;

    let res = app
        .post_json("u1", "/api/ai/generate-article", json!({"prompt": "Rust ownership", "length": 800}))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({"success": true, "content": GENERATED_TEXT}));

    assert_eq!(app.quota.stored_usage("u1").await, Some(10));
    let rows = app.ledger.all().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, CreationKind::Article);
    assert_eq!(rows[0].prompt, "Rust ownership");

    let res = app
        .post_json("u1", "/api/ai/generate-article", json!({"prompt": "Again", "length": 800}))
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "Free usage limit exceeded. Upgrade to premium for more requests."
    );

    assert_eq!(app.quota.stored_usage("u1").await, Some(10));
    assert_eq!(app.ledger.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn first_request_initialises_counter() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.user("new", Plan::Free, None).await;

    let res = app
        .post_json("new", "/api/ai/generate-blog-title", json!({"prompt": "async rust"}))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(app.quota.stored_usage("new").await, Some(1));

    let rows = app.ledger.all().await;
    assert_eq!(rows[0].kind, CreationKind::BlogTitle);
    Ok(())
}

#[tokio::test]
async fn free_user_cannot_generate_images() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.user("u1", Plan::Free, Some(0)).await;

    let res = app
        .post_json("u1", "/api/ai/generate-image", json!({"prompt": "a cat", "publish": true}))
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "This feature is only available for premium subscriptions");
    assert!(app.ledger.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn premium_image_is_published_and_uncounted() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.user("p1", Plan::Premium, None).await;

    let res = app
        .post_json("p1", "/api/ai/generate-image", json!({"prompt": "a cat", "publish": true}))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["content"], "https://media.test/generated.png");

    assert_eq!(app.quota.stored_usage("p1").await, None);
    assert_eq!(app.quota.write_count().await, 0);

    let published = app
        .get("someone-else", "/api/user/published-creations")
        .await?
        .json::<Value>()
        .await?;
    let creations = published["creations"].as_array().cloned().unwrap_or_default();
    assert_eq!(creations.len(), 1);
    assert_eq!(creations[0]["type"], "image");
    assert_eq!(creations[0]["publish"], true);
    assert_eq!(creations[0]["content"], "https://media.test/generated.png");
    Ok(())
}

#[tokio::test]
async fn malformed_article_body_is_rejected_before_metering() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.user("u1", Plan::Free, Some(3)).await;

    for body in [
        json!({"length": 800}),
        json!({"prompt": "   ", "length": 800}),
        json!({"prompt": "Rust", "length": 0}),
        json!({"prompt": "Rust", "length": "long"}),
    ] {
        let res = app.post_json("u1", "/api/ai/generate-article", body).await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.json::<Value>().await?["success"], false);
    }

    assert_eq!(app.quota.stored_usage("u1").await, Some(3));
    assert!(app.ledger.is_empty().await);
    Ok(())
}
