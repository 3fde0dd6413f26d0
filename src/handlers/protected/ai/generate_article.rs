// handlers/protected/ai/generate_article.rs - POST /api/ai/generate-article

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;

use super::utils::{generate, json_body, GeneratedContent};
use crate::api::AppState;
use crate::gateway::GenerationRequest;
use crate::middleware::{ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct ArticleBody {
    #[serde(default)]
    pub prompt: String,
    /// Token budget for the article
    #[serde(default)]
    pub length: u32,
}

/// Standard tier; counts against the free quota
pub async fn generate_article(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<ArticleBody>, JsonRejection>,
) -> ApiResult<GeneratedContent> {
    let ArticleBody { prompt, length } = json_body(body)?;
    generate(&state, &user, GenerationRequest::Article { prompt, length }).await
}
