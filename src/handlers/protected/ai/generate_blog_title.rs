// handlers/protected/ai/generate_blog_title.rs - POST /api/ai/generate-blog-title

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
pub struct BlogTitleBody {
    #[serde(default)]
    pub prompt: String,
}

pub async fn generate_blog_title(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<BlogTitleBody>, JsonRejection>,
) -> ApiResult<GeneratedContent> {
    let BlogTitleBody { prompt } = json_body(body)?;
    generate(&state, &user, GenerationRequest::BlogTitle { prompt }).await
}
