// handlers/protected/ai/generate_image.rs - POST /api/ai/generate-image

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
pub struct ImageBody {
    #[serde(default)]
    pub prompt: String,
    /// Show the result in the published feed
    #[serde(default)]
    pub publish: bool,
}

/// Premium only. `content` is the hosted image URL.
pub async fn generate_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<ImageBody>, JsonRejection>,
) -> ApiResult<GeneratedContent> {
    let ImageBody { prompt, publish } = json_body(body)?;
    generate(&state, &user, GenerationRequest::Image { prompt, publish }).await
}
