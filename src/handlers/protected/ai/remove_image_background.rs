// handlers/protected/ai/remove_image_background.rs - POST /api/ai/remove-image-background
// multipart: file field `image`

use axum::{
    extract::{Multipart, State},
    Extension,
};

use super::utils::{generate, GeneratedContent, MultipartForm};
use crate::api::AppState;
use crate::gateway::GenerationRequest;
use crate::middleware::{ApiResult, AuthUser};

pub async fn remove_image_background(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<GeneratedContent> {
    let mut form = MultipartForm::read(multipart).await?;
    let image = form.take_file("image")?;

    generate(&state, &user, GenerationRequest::RemoveBackground { image }).await
}
