// handlers/protected/ai/remove_image_object.rs - POST /api/ai/remove-image-object
// multipart: file field `image`, text field `object`

use axum::{
    extract::{Multipart, State},
    Extension,
};

use super::utils::{generate, GeneratedContent, MultipartForm};
use crate::api::AppState;
use crate::gateway::GenerationRequest;
use crate::middleware::{ApiResult, AuthUser};

pub async fn remove_image_object(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<GeneratedContent> {
    let mut form = MultipartForm::read(multipart).await?;
    let image = form.take_file("image")?;
    let object = form.take_field("object").unwrap_or_default();

    generate(&state, &user, GenerationRequest::RemoveObject { image, object }).await
}
