// handlers/protected/ai/review_resume.rs - POST /api/ai/review-resume
// multipart: file field `resume` (PDF)

use axum::{
    extract::{Multipart, State},
    Extension,
};

use super::utils::{generate, GeneratedContent, MultipartForm};
use crate::api::AppState;
use crate::gateway::GenerationRequest;
use crate::middleware::{ApiResult, AuthUser};

/// Premium only. Size and MIME type are checked before the plan lookup.
pub async fn review_resume(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<GeneratedContent> {
    let mut form = MultipartForm::read(multipart).await?;
    let resume = form.take_file("resume")?;

    generate(&state, &user, GenerationRequest::ResumeReview { resume }).await
}
