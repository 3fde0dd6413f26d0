// handlers/protected/user/user_creations.rs - GET /api/user/user-creations

use axum::{extract::State, Extension};

use super::CreationList;
use crate::api::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// Caller's own creations, newest first
pub async fn user_creations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<CreationList> {
    let creations = state
        .gateway
        .ledger()
        .list_by_user(&user.user_id)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(ApiResponse::success(CreationList { creations }))
}
