// handlers/protected/user/published_creations.rs - GET /api/user/published-creations

use axum::extract::State;

use super::CreationList;
use crate::api::AppState;
use crate::middleware::{ApiResponse, ApiResult};

pub async fn published_creations(State(state): State<AppState>) -> ApiResult<CreationList> {
    let creations = state
        .gateway
        .ledger()
        .list_published()
        .await
        .map_err(|e| state.reject(e))?;

    Ok(ApiResponse::success(CreationList { creations }))
}
