// handlers/protected/user/toggle_like.rs - POST /api/user/toggle-like

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::api::AppState;
use crate::error::ApiError;
use crate::handlers::protected::ai::utils::json_body;
use crate::ledger::{self, LikeToggle};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct ToggleLikeBody {
    /// Number or numeric string
    #[serde(default)]
    pub id: Option<Value>,
}

/// Flips the caller's like; replies `{success, message, liked, creation}`
pub async fn toggle_like(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<ToggleLikeBody>, JsonRejection>,
) -> ApiResult<LikeToggle> {
    let ToggleLikeBody { id } = json_body(body)?;
    let id = creation_id(id)?;

    let toggled = ledger::toggle_like(state.gateway.ledger(), id, &user.user_id)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(ApiResponse::success(toggled))
}

fn creation_id(raw: Option<Value>) -> Result<i64, ApiError> {
    let parsed = match raw {
        None | Some(Value::Null) => return Err(ApiError::bad_request("Creation ID is required")),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) if s.trim().is_empty() => {
            return Err(ApiError::bad_request("Creation ID is required"))
        }
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    };
    parsed.ok_or_else(|| ApiError::bad_request("Invalid creation ID"))
}
