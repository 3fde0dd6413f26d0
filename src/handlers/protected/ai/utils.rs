use axum::{
    extract::{rejection::JsonRejection, Multipart},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::api::AppState;
use crate::error::ApiError;
use crate::gateway::GenerationRequest;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::providers::Upload;

/// `{success: true, content}`
#[derive(Debug, Serialize)]
pub struct GeneratedContent {
    pub content: String,
}

/// Run one request through the gateway and shape the reply
pub async fn generate(
    state: &AppState,
    user: &AuthUser,
    request: GenerationRequest,
) -> ApiResult<GeneratedContent> {
    let generated = state
        .gateway
        .execute(&user.user_id, request)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(ApiResponse::success(GeneratedContent {
        content: generated.content,
    }))
}

/// Unwrap a JSON body, turning extractor rejections into 400s
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Files and text fields of a multipart request
#[derive(Debug, Default)]
pub struct MultipartForm {
    files: HashMap<String, Upload>,
    fields: HashMap<String, String>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::bad_request(e.body_text()))?;
                    form.files.insert(
                        name,
                        Upload {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    );
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(e.body_text()))?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    pub fn take_file(&mut self, name: &str) -> Result<Upload, ApiError> {
        self.files
            .remove(name)
            .ok_or_else(|| ApiError::bad_request(format!("Missing file field '{}'", name)))
    }

    pub fn take_field(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }
}
