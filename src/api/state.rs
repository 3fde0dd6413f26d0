use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::gateway::Gateway;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub jwt_secret: Arc<str>,
    pub expose_error_detail: bool,
    pub cors_origins: Vec<String>,
    pub body_limit: usize,
}

impl AppState {
    pub fn new(gateway: Arc<Gateway>, jwt_secret: &str) -> Self {
        Self {
            gateway,
            jwt_secret: Arc::from(jwt_secret),
            expose_error_detail: false,
            cors_origins: vec!["*".to_string()],
            body_limit: 12 * 1024 * 1024,
        }
    }

    pub fn from_config(gateway: Arc<Gateway>, config: &AppConfig) -> Self {
        Self::new(gateway, &config.security.jwt_secret)
            .with_error_detail(config.security.expose_error_detail)
            .with_cors_origins(config.security.cors_origins.clone())
            .with_body_limit(config.api.max_request_size_bytes)
    }

    pub fn with_error_detail(mut self, expose: bool) -> Self {
        self.expose_error_detail = expose;
        self
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    /// Convert a domain error into the response the client sees
    pub fn reject(&self, err: impl Into<ApiError>) -> ApiError {
        let err = err.into();
        if self.expose_error_detail {
            err
        } else {
            err.without_detail()
        }
    }
}
