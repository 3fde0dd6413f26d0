use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::gateway::UploadLimits;
use crate::metering::DEFAULT_FREE_USAGE_LIMIT;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub quota: QuotaConfig,
    pub providers: ProviderConfig,
    pub identity: IdentityConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Successful standard-tier requests a free user may make
    pub free_usage_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OpenAI-compatible chat completions base URL
    pub llm_base_url: String,
    pub llm_model: String,
    #[serde(skip_serializing)]
    pub llm_api_key: String,
    pub llm_temperature: f32,
    pub image_api_url: String,
    #[serde(skip_serializing)]
    pub image_api_key: String,
    pub media_api_base: String,
    pub media_delivery_base: String,
    pub media_cloud_name: String,
    #[serde(skip_serializing)]
    pub media_api_key: String,
    #[serde(skip_serializing)]
    pub media_api_secret: String,
    /// Upper bound on any single external call
    pub call_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub secret_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(skip_serializing)]
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub max_request_size_bytes: usize,
    pub max_resume_bytes: usize,
    pub max_image_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// `*` allows any origin
    pub cors_origins: Vec<String>,
    /// Include internal error detail in 500 responses
    pub expose_error_detail: bool,
}

impl ProviderConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

impl ApiConfig {
    pub fn upload_limits(&self) -> UploadLimits {
        UploadLimits {
            max_image_bytes: self.max_image_bytes,
            max_resume_bytes: self.max_resume_bytes,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment defaults first, then per-variable overrides
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        self.quota.free_usage_limit = parsed("QUOTA_FREE_USAGE_LIMIT", self.quota.free_usage_limit);

        // Providers
        let p = &mut self.providers;
        p.llm_base_url = text("LLM_BASE_URL", &p.llm_base_url);
        p.llm_model = text("LLM_MODEL", &p.llm_model);
        p.llm_api_key = first_of(&["LLM_API_KEY", "GEMINI_API_KEY"], &p.llm_api_key);
        p.llm_temperature = parsed("LLM_TEMPERATURE", p.llm_temperature);
        p.image_api_url = text("IMAGE_API_URL", &p.image_api_url);
        p.image_api_key = first_of(&["IMAGE_API_KEY", "CLIPDROP_API_KEY"], &p.image_api_key);
        p.media_api_base = text("MEDIA_API_BASE", &p.media_api_base);
        p.media_delivery_base = text("MEDIA_DELIVERY_BASE", &p.media_delivery_base);
        p.media_cloud_name = first_of(&["MEDIA_CLOUD_NAME", "CLOUDINARY_CLOUD_NAME"], &p.media_cloud_name);
        p.media_api_key = first_of(&["MEDIA_API_KEY", "CLOUDINARY_API_KEY"], &p.media_api_key);
        p.media_api_secret = first_of(&["MEDIA_API_SECRET", "CLOUDINARY_API_SECRET"], &p.media_api_secret);
        p.call_timeout_secs = parsed("PROVIDER_CALL_TIMEOUT_SECS", p.call_timeout_secs);

        // Identity service
        self.identity.base_url = text("IDENTITY_BASE_URL", &self.identity.base_url);
        self.identity.secret_key =
            first_of(&["IDENTITY_SECRET_KEY", "CLERK_SECRET_KEY"], &self.identity.secret_key);

        // Database
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v).filter(|s| !s.trim().is_empty());
        }
        self.database.max_connections = parsed("DATABASE_MAX_CONNECTIONS", self.database.max_connections);
        self.database.connection_timeout =
            parsed("DATABASE_CONNECTION_TIMEOUT", self.database.connection_timeout);

        // API
        self.api.max_request_size_bytes = parsed("API_MAX_REQUEST_SIZE_BYTES", self.api.max_request_size_bytes);
        self.api.max_resume_bytes = parsed("API_MAX_RESUME_BYTES", self.api.max_resume_bytes);
        self.api.max_image_bytes = parsed("API_MAX_IMAGE_BYTES", self.api.max_image_bytes);

        // Security
        self.security.jwt_secret = text("AUTH_JWT_SECRET", &self.security.jwt_secret);
        self.security.jwt_expiry_hours = parsed("SECURITY_JWT_EXPIRY_HOURS", self.security.jwt_expiry_hours);
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        self.security.expose_error_detail =
            parsed("SECURITY_EXPOSE_ERROR_DETAIL", self.security.expose_error_detail);

        self
    }

    fn base(environment: Environment) -> Self {
        Self {
            environment,
            quota: QuotaConfig {
                free_usage_limit: DEFAULT_FREE_USAGE_LIMIT,
            },
            providers: ProviderConfig {
                llm_base_url: "https://generativelanguage.googleapis.com/v1beta/openai/".to_string(),
                llm_model: "gemini-2.0-flash".to_string(),
                llm_api_key: String::new(),
                llm_temperature: 0.7,
                image_api_url: "https://clipdrop-api.co/text-to-image/v1".to_string(),
                image_api_key: String::new(),
                media_api_base: "https://api.cloudinary.com/v1_1".to_string(),
                media_delivery_base: "https://res.cloudinary.com".to_string(),
                media_cloud_name: String::new(),
                media_api_key: String::new(),
                media_api_secret: String::new(),
                call_timeout_secs: 60,
            },
            identity: IdentityConfig {
                base_url: "https://api.clerk.com/v1".to_string(),
                secret_key: String::new(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                max_request_size_bytes: 12 * 1024 * 1024, // 12MB, above the largest upload
                max_resume_bytes: 5 * 1024 * 1024,
                max_image_bytes: 10 * 1024 * 1024,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24 * 7,
                cors_origins: vec!["*".to_string()],
                expose_error_detail: true,
            },
        }
    }

    fn development() -> Self {
        Self::base(Environment::Development)
    }

    fn staging() -> Self {
        let mut config = Self::base(Environment::Staging);
        config.database.max_connections = 20;
        config.database.connection_timeout = 10;
        config.providers.call_timeout_secs = 45;
        config.security.jwt_expiry_hours = 24;
        config.security.cors_origins = vec!["https://staging.example.com".to_string()];
        config
    }

    fn production() -> Self {
        let mut config = Self::base(Environment::Production);
        config.database.max_connections = 50;
        config.database.connection_timeout = 5;
        config.providers.call_timeout_secs = 30;
        config.security.jwt_expiry_hours = 4;
        config.security.cors_origins = vec!["https://app.example.com".to_string()];
        config.security.expose_error_detail = false;
        config
    }
}

fn parsed<T: FromStr>(key: &str, current: T) -> T {
    match env::var(key) {
        Ok(v) => v.trim().parse().unwrap_or(current),
        Err(_) => current,
    }
}

fn text(key: &str, current: &str) -> String {
    env::var(key).unwrap_or_else(|_| current.to_string())
}

/// First non-empty variable among `keys`
fn first_of(keys: &[&str], current: &str) -> String {
    keys.iter()
        .filter_map(|k| env::var(k).ok())
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| current.to_string())
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.quota.free_usage_limit, 10);
        assert!(config.security.expose_error_detail);
        assert_eq!(config.security.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.providers.llm_model, "gemini-2.0-flash");
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.environment, Environment::Production);
        assert!(!config.security.expose_error_detail);
        assert!(!config.security.cors_origins.contains(&"*".to_string()));
        assert_eq!(config.providers.call_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn upload_limits_follow_api_section() {
        let limits = AppConfig::development().api.upload_limits();
        assert_eq!(limits, UploadLimits::default());
    }

    #[test]
    fn secrets_are_not_serialized() {
        let mut config = AppConfig::development();
        config.security.jwt_secret = "hunter2".to_string();
        config.providers.media_api_secret = "s3cret".to_string();

        let rendered = serde_json::to_string(&config).unwrap();
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("gemini-2.0-flash"));
    }

    #[test]
    fn unparsable_override_keeps_current() {
        assert_eq!(parsed("CREATIONS_TEST_UNSET_VARIABLE", 7u32), 7);
    }
}
