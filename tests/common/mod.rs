#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde_json::{json, Value};

use creations_api::api::{self, AppState};
use creations_api::auth::issue_token;
use creations_api::gateway::{Gateway, Providers};
use creations_api::ledger::MemoryCreationLedger;
use creations_api::providers::{
    CompletionRequest, DocumentReader, ImageEdit, ImageGenerator, MediaHost, ProviderError,
    TextGenerator, Upload,
};
use creations_api::quota::{HttpProfileStore, MemoryQuotaStore};
use creations_api::types::Plan;

pub const SECRET: &str = "integration-test-secret";
pub const GENERATED_TEXT: &str = "Generated text";
pub const RESUME_TEXT: &str = "Jane Doe - Senior Engineer";

pub struct FakeText;

#[async_trait]
impl TextGenerator for FakeText {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, ProviderError> {
        Ok(GENERATED_TEXT.to_string())
    }
}

pub struct FakeImage;

#[async_trait]
impl ImageGenerator for FakeImage {
    async fn generate(&self, _prompt: &str) -> Result<Vec<u8>, ProviderError> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }
}

pub struct FakeMedia;

#[async_trait]
impl MediaHost for FakeMedia {
    async fn upload(&self, _image: Upload, edit: ImageEdit) -> Result<String, ProviderError> {
        Ok(match edit {
            ImageEdit::None => "https://media.test/generated.png".to_string(),
            ImageEdit::RemoveBackground => "https://media.test/no-background.png".to_string(),
            ImageEdit::RemoveObject(object) => format!("https://media.test/e_gen_remove:{}/photo.png", object),
        })
    }
}

/// Reads files starting with `%PDF`, rejects everything else
pub struct FakeDocuments;

#[async_trait]
impl DocumentReader for FakeDocuments {
    async fn extract_text(&self, document: Upload) -> Result<String, ProviderError> {
        if document.bytes.starts_with(b"%PDF") {
            Ok(RESUME_TEXT.to_string())
        } else {
            Err(ProviderError::Document("not a PDF".to_string()))
        }
    }
}

/// The router on a free port, backed by in-memory stores and fake providers
pub struct TestApp {
    pub base_url: String,
    pub quota: Arc<MemoryQuotaStore>,
    pub ledger: Arc<MemoryCreationLedger>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let quota = Arc::new(MemoryQuotaStore::without_atomic_increment());
        let ledger = Arc::new(MemoryCreationLedger::new());
        let providers = Providers {
            text: Arc::new(FakeText),
            image: Arc::new(FakeImage),
            media: Arc::new(FakeMedia),
            documents: Arc::new(FakeDocuments),
        };
        let gateway = Gateway::new(quota.clone(), ledger.clone(), providers);
        let state = AppState::new(Arc::new(gateway), SECRET).with_error_detail(true);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, api::app(state)).await;
        });

        Ok(Self {
            base_url,
            quota,
            ledger,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn user(&self, user_id: &str, plan: Plan, free_usage: Option<u32>) {
        self.quota.insert_user(user_id, plan, free_usage).await;
    }

    pub fn token(&self, user_id: &str) -> Result<String> {
        Ok(issue_token(SECRET, user_id, chrono::Duration::hours(1))?)
    }

    pub async fn post_json(&self, user_id: &str, path: &str, body: Value) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(self.token(user_id)?)
            .json(&body)
            .send()
            .await?)
    }

    pub async fn post_form(&self, user_id: &str, path: &str, form: Form) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(self.token(user_id)?)
            .multipart(form)
            .send()
            .await?)
    }

    pub async fn get(&self, user_id: &str, path: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(self.token(user_id)?)
            .send()
            .await?)
    }
}

pub fn file_part(name: &str, mime: &str, bytes: Vec<u8>) -> Result<Part> {
    Ok(Part::bytes(bytes).file_name(name.to_string()).mime_str(mime)?)
}

pub fn pdf_bytes(len: usize) -> Vec<u8> {
    let mut bytes = b"%PDF-1.4\n".to_vec();
    bytes.resize(len.max(bytes.len()), b' ');
    bytes
}

/// Profiles held by [`FakeIdentity`] and every metadata PATCH it received
#[derive(Default)]
pub struct IdentityRecords {
    pub profiles: HashMap<String, Value>,
    pub patches: Vec<(String, Value)>,
}

type SharedRecords = Arc<Mutex<IdentityRecords>>;

/// Identity service stand-in serving `GET /users/:id` and `PATCH /users/:id/metadata`
pub struct FakeIdentity {
    pub base_url: String,
    records: SharedRecords,
}

impl FakeIdentity {
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}/v1", port);
        let records = SharedRecords::default();

        let router = Router::new()
            .route("/v1/users/:id", get(fake_profile))
            .route("/v1/users/:id/metadata", patch(fake_metadata))
            .with_state(records.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self { base_url, records })
    }

    pub fn add_user(&self, user_id: &str, public_metadata: Value, private_metadata: Value) {
        if let Ok(mut records) = self.records.lock() {
            records.profiles.insert(
                user_id.to_string(),
                json!({
                    "id": user_id,
                    "public_metadata": public_metadata,
                    "private_metadata": private_metadata,
                }),
            );
        }
    }

    pub fn patches(&self) -> Vec<(String, Value)> {
        self.records
            .lock()
            .map(|records| records.patches.clone())
            .unwrap_or_default()
    }

    pub fn store(&self) -> Result<HttpProfileStore> {
        Ok(HttpProfileStore::new(&self.base_url, "sk_test", Duration::from_secs(5))?)
    }
}

async fn fake_profile(
    State(records): State<SharedRecords>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let records = records.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    records
        .profiles
        .get(&user_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn fake_metadata(
    State(records): State<SharedRecords>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    let Ok(mut records) = records.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR;
    };
    if !records.profiles.contains_key(&user_id) {
        return StatusCode::NOT_FOUND;
    }
    records.patches.push((user_id.clone(), body.clone()));

    let update = body
        .get("private_metadata")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    if let Some(private) = records
        .profiles
        .get_mut(&user_id)
        .and_then(|profile| profile.get_mut("private_metadata"))
        .and_then(Value::as_object_mut)
    {
        private.extend(update);
    }
    StatusCode::OK
}
