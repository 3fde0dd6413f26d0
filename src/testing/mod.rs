use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::database::{Creation, NewCreation};
use crate::gateway::Providers;
use crate::ledger::{CreationLedger, LedgerError};
use crate::providers::{
    CompletionRequest, DocumentReader, ImageEdit, ImageGenerator, MediaHost, ProviderError,
    TextGenerator, Upload,
};
use crate::quota::{MemoryQuotaStore, QuotaError, QuotaStore, UsageRecord};

/// How a scripted provider answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Succeed,
    Fail,
    Hang,
}

async fn play<T>(script: Script, value: T) -> Result<T, ProviderError> {
    match script {
        Script::Succeed => Ok(value),
        Script::Fail => Err(ProviderError::Status {
            provider: "scripted",
            status: 500,
            body: "scripted failure".to_string(),
        }),
        Script::Hang => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(value)
        }
    }
}

pub struct ScriptedText {
    script: Script,
    reply: String,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedText {
    pub fn new(script: Script, reply: &str) -> Self {
        Self {
            script,
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for ScriptedText {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request);
        }
        play(self.script, self.reply.clone()).await
    }
}

pub struct ScriptedImage {
    script: Script,
    calls: Mutex<usize>,
}

impl ScriptedImage {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().map(|c| *c).unwrap_or_default()
    }
}

#[async_trait]
impl ImageGenerator for ScriptedImage {
    async fn generate(&self, _prompt: &str) -> Result<Vec<u8>, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls += 1;
        }
        play(self.script, vec![0x89, b'P', b'N', b'G']).await
    }
}

pub struct ScriptedMedia {
    script: Script,
    uploads: Mutex<Vec<ImageEdit>>,
}

impl ScriptedMedia {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn uploads(&self) -> Vec<ImageEdit> {
        self.uploads.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MediaHost for ScriptedMedia {
    async fn upload(&self, _image: Upload, edit: ImageEdit) -> Result<String, ProviderError> {
        let url = match &edit {
            ImageEdit::None => "https://media.test/generated.png".to_string(),
            ImageEdit::RemoveBackground => "https://media.test/no-background.png".to_string(),
            ImageEdit::RemoveObject(object) => format!("https://media.test/e_gen_remove:{}.png", object),
        };
        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push(edit);
        }
        play(self.script, url).await
    }
}

/// Returns a fixed text, or a document error when built with `unreadable`
pub struct ScriptedDocuments {
    text: Option<String>,
}

impl ScriptedDocuments {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
        }
    }

    pub fn unreadable() -> Self {
        Self { text: None }
    }
}

#[async_trait]
impl DocumentReader for ScriptedDocuments {
    async fn extract_text(&self, _document: Upload) -> Result<String, ProviderError> {
        self.text
            .clone()
            .ok_or_else(|| ProviderError::Document("scripted unreadable document".to_string()))
    }
}

/// Ledger whose writes always fail
pub struct BrokenLedger;

#[async_trait]
impl CreationLedger for BrokenLedger {
    async fn append(&self, _entry: NewCreation) -> Result<Creation, LedgerError> {
        Err(LedgerError::Corrupt("ledger offline".to_string()))
    }

    async fn find(&self, _id: i64) -> Result<Option<Creation>, LedgerError> {
        Ok(None)
    }

    async fn list_by_user(&self, _user_id: &str) -> Result<Vec<Creation>, LedgerError> {
        Ok(Vec::new())
    }

    async fn list_published(&self) -> Result<Vec<Creation>, LedgerError> {
        Ok(Vec::new())
    }

    async fn replace_likes(&self, id: i64, _likes: Vec<String>) -> Result<Creation, LedgerError> {
        Err(LedgerError::NotFound(id))
    }

    async fn ping(&self) -> Result<(), LedgerError> {
        Err(LedgerError::Corrupt("ledger offline".to_string()))
    }
}

/// Quota store that reads from memory but rejects every write
pub struct ReadOnlyQuota(pub Arc<MemoryQuotaStore>);

#[async_trait]
impl QuotaStore for ReadOnlyQuota {
    async fn get_usage(&self, user_id: &str) -> Result<UsageRecord, QuotaError> {
        self.0.get_usage(user_id).await
    }

    async fn set_usage(&self, _user_id: &str, _free_usage: u32) -> Result<(), QuotaError> {
        Err(QuotaError::Remote("profile service unavailable".to_string()))
    }
}

pub fn providers(
    text: Arc<ScriptedText>,
    image: Arc<ScriptedImage>,
    media: Arc<ScriptedMedia>,
    documents: Arc<ScriptedDocuments>,
) -> Providers {
    Providers {
        text,
        image,
        media,
        documents,
    }
}

pub fn pdf(len: usize) -> Upload {
    Upload {
        file_name: "resume.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        bytes: vec![b'%'; len],
    }
}

pub fn png(len: usize) -> Upload {
    Upload {
        file_name: "photo.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89; len],
    }
}
