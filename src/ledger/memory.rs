use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{CreationLedger, LedgerError};
use crate::database::{Creation, NewCreation};

#[derive(Default)]
struct State {
    next_id: i64,
    rows: Vec<Creation>,
}

/// Process-local ledger, used by tests and by development runs without DATABASE_URL
#[derive(Default)]
pub struct MemoryCreationLedger {
    state: Mutex<State>,
}

impl MemoryCreationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// All rows in insertion order
    pub async fn all(&self) -> Vec<Creation> {
        self.state.lock().await.rows.clone()
    }
}

fn newest_first(mut rows: Vec<Creation>) -> Vec<Creation> {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    rows
}

#[async_trait]
impl CreationLedger for MemoryCreationLedger {
    async fn append(&self, entry: NewCreation) -> Result<Creation, LedgerError> {
        let mut state = self.state.lock().await;
        state.next_id += 1;

        let now = Utc::now();
        let creation = Creation {
            id: state.next_id,
            user_id: entry.user_id,
            prompt: entry.prompt,
            content: entry.content,
            kind: entry.kind,
            publish: entry.publish,
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        state.rows.push(creation.clone());
        Ok(creation)
    }

    async fn find(&self, id: i64) -> Result<Option<Creation>, LedgerError> {
        let state = self.state.lock().await;
        Ok(state.rows.iter().find(|c| c.id == id).cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Creation>, LedgerError> {
        let state = self.state.lock().await;
        let rows = state
            .rows
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn list_published(&self) -> Result<Vec<Creation>, LedgerError> {
        let state = self.state.lock().await;
        let rows = state.rows.iter().filter(|c| c.publish).cloned().collect();
        Ok(newest_first(rows))
    }

    async fn replace_likes(&self, id: i64, likes: Vec<String>) -> Result<Creation, LedgerError> {
        let mut state = self.state.lock().await;
        let creation = state
            .rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(LedgerError::NotFound(id))?;

        creation.likes = likes;
        creation.updated_at = Utc::now();
        Ok(creation.clone())
    }

    async fn ping(&self) -> Result<(), LedgerError> {
        Ok(())
    }
}
