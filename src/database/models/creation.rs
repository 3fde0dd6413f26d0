use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::CreationKind;

/// One successful generation, as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creation {
    pub id: i64,
    pub user_id: String,
    pub prompt: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: CreationKind,
    pub publish: bool,
    /// User ids, each present at most once
    pub likes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Creation {
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|u| u == user_id)
    }
}

/// Fields supplied by the gateway when appending to the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct NewCreation {
    pub user_id: String,
    pub prompt: String,
    pub content: String,
    pub kind: CreationKind,
    pub publish: bool,
}

/// Raw `creations` row
#[derive(Debug, Clone, FromRow)]
pub struct CreationRow {
    pub id: i64,
    pub user_id: String,
    pub prompt: String,
    pub content: String,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub publish: bool,
    /// NULL in tables created before the column had a default
    pub likes: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CreationRow> for Creation {
    type Error = String;

    fn try_from(row: CreationRow) -> Result<Self, Self::Error> {
        let kind = CreationKind::parse(&row.kind)
            .ok_or_else(|| format!("creation {} has unknown type '{}'", row.id, row.kind))?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            prompt: row.prompt,
            content: row.content,
            kind,
            publish: row.publish,
            likes: row.likes.unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
