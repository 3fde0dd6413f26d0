//! Append-mostly record of generated content.
//!
//! Rows are written once per successful generation. `likes` is the only
//! field that changes afterwards, through [`toggle_like`].

pub mod memory;
pub mod postgres;

pub use memory::MemoryCreationLedger;
pub use postgres::PgCreationLedger;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::database::{Creation, DatabaseError, NewCreation};

pub const LIKED_MESSAGE: &str = "Liked successfully";
pub const UNLIKED_MESSAGE: &str = "Like removed successfully";

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Creation not found: {0}")]
    NotFound(i64),

    #[error("Corrupt creation record: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::Database(DatabaseError::Sqlx(err))
    }
}

#[async_trait]
pub trait CreationLedger: Send + Sync {
    async fn append(&self, entry: NewCreation) -> Result<Creation, LedgerError>;

    async fn find(&self, id: i64) -> Result<Option<Creation>, LedgerError>;

    /// Newest first
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Creation>, LedgerError>;

    /// Published creations of every user, newest first
    async fn list_published(&self) -> Result<Vec<Creation>, LedgerError>;

    /// Replace the like set of a creation and return the stored record
    async fn replace_likes(&self, id: i64, likes: Vec<String>) -> Result<Creation, LedgerError>;

    async fn ping(&self) -> Result<(), LedgerError>;
}

/// Outcome of [`toggle_like`]
#[derive(Debug, Clone, Serialize)]
pub struct LikeToggle {
    pub message: &'static str,
    pub liked: bool,
    pub creation: Creation,
}

/// Flip `user_id`'s membership in the creation's like set.
///
/// Read-modify-write like the usage counter: two concurrent toggles on the
/// same creation can overwrite each other.
pub async fn toggle_like(
    ledger: &dyn CreationLedger,
    id: i64,
    user_id: &str,
) -> Result<LikeToggle, LedgerError> {
    let creation = ledger.find(id).await?.ok_or(LedgerError::NotFound(id))?;

    let liked = !creation.is_liked_by(user_id);
    let mut likes = creation.likes;
    if liked {
        likes.push(user_id.to_string());
    } else {
        likes.retain(|u| u != user_id);
    }

    let creation = ledger.replace_likes(id, likes).await?;
    tracing::debug!(creation_id = id, user_id, liked, "toggled like");

    Ok(LikeToggle {
        message: if liked { LIKED_MESSAGE } else { UNLIKED_MESSAGE },
        liked,
        creation,
    })
}
