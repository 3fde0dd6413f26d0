use async_trait::async_trait;
use sqlx::PgPool;

use super::{CreationLedger, LedgerError};
use crate::database::models::CreationRow;
use crate::database::{Creation, DatabaseManager, NewCreation};

const COLUMNS: &str = "id, user_id, prompt, content, type, publish, likes, created_at, updated_at";

/// Ledger stored in the `creations` table
#[derive(Clone)]
pub struct PgCreationLedger {
    pool: PgPool,
}

impl PgCreationLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn convert(row: CreationRow) -> Result<Creation, LedgerError> {
        Creation::try_from(row).map_err(LedgerError::Corrupt)
    }

    fn convert_all(rows: Vec<CreationRow>) -> Result<Vec<Creation>, LedgerError> {
        rows.into_iter().map(Self::convert).collect()
    }
}

#[async_trait]
impl CreationLedger for PgCreationLedger {
    async fn append(&self, entry: NewCreation) -> Result<Creation, LedgerError> {
        let sql = format!(
            "INSERT INTO creations (user_id, prompt, content, type, publish) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, CreationRow>(&sql)
            .bind(&entry.user_id)
            .bind(&entry.prompt)
            .bind(&entry.content)
            .bind(entry.kind.as_str())
            .bind(entry.publish)
            .fetch_one(&self.pool)
            .await?;
        Self::convert(row)
    }

    async fn find(&self, id: i64) -> Result<Option<Creation>, LedgerError> {
        let sql = format!("SELECT {} FROM creations WHERE id = $1", COLUMNS);
        sqlx::query_as::<_, CreationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Self::convert)
            .transpose()
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Creation>, LedgerError> {
        let sql = format!(
            "SELECT {} FROM creations WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, CreationRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Self::convert_all(rows)
    }

    async fn list_published(&self) -> Result<Vec<Creation>, LedgerError> {
        let sql = format!(
            "SELECT {} FROM creations WHERE publish = TRUE ORDER BY created_at DESC, id DESC",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, CreationRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Self::convert_all(rows)
    }

    async fn replace_likes(&self, id: i64, likes: Vec<String>) -> Result<Creation, LedgerError> {
        let sql = format!(
            "UPDATE creations SET likes = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, CreationRow>(&sql)
            .bind(id)
            .bind(&likes)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(LedgerError::NotFound(id))?;
        Self::convert(row)
    }

    async fn ping(&self) -> Result<(), LedgerError> {
        DatabaseManager::health_check(&self.pool).await?;
        Ok(())
    }
}
