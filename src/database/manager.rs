use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATIONS_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS creations (
        id          BIGSERIAL PRIMARY KEY,
        user_id     TEXT NOT NULL,
        prompt      TEXT NOT NULL,
        content     TEXT NOT NULL,
        type        TEXT NOT NULL,
        publish     BOOLEAN NOT NULL DEFAULT FALSE,
        likes       TEXT[] NOT NULL DEFAULT '{}',
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

const CREATIONS_INDEXES: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS creations_user_id_created_at_idx ON creations (user_id, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS creations_publish_created_at_idx ON creations (publish, created_at DESC)",
];

/// Connection pool construction and schema bootstrap for the creations store
pub struct DatabaseManager;

impl DatabaseManager {
    /// Build a pool without connecting; the first query establishes connections
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let database_url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let options =
            PgConnectOptions::from_str(database_url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy_with(options);

        info!("Configured database pool for {}", Self::redacted_url(database_url)?);
        Ok(pool)
    }

    /// Create the creations table and its indexes if they do not exist
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query(CREATIONS_SCHEMA).execute(pool).await?;
        for statement in CREATIONS_INDEXES {
            sqlx::query(statement).execute(pool).await?;
        }
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Connection string with the password masked, for logs
    fn redacted_url(database_url: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(database_url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if url.password().is_some() {
            url.set_password(Some("***"))
                .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }
}
