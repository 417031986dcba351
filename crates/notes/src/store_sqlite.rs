//! SQLite-backed note store using sqlx.

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    locknote_vault::EncryptedPayload,
    sqlx::{Row, SqlitePool, sqlite::SqlitePoolOptions},
};

use crate::{
    Error, Result,
    store::NoteStore,
    types::{NoteRecord, NoteSummary},
};

/// SQLite-backed persistence for encrypted notes.
pub struct SqliteNoteStore {
    pool: SqlitePool,
}

impl SqliteNoteStore {
    /// Create a new store with its own connection pool and run migrations.
    ///
    /// In-memory URLs get a single connection, since every SQLite connection
    /// to `:memory:` is a separate database.
    pub async fn new(database_url: &str) -> Result<Self> {
        let max_connections = if database_url.contains(":memory:") {
            1
        } else {
            5
        };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| Error::persistence("failed to connect to SQLite", e))?;

        crate::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a store using an existing pool (migrations must already be run).
    ///
    /// Call [`crate::run_migrations`] before using this constructor.
    pub fn with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| Error::message(format!("invalid timestamp in notes table: {ms}")))
}

#[async_trait]
impl NoteStore for SqliteNoteStore {
    async fn fetch_by_id(&self, id: &str) -> Result<NoteRecord> {
        let row = sqlx::query(
            "SELECT id, title, content_encrypted, salt, iv, created_at_ms, updated_at_ms
             FROM notes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::persistence("failed to fetch note", e))?
        .ok_or_else(|| Error::not_found(id))?;

        Ok(NoteRecord {
            id: row.get("id"),
            title: row.get("title"),
            payload: EncryptedPayload {
                ciphertext: row.get("content_encrypted"),
                salt: row.get("salt"),
                iv: row.get("iv"),
            },
            created_at: from_millis(row.get("created_at_ms"))?,
            updated_at: from_millis(row.get("updated_at_ms"))?,
        })
    }

    async fn insert(&self, title: &str, payload: &EncryptedPayload) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().timestamp_millis();
        sqlx::query(
            "INSERT INTO notes (id, title, content_encrypted, salt, iv, created_at_ms, updated_at_ms)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(title)
        .bind(&payload.ciphertext)
        .bind(&payload.salt)
        .bind(&payload.iv)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::persistence("failed to insert note", e))?;
        Ok(id)
    }

    async fn update(
        &self,
        id: &str,
        payload: &EncryptedPayload,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE notes SET content_encrypted = ?, salt = ?, iv = ?, updated_at_ms = ?
             WHERE id = ?",
        )
        .bind(&payload.ciphertext)
        .bind(&payload.salt)
        .bind(&payload.iv)
        .bind(updated_at.timestamp_millis())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::persistence("failed to update note", e))?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(id));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<NoteSummary>> {
        let rows = sqlx::query(
            "SELECT id, title, created_at_ms FROM notes ORDER BY created_at_ms DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::persistence("failed to list notes", e))?;

        rows.into_iter()
            .map(|row| -> Result<NoteSummary> {
                Ok(NoteSummary {
                    id: row.get("id"),
                    title: row.get("title"),
                    created_at: from_millis(row.get("created_at_ms"))?,
                })
            })
            .collect()
    }
}
