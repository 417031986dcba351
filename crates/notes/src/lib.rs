//! Password-locked notes.
//!
//! Each note is encrypted under its own password. A [`codec::NoteCodec`]
//! opens notes locked, unlocks them with a prompted or session-cached
//! password, re-encrypts on save and forgets the plaintext on exit.
//! Persistence goes through [`store::NoteStore`], with SQLite and in-memory
//! backends.

pub mod codec;
pub mod config;
pub mod error;
pub mod store;
pub mod store_memory;
pub mod store_sqlite;
pub mod types;

pub use {
    codec::{NoteCodec, default_title},
    config::NotesConfig,
    error::{Error, Result},
    store::NoteStore,
    types::{NoteRecord, NoteState, NoteSummary},
};

/// Run database migrations for the notes crate.
///
/// Creates the `notes` table. Called by [`store_sqlite::SqliteNoteStore::new`];
/// call it yourself before [`store_sqlite::SqliteNoteStore::with_pool`].
pub async fn run_migrations(pool: &sqlx::SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .set_ignore_missing(true)
        .run(pool)
        .await?;
    Ok(())
}
