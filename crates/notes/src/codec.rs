//! Lock/unlock/save/exit lifecycle for open notes.
//!
//! The codec owns the table of open views. Plaintext exists only inside an
//! `Unlocked` view; passwords only inside the shared [`SessionKeyCache`].
//! Lock order is always views, then cache, and neither lock is held across
//! an `.await`.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
};

#[cfg(feature = "metrics")]
use locknote_metrics::{counter, gauge, labels, notes as notes_metrics};
use {
    chrono::{DateTime, Local, TimeZone, Utc},
    locknote_vault::{EncryptedPayload, NoteCipher, SessionKeyCache, VaultError},
    secrecy::{ExposeSecret, Secret},
    tokio::sync::Mutex as AsyncMutex,
    tracing::{debug, info, warn},
    zeroize::Zeroizing,
};

use crate::{
    Error, Result,
    config::NotesConfig,
    store::NoteStore,
    types::{NoteState, NoteSummary},
};

struct NoteView {
    /// Bumped whenever the view is (re)opened or locked, so late unlock
    /// results for an older generation are discarded.
    generation: u64,
    title: String,
    payload: EncryptedPayload,
    state: NoteState,
    content: Option<Zeroizing<String>>,
}

impl NoteView {
    fn lock(&mut self, generation: u64) {
        self.generation = generation;
        self.state = NoteState::Locked;
        self.content = None;
    }
}

type ViewMap = HashMap<String, NoteView>;

#[derive(Clone, Copy)]
enum UnlockSource {
    Prompt,
    Cache,
}

impl UnlockSource {
    fn as_str(self) -> &'static str {
        match self {
            Self::Prompt => "prompt",
            Self::Cache => "cache",
        }
    }
}

/// Drives note views through `Locked → Unlocking → Unlocked → Locked`.
///
/// One codec per signed-in session. The key cache is injected so the session
/// owner can share it with other components and clear it on sign-out.
pub struct NoteCodec {
    store: Arc<dyn NoteStore>,
    cipher: NoteCipher,
    keys: Arc<SessionKeyCache>,
    views: Mutex<ViewMap>,
    /// One writer per note id, kept across reopen and exit so an old save
    /// still in flight orders against new ones.
    save_locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
    generations: AtomicU64,
}

impl NoteCodec {
    pub fn new(store: Arc<dyn NoteStore>, keys: Arc<SessionKeyCache>, cipher: NoteCipher) -> Self {
        Self {
            store,
            cipher,
            keys,
            views: Mutex::new(HashMap::new()),
            save_locks: Mutex::new(HashMap::new()),
            generations: AtomicU64::new(0),
        }
    }

    pub fn from_config(
        config: &NotesConfig,
        store: Arc<dyn NoteStore>,
        keys: Arc<SessionKeyCache>,
    ) -> Result<Self> {
        let cipher = NoteCipher::with_params(config.kdf)?;
        Ok(Self::new(store, keys, cipher))
    }

    pub fn keys(&self) -> &Arc<SessionKeyCache> {
        &self.keys
    }

    pub fn cipher(&self) -> &NoteCipher {
        &self.cipher
    }

    /// Note summaries, newest first.
    pub async fn list(&self) -> Result<Vec<NoteSummary>> {
        self.store.list().await
    }

    /// Create a note with empty content and open it unlocked.
    ///
    /// A blank title becomes a timestamp such as `Oct 19, 3:04 PM`.
    pub async fn create(&self, title: &str, password: Secret<String>) -> Result<String> {
        if password.expose_secret().is_empty() {
            return Err(Error::EmptyPassword);
        }
        let title = match title.trim() {
            "" => default_title(&Local::now()),
            t => t.to_string(),
        };

        let payload = self
            .cipher
            .encrypt_async(Zeroizing::new(String::new()), password.clone())
            .await?;
        let id = self.store.insert(&title, &payload).await?;

        let mut views = self.views();
        self.keys.set(id.clone(), password);
        views.insert(id.clone(), NoteView {
            generation: self.next_generation(),
            title,
            payload,
            state: NoteState::Unlocked,
            content: Some(Zeroizing::new(String::new())),
        });
        Self::record_open_views(&views);
        drop(views);

        #[cfg(feature = "metrics")]
        counter!(notes_metrics::CREATED_TOTAL).increment(1);

        info!(note_id = %id, "note created");
        Ok(id)
    }

    /// Fetch a note and open a view on it.
    ///
    /// If this session already validated a password for the note, decryption
    /// is attempted right away. A cached password that no longer works leaves
    /// the view `Locked` instead of returning an error.
    pub async fn open(&self, id: &str) -> Result<NoteState> {
        let record = self.store.fetch_by_id(id).await?;
        let generation = self.next_generation();

        let cached = {
            let mut views = self.views();
            views.insert(id.to_string(), NoteView {
                generation,
                title: record.title,
                payload: record.payload,
                state: NoteState::Locked,
                content: None,
            });
            Self::record_open_views(&views);
            self.keys.get(id)
        };

        #[cfg(feature = "metrics")]
        counter!(notes_metrics::OPENS_TOTAL).increment(1);

        let Some(password) = cached else {
            debug!(note_id = %id, "note opened locked");
            return Ok(NoteState::Locked);
        };

        match self
            .try_unlock(id, generation, password, UnlockSource::Cache)
            .await
        {
            Ok(()) => Ok(NoteState::Unlocked),
            Err(e) if e.is_decryption_failure() => {
                debug!(note_id = %id, "cached password rejected, prompting");
                Ok(NoteState::Locked)
            },
            Err(e) => Err(e),
        }
    }

    /// Unlock an open view with a user-supplied password.
    ///
    /// On a wrong password the view stays `Locked`, the cache is untouched
    /// and the error satisfies [`Error::is_decryption_failure`].
    pub async fn unlock(&self, id: &str, password: Secret<String>) -> Result<()> {
        let generation = {
            let views = self.views();
            let view = views.get(id).ok_or_else(|| Error::not_open(id))?;
            if view.state == NoteState::Unlocked {
                return Ok(());
            }
            view.generation
        };
        self.try_unlock(id, generation, password, UnlockSource::Prompt)
            .await
    }

    async fn try_unlock(
        &self,
        id: &str,
        generation: u64,
        password: Secret<String>,
        source: UnlockSource,
    ) -> Result<()> {
        let payload = {
            let mut views = self.views();
            let view = views
                .get_mut(id)
                .filter(|v| v.generation == generation)
                .ok_or_else(|| Error::not_open(id))?;
            view.state = NoteState::Unlocking;
            view.payload.clone()
        };
        let pending = PendingUnlock {
            views: &self.views,
            note_id: id,
            generation,
            armed: true,
        };

        let content = match self.cipher.decrypt_async(payload, password.clone()).await {
            Ok(content) => content,
            Err(e) => {
                drop(pending);
                if matches!(e, VaultError::DecryptionFailed) {
                    #[cfg(feature = "metrics")]
                    counter!(notes_metrics::UNLOCK_FAILURES_TOTAL, labels::SOURCE => source.as_str())
                        .increment(1);
                    warn!(note_id = %id, source = source.as_str(), "unlock rejected");
                }
                return Err(e.into());
            },
        };

        let mut views = self.views();
        let stale = match views.get_mut(id) {
            Some(view) if view.generation == generation => {
                self.keys.set(id, password);
                view.content = Some(content);
                view.state = NoteState::Unlocked;
                pending.disarm();
                None
            },
            Some(_) => Some(Error::locked(id)),
            None => Some(Error::not_open(id)),
        };
        drop(views);

        if let Some(err) = stale {
            debug!(note_id = %id, "discarding unlock for a closed or relocked view");
            return Err(err);
        }

        #[cfg(feature = "metrics")]
        counter!(notes_metrics::UNLOCKS_TOTAL, labels::SOURCE => source.as_str()).increment(1);

        info!(note_id = %id, source = source.as_str(), "note unlocked");
        Ok(())
    }

    /// Re-encrypt `content` with the cached password and persist it.
    ///
    /// The new content is kept in the view before the store is called, so a
    /// failed write returns [`Error::Persistence`] without losing the edit and
    /// the caller can retry.
    ///
    /// Saves on one note run one at a time in call order, so the last call
    /// is the one left in the store. A save that has passed its view check is
    /// still persisted if the note is exited or signed out before the write.
    pub async fn save(&self, id: &str, content: String) -> Result<()> {
        let content = Zeroizing::new(content);
        let writer = self.save_lock(id);
        let _writing = writer.lock().await;

        let generation = {
            let views = self.views();
            let view = views.get(id).ok_or_else(|| Error::not_open(id))?;
            if view.state != NoteState::Unlocked {
                return Err(Error::locked(id));
            }
            view.generation
        };
        let password = self.keys.get(id).ok_or_else(|| Error::locked(id))?;

        let payload = self.cipher.encrypt_async(content.clone(), password).await?;

        {
            let mut views = self.views();
            match views.get_mut(id) {
                Some(view)
                    if view.generation == generation && view.state == NoteState::Unlocked =>
                {
                    view.content = Some(content);
                },
                _ => return Err(Error::locked(id)),
            }
        }

        if let Err(e) = self.store.update(id, &payload, Utc::now()).await {
            #[cfg(feature = "metrics")]
            counter!(notes_metrics::SAVE_ERRORS_TOTAL).increment(1);
            warn!(note_id = %id, error = %e, "failed to persist note");
            return Err(e);
        }

        if let Some(view) = self.views().get_mut(id) {
            view.payload = payload;
        }

        #[cfg(feature = "metrics")]
        counter!(notes_metrics::SAVES_TOTAL).increment(1);

        info!(note_id = %id, "note saved");
        Ok(())
    }

    /// Lock a view in place: evict its password and drop its plaintext.
    pub fn lock(&self, id: &str) -> bool {
        let mut views = self.views();
        self.keys.remove(id);
        let Some(view) = views.get_mut(id) else {
            return false;
        };
        view.lock(self.next_generation());
        debug!(note_id = %id, "note locked");
        true
    }

    /// Close a view: evict its password and discard its plaintext.
    pub fn exit(&self, id: &str) -> bool {
        let mut views = self.views();
        self.keys.remove(id);
        let removed = views.remove(id).is_some();
        Self::record_open_views(&views);
        debug!(note_id = %id, "note view closed");
        removed
    }

    /// Clear every cached password and lock every open view.
    pub fn sign_out(&self) {
        let mut views = self.views();
        let evicted = self.keys.clear();
        for view in views.values_mut() {
            view.lock(self.next_generation());
        }

        #[cfg(feature = "metrics")]
        counter!(notes_metrics::SIGN_OUTS_TOTAL).increment(1);

        info!(evicted, open_views = views.len(), "signed out, all notes locked");
    }

    pub fn state(&self, id: &str) -> Option<NoteState> {
        self.views().get(id).map(|v| v.state)
    }

    /// Plaintext of an unlocked view.
    pub fn content(&self, id: &str) -> Option<Zeroizing<String>> {
        self.views().get(id).and_then(|v| v.content.clone())
    }

    pub fn title(&self, id: &str) -> Option<String> {
        self.views().get(id).map(|v| v.title.clone())
    }

    fn save_lock(&self, id: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.save_locks.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(locks.entry(id.to_string()).or_default())
    }

    fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn views(&self) -> MutexGuard<'_, ViewMap> {
        self.views.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[allow(unused_variables)]
    fn record_open_views(views: &ViewMap) {
        #[cfg(feature = "metrics")]
        gauge!(notes_metrics::OPEN_VIEWS).set(views.len() as f64);
    }
}

/// Puts an `Unlocking` view back to `Locked` if the unlock future is dropped
/// or fails before committing.
struct PendingUnlock<'a> {
    views: &'a Mutex<ViewMap>,
    note_id: &'a str,
    generation: u64,
    armed: bool,
}

impl PendingUnlock<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingUnlock<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut views = self.views.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(view) = views.get_mut(self.note_id)
            && view.generation == self.generation
            && view.state == NoteState::Unlocking
        {
            view.state = NoteState::Locked;
        }
    }
}

/// Title for a note created without one, e.g. `Oct 19, 3:04 PM`.
pub fn default_title<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%b %-d, %-I:%M %p").to_string()
}
