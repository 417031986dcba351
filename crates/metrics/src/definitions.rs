//! Metric name and label definitions.
//!
//! This module defines all metric names and common label keys used throughout locknote.
//! Centralizing these definitions ensures consistency and makes it easier to document
//! what metrics are available.

/// Note encryption and session key cache metrics
pub mod vault {
    /// Successful encryptions
    pub const ENCRYPTIONS_TOTAL: &str = "locknote_vault_encryptions_total";
    /// Decryption attempts
    pub const DECRYPTIONS_TOTAL: &str = "locknote_vault_decryptions_total";
    /// Decryption attempts that failed authentication (cause is never recorded)
    pub const DECRYPTION_FAILURES_TOTAL: &str = "locknote_vault_decryption_failures_total";
    /// Key derivation duration in seconds
    pub const KDF_DURATION_SECONDS: &str = "locknote_vault_kdf_duration_seconds";
    /// Passwords currently held in the session key cache
    pub const CACHED_KEYS: &str = "locknote_vault_cached_keys";
}

/// Note lifecycle metrics
pub mod notes {
    /// Notes created
    pub const CREATED_TOTAL: &str = "locknote_notes_created_total";
    /// Note views opened
    pub const OPENS_TOTAL: &str = "locknote_notes_opens_total";
    /// Successful unlocks (prompted or from the session cache)
    pub const UNLOCKS_TOTAL: &str = "locknote_notes_unlocks_total";
    /// Rejected unlock attempts
    pub const UNLOCK_FAILURES_TOTAL: &str = "locknote_notes_unlock_failures_total";
    /// Saves persisted to the note store
    pub const SAVES_TOTAL: &str = "locknote_notes_saves_total";
    /// Saves that failed to persist
    pub const SAVE_ERRORS_TOTAL: &str = "locknote_notes_save_errors_total";
    /// Global sign-outs
    pub const SIGN_OUTS_TOTAL: &str = "locknote_notes_sign_outs_total";
    /// Currently open note views
    pub const OPEN_VIEWS: &str = "locknote_notes_open_views";
}

/// Common label keys
pub mod labels {
    pub const SOURCE: &str = "source";
}

