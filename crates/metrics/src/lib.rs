//! Metrics names and facade for locknote.
//!
//! This crate provides a unified metrics interface using the `metrics` crate facade.
//! Recording is a no-op until the embedding application installs a recorder
//! (for example `metrics-exporter-prometheus`).
//!
//! # Usage
//!
//! ```rust,ignore
//! use locknote_metrics::{counter, gauge, vault};
//!
//! counter!(vault::ENCRYPTIONS_TOTAL).increment(1);
//! gauge!(vault::CACHED_KEYS).set(3.0);
//! ```

mod definitions;

pub use definitions::*;

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};
