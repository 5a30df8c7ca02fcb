//! Storage abstractions for the seen-set.
//!
//! The seen-set maps identity keys to the ISO-8601 instant a posting was
//! first observed. It only ever grows: a run reads it, adds keys, and
//! writes it back whole.
//!
//! ```text
//! data/
//! └── seen_jobs.json   # { "3f9a1c0b7d2e": "2026-10-19T12:00:00.000000+00:00", ... }
//! ```

pub mod local;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use local::LocalSeenStore;

/// Identity key → first-seen timestamp.
pub type SeenSet = BTreeMap<String, String>;

/// Trait for seen-set storage backends.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Load the seen-set. A store that was never written yields an empty set.
    async fn load(&self) -> Result<SeenSet>;

    /// Replace the persisted seen-set.
    async fn save(&self, seen: &SeenSet) -> Result<()>;
}
