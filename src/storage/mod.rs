//! Durable storage for the seen-set.
//!
//! The seen-set is persisted as a pretty-printed, sorted JSON array of
//! identifiers:
//!
//! ```text
//! [
//!   "4f1c…",
//!   "A1",
//!   "A2"
//! ]
//! ```
//!
//! Persisting always rewrites the complete set. Callers insert into the
//! in-memory [`SeenSet`] first and then call [`SeenStore::persist`]; the
//! listing counts as processed once `persist` returns `Ok`.

pub mod local;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::SeenSet;

// Re-export for convenience
pub use local::LocalStore;
pub use memory::MemoryStore;

/// Trait for seen-set storage backends.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Load the stored set. Missing state yields an empty set.
    async fn load(&self) -> Result<SeenSet>;

    /// Replace the stored set with `seen`.
    async fn persist(&self, seen: &SeenSet) -> Result<()>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}
