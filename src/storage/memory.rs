//! In-memory seen-set store.
//!
//! Backs dry runs (state is loaded from the real store once, then never
//! written back) and tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::SeenSet;
use crate::storage::SeenStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    seen: SeenSet,
    persist_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `seen`.
    pub fn with_seen(seen: SeenSet) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                seen,
                persist_count: 0,
            }),
        }
    }

    /// Current stored set.
    pub fn snapshot(&self) -> SeenSet {
        self.lock().seen.clone()
    }

    /// Number of `persist` calls so far.
    pub fn persist_count(&self) -> usize {
        self.lock().persist_count
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SeenStore for MemoryStore {
    async fn load(&self) -> Result<SeenSet> {
        Ok(self.snapshot())
    }

    async fn persist(&self, seen: &SeenSet) -> Result<()> {
        let mut state = self.lock();
        state.seen = seen.clone();
        state.persist_count += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingId;

    #[tokio::test]
    async fn test_persist_replaces_and_counts() {
        let store = MemoryStore::new();
        assert!(store.load().await.unwrap().is_empty());

        let mut seen = SeenSet::new();
        seen.insert(ListingId::from("a"));
        store.persist(&seen).await.unwrap();
        store.persist(&seen).await.unwrap();

        assert_eq!(store.snapshot(), seen);
        assert_eq!(store.persist_count(), 2);
    }
}
