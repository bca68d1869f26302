//! The set of listing identifiers already processed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ListingId;

/// Identifiers processed by this and all earlier runs.
///
/// Backed by a `BTreeSet`, so the serialized JSON array is always sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenSet {
    ids: BTreeSet<ListingId>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &ListingId) -> bool {
        self.ids.contains(id)
    }

    /// Insert an identifier, returning `true` if it was not present.
    pub fn insert(&mut self, id: ListingId) -> bool {
        self.ids.insert(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifiers in canonical (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = &ListingId> {
        self.ids.iter()
    }
}

impl FromIterator<ListingId> for SeenSet {
    fn from_iter<I: IntoIterator<Item = ListingId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
