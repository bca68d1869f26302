//! Stable identity derivation for listing records.
//!
//! Identity is resolved by the ordered rule table [`RULES`]:
//!
//! 1. an upstream-assigned id (`id`, `_id`, `internship_id`)
//! 2. a SHA-256 digest of `title|link`, which always yields a value
//!
//! Resolution is a pure function of the record's field values, so key order
//! and run order never change the result.

use sha2::{Digest, Sha256};

use crate::models::{ListingId, ListingRecord, TITLE_KEYS};

/// Canonical identifier keys, in preference order.
pub const ID_KEYS: &[&str] = &["id", "_id", "internship_id"];

/// Link-like keys hashed by the fallback rule.
pub const HASH_LINK_KEYS: &[&str] = &["link", "url", "slug"];

/// Joins title and link before hashing.
pub const HASH_DELIMITER: &str = "|";

/// One step of identity resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityRule {
    /// First present value among `keys`, stringified.
    Upstream { keys: &'static [&'static str] },
    /// Digest of `title|link`, each the first present value among its keys
    /// or empty. Always applies.
    ContentHash {
        title_keys: &'static [&'static str],
        link_keys: &'static [&'static str],
    },
}

/// Identity rules, tried in order. The last rule always yields an id.
pub const RULES: &[IdentityRule] = &[
    IdentityRule::Upstream { keys: ID_KEYS },
    IdentityRule::ContentHash {
        title_keys: TITLE_KEYS,
        link_keys: HASH_LINK_KEYS,
    },
];

impl IdentityRule {
    /// Apply this rule, returning `None` when it does not match the record.
    pub fn apply(&self, record: &ListingRecord) -> Option<ListingId> {
        match self {
            Self::Upstream { keys } => record.first_text(keys).map(ListingId::new),
            Self::ContentHash {
                title_keys,
                link_keys,
            } => {
                let title = record.first_text(title_keys).unwrap_or_default();
                let link = record.first_text(link_keys).unwrap_or_default();
                Some(ListingId::new(hash_hex(&format!(
                    "{title}{HASH_DELIMITER}{link}"
                ))))
            }
        }
    }
}

/// Resolve the deduplication key for a record.
pub fn resolve(record: &ListingRecord) -> ListingId {
    RULES
        .iter()
        .find_map(|rule| rule.apply(record))
        // Same as the content hash of a record with no title or link.
        .unwrap_or_else(|| ListingId::new(hash_hex(HASH_DELIMITER)))
}

/// Lowercase hex SHA-256 of `input`.
pub fn hash_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}
