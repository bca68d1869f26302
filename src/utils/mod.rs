//! Utility functions and helpers.

pub mod http;
pub mod log;
pub mod retry;

use url::Url;

pub use retry::{RetryPolicy, retry};

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}
