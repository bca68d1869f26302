//! Listing data structures.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Keys probed for a human-readable title, in preference order.
pub const TITLE_KEYS: &[&str] = &["title", "name", "position"];

/// Keys probed for a direct link when rendering a notification.
const LINK_KEYS: &[&str] = &["url", "link", "job_url", "application_url"];

/// Keys holding a site-relative path.
const PATH_KEYS: &[&str] = &["slug", "path"];

/// Title used when a listing carries none.
pub const DEFAULT_TITLE: &str = "Internship";

/// A single listing as returned by the upstream API.
///
/// The upstream schema is not fixed, so the record keeps the raw JSON value.
/// Records that are not JSON objects expose no fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingRecord(Value);

impl ListingRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Raw JSON value of the record.
    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Look up a field; `None` when absent or when the record is not an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.as_object().and_then(|map| map.get(key))
    }

    /// First field among `keys` holding a non-empty value.
    pub fn first_present(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.get(key))
            .find(|value| is_present(value))
    }

    /// First non-empty field among `keys`, rendered as text.
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        self.first_present(keys).map(value_to_text)
    }

    /// Title shown in notifications.
    pub fn display_title(&self) -> String {
        self.first_text(TITLE_KEYS)
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    /// Link shown in notifications.
    ///
    /// Prefers a direct URL field, then a slug or path resolved against
    /// `site_base`, then the listing index of `site_base`.
    pub fn display_link(&self, site_base: &str) -> String {
        if let Some(link) = self.first_text(LINK_KEYS) {
            return link;
        }

        if let Some(path) = self.first_text(PATH_KEYS) {
            if let Ok(base) = Url::parse(site_base) {
                return crate::utils::resolve_url(&base, &path);
            }
        }

        format!("{}/internships", site_base.trim_end_matches('/'))
    }

    /// Compact JSON rendering of the whole record.
    pub fn to_compact_json(&self) -> String {
        self.0.to_string()
    }
}

impl From<Value> for ListingRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Stable deduplication key for a listing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(String);

impl ListingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListingId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Whether a field value counts as set.
///
/// Null, empty strings, `false`, numeric zero and empty containers are
/// treated as missing.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Render a field value as text: strings verbatim, everything else as JSON.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SITE: &str = "https://vtu.internyet.in";

    #[test]
    fn test_display_title_preference() {
        let record = ListingRecord::new(json!({"name": "Backend Intern", "position": "x"}));
        assert_eq!(record.display_title(), "Backend Intern");

        let record = ListingRecord::new(json!({"title": "", "position": "Data Intern"}));
        assert_eq!(record.display_title(), "Data Intern");
    }

    #[test]
    fn test_display_title_default() {
        assert_eq!(ListingRecord::new(json!({})).display_title(), DEFAULT_TITLE);
        assert_eq!(ListingRecord::new(json!("text")).display_title(), DEFAULT_TITLE);
    }

    #[test]
    fn test_display_link_direct() {
        let record = ListingRecord::new(json!({
            "link": "https://a.example/2",
            "url": "https://a.example/1",
        }));
        assert_eq!(record.display_link(SITE), "https://a.example/1");
    }

    #[test]
    fn test_display_link_from_slug() {
        let record = ListingRecord::new(json!({"slug": "/internships/rust-dev"}));
        assert_eq!(
            record.display_link(SITE),
            "https://vtu.internyet.in/internships/rust-dev"
        );
    }

    #[test]
    fn test_display_link_fallback() {
        let record = ListingRecord::new(json!({"title": "No link"}));
        assert_eq!(
            record.display_link("https://vtu.internyet.in/"),
            "https://vtu.internyet.in/internships"
        );
    }

    #[test]
    fn test_is_present() {
        assert!(!is_present(&json!(null)));
        assert!(!is_present(&json!("")));
        assert!(!is_present(&json!(0)));
        assert!(!is_present(&json!(false)));
        assert!(!is_present(&json!([])));
        assert!(!is_present(&json!({})));
        assert!(is_present(&json!("a")));
        assert!(is_present(&json!(42)));
        assert!(is_present(&json!([0])));
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(&json!("abc")), "abc");
        assert_eq!(value_to_text(&json!(17)), "17");
        assert_eq!(value_to_text(&json!(true)), "true");
    }
}
