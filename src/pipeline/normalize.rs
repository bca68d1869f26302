//! Response normalization.
//!
//! The listing API has changed envelope shapes across versions. Extraction
//! tries the known shapes in priority order and degrades to an empty list for
//! anything it does not recognize; it never fails.

use serde_json::{Map, Value};

use crate::models::ListingRecord;

/// Extract the listing records from a decoded API response.
pub fn extract(response: &Value) -> Vec<ListingRecord> {
    let items = match response {
        Value::Object(map) => from_object(map),
        Value::Array(items) => Some(items),
        _ => None,
    };

    items
        .map(|items| items.iter().cloned().map(ListingRecord::new).collect())
        .unwrap_or_default()
}

fn from_object(map: &Map<String, Value>) -> Option<&Vec<Value>> {
    // {"data": [...]}
    if let Some(Value::Array(items)) = map.get("data") {
        return Some(items);
    }

    // {"data": {"data": [...]}}
    if let Some(Value::Object(inner)) = map.get("data") {
        if let Some(Value::Array(items)) = inner.get("data") {
            return Some(items);
        }
    }

    // {"internships": [...]}
    if let Some(Value::Array(items)) = map.get("internships") {
        return Some(items);
    }

    // First list anywhere, in document order
    map.values().find_map(Value::as_array)
}
