// src/models/mod.rs

//! Domain models for the watcher.

mod config;
mod listing;
mod seen;

pub use config::{ApiConfig, Config, EmailConfig, WatchConfig};
pub use listing::{
    DEFAULT_TITLE, ListingId, ListingRecord, TITLE_KEYS, is_present, value_to_text,
};
pub use seen::SeenSet;
