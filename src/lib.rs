// src/lib.rs

//! intern-watch library: new-listing detection with durable deduplication.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
