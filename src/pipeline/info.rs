// src/pipeline/info.rs

use crate::error::Result;
use crate::models::Config;
use crate::storage::{LocalStore, SeenStore};
use crate::utils;

/// Report on the seen-state file. Returns the number of stored ids.
pub async fn run_info(config: &Config) -> Result<usize> {
    let store = LocalStore::new(&config.watch.state_file);
    let exists = tokio::fs::try_exists(store.path()).await?;
    let seen = store.load().await?;

    utils::log::summary(
        "Seen state",
        &[
            ("File", store.location()),
            ("Exists", exists.to_string()),
            ("Seen ids", seen.len().to_string()),
        ],
    );

    Ok(seen.len())
}
