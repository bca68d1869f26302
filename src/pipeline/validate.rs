// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::Config;
use crate::utils;

/// Validate configuration and report the effective settings.
pub fn run_validate(config: &Config) -> Result<()> {
    utils::log::header("Validating configuration");

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    log::info!("Config OK");
    utils::log::sub_item(&format!("API: {}", config.api.url));
    utils::log::sub_item(&format!("Max pages: {}", config.watch.max_pages));
    utils::log::sub_item(&format!(
        "Fetch attempts: {} ({}s apart, {}s timeout)",
        config.api.retries, config.api.retry_delay_secs, config.api.timeout_secs
    ));
    utils::log::sub_item(&format!(
        "State file: {}",
        config.watch.state_file.display()
    ));

    if config.email.is_configured() {
        utils::log::sub_item(&format!(
            "Email: {}:{} -> {}",
            config.email.smtp_host,
            config.email.smtp_port,
            config.email.to.as_deref().unwrap_or_default()
        ));
    } else {
        log::warn!("Email not configured. New listings will only be logged.");
    }

    Ok(())
}
