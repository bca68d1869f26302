//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream listing API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Watch cycle settings
    #[serde(default)]
    pub watch: WatchConfig,

    /// SMTP notification settings
    #[serde(default)]
    pub email: EmailConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, or return defaults if the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(AppError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Apply overrides from process environment variables.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("API_URL") {
            self.api.url = url;
        }
        if let Some(pages) = var("MAX_PAGES") {
            match pages.trim().parse() {
                Ok(n) => self.watch.max_pages = n,
                Err(_) => log::warn!("Ignoring invalid MAX_PAGES value {pages:?}"),
            }
        }
        if let Some(path) = var("SEEN_FILE") {
            self.watch.state_file = PathBuf::from(path);
        }
        if let Some(host) = var("SMTP_HOST") {
            self.email.smtp_host = host;
        }
        if let Some(port) = var("SMTP_PORT") {
            match port.trim().parse() {
                Ok(n) => self.email.smtp_port = n,
                Err(_) => log::warn!("Ignoring invalid SMTP_PORT value {port:?}"),
            }
        }
        if let Some(user) = var("SMTP_USER") {
            self.email.username = Some(user);
        }
        if let Some(pass) = var("SMTP_PASS") {
            self.email.password = Some(pass);
        }
        if let Some(to) = var("EMAIL_TO") {
            self.email.to = Some(to);
        }
        if let Some(from) = var("EMAIL_FROM") {
            self.email.from = Some(from);
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.url.trim().is_empty() {
            return Err(AppError::validation("api.url is empty"));
        }
        url::Url::parse(&self.api.url)
            .map_err(|e| AppError::validation(format!("api.url is not a valid URL: {e}")))?;
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if self.api.retries == 0 {
            return Err(AppError::validation("api.retries must be >= 1"));
        }
        if self.watch.max_pages == 0 {
            return Err(AppError::validation("watch.max_pages must be > 0"));
        }
        if self.watch.state_file.as_os_str().is_empty() {
            return Err(AppError::validation("watch.state_file is empty"));
        }
        if self.email.timeout_secs == 0 {
            return Err(AppError::validation("email.timeout_secs must be > 0"));
        }
        if self.email.retries == 0 {
            return Err(AppError::validation("email.retries must be >= 1"));
        }
        Ok(())
    }
}

/// Upstream listing API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the paginated listing endpoint
    #[serde(default = "defaults::api_url")]
    pub url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::api_timeout")]
    pub timeout_secs: u64,

    /// Attempts per page before giving up
    #[serde(default = "defaults::api_retries")]
    pub retries: u32,

    /// Fixed delay between attempts in seconds
    #[serde(default = "defaults::api_retry_delay")]
    pub retry_delay_secs: u64,

    /// Site root used to turn listing slugs into links
    #[serde(default = "defaults::site_base")]
    pub site_base: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: defaults::api_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::api_timeout(),
            retries: defaults::api_retries(),
            retry_delay_secs: defaults::api_retry_delay(),
            site_base: defaults::site_base(),
        }
    }
}

/// Watch cycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Maximum number of pages to request per run
    #[serde(default = "defaults::max_pages")]
    pub max_pages: u32,

    /// JSON file holding the seen identifiers
    #[serde(default = "defaults::state_file")]
    pub state_file: PathBuf,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            max_pages: defaults::max_pages(),
            state_file: defaults::state_file(),
        }
    }
}

/// SMTP notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Recipient address
    #[serde(default)]
    pub to: Option<String>,

    /// Sender address (defaults to `username`)
    #[serde(default)]
    pub from: Option<String>,

    #[serde(default = "defaults::subject_prefix")]
    pub subject_prefix: String,

    #[serde(default = "defaults::smtp_timeout")]
    pub timeout_secs: u64,

    /// Delivery attempts per notification
    #[serde(default = "defaults::smtp_retries")]
    pub retries: u32,

    #[serde(default = "defaults::smtp_retry_delay")]
    pub retry_delay_secs: u64,
}

impl EmailConfig {
    /// Whether credentials and a recipient are all set.
    pub fn is_configured(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        set(&self.username) && set(&self.password) && set(&self.to)
    }

    /// Sender address, falling back to the login name.
    pub fn sender(&self) -> Option<&str> {
        self.from
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.username.as_deref())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: defaults::smtp_host(),
            smtp_port: defaults::smtp_port(),
            username: None,
            password: None,
            to: None,
            from: None,
            subject_prefix: defaults::subject_prefix(),
            timeout_secs: defaults::smtp_timeout(),
            retries: defaults::smtp_retries(),
            retry_delay_secs: defaults::smtp_retry_delay(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // API defaults
    pub fn api_url() -> String {
        "https://vtuapi.internyet.in/api/v1/internships".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36"
            .into()
    }
    pub fn api_timeout() -> u64 {
        20
    }
    pub fn api_retries() -> u32 {
        3
    }
    pub fn api_retry_delay() -> u64 {
        2
    }
    pub fn site_base() -> String {
        "https://vtu.internyet.in".into()
    }

    // Watch defaults
    pub fn max_pages() -> u32 {
        5
    }
    pub fn state_file() -> PathBuf {
        PathBuf::from("seen.json")
    }

    // Email defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        587
    }
    pub fn subject_prefix() -> String {
        "New VTU Internship: ".into()
    }
    pub fn smtp_timeout() -> u64 {
        30
    }
    pub fn smtp_retries() -> u32 {
        1
    }
    pub fn smtp_retry_delay() -> u64 {
        5
    }
}
