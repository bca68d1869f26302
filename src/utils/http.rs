// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::error::Result;
use crate::models::ApiConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &ApiConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Build the URL of a listing page.
///
/// Any query already present on `base` is replaced by `page=N`.
pub fn page_url(base: &str, page: u32) -> String {
    match base.split_once('?') {
        Some((path, _)) => format!("{path}?page={page}"),
        None => format!("{}?page={page}", base.trim_end_matches('/')),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_plain() {
        assert_eq!(
            page_url("https://api.example.com/v1/internships", 2),
            "https://api.example.com/v1/internships?page=2"
        );
    }

    #[test]
    fn test_page_url_trailing_slash() {
        assert_eq!(
            page_url("https://api.example.com/v1/internships/", 1),
            "https://api.example.com/v1/internships?page=1"
        );
    }

    #[test]
    fn test_page_url_replaces_query() {
        assert_eq!(
            page_url("https://api.example.com/v1/internships?page=9&sort=new", 3),
            "https://api.example.com/v1/internships?page=3"
        );
    }

    #[test]
    fn test_create_client() {
        assert!(create_client(&ApiConfig::default()).is_ok());
    }
}
