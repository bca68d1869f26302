// src/services/fetcher.rs

//! HTTP page fetcher for the listing API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::ApiConfig;
use crate::services::PageFetcher;
use crate::utils::http::page_url;
use crate::utils::{RetryPolicy, retry};

/// Fetches listing pages over HTTP with bounded retries.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(client: Client, config: &ApiConfig) -> Self {
        Self {
            client,
            base_url: config.url.clone(),
            retry: RetryPolicy::new(
                config.retries,
                Duration::from_secs(config.retry_delay_secs),
            ),
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<Value> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, page: u32) -> Result<Value> {
        let url = page_url(&self.base_url, page);
        log::debug!("Fetching page {} from {}", page, url);

        retry(self.retry, &format!("Fetching page {page}"), |_| {
            self.fetch_once(&url)
        })
        .await
        .map_err(|e| AppError::fetch(page, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use crate::utils::http::create_client;

    /// Answer every request with 503, counting requests.
    async fn unavailable(hits: Arc<AtomicUsize>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 4096];
                let _ = socket.read(&mut buf).await;
                hits.fetch_add(1, Ordering::SeqCst);
                let body = r#"{"data": [{"id": 1}]}"#;
                let response = format!(
                    "HTTP/1.1 503 Service Unavailable\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{addr}/api/internships")
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let hits = Arc::new(AtomicUsize::new(0));
        let config = ApiConfig {
            url: unavailable(hits.clone()).await,
            timeout_secs: 5,
            retries: 2,
            retry_delay_secs: 0,
            ..ApiConfig::default()
        };
        let fetcher = HttpFetcher::new(create_client(&config).unwrap(), &config);

        let err = fetcher.fetch(1).await.unwrap_err();
        assert!(matches!(err, AppError::Fetch { page: 1, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let config = ApiConfig {
            url: "http://127.0.0.1:9/api/internships".to_string(),
            timeout_secs: 2,
            retries: 2,
            retry_delay_secs: 0,
            ..ApiConfig::default()
        };
        let fetcher = HttpFetcher::new(create_client(&config).unwrap(), &config);

        let err = fetcher.fetch(4).await.unwrap_err();
        assert!(matches!(err, AppError::Fetch { page: 4, .. }));
    }
}
