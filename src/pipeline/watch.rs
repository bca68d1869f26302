// src/pipeline/watch.rs

//! Watch pipeline entry point.

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::cycle::{CycleMode, CycleOptions, CycleSummary, StopReason, WatchCycle};
use crate::services::{EmailNotifier, HttpFetcher, LogNotifier, Notifier};
use crate::storage::{LocalStore, MemoryStore, SeenStore};
use crate::utils::{self, http};

/// Variations of a watch run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Detect against an in-memory copy of the state; persist and send nothing.
    pub dry_run: bool,
    /// Mark every current listing as seen without notifying.
    pub baseline: bool,
}

/// Run one watch cycle against the configured API, state file and mailbox.
pub async fn run_watch(config: &Config, run: RunOptions) -> Result<CycleSummary> {
    utils::log::header(if run.baseline {
        "Seeding seen state"
    } else {
        "Watching for new internships"
    });
    if run.dry_run {
        log::info!("Dry run: state will not be written and no email will be sent");
    }

    let client = http::create_client(&config.api)?;
    let fetcher = HttpFetcher::new(client, &config.api);
    let store = LocalStore::new(&config.watch.state_file);
    let notifier = select_notifier(config, run)?;

    let options = CycleOptions {
        max_pages: config.watch.max_pages,
        site_base: config.api.site_base.clone(),
        mode: if run.baseline {
            CycleMode::Baseline
        } else {
            CycleMode::Notify
        },
    };

    let summary = if run.dry_run {
        let preview = MemoryStore::with_seen(store.load().await?);
        WatchCycle::new(&fetcher, &preview, notifier.as_ref(), options)
            .run()
            .await?
    } else {
        WatchCycle::new(&fetcher, &store, notifier.as_ref(), options)
            .run()
            .await?
    };

    if summary.total_new == 0 {
        log::info!("No new internships.");
    }
    utils::log::summary("Watch cycle", &summary_items(&summary, &store));

    Ok(summary)
}

fn select_notifier(config: &Config, run: RunOptions) -> Result<Box<dyn Notifier>> {
    if run.dry_run || run.baseline {
        return Ok(Box::new(LogNotifier));
    }
    if !config.email.is_configured() {
        log::warn!("Email not configured. Set SMTP_USER, SMTP_PASS, EMAIL_TO.");
        return Ok(Box::new(LogNotifier));
    }
    Ok(Box::new(EmailNotifier::from_config(&config.email)?))
}

fn summary_items(summary: &CycleSummary, store: &dyn SeenStore) -> Vec<(&'static str, String)> {
    let stop = match summary.stop {
        StopReason::PageLimit => "page limit reached".to_string(),
        StopReason::EmptyPage { page } => format!("page {page} was empty"),
        StopReason::FetchFailed { page } => format!("page {page} could not be fetched"),
    };
    let elapsed = summary.finished_at - summary.started_at;

    vec![
        ("Pages", summary.pages.to_string()),
        ("Fetched", summary.total_fetched.to_string()),
        ("New", summary.total_new.to_string()),
        ("Notified", summary.notified.to_string()),
        ("Notify failures", summary.notify_failures.to_string()),
        ("Stopped", stop),
        ("Seen total", summary.seen_total.to_string()),
        ("State", store.location()),
        (
            "Duration",
            format!("{:.1}s", elapsed.num_milliseconds() as f64 / 1000.0),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use crate::models::SeenSet;

    /// Serve `pages[n - 1]` for `?page=n`, and `[]` past the end.
    async fn serve(pages: Vec<&'static str>) -> String {
        serve_with_status("200 OK", pages).await
    }

    /// Like `serve`, answering every request with `status`.
    async fn serve_with_status(status: &'static str, pages: Vec<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                let page: usize = request
                    .split("page=")
                    .nth(1)
                    .and_then(|rest| rest.split(|c: char| !c.is_ascii_digit()).next())
                    .and_then(|digits| digits.parse().ok())
                    .unwrap_or(1);
                let body = pages.get(page.saturating_sub(1)).copied().unwrap_or("[]");
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{addr}/api/v1/internships")
    }

    fn config_for(url: String, state: &Path) -> Config {
        let mut config = Config::default();
        config.api.url = url;
        config.api.retries = 1;
        config.api.timeout_secs = 5;
        config.watch.state_file = state.to_path_buf();
        config
    }

    const PAGE_ONE: &str = r#"{"data": {"data": [
        {"id": 11, "title": "Rust Intern", "slug": "/internships/11"},
        {"title": "Design Intern", "url": "https://jobs.example/design"}
    ]}}"#;

    fn read_state(path: &Path) -> SeenSet {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_run_watch_over_http() {
        let url = serve(vec![PAGE_ONE]).await;
        let tmp = TempDir::new().unwrap();
        let state = tmp.path().join("seen.json");
        let config = config_for(url, &state);

        let summary = run_watch(&config, RunOptions::default()).await.unwrap();

        assert_eq!(summary.total_fetched, 2);
        assert_eq!(summary.total_new, 2);
        assert_eq!(summary.notified, 2);
        assert_eq!(summary.stop, StopReason::EmptyPage { page: 2 });
        assert_eq!(read_state(&state).len(), 2);

        let again = run_watch(&config, RunOptions::default()).await.unwrap();
        assert_eq!(again.total_new, 0);
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let url = serve(vec![PAGE_ONE]).await;
        let tmp = TempDir::new().unwrap();
        let state = tmp.path().join("seen.json");
        let config = config_for(url, &state);

        let run = RunOptions {
            dry_run: true,
            ..RunOptions::default()
        };
        let summary = run_watch(&config, run).await.unwrap();

        assert_eq!(summary.total_new, 2);
        assert!(!state.exists());
    }

    #[tokio::test]
    async fn test_baseline_then_watch_finds_only_fresh_listings() {
        let tmp = TempDir::new().unwrap();
        let state = tmp.path().join("seen.json");

        let url = serve(vec![PAGE_ONE]).await;
        let seeded = run_watch(
            &config_for(url, &state),
            RunOptions {
                baseline: true,
                ..RunOptions::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(seeded.total_new, 2);
        assert_eq!(seeded.notified, 0);

        let url = serve(vec![r#"[{"id": 11}, {"id": 12, "title": "Data Intern"}]"#]).await;
        let summary = run_watch(&config_for(url, &state), RunOptions::default())
            .await
            .unwrap();
        assert_eq!(summary.total_new, 1);
        assert_eq!(summary.new_ids[0].as_str(), "12");
        assert_eq!(read_state(&state).len(), 3);
    }

    #[tokio::test]
    async fn test_unreachable_api_still_reports() {
        let tmp = TempDir::new().unwrap();
        let state = tmp.path().join("seen.json");
        let config = config_for("http://127.0.0.1:9/api".to_string(), &state);

        let summary = run_watch(&config, RunOptions::default()).await.unwrap();

        assert_eq!(summary.stop, StopReason::FetchFailed { page: 1 });
        assert_eq!(summary.total_fetched, 0);
        assert!(!state.exists());
    }

    #[tokio::test]
    async fn test_server_error_stops_without_state() {
        let url = serve_with_status("503 Service Unavailable", vec![PAGE_ONE]).await;
        let tmp = TempDir::new().unwrap();
        let state = tmp.path().join("seen.json");
        let config = config_for(url, &state);

        let summary = run_watch(&config, RunOptions::default()).await.unwrap();

        assert_eq!(summary.stop, StopReason::FetchFailed { page: 1 });
        assert_eq!(summary.total_fetched, 0);
        assert_eq!(summary.notified, 0);
        assert!(!state.exists());
    }

    #[test]
    fn test_summary_items_describe_stop() {
        let mut summary = CycleSummary {
            started_at: chrono::Utc::now(),
            finished_at: chrono::Utc::now(),
            pages: 2,
            total_fetched: 10,
            total_new: 1,
            notified: 1,
            notify_failures: 0,
            new_ids: Vec::new(),
            seen_total: 40,
            stop: StopReason::EmptyPage { page: 3 },
        };
        let store = MemoryStore::new();

        let items = summary_items(&summary, &store);
        assert!(items.contains(&("Stopped", "page 3 was empty".to_string())));
        assert!(items.contains(&("Fetched", "10".to_string())));

        summary.stop = StopReason::FetchFailed { page: 1 };
        let items = summary_items(&summary, &store);
        assert!(items.contains(&("Stopped", "page 1 could not be fetched".to_string())));
    }
}
