// src/ingest/providers/mod.rs
pub mod codeforces;
pub mod kontests;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::config::app::AppConfig;
use crate::contest::Platform;
use crate::ingest::types::ContestProvider;

/// Where a provider reads its payload from.
#[derive(Clone)]
pub(crate) enum Mode {
    /// Captured response body, parsed exactly like a live one.
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl Mode {
    /// Response body for this mode; non-2xx statuses are errors.
    pub(crate) async fn body(&self, provider: &'static str) -> Result<String> {
        match self {
            Mode::Fixture(s) => Ok(s.clone()),
            Mode::Http { url, client } => {
                let resp = client
                    .get(url.as_str())
                    .send()
                    .await
                    .with_context(|| format!("{provider} http get()"))?;
                let resp = resp
                    .error_for_status()
                    .with_context(|| format!("{provider} http status"))?;
                resp.text()
                    .await
                    .with_context(|| format!("{provider} http .text()"))
            }
        }
    }
}

/// Shared client; `timeout` of `None` leaves requests unbounded.
pub fn build_http_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(t) = timeout {
        builder = builder.timeout(t);
    }
    builder.build().context("building http client")
}

/// Live provider for one platform, dispatching to its normalizer.
pub fn provider_for(platform: Platform, url: &str, client: reqwest::Client) -> Arc<dyn ContestProvider> {
    match platform {
        Platform::Codeforces => Arc::new(codeforces::CodeforcesProvider::from_url(url, client)),
        Platform::Codechef | Platform::Leetcode => {
            Arc::new(kontests::KontestsProvider::from_url(platform, url, client))
        }
    }
}

/// Fixture-backed provider for one platform.
pub fn fixture_provider_for(platform: Platform, body: &str) -> Arc<dyn ContestProvider> {
    match platform {
        Platform::Codeforces => Arc::new(codeforces::CodeforcesProvider::from_fixture_str(body)),
        Platform::Codechef | Platform::Leetcode => {
            Arc::new(kontests::KontestsProvider::from_fixture_str(platform, body))
        }
    }
}

/// The three live providers, in declaration order.
pub fn default_providers(cfg: &AppConfig) -> Result<Vec<Arc<dyn ContestProvider>>> {
    let client = build_http_client(cfg.request_timeout())?;
    Ok(Platform::ALL
        .iter()
        .map(|&p| provider_for(p, cfg.providers.url_for(p), client.clone()))
        .collect())
}

/// Accepts RFC 3339 (`2024-03-02T14:30:00.000Z`) or `2024-03-02 14:30:00 UTC`.
pub(crate) fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = ts.strip_suffix("UTC").map(str::trim).unwrap_or(ts);
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|n| n.and_utc())
}
