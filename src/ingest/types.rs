// src/ingest/types.rs
use anyhow::Result;

use crate::contest::{Contest, Platform};

/// One external contest source.
///
/// `fetch_contests` may fail; callers that need the never-fail contract go
/// through [`fetch_contained`].
#[async_trait::async_trait]
pub trait ContestProvider: Send + Sync {
    async fn fetch_contests(&self) -> Result<Vec<Contest>>;
    fn platform(&self) -> Platform;
}

/// Result of a contained fetch: either data, or an empty list plus the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome<T> {
    pub items: Vec<T>,
    pub failure: Option<String>,
}

impl<T> FetchOutcome<T> {
    pub fn success(items: Vec<T>) -> Self {
        Self {
            items,
            failure: None,
        }
    }

    pub fn empty_with_reason(reason: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            failure: Some(reason.into()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Run one provider with its failures contained: errors are logged and
/// turned into an empty outcome.
pub async fn fetch_contained(provider: &dyn ContestProvider) -> FetchOutcome<Contest> {
    match provider.fetch_contests().await {
        Ok(v) => FetchOutcome::success(v),
        Err(e) => {
            tracing::warn!(
                target: "ingest",
                error = ?e,
                platform = %provider.platform(),
                "provider error"
            );
            metrics::counter!("ingest_provider_errors_total", "platform" => provider.platform().as_str())
                .increment(1);
            FetchOutcome::empty_with_reason(format!("{e:#}"))
        }
    }
}
