// src/ingest/mod.rs
//! Contest ingest: platform adapters, the concurrent aggregator, and the
//! periodic refresh scheduler.

pub mod providers;
pub mod scheduler;
pub mod types;

use crate::contest::{Contest, Platform};
use crate::ingest::types::{fetch_contained, ContestProvider, FetchOutcome};
use futures::future::join_all;
use metrics::gauge;
use std::collections::HashSet;
use std::sync::Arc;

/// Per-provider outcome of one aggregation cycle.
#[derive(Debug, Clone)]
pub struct AggregateReport {
    pub outcomes: Vec<(Platform, FetchOutcome<Contest>)>,
}

impl AggregateReport {
    /// Platforms whose fetch failed, with the reason.
    pub fn failures(&self) -> Vec<(Platform, &str)> {
        self.outcomes
            .iter()
            .filter_map(|(p, o)| o.failure.as_deref().map(|f| (*p, f)))
            .collect()
    }

    /// All contests concatenated in provider order.
    pub fn into_contests(self) -> Vec<Contest> {
        self.outcomes
            .into_iter()
            .flat_map(|(_, o)| o.into_items())
            .collect()
    }
}

/// Runs every provider concurrently and merges the results.
pub struct Aggregator {
    providers: Vec<Arc<dyn ContestProvider>>,
}

impl Aggregator {
    pub fn new(providers: Vec<Arc<dyn ContestProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Fetch from every provider; never fails. A failing provider
    /// contributes nothing and does not affect the others.
    pub async fn fetch_all(&self) -> Vec<Contest> {
        self.fetch_all_report().await.into_contests()
    }

    /// Like [`fetch_all`](Self::fetch_all) but keeps each provider's outcome.
    pub async fn fetch_all_report(&self) -> AggregateReport {
        let handles = self.providers.iter().map(|p| {
            let provider = Arc::clone(p);
            let platform = provider.platform();
            (
                platform,
                tokio::spawn(async move { fetch_contained(provider.as_ref()).await }),
            )
        });
        let (platforms, tasks): (Vec<_>, Vec<_>) = handles.unzip();

        let joined = join_all(tasks).await;
        let outcomes: Vec<(Platform, FetchOutcome<Contest>)> = platforms
            .into_iter()
            .zip(joined)
            .map(|(platform, res)| match res {
                Ok(outcome) => (platform, outcome),
                Err(e) => {
                    // panic or abort inside one provider task
                    tracing::warn!(target: "ingest", error = ?e, %platform, "provider task failed");
                    (
                        platform,
                        FetchOutcome::empty_with_reason(format!("provider task failed: {e}")),
                    )
                }
            })
            .collect();

        let report = AggregateReport { outcomes };
        warn_on_id_collisions(report.outcomes.iter().flat_map(|(_, o)| o.items.iter()));

        let total: usize = report.outcomes.iter().map(|(_, o)| o.items.len()).sum();
        let now = chrono::Utc::now().timestamp().max(0);
        gauge!("ingest_last_run_ts").set(now as f64);
        tracing::info!(
            target: "ingest",
            contests = total,
            failed = report.failures().len(),
            "aggregation complete"
        );
        report
    }
}

/// Slug-derived ids can collide; both contests are kept and the clash is logged.
fn warn_on_id_collisions<'a>(contests: impl Iterator<Item = &'a Contest>) -> usize {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut clashes = 0usize;
    for c in contests {
        if !seen.insert(c.id.as_str()) {
            clashes += 1;
            tracing::warn!(target: "ingest", id = %c.id, name = %c.name, "duplicate contest id");
        }
    }
    clashes
}
