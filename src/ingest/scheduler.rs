// src/ingest/scheduler.rs
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use metrics::counter;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::contest::Contest;
use crate::ingest::Aggregator;

#[derive(Clone, Copy, Debug)]
pub struct RefreshSchedulerCfg {
    pub interval_secs: u64,
}

impl Default for RefreshSchedulerCfg {
    fn default() -> Self {
        Self {
            interval_secs: 15 * 60,
        }
    }
}

/// Latest aggregation result.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub contests: Vec<Contest>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Shared holder of the most recent snapshot. A completed fetch replaces
/// the previous contests wholesale.
#[derive(Debug, Default)]
pub struct ContestCache {
    inner: RwLock<Snapshot>,
}

impl ContestCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, contests: Vec<Contest>) {
        let mut g = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *g = Snapshot {
            contests,
            refreshed_at: Some(Utc::now()),
        };
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Run one aggregation and store it; returns the number of contests.
pub async fn refresh_once(aggregator: &Aggregator, cache: &ContestCache) -> usize {
    let contests = aggregator.fetch_all().await;
    let n = contests.len();
    cache.replace(contests);
    counter!("ingest_runs_total").increment(1);
    n
}

/// Owns the background refresh task. Dropping the handle detaches the task;
/// only [`stop`](Self::stop) cancels it.
pub struct RefreshHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Cancel the timer and wait for the task to finish. A refresh already
    /// in flight is abandoned.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawn the periodic refresher. The first refresh runs immediately; later
/// ones every `interval_secs`. Cycles run one after another inside the task,
/// so they never overlap; a slow cycle delays the next tick.
pub fn spawn_refresh_scheduler(
    aggregator: Arc<Aggregator>,
    cache: Arc<ContestCache>,
    cfg: RefreshSchedulerCfg,
) -> RefreshHandle {
    let (tx, mut rx) = watch::channel(false);
    let period = Duration::from_secs(cfg.interval_secs.max(1));

    let keep_open = tx.clone();

    let task = tokio::spawn(async move {
        let _keep_open = keep_open;
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = rx.changed() => break,
                _ = ticker.tick() => {
                    let n = tokio::select! {
                        _ = rx.changed() => break,
                        n = refresh_once(&aggregator, &cache) => n,
                    };
                    tracing::info!(target: "ingest", contests = n, "scheduled refresh tick");
                }
            }
        }
        tracing::debug!(target: "ingest", "refresh scheduler stopped");
    });

    RefreshHandle { shutdown: tx, task }
}
