use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (once per process), register every
    /// series description, and publish the configured refresh interval as a
    /// static gauge.
    pub fn init(refresh_interval_secs: u64) -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_all();
        gauge!("ingest_refresh_interval_secs").set(refresh_interval_secs as f64);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// Descriptions for every series the crate emits. Goes to whichever
/// recorder is current, so call it after installing one.
pub fn describe_all() {
    describe_counter!("ingest_runs_total", "Contest refresh cycles completed.");
    describe_counter!(
        "ingest_contests_total",
        "Contests normalized from providers."
    );
    describe_counter!(
        "ingest_provider_errors_total",
        "Provider fetch/parse errors."
    );
    describe_histogram!("ingest_fetch_ms", "Provider parse time in milliseconds.");
    describe_gauge!(
        "ingest_last_run_ts",
        "Unix ts when aggregation last completed."
    );
    describe_gauge!(
        "ingest_refresh_interval_secs",
        "Configured refresh interval in seconds."
    );
    describe_counter!("video_fetch_errors_total", "Playlist fetch/parse errors.");
    describe_counter!("autolink_runs_total", "Auto-link runs.");
    describe_counter!("autolink_updated_total", "Solution links written by auto-link.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics::counter;

    #[test]
    fn every_emitted_series_is_described() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            counter!("ingest_runs_total").increment(1);
            counter!("autolink_runs_total").increment(1);
            counter!("video_fetch_errors_total").increment(1);
            describe_all();
        });
        let out = handle.render();
        assert!(out.contains("# HELP ingest_runs_total"), "{out}");
        assert!(out.contains("# HELP autolink_runs_total"), "{out}");
        assert!(out.contains("# HELP video_fetch_errors_total"), "{out}");
    }
}
