//! Contest tracker binary entrypoint.
//! Boots the Axum HTTP server, wires shared state, starts the periodic
//! contest refresh, and exposes Prometheus metrics.

use contest_tracker::config::app::AppConfig;
use contest_tracker::ingest::scheduler::{spawn_refresh_scheduler, RefreshSchedulerCfg};
use contest_tracker::metrics::Metrics;
use contest_tracker::{router, AppState};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - CONTEST_TRACKER_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("CONTEST_TRACKER_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("contest_tracker=debug,ingest=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev (YOUTUBE_API_KEY, CONTEST_TRACKER_CONFIG); no-op in prod.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let cfg = AppConfig::load_default()?;
    tracing::info!(
        refresh_interval_secs = cfg.refresh_interval_secs,
        data_dir = %cfg.data_dir.display(),
        "config loaded"
    );

    // Recorder first so the scheduler's immediate first tick is recorded.
    let metrics = Metrics::init(cfg.refresh_interval_secs)?;

    let state = AppState::from_config(&cfg)?;

    // Lives for the whole process; the handle is detached on drop.
    let _refresh = spawn_refresh_scheduler(
        state.aggregator.clone(),
        state.cache.clone(),
        RefreshSchedulerCfg {
            interval_secs: cfg.refresh_interval_secs,
        },
    );

    let app = router(state).merge(metrics.router());

    Ok(app.into())
}
