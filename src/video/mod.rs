// src/video/mod.rs
//! Solution videos: the playlist adapter and the title matcher.

pub mod matcher;
pub mod youtube;

use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::app::PlaylistMap;
use crate::contest::Platform;
use crate::ingest::types::FetchOutcome;

/// One playlist entry. Lives only for the duration of an auto-link run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoCandidate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub published_at: Option<DateTime<Utc>>,
    pub url: String,
}

#[async_trait::async_trait]
pub trait VideoSource: Send + Sync {
    /// Most recent items of one playlist, in provider order.
    async fn fetch_playlist(&self, playlist_id: &str) -> Result<Vec<VideoCandidate>>;
}

/// Fetch one playlist with failures contained to an empty outcome.
pub async fn fetch_playlist_contained(
    source: &dyn VideoSource,
    playlist_id: &str,
) -> FetchOutcome<VideoCandidate> {
    match source.fetch_playlist(playlist_id).await {
        Ok(v) => FetchOutcome::success(v),
        Err(e) => {
            tracing::warn!(target: "video", error = ?e, playlist_id, "playlist fetch failed");
            metrics::counter!("video_fetch_errors_total").increment(1);
            FetchOutcome::empty_with_reason(format!("{e:#}"))
        }
    }
}

/// Fetch every platform's playlist concurrently, one list per platform.
/// A failed playlist maps to an empty list.
pub async fn fetch_all_platform_videos(
    source: &dyn VideoSource,
    playlists: &PlaylistMap,
) -> HashMap<Platform, Vec<VideoCandidate>> {
    let fetches = Platform::ALL.iter().map(|&platform| async move {
        let outcome = fetch_playlist_contained(source, playlists.playlist_for(platform)).await;
        (platform, outcome.into_items())
    });
    join_all(fetches).await.into_iter().collect()
}
