use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

use crate::config::app::YoutubeConfig;
use crate::video::{VideoCandidate, VideoSource};

#[derive(Debug, Deserialize)]
struct PlaylistItems {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    resource_id: Option<ResourceId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

enum Mode {
    /// playlist id → captured response body
    Fixture(HashMap<String, String>),
    Http {
        api_base: String,
        api_key: Option<String>,
        max_results: u32,
        client: reqwest::Client,
    },
}

/// YouTube Data API `playlistItems` adapter.
pub struct YoutubePlaylistProvider {
    mode: Mode,
}

impl YoutubePlaylistProvider {
    pub fn from_fixtures<I, K, V>(fixtures: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            mode: Mode::Fixture(
                fixtures
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn from_config(cfg: &YoutubeConfig, client: reqwest::Client) -> Self {
        let api_key = cfg.resolved_api_key();
        if api_key.is_none() {
            tracing::warn!(target: "video", "no YouTube API key configured; playlist fetches will be empty");
        }
        Self {
            mode: Mode::Http {
                api_base: cfg.api_base.clone(),
                api_key,
                max_results: cfg.max_results,
                client,
            },
        }
    }

    fn parse_items_from_str(s: &str) -> Result<Vec<VideoCandidate>> {
        let page: PlaylistItems = serde_json::from_str(s).context("parsing playlistItems")?;
        let out = page
            .items
            .into_iter()
            .filter_map(|it| {
                let video_id = it.snippet.resource_id.and_then(|r| r.video_id)?;
                let published_at = it
                    .snippet
                    .published_at
                    .as_deref()
                    .and_then(|p| DateTime::parse_from_rfc3339(p).ok())
                    .map(|d| d.with_timezone(&Utc));
                Some(VideoCandidate {
                    url: format!("https://www.youtube.com/watch?v={video_id}"),
                    id: video_id,
                    title: it.snippet.title,
                    description: it.snippet.description,
                    published_at,
                })
            })
            .collect();
        Ok(out)
    }
}

#[async_trait]
impl VideoSource for YoutubePlaylistProvider {
    async fn fetch_playlist(&self, playlist_id: &str) -> Result<Vec<VideoCandidate>> {
        match &self.mode {
            Mode::Fixture(bodies) => {
                let body = bodies
                    .get(playlist_id)
                    .ok_or_else(|| anyhow!("no fixture for playlist {playlist_id}"))?;
                Self::parse_items_from_str(body)
            }
            Mode::Http {
                api_base,
                api_key,
                max_results,
                client,
            } => {
                let Some(key) = api_key else {
                    bail!("missing YouTube API key");
                };
                let max = max_results.to_string();
                let resp = client
                    .get(api_base.as_str())
                    .query(&[
                        ("part", "snippet"),
                        ("maxResults", max.as_str()),
                        ("playlistId", playlist_id),
                        ("key", key.as_str()),
                    ])
                    .send()
                    .await
                    .context("youtube http get()")?;
                let status = resp.status();
                let body = resp.text().await.context("youtube http .text()")?;
                if !status.is_success() {
                    let message = serde_json::from_str::<ErrorBody>(&body)
                        .ok()
                        .and_then(|b| b.error)
                        .and_then(|e| e.message)
                        .unwrap_or_else(|| "Failed to fetch YouTube videos".to_string());
                    bail!("youtube api error ({status}): {message}");
                }
                Self::parse_items_from_str(&body)
            }
        }
    }
}
