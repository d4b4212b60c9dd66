//! # Auto-link
//!
//! Attaches solution videos to past contests that have no stored link yet.
//! Existing links, manual or automatic, are never re-matched or replaced.

use anyhow::Result;
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::app::PlaylistMap;
use crate::contest::Contest;
use crate::store::solutions::SolutionLinkStore;
use crate::video::matcher::find_matching_video;
use crate::video::{fetch_all_platform_videos, VideoSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AutoLinkSummary {
    /// Links written in this run.
    pub updated: usize,
    /// Past contests considered (including those skipped for having a link).
    pub total: usize,
}

pub struct AutoLinker {
    videos: Arc<dyn VideoSource>,
    playlists: PlaylistMap,
    solutions: Arc<SolutionLinkStore>,
}

impl AutoLinker {
    pub fn new(
        videos: Arc<dyn VideoSource>,
        playlists: PlaylistMap,
        solutions: Arc<SolutionLinkStore>,
    ) -> Self {
        Self {
            videos,
            playlists,
            solutions,
        }
    }

    /// Never fails: any internal error is logged and reported as `{0, 0}`.
    pub async fn run(&self, past_contests: &[Contest]) -> AutoLinkSummary {
        counter!("autolink_runs_total").increment(1);
        match self.try_run(past_contests).await {
            Ok(summary) => {
                counter!("autolink_updated_total").increment(summary.updated as u64);
                tracing::info!(
                    target: "autolink",
                    updated = summary.updated,
                    total = summary.total,
                    "auto-link finished"
                );
                summary
            }
            Err(e) => {
                tracing::warn!(target: "autolink", error = ?e, "auto-link failed");
                AutoLinkSummary::default()
            }
        }
    }

    async fn try_run(&self, past_contests: &[Contest]) -> Result<AutoLinkSummary> {
        let videos = fetch_all_platform_videos(self.videos.as_ref(), &self.playlists).await;

        let mut updated = 0usize;
        for contest in past_contests {
            if self.solutions.try_get(&contest.id)?.is_some() {
                continue;
            }
            let candidates = videos
                .get(&contest.platform)
                .map(Vec::as_slice)
                .unwrap_or_default();
            if let Some(video) = find_matching_video(&contest.name, contest.platform, candidates) {
                self.solutions.set(&contest.id, &video.url)?;
                tracing::debug!(
                    target: "autolink",
                    contest = %contest.id,
                    video = %video.id,
                    "matched solution video"
                );
                updated += 1;
            }
        }

        Ok(AutoLinkSummary {
            updated,
            total: past_contests.len(),
        })
    }
}
