use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::contest::{normalize_name, slugify, Contest, Platform};
use crate::ingest::providers::{parse_timestamp, Mode};
use crate::ingest::types::ContestProvider;

#[derive(Debug, Deserialize)]
struct Item {
    name: String,
    url: String,
    start_time: String,
    end_time: String,
}

/// Aggregator-feed provider (CodeChef, LeetCode).
///
/// The feed has no native ids, so ids are `<prefix>-<slugified name>`.
/// Duration is recomputed from start/end; any `duration` field in the feed
/// is ignored.
pub struct KontestsProvider {
    platform: Platform,
    mode: Mode,
}

impl KontestsProvider {
    pub fn from_fixture_str(platform: Platform, s: &str) -> Self {
        Self {
            platform,
            mode: Mode::Fixture(s.to_string()),
        }
    }

    pub fn from_url(platform: Platform, url: &str, client: reqwest::Client) -> Self {
        Self {
            platform,
            mode: Mode::Http {
                url: url.to_string(),
                client,
            },
        }
    }

    fn parse_items_from_str(platform: Platform, s: &str) -> Result<Vec<Contest>> {
        if platform == Platform::Codeforces {
            bail!("codeforces is not served by the kontests feed");
        }
        let t0 = std::time::Instant::now();
        let items: Vec<Item> = serde_json::from_str(s)
            .with_context(|| format!("parsing {platform} contest feed"))?;

        let mut out = Vec::with_capacity(items.len());
        for it in items {
            let (Some(start), Some(end)) =
                (parse_timestamp(&it.start_time), parse_timestamp(&it.end_time))
            else {
                tracing::debug!(%platform, name = %it.name, "unparseable contest timestamps skipped");
                continue;
            };
            if end < start {
                tracing::debug!(%platform, name = %it.name, "contest ending before start skipped");
                continue;
            }
            // ids come from the raw feed name so they stay stable across
            // changes to display normalization
            out.push(Contest::new(
                platform.contest_id(&slugify(&it.name)),
                normalize_name(&it.name),
                platform,
                it.url,
                start,
                end,
            ));
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_fetch_ms").record(ms);
        counter!("ingest_contests_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl ContestProvider for KontestsProvider {
    async fn fetch_contests(&self) -> Result<Vec<Contest>> {
        let body = self.mode.body(self.platform.as_str()).await?;
        Self::parse_items_from_str(self.platform, &body)
    }

    fn platform(&self) -> Platform {
        self.platform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"[
        {"name":"Starters 101 (Rated till 6 stars)","url":"https://www.codechef.com/START101",
         "start_time":"2023-08-02T14:30:00.000Z","end_time":"2023-08-02T16:30:00.000Z",
         "duration":"99999","site":"CodeChef","in_24_hours":"No","status":"BEFORE"},
        {"name":"Broken","url":"https://www.codechef.com/X",
         "start_time":"soon","end_time":"later"}
    ]"#;

    #[test]
    fn ids_are_prefixed_slugs_and_duration_ignores_feed() {
        let v = KontestsProvider::parse_items_from_str(Platform::Codechef, FEED).unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].id, "cc-starters-101-(rated-till-6-stars)");
        assert_eq!(v[0].platform, Platform::Codechef);
        assert_eq!(v[0].duration, 7200);
    }

    #[test]
    fn leetcode_uses_its_own_prefix() {
        let body = r#"[{"name":"Weekly Contest 360","url":"https://leetcode.com/contest/weekly-contest-360",
            "start_time":"2023-08-27 02:30:00 UTC","end_time":"2023-08-27 04:00:00 UTC"}]"#;
        let v = KontestsProvider::parse_items_from_str(Platform::Leetcode, body).unwrap();
        assert_eq!(v[0].id, "lc-weekly-contest-360");
        assert_eq!(v[0].duration, 5400);
    }

    #[test]
    fn non_array_payload_is_an_error() {
        let body = r#"{"error":"rate limited"}"#;
        assert!(KontestsProvider::parse_items_from_str(Platform::Leetcode, body).is_err());
    }
}
