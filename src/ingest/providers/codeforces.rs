use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::contest::{normalize_name, Contest, Platform};
use crate::ingest::providers::Mode;
use crate::ingest::types::ContestProvider;

#[derive(Debug, Deserialize)]
struct ContestList {
    status: String,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    result: Vec<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Item {
    id: u64,
    name: String,
    #[serde(default)]
    start_time_seconds: Option<i64>,
    duration_seconds: i64,
}

/// Codeforces `contest.list`: provider-native ids, start + duration.
pub struct CodeforcesProvider {
    mode: Mode,
}

impl CodeforcesProvider {
    pub fn from_fixture_str(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    pub fn from_url(url: &str, client: reqwest::Client) -> Self {
        Self {
            mode: Mode::Http {
                url: url.to_string(),
                client,
            },
        }
    }

    fn parse_items_from_str(s: &str) -> Result<Vec<Contest>> {
        let t0 = std::time::Instant::now();
        let list: ContestList = serde_json::from_str(s).context("parsing codeforces contest.list")?;
        if list.status != "OK" {
            bail!(
                "codeforces reported status {}: {}",
                list.status,
                list.comment.unwrap_or_default()
            );
        }

        let mut out = Vec::with_capacity(list.result.len());
        for it in list.result {
            let Some(start_secs) = it.start_time_seconds else {
                tracing::debug!(id = it.id, "codeforces contest without start time skipped");
                continue;
            };
            let Some(end_secs) = start_secs.checked_add(it.duration_seconds) else {
                tracing::debug!(id = it.id, "codeforces contest with out-of-range duration skipped");
                continue;
            };
            let (Some(start), Some(end)) = (
                DateTime::<Utc>::from_timestamp(start_secs, 0),
                DateTime::<Utc>::from_timestamp(end_secs, 0),
            ) else {
                tracing::debug!(id = it.id, "codeforces contest with unrepresentable times skipped");
                continue;
            };
            if end < start {
                tracing::debug!(id = it.id, "codeforces contest with negative duration skipped");
                continue;
            }
            out.push(Contest::new(
                Platform::Codeforces.contest_id(&it.id.to_string()),
                normalize_name(&it.name),
                Platform::Codeforces,
                format!("https://codeforces.com/contest/{}", it.id),
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
impl ContestProvider for CodeforcesProvider {
    async fn fetch_contests(&self) -> Result<Vec<Contest>> {
        let body = self.mode.body("codeforces").await?;
        Self::parse_items_from_str(&body)
    }

    fn platform(&self) -> Platform {
        Platform::Codeforces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_is_start_plus_duration() {
        let body = r#"{"status":"OK","result":[
            {"id":1900,"name":"Codeforces Round 900 (Div. 2)","type":"CF","phase":"FINISHED",
             "durationSeconds":7200,"startTimeSeconds":1700000000}
        ]}"#;
        let v = CodeforcesProvider::parse_items_from_str(body).unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].id, "cf-1900");
        assert_eq!(v[0].url, "https://codeforces.com/contest/1900");
        assert_eq!(v[0].duration, 7200);
        assert_eq!((v[0].end_time - v[0].start_time).num_seconds(), 7200);
    }

    #[test]
    fn failed_status_is_an_error() {
        let body = r#"{"status":"FAILED","comment":"Call limit exceeded"}"#;
        let err = CodeforcesProvider::parse_items_from_str(body).unwrap_err();
        assert!(format!("{err:#}").contains("Call limit exceeded"));
    }

    #[test]
    fn missing_start_time_is_skipped() {
        let body = r#"{"status":"OK","result":[
            {"id":1,"name":"Gym","durationSeconds":100},
            {"id":2,"name":"Round","durationSeconds":100,"startTimeSeconds":10}
        ]}"#;
        let v = CodeforcesProvider::parse_items_from_str(body).unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].id, "cf-2");
    }

    #[test]
    fn overflowing_duration_skips_only_that_contest() {
        let body = format!(
            r#"{{"status":"OK","result":[
                {{"id":1,"name":"Broken","startTimeSeconds":1695134100,"durationSeconds":{}}},
                {{"id":2,"name":"Round","startTimeSeconds":1695134100,"durationSeconds":8100}}
            ]}}"#,
            i64::MAX
        );
        let v = CodeforcesProvider::parse_items_from_str(&body).unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].id, "cf-2");
        assert_eq!(v[0].duration, 8100);
    }
}
