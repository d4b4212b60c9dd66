// src/config/app.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use crate::contest::Platform;

pub const ENV_CONFIG_PATH: &str = "CONTEST_TRACKER_CONFIG";
pub const ENV_YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";
pub const DEFAULT_TOML_PATH: &str = "config/contest_tracker.toml";
pub const DEFAULT_JSON_PATH: &str = "config/contest_tracker.json";

fn default_refresh_interval_secs() -> u64 {
    15 * 60
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_codeforces_url() -> String {
    "https://codeforces.com/api/contest.list".to_string()
}
fn default_codechef_url() -> String {
    "https://kontests.net/api/v1/code_chef".to_string()
}
fn default_leetcode_url() -> String {
    "https://kontests.net/api/v1/leet_code".to_string()
}
fn default_youtube_api_base() -> String {
    "https://www.googleapis.com/youtube/v3/playlistItems".to_string()
}
fn default_api_key() -> String {
    "ENV".to_string()
}
fn default_max_results() -> u32 {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Seconds between scheduled re-aggregations (default fifteen minutes).
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Directory holding the persisted bookmark and solution documents.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Per-request timeout for outbound HTTP. Absent means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub providers: ProviderUrls,
    #[serde(default)]
    pub youtube: YoutubeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderUrls {
    #[serde(default = "default_codeforces_url")]
    pub codeforces_url: String,
    #[serde(default = "default_codechef_url")]
    pub codechef_url: String,
    #[serde(default = "default_leetcode_url")]
    pub leetcode_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeConfig {
    #[serde(default = "default_youtube_api_base")]
    pub api_base: String,
    /// "ENV" means: read from YOUTUBE_API_KEY.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default)]
    pub playlists: PlaylistMap,
}

/// Fixed platform → solution playlist mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistMap {
    pub codeforces: String,
    pub codechef: String,
    pub leetcode: String,
}

impl Default for PlaylistMap {
    fn default() -> Self {
        Self {
            codeforces: "PLcXpkI9A-RZLUfBSNp-YQBCOezZKbDSgB".to_string(),
            codechef: "PLcXpkI9A-RZIZ6lsE0KCcLWeKNoG45fYr".to_string(),
            leetcode: "PLcXpkI9A-RZI6FhydNz3JBt-pi25Cbr".to_string(),
        }
    }
}

impl PlaylistMap {
    pub fn playlist_for(&self, platform: Platform) -> &str {
        match platform {
            Platform::Codeforces => &self.codeforces,
            Platform::Codechef => &self.codechef,
            Platform::Leetcode => &self.leetcode,
        }
    }
}

impl Default for ProviderUrls {
    fn default() -> Self {
        Self {
            codeforces_url: default_codeforces_url(),
            codechef_url: default_codechef_url(),
            leetcode_url: default_leetcode_url(),
        }
    }
}

impl ProviderUrls {
    pub fn url_for(&self, platform: Platform) -> &str {
        match platform {
            Platform::Codeforces => &self.codeforces_url,
            Platform::Codechef => &self.codechef_url,
            Platform::Leetcode => &self.leetcode_url,
        }
    }
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_base: default_youtube_api_base(),
            api_key: default_api_key(),
            max_results: default_max_results(),
            playlists: PlaylistMap::default(),
        }
    }
}

impl YoutubeConfig {
    /// Effective API key: the literal value, or `$YOUTUBE_API_KEY` when the
    /// configured value is "ENV". `None` when neither yields a key.
    pub fn resolved_api_key(&self) -> Option<String> {
        let raw = self.api_key.trim();
        let key = if raw.eq_ignore_ascii_case("env") {
            env::var(ENV_YOUTUBE_API_KEY).ok()?
        } else {
            raw.to_string()
        };
        let key = key.trim().to_string();
        (!key.is_empty()).then_some(key)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            data_dir: default_data_dir(),
            request_timeout_secs: None,
            providers: ProviderUrls::default(),
            youtube: YoutubeConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load config using env var + fallbacks:
    /// 1) $CONTEST_TRACKER_CONFIG
    /// 2) config/contest_tracker.toml
    /// 3) config/contest_tracker.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            } else {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
        }
        let toml_p = PathBuf::from(DEFAULT_TOML_PATH);
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        let json_p = PathBuf::from(DEFAULT_JSON_PATH);
        if json_p.exists() {
            return Self::load_from(&json_p);
        }
        Ok(Self::default())
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<AppConfig> {
    let looks_json = s.trim_start().starts_with('{');
    if hint_ext == "json" || (hint_ext != "toml" && looks_json) {
        return serde_json::from_str(s).context("invalid JSON config");
    }
    toml::from_str(s).context("invalid TOML config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = parse_config("", "toml").unwrap();
        assert_eq!(cfg.refresh_interval_secs, 900);
        assert_eq!(cfg.youtube.max_results, 50);
        assert!(cfg.request_timeout().is_none());
        assert_eq!(cfg.youtube.playlists, PlaylistMap::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let toml = r#"
refresh_interval_secs = 60
request_timeout_secs = 10

[youtube.playlists]
codeforces = "A"
codechef = "B"
leetcode = "C"
"#;
        let cfg = parse_config(toml, "toml").unwrap();
        assert_eq!(cfg.refresh_interval_secs, 60);
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(cfg.youtube.playlists.playlist_for(Platform::Codechef), "B");
        assert_eq!(
            cfg.providers.url_for(Platform::Codeforces),
            "https://codeforces.com/api/contest.list"
        );
    }

    #[test]
    fn json_is_sniffed_without_extension() {
        let cfg = parse_config(r#"{"data_dir":"/tmp/ct"}"#, "").unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/ct"));
    }

    #[test]
    fn literal_api_key_is_used_as_is() {
        let yt = YoutubeConfig {
            api_key: " abc ".into(),
            ..YoutubeConfig::default()
        };
        assert_eq!(yt.resolved_api_key().as_deref(), Some("abc"));
    }
}
