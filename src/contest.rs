//! # Contest model
//!
//! The common shape every platform adapter normalizes into.
//!
//! - `Platform` is the closed set of supported contest sources.
//! - `Contest` is built only through [`Contest::new`], which derives
//!   `duration` from the two timestamps so `duration == end - start` holds
//!   for every contest regardless of what the provider reported.
//! - `solution_link` is never filled by adapters; it is resolved at read
//!   time from the solution link store.

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported contest platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Codeforces,
    Codechef,
    Leetcode,
}

impl Platform {
    /// Declaration order; aggregation concatenates results in this order.
    pub const ALL: [Platform; 3] = [Platform::Codeforces, Platform::Codechef, Platform::Leetcode];

    /// Lowercase identifier, as used in ids, query strings and config keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Codeforces => "codeforces",
            Platform::Codechef => "codechef",
            Platform::Leetcode => "leetcode",
        }
    }

    /// Identifier with the first letter capitalized ("Codeforces", "Codechef", "Leetcode").
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Codeforces => "Codeforces",
            Platform::Codechef => "Codechef",
            Platform::Leetcode => "Leetcode",
        }
    }

    /// Namespace prefix for contest ids; keeps ids from different providers disjoint.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Platform::Codeforces => "cf",
            Platform::Codechef => "cc",
            Platform::Leetcode => "lc",
        }
    }

    /// `<prefix>-<native>`.
    pub fn contest_id(self, native: &str) -> String {
        format!("{}-{}", self.id_prefix(), native)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "codeforces" => Ok(Platform::Codeforces),
            "codechef" => Ok(Platform::Codechef),
            "leetcode" => Ok(Platform::Leetcode),
            other => anyhow::bail!("unknown platform: {other}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    pub id: String,
    pub name: String,
    pub platform: Platform,
    pub url: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Seconds, always `end_time - start_time`.
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_link: Option<String>,
}

impl Contest {
    /// Build a contest, recomputing `duration` from the timestamps.
    pub fn new(
        id: String,
        name: String,
        platform: Platform,
        url: String,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        let duration = (end_time - start_time).num_seconds();
        Self {
            id,
            name,
            platform,
            url,
            start_time,
            end_time,
            duration,
            solution_link: None,
        }
    }

    /// Copy of this contest carrying a resolved solution link.
    pub fn with_solution_link(&self, link: Option<String>) -> Self {
        Self {
            solution_link: link,
            ..self.clone()
        }
    }
}

/// Lowercase and replace every whitespace run with a single hyphen.
///
/// Differently spaced or cased names can map to the same slug; callers
/// building ids from slugs inherit that collision risk.
pub fn slugify(name: &str) -> String {
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));
    re.replace_all(name, "-").to_lowercase()
}

/// Decode HTML entities, trim, and collapse internal whitespace.
pub fn normalize_name(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
