//! # Temporal classification
//!
//! Splits contests into upcoming / ongoing / past relative to a caller-given
//! `now`. Nothing here reads the clock, so the same inputs always classify
//! the same way.
//!
//! Boundary instants (`now == start` or `now == end`) are ongoing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::contest::{Contest, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalState {
    Upcoming,
    Ongoing,
    Past,
}

impl TemporalState {
    pub fn of(contest: &Contest, now: DateTime<Utc>) -> Self {
        if contest.start_time > now {
            TemporalState::Upcoming
        } else if contest.end_time < now {
            TemporalState::Past
        } else {
            TemporalState::Ongoing
        }
    }
}

/// Soonest start first.
pub fn sort_upcoming(contests: &mut [Contest]) {
    contests.sort_by_key(|c| c.start_time);
}

/// Most recent end first.
pub fn sort_past(contests: &mut [Contest]) {
    contests.sort_by(|a, b| b.end_time.cmp(&a.end_time));
}

/// Contests grouped by temporal state, each group in its display order.
/// `ongoing` keeps input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestBoard {
    pub upcoming: Vec<Contest>,
    pub ongoing: Vec<Contest>,
    pub past: Vec<Contest>,
}

impl ContestBoard {
    pub fn build(contests: impl IntoIterator<Item = Contest>, now: DateTime<Utc>) -> Self {
        let mut board = Self::default();
        for c in contests {
            match TemporalState::of(&c, now) {
                TemporalState::Upcoming => board.upcoming.push(c),
                TemporalState::Ongoing => board.ongoing.push(c),
                TemporalState::Past => board.past.push(c),
            }
        }
        sort_upcoming(&mut board.upcoming);
        sort_past(&mut board.past);
        board
    }

    pub fn len(&self) -> usize {
        self.upcoming.len() + self.ongoing.len() + self.past.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Past contests only, most recent first.
pub fn past_contests(contests: &[Contest], now: DateTime<Utc>) -> Vec<Contest> {
    let mut past: Vec<Contest> = contests
        .iter()
        .filter(|c| TemporalState::of(c, now) == TemporalState::Past)
        .cloned()
        .collect();
    sort_past(&mut past);
    past
}

/// Platform toggle + case-insensitive name search.
#[derive(Debug, Clone)]
pub struct ContestFilter {
    pub platforms: HashSet<Platform>,
    pub query: String,
}

impl Default for ContestFilter {
    fn default() -> Self {
        Self {
            platforms: Platform::ALL.into_iter().collect(),
            query: String::new(),
        }
    }
}

impl ContestFilter {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
        self.platforms = platforms.into_iter().collect();
        self
    }

    pub fn matches(&self, contest: &Contest) -> bool {
        self.platforms.contains(&contest.platform)
            && contest
                .name
                .to_lowercase()
                .contains(&self.query.to_lowercase())
    }

    pub fn apply(&self, contests: impl IntoIterator<Item = Contest>) -> Vec<Contest> {
        contests.into_iter().filter(|c| self.matches(c)).collect()
    }
}

/// Countdown to a start time; all zeros once it has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub total: i64,
}

pub fn time_remaining(target: DateTime<Utc>, now: DateTime<Utc>) -> TimeRemaining {
    let total = (target - now).num_seconds();
    if total <= 0 {
        return TimeRemaining::default();
    }
    TimeRemaining {
        days: total / 86_400,
        hours: (total % 86_400) / 3_600,
        minutes: (total % 3_600) / 60,
        seconds: total % 60,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn contest(id: &str, platform: Platform, start: i64, end: i64) -> Contest {
        Contest::new(id.into(), id.into(), platform, String::new(), at(start), at(end))
    }

    #[test]
    fn countdown_breaks_into_units() {
        let now = at(0);
        let target = now + Duration::seconds(86_400 + 2 * 3_600 + 3 * 60 + 4);
        let r = time_remaining(target, now);
        assert_eq!((r.days, r.hours, r.minutes, r.seconds), (1, 2, 3, 4));
        assert_eq!(r.total, 93_784);
    }

    #[test]
    fn countdown_is_zero_after_target() {
        assert_eq!(time_remaining(at(10), at(20)), TimeRemaining::default());
        assert_eq!(time_remaining(at(10), at(10)).total, 0);
    }

    #[test]
    fn filter_by_platform_and_query() {
        let f = ContestFilter::default()
            .with_platforms([Platform::Leetcode])
            .with_query("WEEKLY");
        assert!(f.matches(&contest("Weekly Contest 1", Platform::Leetcode, 0, 1)));
        assert!(!f.matches(&contest("Weekly Contest 1", Platform::Codechef, 0, 1)));
        // plain substring, so "Biweekly" matches too
        assert!(f.matches(&contest("Biweekly Contest 9", Platform::Leetcode, 0, 1)));
        assert!(!f.matches(&contest("Daily", Platform::Leetcode, 0, 1)));
    }

    #[test]
    fn empty_query_matches_everything() {
        let f = ContestFilter::default();
        assert!(f.matches(&contest("anything", Platform::Codeforces, 0, 1)));
    }
}
