//! Title matching between contests and solution videos.
//!
//! A video qualifies when its title contains, case-insensitively, both the
//! contest name and the platform's display name. The first qualifying video
//! in input order wins; there is no scoring. Expect misses when a title
//! abbreviates the contest ("CF Round 900") and occasional false hits when
//! an unrelated title happens to contain both strings.

use crate::contest::Platform;
use crate::video::VideoCandidate;

pub fn title_matches(title: &str, contest_name: &str, platform: Platform) -> bool {
    let title = title.to_lowercase();
    title.contains(&contest_name.to_lowercase())
        && title.contains(&platform.display_name().to_lowercase())
}

pub fn find_matching_video<'a>(
    contest_name: &str,
    platform: Platform,
    candidates: &'a [VideoCandidate],
) -> Option<&'a VideoCandidate> {
    candidates
        .iter()
        .find(|v| title_matches(&v.title, contest_name, platform))
}
