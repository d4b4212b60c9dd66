// tests/solutions.rs
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use contest_tracker::contest::{Contest, Platform};
use contest_tracker::store::solutions::{SolutionLinkError, SolutionLinkForm, SolutionLinkStore};
use contest_tracker::store::{FileBackend, MemoryBackend, StorageBackend};

fn store() -> SolutionLinkStore {
    SolutionLinkStore::new(Arc::new(MemoryBackend::new()))
}

#[test]
fn set_then_get_returns_exact_url_and_second_set_overwrites() {
    let s = store();
    s.set("cf-1873", "https://www.youtube.com/watch?v=first").unwrap();
    assert_eq!(
        s.get("cf-1873").as_deref(),
        Some("https://www.youtube.com/watch?v=first")
    );
    s.set("cf-1873", "https://youtu.be/second").unwrap();
    assert_eq!(s.get("cf-1873").as_deref(), Some("https://youtu.be/second"));
    assert_eq!(s.all().len(), 1);
}

#[test]
fn unknown_id_has_no_link() {
    assert!(store().get("cc-nothing").is_none());
}

#[test]
fn resolve_attaches_links_without_touching_the_input() {
    let s = store();
    s.set("cf-1", "https://youtu.be/one").unwrap();
    let start = Utc.with_ymd_and_hms(2023, 9, 1, 0, 0, 0).unwrap();
    let contests = vec![
        Contest::new("cf-1".into(), "A".into(), Platform::Codeforces, String::new(), start, start),
        Contest::new("cf-2".into(), "B".into(), Platform::Codeforces, String::new(), start, start),
    ];
    let resolved = s.resolve_all(&contests);
    assert_eq!(resolved[0].solution_link.as_deref(), Some("https://youtu.be/one"));
    assert!(resolved[1].solution_link.is_none());
    assert!(contests[0].solution_link.is_none());
    assert_eq!(s.resolve(&contests[0]), resolved[0]);
}

#[test]
fn submit_validates_before_writing() {
    let s = store();
    let bad = SolutionLinkForm {
        contest_id: "cf-1".into(),
        solution_url: "not a url".into(),
    };
    assert!(matches!(s.submit(&bad), Err(SolutionLinkError::InvalidUrl)));
    assert!(s.get("cf-1").is_none());

    let good = SolutionLinkForm {
        contest_id: "cf-1".into(),
        solution_url: " https://youtu.be/abc ".into(),
    };
    s.submit(&good).unwrap();
    assert_eq!(s.get("cf-1").as_deref(), Some("https://youtu.be/abc"));
}

#[test]
fn links_persist_in_the_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    SolutionLinkStore::new(Arc::new(FileBackend::new(dir.path())))
        .set("lc-weekly-contest-360", "https://youtu.be/lc")
        .unwrap();
    let again = SolutionLinkStore::new(Arc::new(FileBackend::new(dir.path())));
    assert_eq!(
        again.get("lc-weekly-contest-360").as_deref(),
        Some("https://youtu.be/lc")
    );
}

struct UnreadableBackend;

impl StorageBackend for UnreadableBackend {
    fn load(&self, _key: &str) -> anyhow::Result<Option<String>> {
        anyhow::bail!("permission denied")
    }
    fn save(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        panic!("must not write after a failed read")
    }
}

#[test]
fn failed_read_blocks_set_and_submit() {
    let s = SolutionLinkStore::new(Arc::new(UnreadableBackend));
    assert!(s.set("cf-1", "https://youtu.be/x").is_err());
    assert!(s.try_get("cf-1").is_err());
    assert!(s.get("cf-1").is_none());
    let err = s
        .submit(&SolutionLinkForm {
            contest_id: "cf-1".into(),
            solution_url: "https://youtu.be/x".into(),
        })
        .unwrap_err();
    assert!(!err.is_validation());
}
