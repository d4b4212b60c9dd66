// tests/providers_codeforces.rs
use contest_tracker::contest::Platform;
use contest_tracker::ingest::providers::codeforces::CodeforcesProvider;
use contest_tracker::ingest::types::{fetch_contained, ContestProvider};

const FIXTURE: &str = include_str!("fixtures/codeforces_contest_list.json");

#[tokio::test]
async fn fixture_parses_into_prefixed_contests() {
    let provider = CodeforcesProvider::from_fixture_str(FIXTURE);
    let contests = provider.fetch_contests().await.expect("codeforces parse ok");

    // the entry without startTimeSeconds is dropped
    assert_eq!(contests.len(), 3);
    assert!(contests.iter().all(|c| c.platform == Platform::Codeforces));
    assert!(contests.iter().all(|c| c.id.starts_with("cf-")));

    let r900 = contests.iter().find(|c| c.id == "cf-1873").unwrap();
    assert_eq!(r900.name, "Codeforces Round 900 (Div. 3)");
    assert_eq!(r900.url, "https://codeforces.com/contest/1873");
    assert_eq!(r900.start_time.timestamp(), 1_695_134_100);
    assert_eq!(r900.end_time.timestamp(), 1_695_134_100 + 8_100);
}

#[tokio::test]
async fn duration_always_equals_end_minus_start() {
    let provider = CodeforcesProvider::from_fixture_str(FIXTURE);
    for c in provider.fetch_contests().await.unwrap() {
        assert_eq!(c.duration, (c.end_time - c.start_time).num_seconds(), "{}", c.id);
    }
}

#[tokio::test]
async fn provider_reported_failure_degrades_to_empty_with_reason() {
    let provider =
        CodeforcesProvider::from_fixture_str(r#"{"status":"FAILED","comment":"contestId: not found"}"#);
    let outcome = fetch_contained(&provider).await;
    assert!(outcome.items.is_empty());
    assert!(outcome.failure.unwrap().contains("FAILED"));
}

#[tokio::test]
async fn schema_drift_degrades_to_empty() {
    let provider = CodeforcesProvider::from_fixture_str("<html>maintenance</html>");
    let outcome = fetch_contained(&provider).await;
    assert!(outcome.is_failure());
    assert!(outcome.into_items().is_empty());
}
