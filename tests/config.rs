// tests/config.rs
use contest_tracker::config::app::{AppConfig, ENV_CONFIG_PATH, ENV_YOUTUBE_API_KEY};
use contest_tracker::contest::Platform;
use std::{env, fs};

#[test]
fn loads_toml_and_json_files() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("contest_tracker.toml");
    fs::write(
        &p_toml,
        r#"
refresh_interval_secs = 300
data_dir = "state"

[providers]
codeforces_url = "http://localhost:9000/cf"
"#,
    )
    .unwrap();
    let cfg = AppConfig::load_from(&p_toml).unwrap();
    assert_eq!(cfg.refresh_interval_secs, 300);
    assert_eq!(cfg.providers.url_for(Platform::Codeforces), "http://localhost:9000/cf");
    assert_eq!(
        cfg.providers.url_for(Platform::Leetcode),
        "https://kontests.net/api/v1/leet_code"
    );

    let p_json = dir.path().join("contest_tracker.json");
    fs::write(&p_json, r#"{"youtube":{"max_results":10}}"#).unwrap();
    let cfg = AppConfig::load_from(&p_json).unwrap();
    assert_eq!(cfg.youtube.max_results, 10);
    assert_eq!(cfg.refresh_interval_secs, 900);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("broken.toml");
    fs::write(&p, "refresh_interval_secs = \"soon\"").unwrap();
    assert!(AppConfig::load_from(&p).is_err());
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not read
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var(ENV_CONFIG_PATH);

    // 1) Nothing on disk -> defaults
    let cfg = AppConfig::load_default().unwrap();
    assert_eq!(cfg.refresh_interval_secs, 900);

    // 2) Fallback TOML in ./config/
    fs::create_dir_all(tmp.path().join("config")).unwrap();
    fs::write(
        tmp.path().join("config/contest_tracker.toml"),
        "refresh_interval_secs = 120",
    )
    .unwrap();
    assert_eq!(AppConfig::load_default().unwrap().refresh_interval_secs, 120);

    // 3) Env wins
    let p_env = tmp.path().join("elsewhere.json");
    fs::write(&p_env, r#"{"refresh_interval_secs": 60}"#).unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    assert_eq!(AppConfig::load_default().unwrap().refresh_interval_secs, 60);

    // 4) Env pointing nowhere is an error
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(AppConfig::load_default().is_err());
    env::remove_var(ENV_CONFIG_PATH);

    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn env_api_key_is_resolved() {
    let cfg = AppConfig::default();
    env::set_var(ENV_YOUTUBE_API_KEY, "k-123");
    assert_eq!(cfg.youtube.resolved_api_key().as_deref(), Some("k-123"));
    env::remove_var(ENV_YOUTUBE_API_KEY);
    assert!(cfg.youtube.resolved_api_key().is_none());
}
