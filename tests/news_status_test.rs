use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn status_reports_missing_feed_as_issue() {
    let tmp = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("sdw-news")
        .current_dir(tmp.path())
        .env("NEWS_HOME", tmp.path())
        .env_remove("NEWS_CONFIG_PATH")
        .env_remove("NEWS_FEED_FILE")
        .arg("status")
        .assert()
        .failure()
        .stdout(predicate::str::contains("issue: missing feed file"));
}

#[test]
fn status_lists_env_overrides_and_effective_config() {
    let tmp = tempdir().expect("tempdir");
    let feed = tmp.path().join("ids.csv");
    fs::write(&feed, "UserID\n1\n").expect("write feed");

    assert_cmd::cargo::cargo_bin_cmd!("sdw-news")
        .current_dir(tmp.path())
        .env("NEWS_HOME", tmp.path())
        .env("NEWS_FEED_FILE", &feed)
        .env("NEWS_PROCESSED_MARKER", "Done")
        .env_remove("NEWS_CONFIG_PATH")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("NEWS_FEED_FILE"))
        .stdout(predicate::str::contains("feed.processed_marker=Done"))
        .stdout(predicate::str::contains("config_file="));
}

#[test]
fn status_flags_invalid_config() {
    let tmp = tempdir().expect("tempdir");
    fs::write(tmp.path().join("SDW2023.csv"), "UserID\n1\n").expect("write feed");

    assert_cmd::cargo::cargo_bin_cmd!("sdw-news")
        .current_dir(tmp.path())
        .env("NEWS_HOME", tmp.path())
        .env("NEWS_MAX_DESCRIPTION_CHARS", "500")
        .env_remove("NEWS_CONFIG_PATH")
        .env_remove("NEWS_FEED_FILE")
        .arg("status")
        .assert()
        .failure()
        .stdout(predicate::str::contains("config invalid"));
}
