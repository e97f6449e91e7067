use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct NewsPaths {
    pub news_home: PathBuf,
    pub feed_file: PathBuf,
    pub registry_file: PathBuf,
    pub feed_out_file: PathBuf,
    pub summary_file: PathBuf,
    pub logs_dir: PathBuf,
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

pub fn resolve_paths() -> Result<NewsPaths> {
    let cwd = env::current_dir().context("current directory could not be resolved")?;
    let news_home = env_or_default_path("NEWS_HOME", cwd);

    let feed_file = env_or_default_path("NEWS_FEED_FILE", news_home.join("SDW2023.csv"));
    let registry_file =
        env_or_default_path("NEWS_REGISTRY_FILE", news_home.join("registry.json"));
    let feed_out_file = env_or_default_path(
        "NEWS_FEED_OUT_FILE",
        news_home.join("SDW2023_processed.csv"),
    );
    let summary_file = env_or_default_path(
        "NEWS_SUMMARY_FILE",
        news_home.join("processing_summary.csv"),
    );
    let logs_dir = env_or_default_path("NEWS_LOGS_DIR", news_home.join("logs"));

    Ok(NewsPaths {
        news_home,
        feed_file,
        registry_file,
        feed_out_file,
        summary_file,
        logs_dir,
    })
}

#[cfg(test)]
pub fn test_paths(root: &std::path::Path) -> NewsPaths {
    NewsPaths {
        news_home: root.to_path_buf(),
        feed_file: root.join("feed.csv"),
        registry_file: root.join("registry.json"),
        feed_out_file: root.join("feed_processed.csv"),
        summary_file: root.join("summary.csv"),
        logs_dir: root.join("logs"),
    }
}
