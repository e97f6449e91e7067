use crate::error::NewsError;
use crate::news::paths::NewsPaths;
use anyhow::Result;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ICON: &str =
    "https://digitalinnovationone.github.io/santander-dev-week-2023-api/icons/credit.svg";
pub const DESCRIPTION_CHAR_LIMIT: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub id_column: String,
    pub processed_marker: String,
    pub timestamp_format: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            id_column: "UserID".to_string(),
            processed_marker: "Yes".to_string(),
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    pub icon: String,
    pub max_description_chars: usize,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            icon: DEFAULT_ICON.to_string(),
            max_description_chars: DESCRIPTION_CHAR_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewsConfig {
    pub feed: FeedConfig,
    pub messages: MessageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialNewsConfig {
    feed: Option<FeedConfig>,
    messages: Option<MessageConfig>,
}

fn env_or_usize(var: &str, fallback: usize) -> usize {
    match env::var(var) {
        Ok(v) => v.trim().parse::<usize>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn timestamp_format_is_valid(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

fn validate(cfg: &NewsConfig) -> Result<()> {
    if cfg.feed.id_column.trim().is_empty() {
        return Err(NewsError::InvalidConfig("feed id column cannot be empty".into()).into());
    }
    if cfg.feed.processed_marker.is_empty() {
        return Err(NewsError::InvalidConfig("processed marker cannot be empty".into()).into());
    }
    if !timestamp_format_is_valid(&cfg.feed.timestamp_format) {
        return Err(NewsError::InvalidConfig(format!(
            "invalid timestamp format `{}`",
            cfg.feed.timestamp_format
        ))
        .into());
    }
    if cfg.messages.icon.trim().is_empty() {
        return Err(NewsError::InvalidConfig("message icon cannot be empty".into()).into());
    }
    let max = cfg.messages.max_description_chars;
    if max == 0 || max > DESCRIPTION_CHAR_LIMIT {
        return Err(NewsError::InvalidConfig(format!(
            "invalid max description chars {max}: require 1..={DESCRIPTION_CHAR_LIMIT}"
        ))
        .into());
    }
    Ok(())
}

pub fn resolve_config_path(paths: &NewsPaths) -> PathBuf {
    if let Ok(custom) = env::var("NEWS_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    paths.news_home.join("news.toml")
}

fn merge_file_config(base: &mut NewsConfig, raw: &str, path: &Path) -> Result<()> {
    let parsed: PartialNewsConfig = toml::from_str(raw).map_err(|err| {
        NewsError::InvalidConfig(format!("failed to parse {}: {err}", path.display()))
    })?;
    if let Some(feed) = parsed.feed {
        base.feed = feed;
    }
    if let Some(messages) = parsed.messages {
        base.messages = messages;
    }
    Ok(())
}

fn apply_env_overrides(cfg: &mut NewsConfig) {
    cfg.feed.id_column = env_or_string("NEWS_ID_COLUMN", &cfg.feed.id_column);
    cfg.feed.processed_marker =
        env_or_string("NEWS_PROCESSED_MARKER", &cfg.feed.processed_marker);
    cfg.feed.timestamp_format =
        env_or_string("NEWS_TIMESTAMP_FORMAT", &cfg.feed.timestamp_format);
    cfg.messages.icon = env_or_string("NEWS_ICON_URL", &cfg.messages.icon);
    cfg.messages.max_description_chars = env_or_usize(
        "NEWS_MAX_DESCRIPTION_CHARS",
        cfg.messages.max_description_chars,
    );
}

pub fn load_config(paths: &NewsPaths) -> Result<NewsConfig> {
    let mut cfg = NewsConfig::default();

    let path = resolve_config_path(paths);
    if path.exists() {
        let raw = fs::read_to_string(&path).map_err(|err| {
            NewsError::InvalidConfig(format!("failed to read {}: {err}", path.display()))
        })?;
        merge_file_config(&mut cfg, &raw, &path)?;
    }

    apply_env_overrides(&mut cfg);
    validate(&cfg)?;
    Ok(cfg)
}
