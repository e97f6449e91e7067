use anyhow::Result;
use std::env;

use crate::commands::CommandReport;
use crate::news::config::{load_config, resolve_config_path};
use crate::news::paths::resolve_paths;

include!(concat!(env!("OUT_DIR"), "/news_env_allowlist.rs"));

fn env_overrides_set() -> Vec<&'static str> {
    GENERATED_NEWS_ENV_ALLOWLIST
        .iter()
        .copied()
        .filter(|key| env::var_os(key).is_some_and(|v| !v.is_empty()))
        .collect()
}

pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let mut report = CommandReport::new("status");

    report.detail(format!("build_uuid={}", env!("BUILD_UUID")));
    report.detail(format!("news_home={}", paths.news_home.display()));
    report.detail(format!("feed_file={}", paths.feed_file.display()));
    report.detail(format!("registry_file={}", paths.registry_file.display()));
    report.detail(format!("feed_out_file={}", paths.feed_out_file.display()));
    report.detail(format!("summary_file={}", paths.summary_file.display()));
    report.detail(format!("logs_dir={}", paths.logs_dir.display()));

    let config_path = resolve_config_path(&paths);
    report.detail(format!(
        "config_file={} ({})",
        config_path.display(),
        if config_path.exists() { "present" } else { "absent" }
    ));
    report.detail(format!("env.overrides={}", env_overrides_set().join(",")));

    match load_config(&paths) {
        Ok(cfg) => {
            report.detail(format!("feed.id_column={}", cfg.feed.id_column));
            report.detail(format!("feed.processed_marker={}", cfg.feed.processed_marker));
            report.detail(format!("feed.timestamp_format={}", cfg.feed.timestamp_format));
            report.detail(format!("messages.icon={}", cfg.messages.icon));
            report.detail(format!(
                "messages.max_description_chars={}",
                cfg.messages.max_description_chars
            ));
        }
        Err(err) => report.issue(format!("config invalid: {err:#}")),
    }

    if !paths.feed_file.exists() {
        report.issue(format!("missing feed file ({})", paths.feed_file.display()));
    }
    if !paths.registry_file.exists() {
        report.detail("registry=absent (first run starts empty)");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::GENERATED_NEWS_ENV_ALLOWLIST;

    #[test]
    fn allowlist_covers_path_and_config_keys() {
        for key in ["NEWS_HOME", "NEWS_FEED_FILE", "NEWS_REGISTRY_FILE", "NEWS_ID_COLUMN"] {
            assert!(GENERATED_NEWS_ENV_ALLOWLIST.contains(&key), "{key} missing");
        }
        // The stderr warning tag only appears inside a longer format string.
        assert!(!GENERATED_NEWS_ENV_ALLOWLIST.contains(&concat!("NEWS_", "WARN")));
        assert!(
            GENERATED_NEWS_ENV_ALLOWLIST
                .iter()
                .all(|key| key.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_'))
        );
    }
}
