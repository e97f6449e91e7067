use crate::logging;
use crate::news::audit;
use crate::news::catalog::Catalog;
use crate::news::config::NewsConfig;
use crate::news::feed::read_feed;
use crate::news::merge::{self, MergeOutcome};
use crate::news::paths::NewsPaths;
use crate::news::reconcile::{IdentifierFailure, reconcile};
use crate::news::registry::{LoadStatus, RegistryStore};
use crate::news::selector::{CatalogSelector, MessageSource};
use crate::news::summary::{Summary, summarize};
use crate::news::util::local_timestamp;
use anyhow::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub registry_status: LoadStatus,
    pub registry_records_before: usize,
    pub merge: MergeOutcome,
    pub created: usize,
    pub failures: Vec<IdentifierFailure>,
    pub summary: Summary,
    pub timestamp: String,
    pub wrote_files: bool,
}

pub fn run(paths: &NewsPaths, cfg: &NewsConfig, opts: RunOptions) -> Result<RunOutcome> {
    let selector = CatalogSelector::new(Catalog::default(), cfg.messages.max_description_chars);
    run_with_source(paths, cfg, opts, &selector)
}

/// One full batch: read feed, load registry, reconcile, merge, summarize.
/// Only feed-read and file-write failures abort the run.
pub fn run_with_source<S: MessageSource + ?Sized>(
    paths: &NewsPaths,
    cfg: &NewsConfig,
    opts: RunOptions,
    source: &S,
) -> Result<RunOutcome> {
    let feed = read_feed(&paths.feed_file, &cfg.feed.id_column)?;
    let identifiers = feed.identifiers();
    let ids_display: Vec<String> = identifiers
        .iter()
        .map(|i| i.id.as_ref().map(|id| id.canonical()).unwrap_or_default())
        .collect();
    logging::progress(format!("IDs found in feed: [{}]", ids_display.join(", ")));

    let store = RegistryStore::new(&paths.registry_file);
    let loaded = store.load();
    match &loaded.status {
        LoadStatus::Loaded => {}
        LoadStatus::Missing => {
            logging::progress("Registry file not found. Starting with an empty registry.")
        }
        LoadStatus::Malformed(_) => {
            logging::progress("Registry file unreadable. Starting with an empty registry.")
        }
    }
    let mut registry = loaded.registry;
    let registry_records_before = registry.len();

    let reconciled = reconcile(&registry, &identifiers, source, &cfg.messages.icon);
    let timestamp = local_timestamp(&cfg.feed.timestamp_format);

    let merge = if opts.dry_run {
        merge::apply(&mut registry, &reconciled.processed)
    } else {
        audit::record(
            paths,
            "registry-load",
            loaded.status.as_str(),
            &format!("path={} records={registry_records_before}", paths.registry_file.display()),
        );
        let merged = merge::merge_and_save(&store, &mut registry, &reconciled.processed)?;
        audit::record(
            paths,
            "merge",
            if reconciled.failures.is_empty() { "ok" } else { "degraded" },
            &format!(
                "updated={} inserted={} failed={} total={}",
                merged.updated,
                merged.inserted,
                reconciled.failures.len(),
                merged.total_records
            ),
        );
        feed.write_annotated(&paths.feed_out_file, &cfg.feed.processed_marker, &timestamp)?;
        merged
    };

    let summary = summarize(identifiers.len(), &reconciled.processed);
    if !opts.dry_run {
        summary.write_csv(&paths.summary_file)?;
        audit::record(
            paths,
            "summary",
            "ok",
            &format!(
                "input={} processed={} synthesized={}",
                summary.total_input, summary.processed, summary.synthesized
            ),
        );
    }

    Ok(RunOutcome {
        registry_status: loaded.status,
        registry_records_before,
        merge,
        created: reconciled.created.len(),
        failures: reconciled.failures,
        summary,
        timestamp,
        wrote_files: !opts.dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnnotateError;
    use crate::news::paths::test_paths;
    use crate::news::record::UserId;
    use std::fs;
    use tempfile::tempdir;

    struct RejectText;

    impl MessageSource for RejectText {
        fn describe(&self, id: Option<&UserId>, name: &str) -> Result<String, AnnotateError> {
            match id {
                Some(UserId::Text(_)) => Err(AnnotateError::Selection("text ids rejected".into())),
                _ => CatalogSelector::default().describe(id, name),
            }
        }
    }

    #[test]
    fn full_run_writes_registry_feed_copy_and_summary() {
        let tmp = tempdir().expect("tempdir");
        let paths = test_paths(tmp.path());
        fs::write(&paths.feed_file, "UserID\n1\n2\n").expect("write feed");

        let outcome = run(&paths, &NewsConfig::default(), RunOptions::default()).expect("run");

        assert_eq!(outcome.registry_status, LoadStatus::Missing);
        assert_eq!(outcome.created, 2);
        assert_eq!(outcome.summary.processed, 2);
        assert!(paths.registry_file.exists());
        assert!(paths.feed_out_file.exists());
        assert!(paths.summary_file.exists());
        assert!(paths.logs_dir.join("audit.log").exists());

        let registry = RegistryStore::new(&paths.registry_file).load().registry;
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get(&UserId::Int(2)).and_then(|r| r.name.as_deref()),
            Some("User_2")
        );
    }

    #[test]
    fn dry_run_writes_nothing() {
        let tmp = tempdir().expect("tempdir");
        let paths = test_paths(tmp.path());
        fs::write(&paths.feed_file, "UserID\n1\n").expect("write feed");

        let outcome = run(
            &paths,
            &NewsConfig::default(),
            RunOptions { dry_run: true },
        )
        .expect("run");

        assert!(!outcome.wrote_files);
        assert_eq!(outcome.merge.inserted, 1);
        assert!(!paths.registry_file.exists());
        assert!(!paths.feed_out_file.exists());
        assert!(!paths.summary_file.exists());
        assert!(!paths.logs_dir.exists());
    }

    #[test]
    fn malformed_registry_does_not_abort_run() {
        let tmp = tempdir().expect("tempdir");
        let paths = test_paths(tmp.path());
        fs::write(&paths.feed_file, "UserID\n1\n").expect("write feed");
        fs::write(&paths.registry_file, "[{").expect("write registry");

        let outcome = run(&paths, &NewsConfig::default(), RunOptions::default()).expect("run");
        assert!(matches!(outcome.registry_status, LoadStatus::Malformed(_)));
        assert_eq!(outcome.summary.processed, 1);
    }

    #[test]
    fn loosely_typed_registry_keeps_every_user() {
        let tmp = tempdir().expect("tempdir");
        let paths = test_paths(tmp.path());
        fs::write(&paths.feed_file, "UserID\n3\n").expect("write feed");
        fs::write(
            &paths.registry_file,
            r#"[
                {"id": 1, "name": "Alice", "news": [{"description": "hi"}]},
                {"id": 2, "name": "Bob", "news": null},
                {"id": 18446744073709551615, "name": "Big", "news": []}
            ]"#,
        )
        .expect("write registry");

        let outcome = run(&paths, &NewsConfig::default(), RunOptions::default()).expect("run");
        assert_eq!(outcome.registry_status, LoadStatus::Loaded);
        assert_eq!(outcome.merge.total_records, 4);

        let registry = RegistryStore::new(&paths.registry_file).load().registry;
        assert_eq!(registry.len(), 4);
        let bob = registry.get(&UserId::Int(2)).expect("bob kept");
        assert_eq!(bob.name.as_deref(), Some("Bob"));
        let alice = registry.get(&UserId::Int(1)).expect("alice kept");
        assert_eq!(alice.news[0].description, "hi");
        assert!(registry.get(&UserId::UInt(u64::MAX)).is_some());
        assert!(registry.get(&UserId::Int(3)).is_some());
    }

    #[test]
    fn failing_identifier_is_absent_from_summary() {
        let tmp = tempdir().expect("tempdir");
        let paths = test_paths(tmp.path());
        fs::write(&paths.feed_file, "UserID\n1\nbad\n3\n").expect("write feed");

        let outcome = run_with_source(
            &paths,
            &NewsConfig::default(),
            RunOptions::default(),
            &RejectText,
        )
        .expect("run");

        let ids: Vec<_> = outcome.summary.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
        assert_eq!(outcome.summary.failed, 1);
        assert_eq!(outcome.failures.len(), 1);

        let registry = RegistryStore::new(&paths.registry_file).load().registry;
        assert!(registry.get(&UserId::Text("bad".to_string())).is_none());
    }

    #[test]
    fn missing_feed_is_fatal() {
        let tmp = tempdir().expect("tempdir");
        let paths = test_paths(tmp.path());
        assert!(run(&paths, &NewsConfig::default(), RunOptions::default()).is_err());
        assert!(!paths.registry_file.exists());
    }
}
