use anyhow::Result;

use crate::commands::CommandReport;
use crate::logging;
use crate::news::config::load_config;
use crate::news::paths::resolve_paths;
use crate::news::pipeline::{self, RunOptions, RunOutcome};
use crate::news::registry::LoadStatus;

#[derive(Debug, Clone, Default)]
pub struct NewsRunOptions {
    pub dry_run: bool,
}

fn print_summary(outcome: &RunOutcome) {
    let summary = &outcome.summary;
    logging::progress("");
    logging::rule(60);
    logging::progress("PROCESSING SUMMARY");
    logging::rule(60);
    logging::progress(format!("Total IDs in feed: {}", summary.total_input));
    logging::progress(format!("Users processed: {}", summary.processed));
    logging::progress(format!("New users created: {}", summary.synthesized));
    logging::progress("");
    logging::progress("Details:");
    for line in summary.render_table() {
        logging::progress(line);
    }
}

pub fn run(opts: &NewsRunOptions) -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let cfg = load_config(&paths)?;
    let mut report = CommandReport::new("run");

    report.detail(format!("feed_file={}", paths.feed_file.display()));
    report.detail(format!("registry_file={}", paths.registry_file.display()));
    if opts.dry_run {
        report.detail("dry-run: no files will be written");
    }

    let outcome = pipeline::run(
        &paths,
        &cfg,
        RunOptions {
            dry_run: opts.dry_run,
        },
    )?;
    print_summary(&outcome);

    report.detail(format!("registry.status={}", outcome.registry_status.as_str()));
    if let LoadStatus::Malformed(reason) = &outcome.registry_status {
        report.detail(format!("registry.malformed_reason={reason}"));
    }
    report.detail(format!(
        "registry.records_before={}",
        outcome.registry_records_before
    ));
    report.detail(format!("registry.records_after={}", outcome.merge.total_records));
    report.detail(format!("registry.distinct_ids={}", outcome.merge.distinct_ids));
    report.detail(format!("merge.updated={}", outcome.merge.updated));
    report.detail(format!("merge.inserted={}", outcome.merge.inserted));
    if outcome.merge.collapsed > 0 {
        report.detail(format!("merge.collapsed_duplicates={}", outcome.merge.collapsed));
    }
    report.detail(format!("summary.total_input={}", outcome.summary.total_input));
    report.detail(format!("summary.processed={}", outcome.summary.processed));
    report.detail(format!("summary.failed={}", outcome.summary.failed));
    report.detail(format!("summary.synthesized={}", outcome.summary.synthesized));
    report.detail(format!("created={}", outcome.created));
    report.detail(format!("timestamp={}", outcome.timestamp));
    for failure in &outcome.failures {
        let id = failure
            .id
            .as_ref()
            .map(|id| id.canonical())
            .unwrap_or_default();
        report.detail(format!(
            "skipped.row={} id={id} reason={}",
            failure.row, failure.error
        ));
    }

    if outcome.wrote_files {
        report.detail(format!("wrote.registry={}", paths.registry_file.display()));
        report.detail(format!("wrote.feed_copy={}", paths.feed_out_file.display()));
        report.detail(format!("wrote.summary={}", paths.summary_file.display()));
    }

    Ok(report)
}
