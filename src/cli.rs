use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::news_run::{self, NewsRunOptions};
use crate::commands::news_show::{self, NewsShowOptions};
use crate::commands::{CommandReport, news_status};
use crate::logging;

#[derive(Debug, Parser)]
#[command(
    name = "sdw-news",
    version,
    about = "Reconcile a user-id feed against the registry and assign deterministic messages"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Process the feed, update the registry, write the feed copy and summary.
    Run {
        /// Compute and report everything without writing any file.
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        json: bool,
    },
    /// Show one registry record and the message the next run would assign.
    Show {
        #[arg(long)]
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Print resolved paths, effective config and environment overrides.
    Status {
        #[arg(long)]
        json: bool,
    },
}

fn print_report(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!(
        "{}: {}",
        report.command,
        if report.ok { "ok" } else { "issues found" }
    );
    for detail in &report.details {
        println!("  {detail}");
    }
    for issue in &report.issues {
        println!("  issue: {issue}");
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let (report, json) = match cli.command {
        Command::Run { dry_run, json } => {
            logging::set_quiet(json);
            (news_run::run(&NewsRunOptions { dry_run })?, json)
        }
        Command::Show { id, json } => (news_show::run(&NewsShowOptions { id })?, json),
        Command::Status { json } => (news_status::run()?, json),
    };

    print_report(&report, json)?;
    if !report.ok {
        anyhow::bail!("{} reported {} issue(s)", report.command, report.issues.len());
    }
    Ok(())
}
