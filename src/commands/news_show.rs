use anyhow::Result;

use crate::commands::CommandReport;
use crate::news::catalog::Catalog;
use crate::news::config::load_config;
use crate::news::paths::resolve_paths;
use crate::news::record::{UserId, synthesized_name};
use crate::news::registry::{RegistryStore, Slot};
use crate::news::selector::{CatalogSelector, MessageSource};

#[derive(Debug, Clone)]
pub struct NewsShowOptions {
    pub id: String,
}

/// Read-only lookup of one registry record, with a preview of the message
/// the next run would append for it.
pub fn run(opts: &NewsShowOptions) -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let cfg = load_config(&paths)?;
    let mut report = CommandReport::new("show");

    let Some(id) = UserId::from_cell(&opts.id) else {
        report.issue("identifier cannot be blank");
        return Ok(report);
    };
    report.detail(format!("id={id}"));

    let loaded = RegistryStore::new(&paths.registry_file).load();
    report.detail(format!("registry.status={}", loaded.status.as_str()));

    let selector = CatalogSelector::new(Catalog::default(), cfg.messages.max_description_chars);
    if let Some(index) = selector.index_for(Some(&id)) {
        report.detail(format!("catalog.index={index}"));
    }

    let name = match loaded.registry.lookup(&id) {
        Slot::Unreadable => {
            report.issue("registry entry is not a readable user record; the next run will skip it");
            return Ok(report);
        }
        Slot::Record(record) => {
            report.detail("record=found");
            report.detail(format!("news.count={}", record.news.len()));
            if let Some(last) = record.last_description() {
                report.detail(format!("news.last={last}"));
            }
            match &record.name {
                Some(name) => name.clone(),
                None => {
                    report.issue("record has no display name; the next run will skip it");
                    return Ok(report);
                }
            }
        }
        Slot::Vacant => {
            report.detail("record=absent (created on next run)");
            synthesized_name(&id)
        }
    };
    report.detail(format!("name={name}"));

    match selector.describe(Some(&id), &name) {
        Ok(preview) => report.detail(format!("next_message={preview}")),
        Err(err) => report.issue(format!("message selection failed: {err}")),
    }

    Ok(report)
}
