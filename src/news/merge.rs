use crate::error::NewsErrorCode;
use crate::news::record::UserRecord;
use crate::news::registry::{Registry, RegistryStore, UpsertAction};
use crate::news::warn::{self, WarnEvent};
use anyhow::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub updated: usize,
    pub inserted: usize,
    /// Later entries dropped because their id already appeared earlier.
    pub collapsed: usize,
    pub total_records: usize,
    pub distinct_ids: usize,
}

/// Collapse duplicate ids, then upsert every processed record into
/// `registry`, last writer wins.
pub fn apply(registry: &mut Registry, processed: &[UserRecord]) -> MergeOutcome {
    let mut outcome = MergeOutcome {
        collapsed: registry.collapse_duplicates(),
        ..MergeOutcome::default()
    };
    if outcome.collapsed > 0 {
        warn::emit(WarnEvent {
            code: NewsErrorCode::E005DuplicateIds.as_str(),
            stage: "merge",
            action: "keep-first-entry-per-id",
            id: "",
            source: "registry",
            reason: "duplicate-ids-on-disk",
            err: &format!("dropped={}", outcome.collapsed),
        });
    }
    for record in processed {
        match registry.upsert(record.clone()) {
            UpsertAction::Updated => outcome.updated += 1,
            UpsertAction::Inserted => outcome.inserted += 1,
        }
    }
    outcome.total_records = registry.len();
    outcome.distinct_ids = registry.distinct_ids();
    outcome
}

/// [`apply`], then persist the whole registry through `store`.
pub fn merge_and_save(
    store: &RegistryStore,
    registry: &mut Registry,
    processed: &[UserRecord],
) -> Result<MergeOutcome> {
    let outcome = apply(registry, processed);
    store.save(registry.entries())?;
    Ok(outcome)
}
