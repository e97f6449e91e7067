use crate::error::{AnnotateError, NewsErrorCode};
use crate::logging;
use crate::news::record::{MessageEntry, UserId, UserRecord};
use crate::news::registry::{Registry, Slot};
use crate::news::selector::MessageSource;
use crate::news::warn::{self, WarnEvent};
use std::collections::HashSet;

/// One identifier cell from the feed, with its 1-based data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedIdentifier {
    pub row: usize,
    pub id: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierFailure {
    pub row: usize,
    pub id: Option<UserId>,
    pub error: AnnotateError,
}

#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    /// Annotated records, one per successfully processed feed row, in feed order.
    pub processed: Vec<UserRecord>,
    /// Distinct ids that had no registry record, in first-seen order.
    pub created: Vec<UserId>,
    pub failures: Vec<IdentifierFailure>,
}

enum Lookup {
    Found(UserRecord),
    Create(UserRecord),
}

fn lookup(registry: &Registry, id: &UserId) -> Result<Lookup, AnnotateError> {
    match registry.lookup(id) {
        Slot::Record(existing) => Ok(Lookup::Found(existing.clone())),
        Slot::Unreadable => Err(AnnotateError::UnreadableRecord(id.canonical())),
        Slot::Vacant => Ok(Lookup::Create(UserRecord::synthesized(id))),
    }
}

fn annotate<S: MessageSource + ?Sized>(
    mut record: UserRecord,
    source: &S,
    icon: &str,
) -> Result<UserRecord, AnnotateError> {
    let name = match record.name.as_deref() {
        Some(name) => name.to_string(),
        None => {
            let id = record.id.as_ref().map(UserId::canonical).unwrap_or_default();
            return Err(AnnotateError::MissingName(id));
        }
    };
    let description = source.describe(record.id.as_ref(), &name)?;
    logging::progress(format!("For {name}: {description}"));
    record.news.push(MessageEntry::new(icon, description));
    Ok(record)
}

/// Resolve every feed identifier against `registry` and append one message
/// entry per identifier. `registry` itself is left untouched; matched
/// records are cloned. A failing identifier is logged and skipped.
pub fn reconcile<S: MessageSource + ?Sized>(
    registry: &Registry,
    identifiers: &[FeedIdentifier],
    source: &S,
    icon: &str,
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();
    let mut created_seen = HashSet::new();

    for ident in identifiers {
        let Some(id) = ident.id.as_ref() else {
            skip(&mut outcome, ident, AnnotateError::BlankIdentifier);
            continue;
        };

        let (record, is_new) = match lookup(registry, id) {
            Err(err) => {
                skip(&mut outcome, ident, err);
                continue;
            }
            Ok(Lookup::Found(record)) => (record, false),
            Ok(Lookup::Create(record)) => {
                logging::progress(format!(
                    "User ID {id} not found in registry. Creating new record."
                ));
                (record, true)
            }
        };

        match annotate(record, source, icon) {
            Ok(record) => {
                if is_new && created_seen.insert(id.clone()) {
                    outcome.created.push(id.clone());
                }
                outcome.processed.push(record);
            }
            Err(err) => skip(&mut outcome, ident, err),
        }
    }

    outcome
}

fn skip(outcome: &mut ReconcileOutcome, ident: &FeedIdentifier, error: AnnotateError) {
    let id = ident.id.as_ref().map(UserId::canonical).unwrap_or_default();
    logging::progress(format!("Error processing user {id} (row {}): {error}", ident.row));
    warn::emit(WarnEvent {
        code: NewsErrorCode::E003AnnotateFailed.as_str(),
        stage: "reconcile",
        action: "skip-identifier",
        id: &id,
        source: &format!("feed-row-{}", ident.row),
        reason: "annotation-failed",
        err: &error.to_string(),
    });
    outcome.failures.push(IdentifierFailure {
        row: ident.row,
        id: ident.id.clone(),
        error,
    });
}
