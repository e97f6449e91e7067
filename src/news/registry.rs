use crate::error::NewsErrorCode;
use crate::news::record::{UserId, UserRecord};
use crate::news::warn::{self, WarnEvent};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// One element of the registry array. Elements that do not fit the
/// `UserRecord` shape are carried through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegistryEntry {
    Record(UserRecord),
    Opaque(Value),
}

impl RegistryEntry {
    fn id(&self) -> Option<UserId> {
        match self {
            Self::Record(record) => record.id.clone(),
            Self::Opaque(value) => value
                .get("id")
                .and_then(|id| serde_json::from_value(id.clone()).ok()),
        }
    }
}

/// What the registry holds for one id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    Record(&'a UserRecord),
    /// An entry with this id exists but is not a readable user record.
    Unreadable,
    Vacant,
}

/// Ordered registry entries with a hash index on `id`.
///
/// Position order is the on-disk order; inserts go to the end. The index
/// points at the first entry for each id.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
    index: HashMap<UserId, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Updated,
    Inserted,
}

impl Registry {
    pub fn from_entries(entries: Vec<RegistryEntry>) -> Self {
        let mut registry = Self {
            entries,
            index: HashMap::new(),
        };
        registry.reindex();
        registry
    }

    #[cfg(test)]
    pub fn from_records(records: Vec<UserRecord>) -> Self {
        Self::from_entries(records.into_iter().map(RegistryEntry::Record).collect())
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (pos, entry) in self.entries.iter().enumerate() {
            if let Some(id) = entry.id() {
                self.index.entry(id).or_insert(pos);
            }
        }
    }

    pub fn lookup(&self, id: &UserId) -> Slot<'_> {
        match self.index.get(id).map(|&pos| &self.entries[pos]) {
            Some(RegistryEntry::Record(record)) => Slot::Record(record),
            Some(RegistryEntry::Opaque(_)) => Slot::Unreadable,
            None => Slot::Vacant,
        }
    }

    #[cfg(test)]
    pub fn get(&self, id: &UserId) -> Option<&UserRecord> {
        match self.lookup(id) {
            Slot::Record(record) => Some(record),
            Slot::Unreadable | Slot::Vacant => None,
        }
    }

    /// Replace the entry with the same id in place, or append.
    pub fn upsert(&mut self, record: UserRecord) -> UpsertAction {
        let Some(id) = record.id.clone() else {
            self.entries.push(RegistryEntry::Record(record));
            return UpsertAction::Inserted;
        };
        match self.index.get(&id) {
            Some(&pos) => {
                self.entries[pos] = RegistryEntry::Record(record);
                UpsertAction::Updated
            }
            None => {
                self.index.insert(id, self.entries.len());
                self.entries.push(RegistryEntry::Record(record));
                UpsertAction::Inserted
            }
        }
    }

    /// Drop every entry whose id already appeared earlier. Returns how many
    /// entries were removed.
    pub fn collapse_duplicates(&mut self) -> usize {
        let before = self.entries.len();
        let kept: Vec<RegistryEntry> = {
            let index = &self.index;
            std::mem::take(&mut self.entries)
                .into_iter()
                .enumerate()
                .filter(|(pos, entry)| match entry.id() {
                    Some(id) => index.get(&id) == Some(pos),
                    None => true,
                })
                .map(|(_, entry)| entry)
                .collect()
        };
        self.entries = kept;
        self.reindex();
        before - self.entries.len()
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub fn records(&self) -> impl Iterator<Item = &UserRecord> {
        self.entries.iter().filter_map(|entry| match entry {
            RegistryEntry::Record(record) => Some(record),
            RegistryEntry::Opaque(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn distinct_ids(&self) -> usize {
        self.index.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    Missing,
    Malformed(String),
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::Missing => "missing",
            Self::Malformed(_) => "malformed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub registry: Registry,
    pub status: LoadStatus,
}

#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the registry. An absent file, a file that is not JSON, or a
    /// top level that is not an array yields an empty registry and a
    /// warning; neither is an error. Elements are not schema-checked.
    pub fn load(&self) -> LoadOutcome {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                self.warn_soft_failure(NewsErrorCode::E001RegistryMissing, "file-not-found", "");
                return LoadOutcome {
                    registry: Registry::default(),
                    status: LoadStatus::Missing,
                };
            }
            Err(err) => return self.malformed(format!("read failed: {err}")),
        };

        match serde_json::from_str::<Vec<RegistryEntry>>(&raw) {
            Ok(entries) => LoadOutcome {
                registry: Registry::from_entries(entries),
                status: LoadStatus::Loaded,
            },
            Err(err) => self.malformed(format!("parse failed: {err}")),
        }
    }

    fn malformed(&self, reason: String) -> LoadOutcome {
        self.warn_soft_failure(
            NewsErrorCode::E002RegistryMalformed,
            "unreadable-or-invalid-json",
            &reason,
        );
        LoadOutcome {
            registry: Registry::default(),
            status: LoadStatus::Malformed(reason),
        }
    }

    fn warn_soft_failure(&self, code: NewsErrorCode, reason: &str, err: &str) {
        warn::emit(WarnEvent {
            code: code.as_str(),
            stage: "registry-load",
            action: "start-empty-registry",
            id: "",
            source: &self.path.display().to_string(),
            reason,
            err,
        });
    }

    /// Replace the backing file with `records`. The new content is staged in
    /// a temp file next to the target and renamed over it.
    pub fn save(&self, entries: &[RegistryEntry]) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;

        let data = serde_json::to_string_pretty(entries)?;
        let mut temp = NamedTempFile::new_in(&parent)
            .with_context(|| format!("failed to stage temp file in {}", parent.display()))?;
        temp.write_all(format!("{data}\n").as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path)
            .map_err(|err| err.error)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}
