use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("feed file unreadable: {0}")]
    FeedUnreadable(String),
    #[error("feed has no `{column}` column (found: {found})")]
    MissingIdColumn { column: String, found: String },
    #[error("feed is malformed at line {line}: {reason}")]
    MalformedFeed { line: usize, reason: String },
    #[error("config file invalid or unreadable: {0}")]
    InvalidConfig(String),
}

/// Why a single feed identifier was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotateError {
    #[error("identifier cell is blank")]
    BlankIdentifier,
    #[error("record {0} has no display name")]
    MissingName(String),
    #[error("registry entry for {0} is not a readable user record")]
    UnreadableRecord(String),
    #[error("message selection failed: {0}")]
    Selection(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsErrorCode {
    E001RegistryMissing,
    E002RegistryMalformed,
    E003AnnotateFailed,
    E004AuditWriteFailed,
    E005DuplicateIds,
}

impl NewsErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::E001RegistryMissing => "E001_REGISTRY_MISSING",
            Self::E002RegistryMalformed => "E002_REGISTRY_MALFORMED",
            Self::E003AnnotateFailed => "E003_ANNOTATE_FAILED",
            Self::E004AuditWriteFailed => "E004_AUDIT_WRITE_FAILED",
            Self::E005DuplicateIds => "E005_DUPLICATE_IDS",
        }
    }
}
