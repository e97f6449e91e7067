use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// External user identifier. Registries written with numeric ids keep them
/// numeric; anything else round-trips as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Int(i64),
    /// Integers above `i64::MAX`.
    UInt(u64),
    Text(String),
}

impl UserId {
    /// Parse one feed cell. Blank cells carry no identifier.
    pub fn from_cell(cell: &str) -> Option<Self> {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Some(Self::Int(n));
        }
        if let Ok(n) = trimmed.parse::<u64>() {
            return Some(Self::UInt(n));
        }
        Some(Self::Text(trimmed.to_string()))
    }

    /// Canonical string form, used for hashing and synthesized names.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::UInt(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEntry {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MessageEntry {
    pub fn new(icon: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            description: description.into(),
            extra: Map::new(),
        }
    }
}

pub const SYNTHESIZED_NAME_PREFIX: &str = "User_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub news: Vec<MessageEntry>,
    /// Fields this tool does not manage, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// Minimal record for an identifier seen for the first time.
    pub fn synthesized(id: &UserId) -> Self {
        Self {
            id: Some(id.clone()),
            name: Some(synthesized_name(id)),
            news: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn last_description(&self) -> Option<&str> {
        self.news.last().map(|entry| entry.description.as_str())
    }

    pub fn has_synthesized_name(&self) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| name.starts_with(SYNTHESIZED_NAME_PREFIX))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<MessageEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<MessageEntry>>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn synthesized_name(id: &UserId) -> String {
    format!("{SYNTHESIZED_NAME_PREFIX}{id}")
}
