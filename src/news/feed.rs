use crate::error::NewsError;
use crate::news::reconcile::FeedIdentifier;
use crate::news::record::UserId;
use crate::news::tabular;
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const PROCESSED_COLUMN: &str = "Processed";
pub const PROCESSED_AT_COLUMN: &str = "ProcessedAt";

/// The identifier feed, held in memory as read.
#[derive(Debug, Clone)]
pub struct Feed {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    id_column: usize,
}

impl Feed {
    /// Build a feed from parsed records. The first record is the header.
    pub fn from_records(mut records: Vec<Vec<String>>, id_column_name: &str) -> Result<Self> {
        if records.is_empty() {
            return Err(NewsError::FeedUnreadable("feed has no header row".to_string()).into());
        }
        let header: Vec<String> = records
            .remove(0)
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();
        let id_column = header
            .iter()
            .position(|h| h == id_column_name)
            .ok_or_else(|| NewsError::MissingIdColumn {
                column: id_column_name.to_string(),
                found: header.join(","),
            })?;
        for (i, row) in records.iter().enumerate() {
            if row.len() > header.len() {
                return Err(NewsError::MalformedFeed {
                    line: i + 2,
                    reason: format!("{} fields, header has {}", row.len(), header.len()),
                }
                .into());
            }
        }
        Ok(Self {
            header,
            rows: records,
            id_column,
        })
    }

    pub fn identifiers(&self) -> Vec<FeedIdentifier> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| FeedIdentifier {
                row: i + 1,
                id: row.get(self.id_column).and_then(|cell| UserId::from_cell(cell)),
            })
            .collect()
    }

    /// Rows padded to the header width with the processed marker and run
    /// timestamp appended.
    pub fn annotated_rows(&self, marker: &str, timestamp: &str) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut out = row.clone();
                out.resize(self.header.len(), String::new());
                out.push(marker.to_string());
                out.push(timestamp.to_string());
                out
            })
            .collect()
    }

    pub fn write_annotated(&self, path: &Path, marker: &str, timestamp: &str) -> Result<()> {
        let mut header = self.header.clone();
        header.push(PROCESSED_COLUMN.to_string());
        header.push(PROCESSED_AT_COLUMN.to_string());
        tabular::write_file(path, &header, &self.annotated_rows(marker, timestamp))
    }
}

/// Read and parse the feed at `path`. Every failure here is fatal to the run.
pub fn read_feed(path: &Path, id_column_name: &str) -> Result<Feed> {
    let raw = fs::read_to_string(path).map_err(|err| {
        let what = if err.kind() == ErrorKind::NotFound {
            "not found".to_string()
        } else {
            err.to_string()
        };
        NewsError::FeedUnreadable(format!("{}: {what}", path.display()))
    })?;
    let records = tabular::parse(&raw).map_err(|err| NewsError::MalformedFeed {
        line: err.line,
        reason: err.reason,
    })?;
    Feed::from_records(records, id_column_name)
        .with_context(|| format!("invalid feed {}", path.display()))
}
