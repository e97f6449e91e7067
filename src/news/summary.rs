use crate::news::record::UserRecord;
use crate::news::tabular;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

pub const NO_MESSAGE_MARKER: &str = "No message";
pub const SUMMARY_HEADER: [&str; 4] = ["ID", "Name", "Message", "TotalMessages"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub id: String,
    pub name: String,
    pub message: String,
    pub total_messages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_input: usize,
    pub processed: usize,
    pub failed: usize,
    /// Processed records still carrying a synthesized `User_` name.
    pub synthesized: usize,
    pub rows: Vec<SummaryRow>,
}

fn row_for(record: &UserRecord) -> SummaryRow {
    SummaryRow {
        id: record.id.as_ref().map(|id| id.canonical()).unwrap_or_default(),
        name: record.name.clone().unwrap_or_default(),
        message: record
            .last_description()
            .unwrap_or(NO_MESSAGE_MARKER)
            .to_string(),
        total_messages: record.news.len(),
    }
}

/// Read-only projection of a run's processed records.
pub fn summarize(total_input: usize, processed: &[UserRecord]) -> Summary {
    Summary {
        total_input,
        processed: processed.len(),
        failed: total_input.saturating_sub(processed.len()),
        synthesized: processed.iter().filter(|r| r.has_synthesized_name()).count(),
        rows: processed.iter().map(row_for).collect(),
    }
}

impl Summary {
    pub fn csv_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                vec![
                    row.id.clone(),
                    row.name.clone(),
                    row.message.clone(),
                    row.total_messages.to_string(),
                ]
            })
            .collect()
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        tabular::write_file(path, &SUMMARY_HEADER, &self.csv_rows())
    }

    /// Right-aligned fixed-width table of the summary rows.
    pub fn render_table(&self) -> Vec<String> {
        let cells: Vec<Vec<String>> = std::iter::once(
            SUMMARY_HEADER.iter().map(|h| h.to_string()).collect::<Vec<String>>(),
        )
        .chain(self.csv_rows())
        .collect();

        let mut widths = [0usize; SUMMARY_HEADER.len()];
        for row in &cells {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        cells
            .iter()
            .map(|row| {
                row.iter()
                    .zip(widths)
                    .map(|(cell, w)| format!("{cell:>w$}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::record::{MessageEntry, UserId};

    fn record(id: i64, name: &str, messages: &[&str]) -> UserRecord {
        let mut r = UserRecord::synthesized(&UserId::Int(id));
        r.name = Some(name.to_string());
        r.news = messages
            .iter()
            .map(|m| MessageEntry::new("icon", *m))
            .collect();
        r
    }

    #[test]
    fn summarize_counts_and_takes_latest_message() {
        let processed = vec![
            record(1, "User_1", &["first"]),
            record(2, "Alice", &["old", "new"]),
        ];
        let summary = summarize(3, &processed);

        assert_eq!(summary.total_input, 3);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.synthesized, 1);
        assert_eq!(
            summary.rows[1],
            SummaryRow {
                id: "2".to_string(),
                name: "Alice".to_string(),
                message: "new".to_string(),
                total_messages: 2,
            }
        );
    }

    #[test]
    fn empty_news_uses_marker() {
        let summary = summarize(1, &[record(7, "Bob", &[])]);
        assert_eq!(summary.rows[0].message, NO_MESSAGE_MARKER);
        assert_eq!(summary.rows[0].total_messages, 0);
    }

    #[test]
    fn table_columns_are_aligned() {
        let summary = summarize(1, &[record(10, "Alice", &["hi"])]);
        let lines = summary.render_table();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].chars().count(), lines[1].chars().count());
        assert!(lines[0].ends_with("TotalMessages"));
    }

    #[test]
    fn csv_has_fixed_header() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("summary.csv");
        summarize(1, &[record(1, "Ana", &["a, b"])])
            .write_csv(&path)
            .expect("write");
        let raw = std::fs::read_to_string(&path).expect("read");
        assert_eq!(raw, "ID,Name,Message,TotalMessages\n1,Ana,\"a, b\",1\n");
    }
}
