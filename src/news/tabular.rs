//! Minimal RFC 4180 CSV reading and writing for the feed and summary files.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub reason: String,
}

/// Split `raw` into records of fields. Quoted fields may contain commas,
/// doubled quotes and line breaks. Blank lines are dropped.
pub fn parse(raw: &str) -> Result<Vec<Vec<String>>, ParseError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut line = 1usize;
    let mut quote_line = 1usize;
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(ch);
                }
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' if field.is_empty() && !field_was_quoted => {
                in_quotes = true;
                field_was_quoted = true;
                quote_line = line;
            }
            '"' => {
                return Err(ParseError {
                    line,
                    reason: "unexpected quote inside unquoted field".to_string(),
                });
            }
            ',' => {
                row.push(std::mem::take(&mut field));
                field_was_quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                finish_row(&mut rows, &mut row, &mut field, field_was_quoted);
                field_was_quoted = false;
                line += 1;
            }
            _ => {
                if field_was_quoted {
                    return Err(ParseError {
                        line,
                        reason: "text after closing quote".to_string(),
                    });
                }
                field.push(ch);
            }
        }
    }

    if in_quotes {
        return Err(ParseError {
            line: quote_line,
            reason: "unterminated quoted field".to_string(),
        });
    }
    finish_row(&mut rows, &mut row, &mut field, field_was_quoted);
    Ok(rows)
}

fn finish_row(
    rows: &mut Vec<Vec<String>>,
    row: &mut Vec<String>,
    field: &mut String,
    field_was_quoted: bool,
) {
    if row.is_empty() && field.is_empty() && !field_was_quoted {
        return;
    }
    row.push(std::mem::take(field));
    rows.push(std::mem::take(row));
}

pub fn escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub fn render_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Write `header` and `rows` to `path`, replacing any previous content.
pub fn write_file<S: AsRef<str>>(path: &Path, header: &[S], rows: &[Vec<String>]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut out = render_row(header);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("failed to write {}", path.display()))
}
