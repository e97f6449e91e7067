use anyhow::Result;
use chrono::Local;
use std::time::{SystemTime, UNIX_EPOCH};

/// Return the current Unix epoch in seconds.
pub fn now_epoch_secs() -> Result<u64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

/// Local wall-clock time rendered with a strftime-style `format`.
pub fn local_timestamp(format: &str) -> String {
    Local::now().format(format).to_string()
}

/// Keep at most `max_chars` Unicode characters of `input`. Hard cut, no
/// ellipsis, never splits a character.
pub fn truncate_chars(input: &str, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => input[..byte_idx].to_string(),
        None => input.to_string(),
    }
}
