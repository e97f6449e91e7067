use crate::error::NewsErrorCode;
use crate::news::paths::NewsPaths;
use crate::news::util::now_epoch_secs;
use crate::news::warn::{self, WarnEvent};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;

#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub at_epoch_secs: u64,
    pub phase: String,
    pub status: String,
    pub message: String,
}

pub fn append_event(paths: &NewsPaths, phase: &str, status: &str, message: &str) -> Result<()> {
    fs::create_dir_all(&paths.logs_dir)
        .with_context(|| format!("failed to create {}", paths.logs_dir.display()))?;
    let event = AuditEvent {
        at_epoch_secs: now_epoch_secs()?,
        phase: phase.to_string(),
        status: status.to_string(),
        message: message.to_string(),
    };

    let line = format!("{}\n", serde_json::to_string(&event)?);
    let path = paths.logs_dir.join("audit.log");
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

/// Like [`append_event`], but a failed write only produces a warning line.
pub fn record(paths: &NewsPaths, phase: &str, status: &str, message: &str) {
    if let Err(err) = append_event(paths, phase, status, message) {
        warn::emit(WarnEvent {
            code: NewsErrorCode::E004AuditWriteFailed.as_str(),
            stage: phase,
            action: "append-audit-event",
            id: "",
            source: &paths.logs_dir.display().to_string(),
            reason: "audit-log-unwritable",
            err: &format!("{err:#}"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::paths::test_paths;
    use tempfile::tempdir;

    #[test]
    fn append_event_writes_one_json_line_per_event() {
        let tmp = tempdir().expect("tempdir");
        let paths = test_paths(tmp.path());

        append_event(&paths, "registry-load", "ok", "loaded 2 records").expect("append 1");
        append_event(&paths, "merge", "ok", "saved").expect("append 2");

        let raw = fs::read_to_string(paths.logs_dir.join("audit.log")).expect("read audit");
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).expect("json");
        assert_eq!(first["phase"], "registry-load");
        assert_eq!(first["message"], "loaded 2 records");
    }
}
