//! Audit trail of every move, kept as a pretty-printed JSON array so it
//! stays hand-readable.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use shared::OrganizationLogEntry;
use tracing::warn;

/// Appends one entry, creating the log and its parent directory on first
/// use. A corrupt log is abandoned and restarted rather than blocking the
/// move that triggered the write.
pub fn append(log_path: &Path, entry: &OrganizationLogEntry) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }

    let mut entries = read_entries(log_path);
    entries.push(entry.clone());

    let serialized = serde_json::to_string_pretty(&entries).context("serializing log entries")?;
    fs::write(log_path, serialized)
        .with_context(|| format!("writing log {}", log_path.display()))?;
    Ok(())
}

/// Reads the full history. Missing file means no history yet; unparseable
/// contents are dropped with a warning.
pub fn read_entries(log_path: &Path) -> Vec<OrganizationLogEntry> {
    let raw = match fs::read_to_string(log_path) {
        Ok(raw) => raw,
        Err(_) => return Vec::new(),
    };
    match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("log {} is corrupt, starting fresh: {}", log_path.display(), err);
            Vec::new()
        }
    }
}
