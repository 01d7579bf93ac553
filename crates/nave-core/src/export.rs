//! Export files written during a sync run

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::error::{Error, Result};

/// The two transient files a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Raw,
    Masked,
}

impl ExportKind {
    pub const ALL: [ExportKind; 2] = [ExportKind::Raw, ExportKind::Masked];

    pub fn prefix(self) -> &'static str {
        match self {
            ExportKind::Raw => "raw_jira_data",
            ExportKind::Masked => "masked_jira_data",
        }
    }

    /// Glob matching every export of this kind, whatever its timestamp
    pub fn glob_pattern(self) -> String {
        format!("{}_*.json", self.prefix())
    }
}

/// Build `<prefix>_<YYYYMMDD_HHMMSS>.json`
pub fn export_file_name(kind: ExportKind, at: OffsetDateTime) -> Result<String> {
    let format = format_description!("[year][month][day]_[hour][minute][second]");
    let stamp = at
        .format(&format)
        .map_err(|e| Error::Other(anyhow::anyhow!("Failed to format timestamp: {}", e)))?;

    Ok(format!("{}_{}.json", kind.prefix(), stamp))
}

/// Write a value as two-space indented JSON
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// Read a JSON document, reporting parse failures as malformed input
pub fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::MalformedInput(format!("{}: {}", path.display(), e)))
}
