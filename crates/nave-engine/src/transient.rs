//! Transient export files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nave_core::ExportKind;

/// Files a run writes and must remove before it returns.
///
/// [`cleanup`](Self::cleanup) is called explicitly at the end of a run;
/// dropping the set removes anything still tracked.
#[derive(Debug, Default)]
pub struct TransientFiles {
    paths: Vec<PathBuf>,
}

impl TransientFiles {
    pub fn track(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn tracked(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Remove every tracked file, returning the ones actually deleted
    pub fn cleanup(&mut self) -> Vec<PathBuf> {
        let mut removed = Vec::new();

        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!("Removed {}", path.display());
                    removed.push(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("Error removing file {}: {}", path.display(), e),
            }
        }

        removed
    }
}

impl Drop for TransientFiles {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Delete raw and masked exports left behind by earlier runs in `dir`
pub fn remove_stale_exports(dir: &Path) -> Result<Vec<PathBuf>> {
    let dir = dir
        .to_str()
        .with_context(|| format!("Work directory is not valid UTF-8: {}", dir.display()))?;
    let mut removed = Vec::new();

    for kind in ExportKind::ALL {
        let pattern = format!("{}/{}", glob::Pattern::escape(dir), kind.glob_pattern());
        let entries = glob::glob(&pattern).context("Invalid export glob pattern")?;

        for path in entries.filter_map(|entry| entry.ok()) {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    tracing::info!("Removed existing file: {}", path.display());
                    removed.push(path);
                }
                Err(e) => tracing::warn!("Error removing file {}: {}", path.display(), e),
            }
        }
    }

    Ok(removed)
}
