use anyhow::Result;
use nave_config::Settings;
use nave_engine::remove_stale_exports;
use std::path::PathBuf;

pub fn handle(settings: &Settings, work_dir: Option<PathBuf>) -> Result<()> {
    let dir = super::work_dir(settings, work_dir);
    let removed = remove_stale_exports(&dir)?;

    if removed.is_empty() {
        println!("No export files found in {}", dir.display());
    } else {
        println!("✓ Removed {} export file(s) from {}", removed.len(), dir.display());
    }

    Ok(())
}
