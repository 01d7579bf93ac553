pub mod clean;
pub mod mask;
pub mod sync;

use anyhow::Result;
use nave_config::Settings;
use nave_security::{MaskReport, Masker, MaskingConfig};
use std::path::{Path, PathBuf};

/// Load settings from `path`, or from the default location
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let settings = match path {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    tracing::debug!(work_dir = %settings.work_dir.display(), "Loaded settings");
    Ok(settings)
}

pub fn build_masker(settings: &Settings, seed: Option<u64>) -> Masker {
    let config = MaskingConfig::with_description_placeholder(
        settings.masking.description_placeholder.clone(),
    );
    match seed {
        Some(seed) => {
            tracing::debug!(seed, "Using seeded masker");
            Masker::seeded(config, seed)
        }
        None => Masker::new(config),
    }
}

pub fn work_dir(settings: &Settings, work_dir: Option<PathBuf>) -> PathBuf {
    work_dir.unwrap_or_else(|| settings.work_dir.clone())
}

pub fn print_report(report: &MaskReport) {
    println!("  Display names replaced: {}", report.opaque_names);
    println!("  Texts replaced: {}", report.opaque_texts);
    println!("  Emails scrubbed: {}", report.emails);
    println!("  URLs scrubbed: {}", report.urls);
    println!("  Changelog items rewritten: {}", report.companion_rewrites);
}
