use anyhow::Result;
use nave_config::Settings;
use nave_security::mask_json_file;
use std::path::{Path, PathBuf};

pub fn handle(
    settings: &Settings,
    input: PathBuf,
    output: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<()> {
    let output = output.unwrap_or_else(|| default_output(&input));
    let mut masker = super::build_masker(settings, seed);

    let report = mask_json_file(&input, &output, &mut masker)?;

    println!("✓ Masked file saved to: {}", output.display());
    super::print_report(&report);

    Ok(())
}

/// `dir/issue.json` -> `dir/masked_issue.json`
fn default_output(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export.json".to_string());
    input.with_file_name(format!("masked_{}", name))
}
