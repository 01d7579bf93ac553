//! Sync pipeline: fetch, mask, upload, clean up

pub mod transient;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nave_core::{ExportKind, export_file_name, write_json};
use nave_security::{MaskReport, Masker, mask_json_file};
use nave_sources::{ExportSink, IssueSource};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::Instrument;

pub use transient::{TransientFiles, remove_stale_exports};

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct SyncSummary {
    pub issues: usize,
    pub report: MaskReport,
    pub response: Value,
    pub stale_removed: usize,
}

pub struct SyncPipeline<S, K> {
    source: S,
    sink: K,
    masker: Masker,
    work_dir: PathBuf,
}

impl<S: IssueSource, K: ExportSink> SyncPipeline<S, K> {
    pub fn new(source: S, sink: K, masker: Masker, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            sink,
            masker,
            work_dir: work_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Run once. Raw and masked exports never outlive the call, whether it
    /// succeeds or fails.
    pub async fn run(&mut self) -> Result<SyncSummary> {
        let span = tracing::info_span!("sync", run_id = %uuid::Uuid::new_v4());

        async {
            let mut transient = TransientFiles::default();
            let result = self.run_steps(&mut transient).await;

            let removed = transient.cleanup();
            tracing::debug!(removed = removed.len(), "Removed transient files");

            if let Err(e) = &result {
                tracing::error!("Sync failed: {:#}", e);
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_steps(&mut self, transient: &mut TransientFiles) -> Result<SyncSummary> {
        let stale = remove_stale_exports(&self.work_dir)?;

        tracing::info!("Downloading data from the tracker");
        let document = self.source.fetch().await.context("Failed to fetch tracker data")?;
        let issues = document
            .get("issues")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        let now = OffsetDateTime::now_utc();
        let raw_path = self.work_dir.join(export_file_name(ExportKind::Raw, now)?);
        let masked_path = self.work_dir.join(export_file_name(ExportKind::Masked, now)?);

        transient.track(raw_path.clone());
        write_json(&raw_path, &document).context("Failed to save raw export")?;
        drop(document);

        tracing::info!("Masking sensitive data");
        transient.track(masked_path.clone());
        let report = mask_json_file(&raw_path, &masked_path, &mut self.masker)
            .context("Failed to mask export")?;

        tracing::info!("Sending masked data to the dashboard");
        let response = self
            .sink
            .upload(&masked_path)
            .await
            .context("Failed to upload masked export")?;

        tracing::info!(issues, replaced = report.total(), "Sync completed");
        Ok(SyncSummary {
            issues,
            report,
            response,
            stale_removed: stale.len(),
        })
    }
}
