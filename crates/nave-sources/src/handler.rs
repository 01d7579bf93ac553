//! Collaborator traits for the sync pipeline

use std::path::Path;

use async_trait::async_trait;
use nave_core::Result;
use serde_json::Value;

/// Where raw issue exports come from
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Fetch the complete export as one document
    async fn fetch(&self) -> Result<Value>;
}

/// Where masked exports are delivered
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Upload the file at `path`, returning the service's JSON reply
    async fn upload(&self, path: &Path) -> Result<Value>;
}
