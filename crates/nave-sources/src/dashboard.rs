use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use nave_config::{DashboardConfig, DashboardSettings};
use nave_core::{Error, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::handler::ExportSink;
use crate::http_error;

/// Client for the dashboard's multipart ingestion endpoint
pub struct DashboardClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    dashboard_id: String,
    cumulative: bool,
}

impl DashboardClient {
    pub fn new(config: &DashboardConfig, settings: &DashboardSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("nave/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.upload_timeout_secs))
            .build()
            .map_err(|e| Error::Other(anyhow::anyhow!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            dashboard_id: config.dashboard_id.clone(),
            cumulative: settings.cumulative,
        })
    }

    pub fn with_cumulative(mut self, cumulative: bool) -> Self {
        self.cumulative = cumulative;
        self
    }

    pub async fn upload_file(&self, path: &Path) -> Result<Value> {
        let bytes = tokio::fs::read(path).await?;
        let size = bytes.len();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("data.json")
            .to_string();

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/json")
            .map_err(http_error)?;
        let form = Form::new()
            .part("data", part)
            .text("dashboardId", self.dashboard_id.clone())
            .text("cumulative", self.cumulative.to_string());

        tracing::info!(
            url = %self.api_url,
            dashboard_id = %self.dashboard_id,
            bytes = size,
            "Uploading export to dashboard"
        );

        let response = self
            .client
            .post(&self.api_url)
            .header(AUTHORIZATION, &self.api_key)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        let body = response.text().await.map_err(http_error)?;

        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                dashboard_id = %self.dashboard_id,
                bytes = size,
                "Dashboard rejected upload"
            );
            return Err(Error::Upload {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|e| Error::MalformedInput(format!("dashboard response: {}", e)))
    }
}

#[async_trait]
impl ExportSink for DashboardClient {
    async fn upload(&self, path: &Path) -> Result<Value> {
        self.upload_file(path).await
    }
}
