use std::time::Duration;

use async_trait::async_trait;
use nave_config::{TrackerConfig, TrackerSettings};
use nave_core::{Error, Result};
use reqwest::header::ACCEPT;
use serde_json::Value;

use crate::handler::IssueSource;
use crate::http_error;

/// Client for the tracker's issue search endpoint
pub struct TrackerClient {
    client: reqwest::Client,
    url: String,
    username: String,
    api_token: String,
    jql: String,
    page_size: usize,
    max_pages: Option<usize>,
}

impl TrackerClient {
    pub fn new(config: &TrackerConfig, settings: &TrackerSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("nave/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.fetch_timeout_secs))
            .build()
            .map_err(|e| Error::Other(anyhow::anyhow!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            username: config.username.clone(),
            api_token: config.api_token.clone(),
            jql: settings.jql.clone(),
            page_size: settings.page_size.max(1),
            max_pages: settings.max_pages,
        })
    }

    /// Fetch one page of search results starting at `start_at`
    pub async fn fetch_page(&self, start_at: usize) -> Result<Value> {
        let start_at = start_at.to_string();
        let max_results = self.page_size.to_string();

        tracing::debug!(url = %self.url, start_at = %start_at, "Requesting tracker page");

        let response = self
            .client
            .get(&self.url)
            .basic_auth(&self.username, Some(&self.api_token))
            .header(ACCEPT, "application/json")
            .query(&[
                ("expand", "changelog"),
                ("startAt", start_at.as_str()),
                ("maxResults", max_results.as_str()),
                ("jql", self.jql.as_str()),
            ])
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        let body = response.text().await.map_err(http_error)?;

        if !status.is_success() {
            return Err(Error::Tracker {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::MalformedInput(format!("tracker response: {}", e)))
    }

    /// Fetch every page and merge them into a single search document.
    ///
    /// The first page's envelope is kept; `issues` holds all pages in order.
    /// A response without an `issues` array is returned as-is.
    pub async fn fetch_all(&self) -> Result<Value> {
        let mut document = self.fetch_page(0).await?;
        let Some(mut issues) = take_issues(&mut document) else {
            tracing::info!("Tracker response is not paginated");
            return Ok(document);
        };

        let total = document.get("total").and_then(Value::as_u64);
        let mut pages = 1;
        let mut last_page_len = issues.len();

        while let Some(total) = total {
            if issues.len() as u64 >= total || last_page_len == 0 {
                break;
            }
            if self.max_pages.is_some_and(|max| pages >= max) {
                tracing::warn!(
                    fetched = issues.len(),
                    total,
                    "Stopping at the configured page limit"
                );
                break;
            }

            let mut page = self.fetch_page(issues.len()).await?;
            let batch = take_issues(&mut page).unwrap_or_default();
            last_page_len = batch.len();
            issues.extend(batch);
            pages += 1;
        }

        tracing::info!(issues = issues.len(), pages, "Fetched tracker export");
        Ok(merge_pages(document, issues))
    }
}

#[async_trait]
impl IssueSource for TrackerClient {
    async fn fetch(&self) -> Result<Value> {
        self.fetch_all().await
    }
}

fn take_issues(page: &mut Value) -> Option<Vec<Value>> {
    match page.get_mut("issues")? {
        Value::Array(items) => Some(std::mem::take(items)),
        _ => None,
    }
}

fn merge_pages(mut document: Value, issues: Vec<Value>) -> Value {
    if let Some(envelope) = document.as_object_mut() {
        if envelope.contains_key("startAt") {
            envelope.insert("startAt".to_string(), Value::from(0));
        }
        if envelope.contains_key("maxResults") {
            envelope.insert("maxResults".to_string(), Value::from(issues.len()));
        }
        envelope.insert("issues".to_string(), Value::Array(issues));
    }
    document
}
