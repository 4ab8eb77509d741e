//! REST backend data source
//!
//! Talks to the backend over HTTP with reqwest. Every response is expected in
//! the `{ success, data?, error? }` envelope.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::DataSource;
use crate::error::{ApiError, Result};
use crate::models::{
    ApiResponse, AuditEntry, AuditQuery, CategoryRequest, Item, PrintSettings, ScanLogItem,
    SquareStatus,
};

/// HTTP-backed data source.
#[derive(Debug, Clone)]
pub struct RemoteDataSource {
    client: Client,
    base_url: Url,
}

impl RemoteDataSource {
    /// Creates a client for `base_url` (e.g. `http://localhost:3000/api`)
    /// with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ApiError::validation(format!("Invalid API base URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::validation(format!(
                "Invalid API base URL '{}'",
                base_url
            )));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends percent-encoded path segments to the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::validation("Invalid API base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // == Request Helpers ==

    /// Sends a request and returns the envelope's data, which must be present.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        self.exchange::<T>(request)
            .await?
            .data
            .ok_or_else(|| ApiError::transport("Response is missing data"))
    }

    /// Sends a request to an endpoint that returns no data.
    async fn send_unit(&self, request: RequestBuilder) -> Result<()> {
        self.exchange::<serde_json::Value>(request).await.map(|_| ())
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResponse<T>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or_else(|| format!("Request failed with status {}", status));
            debug!("Backend returned {}: {}", status, message);

            return Err(match status {
                StatusCode::NOT_FOUND => ApiError::NotFound(message),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    ApiError::Validation(message)
                }
                _ => ApiError::Transport(message),
            });
        }

        let envelope: ApiResponse<T> = serde_json::from_slice(&body)?;
        if !envelope.success {
            return Err(ApiError::Transport(
                envelope
                    .error
                    .unwrap_or_else(|| "Backend reported failure".to_string()),
            ));
        }
        Ok(envelope)
    }
}

#[async_trait]
impl DataSource for RemoteDataSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn recent_logs(&self) -> Result<Vec<ScanLogItem>> {
        let url = self.url(&["logs", "recent"])?;
        self.send(self.client.get(url)).await
    }

    async fn item_by_barcode(&self, barcode: &str) -> Result<Item> {
        let url = self.url(&["item", barcode])?;
        let item: Item = self.send(self.client.get(url)).await?;
        Ok(item.normalized_for_barcode(barcode, Utc::now()))
    }

    async fn item_by_id(&self, id: &str) -> Result<Item> {
        let url = self.url(&["item", "id", id])?;
        let item: Item = self.send(self.client.get(url)).await?;
        Ok(item.normalized(Utc::now()))
    }

    async fn search_items(&self, query: &str) -> Result<Vec<Item>> {
        let url = self.url(&["items", "search"])?;
        let items: Vec<Item> = self
            .send(self.client.get(url).query(&[("q", query)]))
            .await?;
        let now = Utc::now();
        Ok(items.into_iter().map(|item| item.normalized(now)).collect())
    }

    async fn create_item(&self, item: &Item) -> Result<Item> {
        let url = self.url(&["item"])?;
        let reply: Item = self.send(self.client.post(url).json(item)).await?;
        if reply.id.is_empty() {
            return Err(ApiError::transport("Backend did not assign an item id"));
        }
        Ok(item.clone().confirmed_by(&reply, Utc::now()))
    }

    async fn update_item(&self, item: &Item) -> Result<Item> {
        let url = self.url(&["item", item.id.as_str()])?;
        let reply: Item = self.send(self.client.put(url).json(item)).await?;
        Ok(item.clone().confirmed_by(&reply, Utc::now()))
    }

    async fn delete_item(&self, id: &str) -> Result<()> {
        let url = self.url(&["item", id])?;
        self.send_unit(self.client.delete(url)).await
    }

    async fn square_status(&self) -> Result<SquareStatus> {
        let url = self.url(&["square", "status"])?;
        self.send(self.client.get(url)).await
    }

    async fn categories(&self) -> Result<Vec<String>> {
        let url = self.url(&["categories"])?;
        self.send(self.client.get(url)).await
    }

    async fn add_category(&self, name: &str) -> Result<Vec<String>> {
        let url = self.url(&["categories"])?;
        self.send(self.client.post(url).json(&CategoryRequest::new(name)))
            .await
    }

    async fn delete_category(&self, name: &str) -> Result<Vec<String>> {
        let url = self.url(&["categories", name])?;
        self.send(self.client.delete(url)).await
    }

    async fn audit_logs(&self, query: AuditQuery) -> Result<Vec<AuditEntry>> {
        let url = self.url(&["audit"])?;
        self.send(self.client.get(url).query(&query)).await
    }

    async fn export_audit_logs(&self) -> Result<String> {
        let url = self.url(&["audit", "export"])?;
        self.send(self.client.get(url)).await
    }

    async fn print_settings(&self) -> Result<PrintSettings> {
        let url = self.url(&["print", "settings"])?;
        self.send(self.client.get(url)).await
    }

    async fn save_print_settings(&self, settings: &PrintSettings) -> Result<PrintSettings> {
        let url = self.url(&["print", "settings"])?;
        self.send(self.client.post(url).json(settings)).await
    }

    async fn print_label(&self, item_id: &str) -> Result<()> {
        let url = self.url(&["print", "label", item_id])?;
        self.send_unit(self.client.post(url)).await
    }
}
