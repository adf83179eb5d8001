//! Retouch HTTP Client
//!
//! A small, type-safe client for the asynchronous image-editing service.
//!
//! The service runs every job asynchronously: a submission returns a task id,
//! and the task is then polled until it reaches a terminal status. This crate
//! performs exactly those two calls and nothing more. It never retries; that
//! decision belongs to the caller.
//!
//! # Example
//!
//! ```no_run
//! use retouch_client::ImageEditClient;
//! use retouch_core::domain::job::{ApiKey, FunctionType, JobRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ImageEditClient::new("https://dashscope.aliyuncs.com");
//!
//!     let request = JobRequest::new(
//!         "https://example.com/photo.jpg",
//!         "sk-...",
//!         FunctionType::RemoveWatermark,
//!         "去除图像中的文字",
//!     );
//!     let handle = client.submit(&request).await?;
//!
//!     let report = client.poll(&handle.task_id, &ApiKey::new("sk-...")).await?;
//!     println!("{}: {:?}", handle.task_id, report.status);
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
mod service;
mod tasks;

#[cfg(test)]
mod stub_server;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use service::JobService;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

/// Public endpoint of the image-editing service
pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com";

/// Model used for image editing
pub const DEFAULT_MODEL: &str = "wanx2.1-imageedit";

/// HTTP client for the image-editing service
#[derive(Debug, Clone)]
pub struct ImageEditClient {
    /// Base URL of the service (e.g., "https://dashscope.aliyuncs.com")
    base_url: String,
    /// Model identifier sent with every submission
    model: String,
    /// HTTP client instance
    client: Client,
}

impl ImageEditClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the service
    ///
    /// # Example
    /// ```
    /// use retouch_client::ImageEditClient;
    ///
    /// let client = ImageEditClient::new("https://dashscope.aliyuncs.com");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use retouch_client::ImageEditClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ImageEditClient::with_client("https://dashscope.aliyuncs.com", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: DEFAULT_MODEL.to_string(),
            client,
        }
    }

    /// Use a different model identifier for submissions
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Endpoint URL below the base URL
    ///
    /// Each segment is percent-encoded, so caller-supplied ids cannot change
    /// the path or add a query.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(format!("{}: cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// A non-success status becomes [`ClientError::Transport`]; a success body
    /// that is not the expected JSON becomes [`ClientError::MalformedResponse`].
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::transport(status.as_u16(), error_text));
        }

        let body = response.text().await?;
        parse_body(&body)
    }
}

/// Deserialize a success body
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| ClientError::MalformedResponse(format!("invalid JSON body: {}", e)))
}
