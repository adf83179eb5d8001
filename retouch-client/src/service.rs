//! Job service seam
//!
//! The lifecycle controller talks to the remote service only through this
//! trait, so it can run against the HTTP client or a test double.

use async_trait::async_trait;
use retouch_core::domain::job::{ApiKey, JobHandle, JobRequest, StatusReport};

use crate::ImageEditClient;
use crate::error::Result;

/// Remote job operations
#[async_trait]
pub trait JobService: Send + Sync {
    /// Submits a job and returns its handle
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle>;

    /// Fetches the current status of a task
    async fn poll(&self, task_id: &str, api_key: &ApiKey) -> Result<StatusReport>;
}

#[async_trait]
impl JobService for ImageEditClient {
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle> {
        ImageEditClient::submit(self, request).await
    }

    async fn poll(&self, task_id: &str, api_key: &ApiKey) -> Result<StatusReport> {
        ImageEditClient::poll(self, task_id, api_key).await
    }
}
