//! Task status endpoint

use reqwest::Url;
use retouch_core::domain::job::{ApiKey, StatusReport};
use retouch_core::dto::task::TaskStatusResponse;
use tracing::debug;

use crate::ImageEditClient;
use crate::error::Result;

impl ImageEditClient {
    pub(crate) fn task_url(&self, task_id: &str) -> Result<Url> {
        self.endpoint(["api", "v1", "tasks", task_id])
    }

    /// Look up the status of a submitted task
    ///
    /// Status codes the client does not know map to `JobStatus::Unknown`
    /// instead of failing.
    ///
    /// # Arguments
    /// * `task_id` - Task id from the submission
    /// * `api_key` - Caller's credential
    pub async fn poll(&self, task_id: &str, api_key: &ApiKey) -> Result<StatusReport> {
        let response = self
            .client
            .get(self.task_url(task_id)?)
            .bearer_auth(api_key.expose())
            .send()
            .await?;

        let body: TaskStatusResponse = self.handle_response(response).await?;
        let report = body.into_report();

        debug!(
            "Task {} status: {}",
            task_id,
            report.raw_status.as_deref().unwrap_or("<none>")
        );
        Ok(report)
    }
}
