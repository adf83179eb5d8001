//! Job submission endpoint

use reqwest::Url;
use retouch_core::domain::catalog::FunctionSpec;
use retouch_core::domain::job::{ApiKey, JobHandle, JobRequest};
use retouch_core::dto::job::{CreateJob, CreateJobResponse};
use tracing::{debug, info};

use crate::ImageEditClient;
use crate::error::{ClientError, Result};

/// Header asking the service to run the job asynchronously
pub(crate) const ASYNC_HEADER: &str = "X-DashScope-Async";

impl ImageEditClient {
    pub(crate) fn submit_url(&self) -> Result<Url> {
        self.endpoint(["api", "v1", "services", "aigc", "image2image", "image-synthesis"])
    }

    /// Submit an image-editing job
    ///
    /// # Arguments
    /// * `request` - The job to run
    ///
    /// # Returns
    /// The handle of the accepted job
    pub async fn submit(&self, request: &JobRequest) -> Result<JobHandle> {
        let body = CreateJob::from_request(&self.model, request);
        debug!(
            "Submitting {} job for {}",
            request.function, request.image_url
        );

        let response = self
            .client
            .post(self.submit_url()?)
            .bearer_auth(request.api_key.expose())
            .header(ASYNC_HEADER, "enable")
            .json(&body)
            .send()
            .await?;

        let created: CreateJobResponse = self.handle_response(response).await?;
        let handle = created.handle().ok_or_else(|| {
            ClientError::MalformedResponse("response has no output.task_id".to_string())
        })?;

        info!("Job accepted as task {}", handle.task_id);
        Ok(handle)
    }

    /// Submit a watermark-removal job with the default prompt
    ///
    /// # Arguments
    /// * `image_url` - Image to clean up
    /// * `api_key` - Caller's credential
    pub async fn remove_watermark(
        &self,
        image_url: impl Into<String>,
        api_key: &ApiKey,
    ) -> Result<JobHandle> {
        let request = FunctionSpec::remove_watermark().request(image_url, api_key.clone(), None);
        self.submit(&request).await
    }
}
