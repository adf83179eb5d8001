//! Job submission DTOs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::domain::job::{FunctionType, JobHandle, JobRequest};

/// Body of the job-creation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJob {
    pub model: String,
    pub input: CreateJobInput,
    pub parameters: Map<String, JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobInput {
    pub function: FunctionType,
    pub prompt: String,
    pub base_image_url: String,
}

impl CreateJob {
    /// Builds the body for `request`
    ///
    /// The service always gets `n: 1`; request parameters are merged on top.
    pub fn from_request(model: impl Into<String>, request: &JobRequest) -> Self {
        let mut parameters = Map::new();
        parameters.insert("n".to_string(), JsonValue::from(1));
        for (key, value) in &request.parameters {
            parameters.insert(key.clone(), value.clone());
        }

        Self {
            model: model.into(),
            input: CreateJobInput {
                function: request.function.clone(),
                prompt: request.prompt.clone(),
                base_image_url: request.image_url.clone(),
            },
            parameters,
        }
    }
}

/// Response of the job-creation call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateJobResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub output: Option<CreateJobOutput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateJobOutput {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub task_status: Option<String>,
}

impl CreateJobResponse {
    /// Handle for the accepted job, if the service issued a non-empty task id
    pub fn handle(&self) -> Option<JobHandle> {
        self.output
            .as_ref()
            .and_then(|output| output.task_id.as_deref())
            .filter(|id| !id.trim().is_empty())
            .map(JobHandle::new)
    }
}
