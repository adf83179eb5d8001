//! Task status DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::job::{JobResult, JobStatus, StatusReport};

/// Response of the task status lookup
///
/// Every field is optional: missing or oddly typed values degrade to an
/// `Unknown` status instead of a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub output: Option<TaskOutput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskOutput {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub task_status: Option<JsonValue>,
    #[serde(default)]
    pub results: Option<Vec<TaskResultEntry>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskResultEntry {
    #[serde(default)]
    pub url: Option<String>,
}

impl TaskStatusResponse {
    /// Converts the response into a status report
    pub fn into_report(self) -> StatusReport {
        let Some(output) = self.output else {
            return StatusReport::new(JobStatus::Unknown);
        };

        let raw_status = output
            .task_status
            .as_ref()
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        let status = raw_status
            .as_deref()
            .map(JobStatus::from_code)
            .unwrap_or(JobStatus::Unknown);

        let result = match status {
            JobStatus::Succeeded => output
                .results
                .unwrap_or_default()
                .into_iter()
                .next()
                .and_then(|entry| entry.url)
                .map(|result_url| JobResult { result_url }),
            _ => None,
        };

        StatusReport {
            status,
            result,
            raw_status,
        }
    }
}
