//! Job domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

/// Bearer credential for the image-editing service
///
/// Treated as an opaque string. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw credential, for building the `Authorization` header only
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Image-editing function understood by the remote service
///
/// Serialized as the service's function identifier. Identifiers without a
/// dedicated variant round-trip through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FunctionType {
    RemoveWatermark,
    SuperResolution,
    Other(String),
}

impl FunctionType {
    pub fn as_str(&self) -> &str {
        match self {
            FunctionType::RemoveWatermark => "remove_watermark",
            FunctionType::SuperResolution => "super_resolution",
            FunctionType::Other(id) => id,
        }
    }
}

impl From<String> for FunctionType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "remove_watermark" => FunctionType::RemoveWatermark,
            "super_resolution" => FunctionType::SuperResolution,
            _ => FunctionType::Other(s),
        }
    }
}

impl From<&str> for FunctionType {
    fn from(s: &str) -> Self {
        FunctionType::from(s.to_string())
    }
}

impl From<FunctionType> for String {
    fn from(function: FunctionType) -> Self {
        function.as_str().to_string()
    }
}

impl std::fmt::Display for FunctionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to run one image-editing job
///
/// Built once by the caller and never modified after submission.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    pub image_url: String,
    pub api_key: ApiKey,
    pub function: FunctionType,
    pub prompt: String,
    /// Function-specific options, merged into the service's `parameters` object
    pub parameters: Map<String, JsonValue>,
}

impl JobRequest {
    pub fn new(
        image_url: impl Into<String>,
        api_key: impl Into<ApiKey>,
        function: FunctionType,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            image_url: image_url.into(),
            api_key: api_key.into(),
            function,
            prompt: prompt.into(),
            parameters: Map::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Checks the inputs that must be present before anything is sent
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.image_url.trim().is_empty() {
            return Err(ValidationError::MissingImageUrl);
        }
        if self.api_key.is_blank() {
            return Err(ValidationError::MissingApiKey);
        }
        Ok(())
    }
}

/// Input problems detected locally, before any network call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("an image URL is required")]
    MissingImageUrl,

    #[error("an API key is required")]
    MissingApiKey,

    #[error("unknown image function: {0}")]
    UnknownFunction(String),
}

/// Handle to a job accepted by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub task_id: String,
}

impl JobHandle {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
        }
    }
}

/// Remote task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Canceled,
    /// Code the service did not send or we do not recognize; keep polling
    Unknown,
}

impl JobStatus {
    /// Maps a service status code, falling back to `Unknown`
    pub fn from_code(code: &str) -> Self {
        match code {
            "PENDING" => JobStatus::Pending,
            "RUNNING" => JobStatus::Running,
            "SUCCEEDED" => JobStatus::Succeeded,
            "FAILED" => JobStatus::Failed,
            "CANCELED" => JobStatus::Canceled,
            _ => JobStatus::Unknown,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Canceled
        )
    }
}

/// Output of a successful job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub result_url: String,
}

/// What a single status lookup returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub status: JobStatus,
    /// First result of a succeeded task, if the service returned any
    pub result: Option<JobResult>,
    /// Status code exactly as received
    pub raw_status: Option<String>,
}

impl StatusReport {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            result: None,
            raw_status: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_type_wire_ids() {
        assert_eq!(FunctionType::RemoveWatermark.as_str(), "remove_watermark");
        assert_eq!(
            FunctionType::from("super_resolution"),
            FunctionType::SuperResolution
        );
        assert_eq!(
            FunctionType::from("colorization"),
            FunctionType::Other("colorization".to_string())
        );
    }

    #[test]
    fn test_function_type_serde() {
        let json = serde_json::to_string(&FunctionType::SuperResolution).unwrap();
        assert_eq!(json, "\"super_resolution\"");

        let parsed: FunctionType = serde_json::from_str("\"expand\"").unwrap();
        assert_eq!(parsed, FunctionType::Other("expand".to_string()));
    }

    #[test]
    fn test_validate_rejects_blank_inputs() {
        let req = JobRequest::new("  ", "k", FunctionType::RemoveWatermark, "");
        assert_eq!(req.validate(), Err(ValidationError::MissingImageUrl));

        let req = JobRequest::new("https://x/img.jpg", "", FunctionType::RemoveWatermark, "");
        assert_eq!(req.validate(), Err(ValidationError::MissingApiKey));

        let req = JobRequest::new("https://x/img.jpg", "k", FunctionType::RemoveWatermark, "");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let req = JobRequest::new("u", "sk-secret", FunctionType::RemoveWatermark, "");
        let printed = format!("{:?}", req);
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("ApiKey(****)"));
    }

    #[test]
    fn test_status_from_code() {
        assert_eq!(JobStatus::from_code("PENDING"), JobStatus::Pending);
        assert_eq!(JobStatus::from_code("RUNNING"), JobStatus::Running);
        assert_eq!(JobStatus::from_code("SUCCEEDED"), JobStatus::Succeeded);
        assert_eq!(JobStatus::from_code("FAILED"), JobStatus::Failed);
        assert_eq!(JobStatus::from_code("CANCELED"), JobStatus::Canceled);
        assert_eq!(JobStatus::from_code("SUSPENDED"), JobStatus::Unknown);
        assert!(!JobStatus::Unknown.is_terminal());
        assert!(JobStatus::Canceled.is_terminal());
    }
}
