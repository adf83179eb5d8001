//! Function catalog
//!
//! Describes the image functions offered to users: a label, the prompt to use
//! when the user gives none, and default parameters. The catalog is plain
//! configuration and can be loaded from JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::domain::job::{ApiKey, FunctionType, JobRequest, ValidationError};

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub function: FunctionType,
    pub label: String,
    pub default_prompt: String,
    #[serde(default)]
    pub default_parameters: Map<String, JsonValue>,
}

impl FunctionSpec {
    /// Built-in watermark removal entry
    pub fn remove_watermark() -> Self {
        Self {
            function: FunctionType::RemoveWatermark,
            label: "Remove watermark".to_string(),
            default_prompt: "去除图像中的文字".to_string(),
            default_parameters: Map::new(),
        }
    }

    /// Built-in super resolution entry, upscaling twice
    pub fn super_resolution() -> Self {
        let mut default_parameters = Map::new();
        default_parameters.insert("upscale_factor".to_string(), JsonValue::from(2));

        Self {
            function: FunctionType::SuperResolution,
            label: "Super resolution".to_string(),
            default_prompt: "图像超分。".to_string(),
            default_parameters,
        }
    }

    /// Builds a request for this function
    ///
    /// `prompt` falls back to the default prompt when `None`.
    pub fn request(
        &self,
        image_url: impl Into<String>,
        api_key: impl Into<ApiKey>,
        prompt: Option<String>,
    ) -> JobRequest {
        let mut request = JobRequest::new(
            image_url,
            api_key,
            self.function.clone(),
            prompt.unwrap_or_else(|| self.default_prompt.clone()),
        );
        request.parameters = self.default_parameters.clone();
        request
    }
}

/// Ordered set of available functions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionCatalog {
    entries: Vec<FunctionSpec>,
}

impl FunctionCatalog {
    pub fn new(entries: Vec<FunctionSpec>) -> Self {
        Self { entries }
    }

    /// Functions the service offers out of the box
    pub fn builtin() -> Self {
        Self::new(vec![
            FunctionSpec::remove_watermark(),
            FunctionSpec::super_resolution(),
        ])
    }

    /// Parses a catalog from a JSON array of entries
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn get(&self, function: &FunctionType) -> Option<&FunctionSpec> {
        self.entries.iter().find(|spec| &spec.function == function)
    }

    /// Looks up an entry by its wire identifier
    pub fn find(&self, id: &str) -> Result<&FunctionSpec, ValidationError> {
        self.get(&FunctionType::from(id))
            .ok_or_else(|| ValidationError::UnknownFunction(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionSpec> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FunctionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = FunctionCatalog::builtin();
        assert_eq!(catalog.len(), 2);

        let sr = catalog.find("super_resolution").unwrap();
        assert_eq!(sr.default_prompt, "图像超分。");
        assert_eq!(sr.default_parameters.get("upscale_factor"), Some(&JsonValue::from(2)));
        assert_eq!(
            catalog.get(&FunctionType::RemoveWatermark),
            Some(&FunctionSpec::remove_watermark())
        );

        assert_eq!(
            catalog.find("colorization"),
            Err(ValidationError::UnknownFunction("colorization".to_string()))
        );
    }

    #[test]
    fn test_request_uses_defaults() {
        let catalog = FunctionCatalog::builtin();
        let spec = catalog.get(&FunctionType::SuperResolution).unwrap();

        let req = spec.request("https://x/img.jpg", "k", None);
        assert_eq!(req.function, FunctionType::SuperResolution);
        assert_eq!(req.prompt, "图像超分。");
        assert_eq!(req.parameters.get("upscale_factor"), Some(&JsonValue::from(2)));

        let req = spec.request("https://x/img.jpg", "k", Some("sharper".to_string()));
        assert_eq!(req.prompt, "sharper");
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"[
            {"function": "colorization", "label": "Colorize", "default_prompt": "colorize"},
            {"function": "super_resolution", "label": "Upscale x4",
             "default_prompt": "upscale", "default_parameters": {"upscale_factor": 4}}
        ]"#;

        let catalog = FunctionCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);

        let colorize = catalog.find("colorization").unwrap();
        assert_eq!(colorize.function, FunctionType::Other("colorization".to_string()));
        assert!(colorize.default_parameters.is_empty());

        let upscale = catalog.get(&FunctionType::SuperResolution).unwrap();
        assert_eq!(upscale.default_parameters.get("upscale_factor"), Some(&JsonValue::from(4)));
    }
}
