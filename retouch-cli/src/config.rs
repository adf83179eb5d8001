//! Configuration module
//!
//! Collects service connection settings, polling settings and the function
//! catalog from command-line flags and the environment.

use anyhow::{Context, Result};
use retouch_client::ImageEditClient;
use retouch_core::domain::catalog::FunctionCatalog;
use retouch_core::domain::job::ApiKey;
use retouch_lifecycle::LifecycleConfig;
use std::time::Duration;

/// Timeout applied to each HTTP request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the image-editing service
    pub base_url: String,
    /// Credential, if one was supplied
    pub api_key: Option<ApiKey>,
    /// Model identifier for submissions
    pub model: String,
    /// Polling settings
    pub lifecycle: LifecycleConfig,
    /// Functions the user can pick from
    pub catalog: FunctionCatalog,
}

impl Config {
    /// Builds the configuration
    ///
    /// Polling settings start from the environment and are overridden by
    /// explicit flags. Without a catalog file the built-in catalog is used.
    pub fn load(
        base_url: String,
        api_key: Option<ApiKey>,
        model: String,
        poll_interval: Option<u64>,
        max_poll_duration: Option<u64>,
        catalog_path: Option<&str>,
    ) -> Result<Self> {
        let mut lifecycle = LifecycleConfig::from_env()?;
        if let Some(secs) = poll_interval {
            lifecycle.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = max_poll_duration {
            lifecycle.max_poll_duration = (secs > 0).then(|| Duration::from_secs(secs));
        }
        lifecycle.validate()?;

        let catalog = match catalog_path {
            Some(path) => load_catalog(path)?,
            None => FunctionCatalog::builtin(),
        };

        Ok(Self {
            base_url,
            api_key,
            model,
            lifecycle,
            catalog,
        })
    }

    /// Credential as supplied; blank when missing so the controller can reject it
    pub fn api_key(&self) -> ApiKey {
        self.api_key.clone().unwrap_or_default()
    }

    /// HTTP client for the configured service
    pub fn client(&self) -> Result<ImageEditClient> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ImageEditClient::with_client(&self.base_url, http_client).with_model(&self.model))
    }
}

/// Reads a function catalog from a JSON file
fn load_catalog(path: &str) -> Result<FunctionCatalog> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path))?;

    let catalog = FunctionCatalog::from_json(&json)
        .with_context(|| format!("Failed to parse catalog file: {}", path))?;

    if catalog.is_empty() {
        anyhow::bail!("Catalog file {} lists no functions", path);
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(api_key: Option<ApiKey>) -> Config {
        Config::load(
            retouch_client::DEFAULT_BASE_URL.to_string(),
            api_key,
            retouch_client::DEFAULT_MODEL.to_string(),
            Some(3),
            Some(0),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_debug_output_redacts_api_key() {
        let config = load(Some(ApiKey::new("sk-secret-value")));

        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-secret-value"));
        assert!(printed.contains("****"));
        assert_eq!(config.api_key().expose(), "sk-secret-value");
    }

    #[test]
    fn test_missing_api_key_is_blank() {
        let config = load(None);
        assert!(config.api_key().is_blank());
        assert_eq!(config.lifecycle.max_poll_duration, None);
    }

    #[test]
    fn test_rejects_out_of_range_poll_interval() {
        let result = Config::load(
            retouch_client::DEFAULT_BASE_URL.to_string(),
            None,
            retouch_client::DEFAULT_MODEL.to_string(),
            Some(u64::MAX),
            None,
            None,
        );
        assert!(result.is_err());
    }
}
