//! Controller configuration
//!
//! Polling cadence and the optional polling limit.

use std::time::Duration;

/// Default time between two status lookups
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Longest accepted time between two status lookups
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Lifecycle controller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// How often a polling job asks the service for its status
    pub poll_interval: Duration,

    /// Give up polling after this long; `None` polls until a terminal status
    pub max_poll_duration: Option<Duration>,
}

impl LifecycleConfig {
    /// Creates a configuration with defaults
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_duration: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - RETOUCH_POLL_INTERVAL (optional, seconds, default: 3)
    /// - RETOUCH_MAX_POLL_DURATION (optional, seconds, default: unbounded, 0 = unbounded)
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::new();

        if let Some(secs) = env_secs("RETOUCH_POLL_INTERVAL")? {
            config.poll_interval = Duration::from_secs(secs);
        }

        if let Some(secs) = env_secs("RETOUCH_MAX_POLL_DURATION")? {
            config.max_poll_duration = (secs > 0).then(|| Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_poll_duration(mut self, limit: Duration) -> Self {
        self.max_poll_duration = Some(limit);
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.poll_interval > MAX_POLL_INTERVAL {
            anyhow::bail!(
                "poll_interval must be at most {} seconds",
                MAX_POLL_INTERVAL.as_secs()
            );
        }

        if let Some(limit) = self.max_poll_duration {
            if limit < self.poll_interval {
                anyhow::bail!("max_poll_duration must be at least one poll_interval");
            }
        }

        Ok(())
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn env_secs(name: &str) -> anyhow::Result<Option<u64>> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} must be a whole number of seconds", name)),
        Err(_) => Ok(None),
    }
}
