//! File-based configuration.
//!
//! ```toml
//! staging_dir = "/var/lib/app/download"
//! endpoint_cooldown_ms = 500
//! mirror_dir = "/srv/app/classes"
//!
//! [retry]
//! max_attempts = 5
//! sleep_ms = 2000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::options::{DEFAULT_STAGING_DIR, FetchOptions};
use super::policy::RetryPolicy;
use crate::error::{FetchError, Result};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    pub staging_dir: PathBuf,
    pub endpoint_cooldown_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub mirror_dir: Option<PathBuf>,
    pub retry: RetryConfig,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub sleep_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
            endpoint_cooldown_ms: 1000,
            connect_timeout_ms: 5000,
            request_timeout_ms: 30_000,
            mirror_dir: None,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            sleep_ms: 1000,
        }
    }
}

impl FetchConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.retry_policy()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| FetchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions::default()
            .staging_dir(self.staging_dir.clone())
            .endpoint_cooldown(Duration::from_millis(self.endpoint_cooldown_ms))
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.sleep_ms),
        )
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
