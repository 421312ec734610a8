//! Client configuration
//!
//! The crate reads no files or environment variables itself. Applications
//! that keep rendering settings in TOML can parse them with
//! [`RenderConfig::from_toml_str`]:
//!
//! ```toml
//! default_server = "https://www.plantuml.com/plantuml"
//! retry_delay_ms = 2000
//! user_agent = "my-docs-builder/1.0"
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::request::DEFAULT_SERVER;
use crate::retry::{RetryPolicy, DEFAULT_RETRY_DELAY};

/// Settings for [`crate::PlantUmlClient`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Server used for encoded GET requests when no explicit server is given
    pub default_server: String,
    /// Delay before retrying a `403 Forbidden`, in milliseconds
    pub retry_delay_ms: u64,
    /// User-Agent header; reqwest's default when unset
    pub user_agent: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_server: DEFAULT_SERVER.to_string(),
            retry_delay_ms: DEFAULT_RETRY_DELAY.as_millis() as u64,
            user_agent: None,
        }
    }
}

impl RenderConfig {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Retry policy described by these settings
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new().with_delay(Duration::from_millis(self.retry_delay_ms))
    }
}
