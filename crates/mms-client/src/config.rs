//! Client configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "/alfresco/service";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the model management backend.
///
/// A config value is passed explicitly to every [`UrlBuilder`](crate::UrlBuilder)
/// and [`HttpElementStore`](crate::HttpElementStore); there is no global
/// base URL or ticket.
///
/// ```toml
/// base_url = "https://ems.example.org/alfresco/service"
/// ticket = "TICKET_abc"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service root every URL is built from
    pub base_url: String,
    /// Authentication ticket appended as `alf_ticket`
    pub ticket: Option<String>,
    /// Per-request timeout for the HTTP store
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            ticket: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_ticket(mut self, ticket: impl Into<String>) -> Self {
        self.ticket = Some(ticket.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse a config from TOML text; missing keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Failed to parse client config")?;
        Ok(config.normalized())
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read client config: {:?}", path))?;
        Self::from_toml_str(&text)
    }

    // Trailing slashes would double up when paths are appended; empty tickets
    // mean "no ticket".
    fn normalized(mut self) -> Self {
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
        if self.ticket.as_deref().is_some_and(str::is_empty) {
            self.ticket = None;
        }
        self
    }
}
