// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the Embedly client

use std::env;

/// Default metadata API host (oembed, extract, custom endpoints)
pub const DEFAULT_API_URL: &str = "http://api.embed.ly/1";
/// Default display API host (crop, resize)
pub const DEFAULT_DISPLAY_URL: &str = "http://i.embed.ly/1";
/// Identifying User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "rust-embedly";

/// Configuration for the Embedly client
#[derive(Debug, Clone)]
pub struct EmbedlyConfig {
    /// Embedly API key, sent as `key` on every request
    pub api_key: String,
    /// Base URL of the metadata API
    pub api_url: String,
    /// Base URL of the display API
    pub display_url: String,
    /// User-Agent header value
    pub user_agent: String,
    /// Total request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl EmbedlyConfig {
    /// Create a configuration with default hosts for the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables
    ///
    /// `EMBEDLY_API_KEY` is read as-is; call [`validate`](Self::validate)
    /// before handing the config to a client.
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("EMBEDLY_API_KEY").unwrap_or_default(),
            api_url: env::var("EMBEDLY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            display_url: env::var("EMBEDLY_DISPLAY_URL")
                .unwrap_or_else(|_| DEFAULT_DISPLAY_URL.to_string()),
            user_agent: env::var("EMBEDLY_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            request_timeout_ms: env::var("EMBEDLY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30000),
        }
    }

    /// Point both hosts at the same base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.api_url = base_url.clone();
        self.display_url = base_url;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("API key is required (set EMBEDLY_API_KEY)".to_string());
        }
        for (name, value) in [("API URL", &self.api_url), ("display URL", &self.display_url)] {
            if url::Url::parse(value).is_err() {
                return Err(format!("{} is not a valid URL: {}", name, value));
            }
        }
        if self.request_timeout_ms == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for EmbedlyConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            display_url: DEFAULT_DISPLAY_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_ms: 30000,
        }
    }
}
