//! CLI configuration.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use turbo_catalog::EditorConfig;
use turbo_data::FetchClient;

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Validation switches shared with the product editor.
    #[serde(default)]
    pub editor: EditorConfig,

    /// Admin API connection.
    #[serde(default)]
    pub api: ApiConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

/// Admin API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the admin API, e.g. `https://admin.example.com/api`.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Headers sent with every request.
    #[serde(default)]
    pub default_headers: HashMap<String, String>,

    /// Bearer token. `CATALOG_API_TOKEN` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: default_timeout_ms(),
            default_headers: HashMap::new(),
            token: None,
        }
    }
}

impl ApiConfig {
    /// Build an HTTP client for the configured API.
    pub fn client(&self) -> Result<FetchClient> {
        let base_url = self
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .context("No API configured: set api.base_url in catalog.toml")?;

        let mut client = FetchClient::new()
            .with_base_url(base_url)
            .with_timeout(Duration::from_millis(self.timeout_ms));
        for (key, value) in &self.default_headers {
            client = client.with_default_header(key.as_str(), value.as_str());
        }

        let token = std::env::var("CATALOG_API_TOKEN")
            .ok()
            .or_else(|| self.token.clone());
        if let Some(token) = token {
            client = client.with_default_header("Authorization", format!("Bearer {}", token));
        }
        Ok(client)
    }
}

/// Generate a default catalog.toml config file.
pub fn generate_default_config() -> String {
    r#"# Catalog CLI configuration

[editor]
# "explicit_choice": a required yes/no attribute accepts either answer.
# "must_be_true": only "yes" satisfies it.
required_boolean = "explicit_choice"
require_thumbnail = true
require_gallery = true

[api]
# base_url = "https://admin.example.com/api"
timeout_ms = 10000

[api.default_headers]
# X-Tenant = "acme"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.editor, EditorConfig::default());
        assert_eq!(config.api.timeout_ms, 10_000);
        assert!(config.api.base_url.is_none());
    }

    #[test]
    fn test_client_requires_base_url() {
        assert!(ApiConfig::default().client().is_err());

        let api = ApiConfig {
            base_url: Some("https://admin.example.com/api".into()),
            ..ApiConfig::default()
        };
        let client = api.client().unwrap();
        assert_eq!(client.base_url(), Some("https://admin.example.com/api"));
    }
}
