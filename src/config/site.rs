//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Environment variable that overrides the configured content API endpoint
pub const ENDPOINT_ENV_VAR: &str = "CONTENT_API_ENDPOINT";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,

    // Content API
    /// Base URL of the headless content API
    pub api_endpoint: String,
    /// Document type queried for blog posts
    pub document_type: String,
    /// Number of posts per listing page
    pub page_size: usize,

    // Directory
    pub public_dir: String,

    // Display
    /// Words-per-minute rate for the reading time estimate
    pub words_per_minute: usize,

    // Server
    /// Seconds before the listing page is considered stale
    pub revalidate_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            description: String::new(),

            api_endpoint: String::new(),
            document_type: "publication".to_string(),
            page_size: 2,

            public_dir: "public".to_string(),

            words_per_minute: 200,

            revalidate_secs: 10,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment overrides (currently only the API endpoint)
    pub fn apply_env(&mut self) {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV_VAR) {
            self.api_endpoint = endpoint;
        }
    }

    /// Fail fast on an unusable configuration instead of letting the first
    /// fetch blow up with an undefined endpoint
    pub fn validate(&self) -> Result<()> {
        if self.api_endpoint.trim().is_empty() {
            return Err(Error::Configuration(format!(
                "no content API endpoint configured; set `api_endpoint` in _config.yml or the {} environment variable",
                ENDPOINT_ENV_VAR
            )));
        }

        if !self.api_endpoint.starts_with("http://") && !self.api_endpoint.starts_with("https://") {
            return Err(Error::Configuration(format!(
                "content API endpoint must be an absolute http(s) URL, got `{}`",
                self.api_endpoint
            )));
        }

        if self.page_size == 0 {
            return Err(Error::Configuration(
                "page_size must be at least 1".to_string(),
            ));
        }

        if self.words_per_minute == 0 {
            return Err(Error::Configuration(
                "words_per_minute must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "spacetraveling");
        assert_eq!(config.document_type, "publication");
        assert_eq!(config.page_size, 2);
        assert_eq!(config.words_per_minute, 200);
        assert_eq!(config.revalidate_secs, 10);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
api_endpoint: https://myrepo.cdn.example.com/api/v2
page_size: 5
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.api_endpoint, "https://myrepo.cdn.example.com/api/v2");
        assert_eq!(config.page_size, 5);
        // untouched fields keep their defaults
        assert_eq!(config.document_type, "publication");
    }

    #[test]
    fn test_validate_missing_endpoint() {
        let config = SiteConfig::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_validate_zero_words_per_minute() {
        // a zero rate would divide by zero in the reading time estimate
        let config = SiteConfig {
            api_endpoint: "https://myrepo.cdn.example.com/api/v2".to_string(),
            words_per_minute: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_validate_relative_endpoint() {
        let config = SiteConfig {
            api_endpoint: "myrepo.example.com".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ok() {
        let config = SiteConfig {
            api_endpoint: "https://myrepo.cdn.example.com/api/v2".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
