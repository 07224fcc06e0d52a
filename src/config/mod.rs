//! Configuration management for relnotes
//!
//! Server settings come from an optional TOML file; the webhook destination
//! and the shared secret come from the environment, shape-checked before the
//! server starts so a malformed id or token fails at boot rather than at the
//! first submission.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

impl Config {
    /// Load configuration from default location or create default
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "relnotes") {
            let config_dir = proj_dirs.config_dir();
            std::fs::create_dir_all(config_dir)?;
            Ok(config_dir.join("config.toml"))
        } else {
            Ok(PathBuf::from("config.toml"))
        }
    }
}

// Discord snowflakes are 17-20 decimal digits; webhook tokens are 68
// word-or-dash characters.
static SNOWFLAKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{17,20}$").unwrap());
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w-]{68}$").unwrap());

/// Webhook destination and shared secret, sourced from the environment.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub id: String,
    pub token: String,
    pub thread_id: Option<String>,
    pub secret_key: String,
}

impl WebhookConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var("WEBHOOK_ID").ok(),
            std::env::var("WEBHOOK_TOKEN").ok(),
            std::env::var("WEBHOOK_THREAD_ID").ok(),
            std::env::var("SECRET_KEY").ok(),
        )
    }

    fn from_vars(
        id: Option<String>,
        token: Option<String>,
        thread_id: Option<String>,
        secret_key: Option<String>,
    ) -> Result<Self> {
        let id = id.context("WEBHOOK_ID environment variable not set")?;
        if !SNOWFLAKE_RE.is_match(&id) {
            bail!("WEBHOOK_ID must be a 17-20 digit webhook id");
        }

        let token = token.context("WEBHOOK_TOKEN environment variable not set")?;
        if !TOKEN_RE.is_match(&token) {
            bail!("WEBHOOK_TOKEN is not a valid webhook token");
        }

        if let Some(thread_id) = &thread_id {
            if !SNOWFLAKE_RE.is_match(thread_id) {
                bail!("WEBHOOK_THREAD_ID must be a 17-20 digit thread id");
            }
        }

        let secret_key = secret_key.context("SECRET_KEY environment variable not set")?;
        if secret_key.is_empty() {
            bail!("SECRET_KEY must not be empty");
        }

        Ok(Self {
            id,
            token,
            thread_id,
            secret_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> String {
        "a".repeat(68)
    }

    #[test]
    fn test_valid_webhook_vars() {
        let config = WebhookConfig::from_vars(
            Some("12345678901234567".to_string()),
            Some(token()),
            None,
            Some("hunter2".to_string()),
        )
        .unwrap();
        assert_eq!(config.id, "12345678901234567");
        assert!(config.thread_id.is_none());
    }

    #[test]
    fn test_thread_id_validated_when_present() {
        let result = WebhookConfig::from_vars(
            Some("12345678901234567".to_string()),
            Some(token()),
            Some("not-a-snowflake".to_string()),
            Some("hunter2".to_string()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_id_rejected() {
        let long_id = "1".repeat(21);
        for id in ["", "123", long_id.as_str(), "12345678901234567x"] {
            let result = WebhookConfig::from_vars(
                Some(id.to_string()),
                Some(token()),
                None,
                Some("hunter2".to_string()),
            );
            assert!(result.is_err(), "id {id:?} should be rejected");
        }
    }

    #[test]
    fn test_malformed_token_rejected() {
        let result = WebhookConfig::from_vars(
            Some("12345678901234567".to_string()),
            Some("short".to_string()),
            None,
            Some("hunter2".to_string()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_secret_rejected() {
        let result = WebhookConfig::from_vars(
            Some("12345678901234567".to_string()),
            Some(token()),
            None,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_default_server_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8787);
    }

    #[test]
    fn test_load_from_parses_server_table() {
        let path = std::env::temp_dir().join("relnotes-config-valid.toml");
        std::fs::write(&path, "[server]\nhost = \"0.0.0.0\"\nport = 9000\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_from_reports_malformed_config() {
        let path = std::env::temp_dir().join("relnotes-config-malformed.toml");
        std::fs::write(&path, "server = \"not a table\"").unwrap();
        let result = Config::load_from(&path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("invalid config file"));
        std::fs::remove_file(&path).ok();
    }
}
