//! Configuration management
//!
//! This module handles loading and parsing configuration for nominee-board.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream nominee API configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// External voting site configuration
    #[serde(default)]
    pub vote: VoteConfig,
    /// Page presentation configuration
    #[serde(default)]
    pub site: SiteConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Upstream nominee API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the category/nominee API, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout for the category listing request, in seconds
    #[serde(default = "default_list_timeout")]
    pub list_timeout_secs: u64,
    /// Timeout for the per-category request, in seconds (unbounded when unset)
    #[serde(default)]
    pub detail_timeout_secs: Option<u64>,
    /// User-Agent header sent upstream
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            list_timeout_secs: default_list_timeout(),
            detail_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "https://tcaapi.kaba.et".to_string()
}

fn default_list_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("nominee-board/{}", env!("CARGO_PKG_VERSION"))
}

impl UpstreamConfig {
    /// Timeout applied to the category listing request
    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.list_timeout_secs)
    }

    /// Timeout applied to the per-category request, if any
    pub fn detail_timeout(&self) -> Option<Duration> {
        self.detail_timeout_secs.map(Duration::from_secs)
    }
}

/// External voting site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteConfig {
    /// Base URL of the voting site; votes open `{site_url}/category/{id}`
    #[serde(default = "default_vote_site_url")]
    pub site_url: String,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            site_url: default_vote_site_url(),
        }
    }
}

fn default_vote_site_url() -> String {
    "https://www.tca2025.com".to_string()
}

/// Page presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Heading of the categories page
    #[serde(default = "default_title")]
    pub title: String,
    /// Sub-heading of the categories page
    #[serde(default = "default_tagline")]
    pub tagline: String,
    /// Seconds a rendered page may be served before revalidation
    #[serde(default = "default_revalidate")]
    pub revalidate_secs: u32,
    /// Directory whose templates replace the built-in ones by name
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            tagline: default_tagline(),
            revalidate_secs: default_revalidate(),
            templates_dir: None,
        }
    }
}

fn default_title() -> String {
    "Nominee Categories".to_string()
}

fn default_tagline() -> String {
    "Browse through different categories and vote for your favorite creators.".to_string()
}

fn default_revalidate() -> u32 {
    60
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - NOMINEE_BOARD_SERVER_HOST
    /// - NOMINEE_BOARD_SERVER_PORT
    /// - NOMINEE_BOARD_UPSTREAM_BASE_URL
    /// - NOMINEE_BOARD_UPSTREAM_LIST_TIMEOUT_SECS
    /// - NOMINEE_BOARD_UPSTREAM_DETAIL_TIMEOUT_SECS
    /// - NOMINEE_BOARD_VOTE_SITE_URL
    /// - NOMINEE_BOARD_SITE_TITLE
    /// - NOMINEE_BOARD_SITE_REVALIDATE_SECS
    /// - NOMINEE_BOARD_SITE_TEMPLATES_DIR
    ///
    /// The merged result is validated before it is returned.
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("NOMINEE_BOARD_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("NOMINEE_BOARD_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }

        if let Ok(url) = std::env::var("NOMINEE_BOARD_UPSTREAM_BASE_URL") {
            self.upstream.base_url = url;
        }
        if let Ok(secs) = std::env::var("NOMINEE_BOARD_UPSTREAM_LIST_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                self.upstream.list_timeout_secs = secs;
            }
        }
        if let Ok(secs) = std::env::var("NOMINEE_BOARD_UPSTREAM_DETAIL_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                self.upstream.detail_timeout_secs = Some(secs);
            }
        }

        if let Ok(url) = std::env::var("NOMINEE_BOARD_VOTE_SITE_URL") {
            self.vote.site_url = url;
        }

        if let Ok(title) = std::env::var("NOMINEE_BOARD_SITE_TITLE") {
            self.site.title = title;
        }
        if let Ok(secs) = std::env::var("NOMINEE_BOARD_SITE_REVALIDATE_SECS") {
            if let Ok(secs) = secs.parse::<u32>() {
                self.site.revalidate_secs = secs;
            }
        }
        if let Ok(dir) = std::env::var("NOMINEE_BOARD_SITE_TEMPLATES_DIR") {
            self.site.templates_dir = Some(PathBuf::from(dir));
        }
    }

    /// Reject configurations the client cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.list_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "upstream.list_timeout_secs must be greater than zero".to_string(),
            ));
        }
        for (field, url) in [
            ("upstream.base_url", &self.upstream.base_url),
            ("vote.site_url", &self.vote.site_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be an http(s) URL, got '{}'",
                    field, url
                )));
            }
        }
        if let Some(dir) = &self.site.templates_dir {
            if !dir.is_dir() {
                return Err(ConfigError::ValidationError(format!(
                    "site.templates_dir '{}' is not a directory",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for all config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
const ENV_KEYS: [&str; 9] = [
    "NOMINEE_BOARD_SERVER_HOST",
    "NOMINEE_BOARD_SERVER_PORT",
    "NOMINEE_BOARD_UPSTREAM_BASE_URL",
    "NOMINEE_BOARD_UPSTREAM_LIST_TIMEOUT_SECS",
    "NOMINEE_BOARD_UPSTREAM_DETAIL_TIMEOUT_SECS",
    "NOMINEE_BOARD_VOTE_SITE_URL",
    "NOMINEE_BOARD_SITE_TITLE",
    "NOMINEE_BOARD_SITE_REVALIDATE_SECS",
    "NOMINEE_BOARD_SITE_TEMPLATES_DIR",
];


/// Property-based tests for configuration parsing
#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        super::CONFIG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn valid_url_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("https://tcaapi.kaba.et".to_string()),
            Just("http://localhost:4000".to_string()),
            "[a-z]{3,10}".prop_map(|host| format!("https://{}.example.com", host)),
        ]
    }

    fn valid_config_strategy() -> impl Strategy<Value = Config> {
        (
            "[a-z][a-z0-9]{0,10}",
            1u16..=65535,
            valid_url_strategy(),
            1u64..=120,
            proptest::option::of(1u64..=120),
            valid_url_strategy(),
            "[A-Za-z ]{1,20}",
            0u32..=3600,
        )
            .prop_map(
                |(host, port, base_url, list_timeout, detail_timeout, vote_url, title, revalidate)| {
                    let mut config = Config::default();
                    config.server.host = host;
                    config.server.port = port;
                    config.upstream.base_url = base_url;
                    config.upstream.list_timeout_secs = list_timeout;
                    config.upstream.detail_timeout_secs = detail_timeout;
                    config.vote.site_url = vote_url;
                    config.site.title = title;
                    config.site.revalidate_secs = revalidate;
                    config
                },
            )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// Serializing a valid config to YAML and loading it back yields the same values.
        #[test]
        fn config_roundtrip(config in valid_config_strategy()) {
            let yaml = serde_yaml::to_string(&config).expect("Failed to serialize config");

            let mut file = NamedTempFile::new().expect("Failed to create temp file");
            write!(file, "{}", yaml).expect("Failed to write config");

            let parsed = Config::load(file.path()).expect("Failed to parse config");

            prop_assert!(parsed.validate().is_ok());
            prop_assert_eq!(&config.server.host, &parsed.server.host);
            prop_assert_eq!(config.server.port, parsed.server.port);
            prop_assert_eq!(&config.upstream.base_url, &parsed.upstream.base_url);
            prop_assert_eq!(config.upstream.list_timeout_secs, parsed.upstream.list_timeout_secs);
            prop_assert_eq!(config.upstream.detail_timeout_secs, parsed.upstream.detail_timeout_secs);
            prop_assert_eq!(&config.vote.site_url, &parsed.vote.site_url);
            prop_assert_eq!(&config.site.title, &parsed.site.title);
            prop_assert_eq!(config.site.revalidate_secs, parsed.site.revalidate_secs);
        }

        /// Any port set through the environment wins over the file value.
        #[test]
        fn env_port_override(port in 1u16..=65535) {
            let _guard = lock_env();
            for key in super::ENV_KEYS {
                std::env::remove_var(key);
            }

            let mut file = NamedTempFile::new().expect("Failed to create temp file");
            write!(file, "server:\n  port: 8080\n").expect("Failed to write config");

            std::env::set_var("NOMINEE_BOARD_SERVER_PORT", port.to_string());
            let config = Config::load_with_env(file.path());
            std::env::remove_var("NOMINEE_BOARD_SERVER_PORT");

            prop_assert_eq!(config.expect("Failed to load config").server.port, port);
        }
    }
}
