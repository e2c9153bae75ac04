//! Configuration management for the Surround SCM bridge
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (SSCM_*)
//! 3. Config file (~/.config/sscm-bridge/config.toml)
//! 4. Default values

use std::path::PathBuf;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Port the Surround server listens on unless told otherwise
pub const DEFAULT_PORT: u16 = 4900;

/// Placeholder in a release filter that is replaced by the release number
pub const RELEASE_PLACEHOLDER: &str = "%RELNO%";

/// Connection settings for the sscm client
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Path to the sscm executable
    pub exe_path: String,

    /// Server as `host` or `host:port`
    pub server: String,

    /// User name
    pub username: String,

    /// Password; only sent along with a user name
    pub password: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            exe_path: "sscm".to_string(),
            server: String::new(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl ServerConfig {
    /// The server with the default port appended when none was given
    ///
    /// Returns an empty string when no server is configured.
    pub fn server_with_port(&self) -> String {
        if self.server.is_empty() {
            String::new()
        } else if self.server.contains(':') {
            self.server.clone()
        } else {
            format!("{}:{}", self.server, DEFAULT_PORT)
        }
    }
}

/// Label-related configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Pattern matching folder paths to a release, e.g. `Release %RELNO%`
    pub release_filter: Option<String>,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Server connection configuration
    pub server: ServerConfig,

    /// Label configuration
    pub labels: LabelConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/sscm-bridge/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sscm-bridge").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - SSCM_EXE_PATH: Path to the sscm executable
    /// - SSCM_SERVER: Server host[:port]
    /// - SSCM_USER: User name
    /// - SSCM_PASSWORD: Password
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(exe_path) = std::env::var("SSCM_EXE_PATH") {
            self.server.exe_path = exe_path;
        }

        if let Ok(server) = std::env::var("SSCM_SERVER") {
            self.server.server = server;
        }

        if let Ok(username) = std::env::var("SSCM_USER") {
            self.server.username = username;
        }

        if let Ok(password) = std::env::var("SSCM_PASSWORD") {
            self.server.password = password;
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, overrides: ServerOverrides) -> Self {
        if let Some(exe_path) = overrides.exe_path {
            self.server.exe_path = exe_path;
        }

        if let Some(server) = overrides.server {
            self.server.server = server;
        }

        if let Some(username) = overrides.username {
            self.server.username = username;
        }

        if let Some(password) = overrides.password {
            self.server.password = password;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(overrides: ServerOverrides) -> Result<Self> {
        Ok(Self::load()?.with_env_overrides().with_cli_overrides(overrides))
    }

    /// Compile the configured release filter for a release number
    pub fn release_filter(&self, release: &str) -> Result<ReleaseFilter> {
        ReleaseFilter::new(self.labels.release_filter.as_deref(), release)
    }
}

/// Server settings supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ServerOverrides {
    /// Path to the sscm executable
    pub exe_path: Option<String>,

    /// Server as `host` or `host:port`
    pub server: Option<String>,

    /// User name
    pub username: Option<String>,

    /// Password
    pub password: Option<String>,
}

/// Matches folder paths against a release-specific pattern
#[derive(Debug, Clone)]
pub struct ReleaseFilter {
    regex: Regex,
}

impl ReleaseFilter {
    /// Build a filter from a pattern containing [`RELEASE_PLACEHOLDER`]
    ///
    /// A missing or empty pattern matches any path containing the release
    /// number. Matching is case-insensitive.
    pub fn new(pattern: Option<&str>, release: &str) -> Result<Self> {
        let pattern = pattern
            .filter(|p| !p.is_empty())
            .unwrap_or(RELEASE_PLACEHOLDER);
        let expanded = pattern.replace(RELEASE_PLACEHOLDER, &regex::escape(release));

        let regex = RegexBuilder::new(&expanded)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::Config(format!("Invalid release filter '{}': {}", pattern, e)))?;

        Ok(Self { regex })
    }

    /// Check whether a folder path belongs to the release
    pub fn matches(&self, folder_path: &str) -> bool {
        self.regex.is_match(folder_path)
    }
}
