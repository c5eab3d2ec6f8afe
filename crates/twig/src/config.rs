//! Configuration management for twig.
//!
//! Configuration lives in a YAML file under the user's config directory
//! (`$XDG_CONFIG_HOME/twig/config.yaml` on Linux). The Jira connection
//! values can additionally be overridden through environment variables so
//! CI jobs never have to write a token to disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Directory name under the platform config root.
pub const CONFIG_DIR_NAME: &str = "twig";

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Environment override for the Jira base URL.
pub const ENV_BASE_URL: &str = "TWIG_JIRA_BASE_URL";

/// Environment override for the Jira API token.
pub const ENV_TOKEN: &str = "TWIG_JIRA_TOKEN";

/// Replacement text used when displaying the token.
const MASKED: &str = "***masked***";

/// Top-level configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Jira connection settings.
    #[serde(default)]
    pub jira: JiraConfig,

    /// CLI presentation settings.
    #[serde(default)]
    pub cli: CliConfig,
}

/// Jira connection section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JiraConfig {
    /// Base URL of the Jira instance, e.g. `https://your-domain.atlassian.net`.
    #[serde(default)]
    pub base_url: String,

    /// Personal Access Token used as a bearer token.
    #[serde(default)]
    pub token: String,
}

/// CLI presentation section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    /// Default output format (table, json, yaml).
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Whether colored output is enabled.
    #[serde(default = "default_color")]
    pub color: bool,

    /// Whether verbose output is enabled.
    #[serde(default)]
    pub verbose: bool,
}

fn default_output_format() -> String {
    "table".to_string()
}

fn default_color() -> bool {
    true
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output_format: default_output_format(),
            color: default_color(),
            verbose: false,
        }
    }
}

impl Config {
    /// Path of the configuration file under the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform has no config directory.
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::Config("could not determine config directory".to_string()))
    }

    /// Load configuration from the default location, applying environment
    /// overrides. A missing file yields the defaults rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        let config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        Ok(config.overridden_from(|name| std::env::var(name).ok()))
    }

    /// Load configuration from an explicit file path.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save configuration to a file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment overrides for the Jira connection values.
    ///
    /// The lookup function is injected so tests do not mutate process-global
    /// environment state.
    #[must_use]
    pub fn overridden_from(mut self, get: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = get(ENV_BASE_URL) {
            self.jira.base_url = base_url;
        }
        if let Some(token) = get(ENV_TOKEN) {
            self.jira.token = token;
        }
        self
    }

    /// Set a configuration value by dotted key, e.g. `jira.base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown sections, unknown fields, or a key that
    /// is not of the `section.field` form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let (section, field) = key.split_once('.').ok_or_else(|| {
            Error::Config(format!(
                "invalid key format: '{key}'. Use section.key (e.g. jira.base_url)"
            ))
        })?;

        match section {
            "jira" => match field {
                "base_url" => self.jira.base_url = value.to_string(),
                "token" => self.jira.token = value.to_string(),
                _ => {
                    return Err(Error::Config(format!("unknown jira config field: {field}")));
                }
            },
            "cli" => match field {
                "output_format" => self.cli.output_format = value.to_string(),
                "color" => self.cli.color = value.eq_ignore_ascii_case("true"),
                "verbose" => self.cli.verbose = value.eq_ignore_ascii_case("true"),
                _ => {
                    return Err(Error::Config(format!("unknown cli config field: {field}")));
                }
            },
            _ => {
                return Err(Error::Config(format!("unknown config section: {section}")));
            }
        }

        Ok(())
    }

    /// A copy with the token replaced by a mask, for display.
    #[must_use]
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        if !masked.jira.token.is_empty() {
            masked.jira.token = MASKED.to_string();
        }
        masked
    }
}
