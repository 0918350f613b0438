//! Client config load/save for `~/.ikb/config.yaml` (service.*, session.*).

use std::path::{Path, PathBuf};

use crate::client::DEFAULT_ENDPOINT;

/// Greeting that seeds a new conversation unless the config overrides it.
pub const DEFAULT_GREETING: &str =
    "Hello! I'm your Knowledge Base Assistant. How can I help you today?";

/// Service section (endpoint).
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ServiceSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Session section (greeting). An empty greeting starts with an empty log.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default)]
    pub session: SessionSection,
}

impl Config {
    pub fn endpoint(&self) -> &str {
        self.service.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// `None` when the greeting is configured as an empty string.
    pub fn greeting(&self) -> Option<&str> {
        match self.session.greeting.as_deref() {
            None => Some(DEFAULT_GREETING),
            Some("") => None,
            Some(g) => Some(g),
        }
    }

    /// Copy with every default written out, for `--init-config`.
    pub fn resolved(&self) -> Config {
        Config {
            service: ServiceSection {
                endpoint: Some(self.endpoint().to_string()),
            },
            session: SessionSection {
                greeting: Some(self.greeting().unwrap_or_default().to_string()),
            },
        }
    }
}

/// Returns the default config file path: `~/.ikb/config.yaml` (platform-specific).
pub fn default_config_path() -> Option<PathBuf> {
    let home = home_dir()?;
    Some(home.join(".ikb").join("config.yaml"))
}

#[cfg(unix)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(windows)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE").map(PathBuf::from)
}

#[cfg(not(any(unix, windows)))]
fn home_dir() -> Option<PathBuf> {
    None
}

/// Load config from a YAML file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load config, treating a missing file as the default config.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    load(path)
}

/// Save config to a YAML file. Creates parent directory if missing.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let io_err = |source: std::io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let contents = serde_yaml::to_string(config).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, contents).map_err(io_err)
}

/// Config load/save error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}
