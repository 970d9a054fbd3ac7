//! Loader configuration, read from a `defstack.toml` file or built in code.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where definitions live and how their documents are shaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Directory scanned for resource documents. Relative paths in a config
    /// file are resolved against the file's directory.
    pub root: PathBuf,
    /// Document file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Reserved key naming an inline object's concrete type.
    #[serde(default = "default_discriminator")]
    pub discriminator: String,
}

fn default_extension() -> String {
    "json".to_string()
}

fn default_discriminator() -> String {
    "$type".to_string()
}

impl LoaderConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: default_extension(),
            discriminator: default_discriminator(),
        }
    }

    /// Parses a TOML config. `root` is taken as written.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(contents)?;
        config.normalize()?;
        Ok(config)
    }

    /// Loads a TOML config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents)?;
        if config.root.is_relative() {
            if let Some(dir) = path.parent() {
                config.root = dir.join(&config.root);
            }
        }
        info!("Loaded loader config from {:?}", path);
        Ok(config)
    }

    fn normalize(&mut self) -> Result<(), ConfigError> {
        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(ConfigError::Invalid("extension must not be empty".into()));
        }
        self.extension = extension.to_owned();
        if self.discriminator.is_empty() {
            return Err(ConfigError::Invalid("discriminator must not be empty".into()));
        }
        Ok(())
    }
}
