//! Configuration system for the sealbox CLI.

use clap::ValueEnum;
use sealbox_crypto::{Encoding, KeyMaterial};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// sealbox configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Defaults for encrypt/decrypt
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which construct seals the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Construct {
    /// XSalsa20-Poly1305, no associated data
    #[serde(rename = "secretbox")]
    #[value(name = "secretbox")]
    SecretBox,
    /// XChaCha20-Poly1305 with associated data
    #[serde(rename = "aead")]
    #[value(name = "aead")]
    Aead,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Construct::SecretBox => f.write_str("secretbox"),
            Construct::Aead => f.write_str("aead"),
        }
    }
}

/// Defaults applied when a flag is not given
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Construct used by encrypt/decrypt
    #[serde(default = "default_construct")]
    pub construct: Construct,
    /// Encoding of ciphertext input and output
    #[serde(default = "default_encoding")]
    pub encoding: Encoding,
    /// Encoding of key files and inline keys
    #[serde(default = "default_key_encoding")]
    pub key_encoding: Encoding,
    /// Key file path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,
    /// Inline key, used when no key file is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<KeyMaterial>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values

fn default_construct() -> Construct {
    Construct::Aead
}

fn default_encoding() -> Encoding {
    Encoding::Base64
}

fn default_key_encoding() -> Encoding {
    Encoding::Base64
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            construct: default_construct(),
            encoding: default_encoding(),
            key_encoding: default_key_encoding(),
            key_file: None,
            key: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;
        Ok(())
    }

    /// Get default config path
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("sealbox/config.toml")
    }

    /// Load config from default path, or create default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if reading or creating the config fails.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let path = Self::default_path();

        if path.exists() {
            Self::load(&path)
        } else {
            let config = Self::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// The configured key file with `~` expanded
    #[must_use]
    pub fn key_file(&self) -> Option<PathBuf> {
        self.defaults.key_file.as_deref().map(expand_home)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid.
    pub fn validate(&self) -> anyhow::Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            );
        }

        if let Some(path) = &self.defaults.key_file {
            if path.as_os_str().is_empty() {
                anyhow::bail!("key_file is set but empty");
            }
        }

        Ok(())
    }
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(rest),
        Err(_) => path.to_path_buf(),
    }
}
