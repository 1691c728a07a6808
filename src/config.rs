//! Export settings, optionally loaded from a TOML file.

#[cfg(feature = "serde")]
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Quality used when neither the config file nor the command line sets one.
pub const DEFAULT_QUALITY: u8 = 90;

/// Errors produced while loading or validating export settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serde")]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("quality must be within 1..=100, got {0}")]
    QualityOutOfRange(u8),
}

/// How decoded images are written out.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ExportConfig {
    /// JPEG quality, 1..=100.
    pub quality: u8,
    /// Export every CAFF frame as `<stem>_<n>.jpg` instead of only the first as `<stem>.jpg`.
    pub all_frames: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            all_frames: false,
        }
    }
}

impl ExportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::QualityOutOfRange(self.quality));
        }
        Ok(())
    }

    /// Parse settings from TOML text. Missing keys take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: ExportConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read settings from a TOML file.
    #[cfg(feature = "serde")]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}
