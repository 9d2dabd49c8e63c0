//! Configuration module.
//!
//! Handles loading and validating `imgpipe.toml`. The file sets the
//! defaults the CLI uses for each operation; flags given on the command line
//! override them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [open]
//! auto_orient = true        # Rotate upright from EXIF orientation on open
//!
//! [resize]
//! resample = true           # Interpolated (true) or nearest-neighbour (false)
//!
//! [save]
//! quality = 85              # JPEG quality (0-100), omit for codec default
//! compression = 6           # PNG compression (0-9), omit for codec default
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::imaging::{OpenOptions, ResizeOptions, SaveOptions};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config file name looked up by the CLI.
pub const CONFIG_FILE: &str = "imgpipe.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `imgpipe.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub open: OpenConfig,
    pub resize: ResizeConfig,
    pub save: SaveConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenConfig {
    pub auto_orient: bool,
}

impl Default for OpenConfig {
    fn default() -> Self {
        Self { auto_orient: true }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub resample: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self { resample: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SaveConfig {
    /// JPEG quality (0-100). `None` or `0` leaves it to the codec.
    pub quality: Option<u8>,
    /// PNG compression level (0-9). `None` or `0` leaves it to the codec.
    pub compression: Option<u8>,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.save.quality.is_some_and(|q| q > 100) {
            return Err(ConfigError::Validation("save.quality must be 0-100".into()));
        }
        if self.save.compression.is_some_and(|c| c > 9) {
            return Err(ConfigError::Validation(
                "save.compression must be 0-9".into(),
            ));
        }
        Ok(())
    }

    pub fn open_options(&self) -> OpenOptions {
        OpenOptions {
            auto_orient: self.open.auto_orient,
        }
    }

    /// Resize options with no bounds set, carrying the configured resampling.
    pub fn resize_defaults(&self) -> ResizeOptions {
        ResizeOptions::default().with_resample(self.resize.resample)
    }

    pub fn save_options(&self) -> SaveOptions {
        let mut options = SaveOptions::default();
        if let Some(quality) = self.save.quality {
            options = options.with_quality(quality);
        }
        if let Some(compression) = self.save.compression {
            options = options.with_compression(compression);
        }
        options
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse and validate config text. Missing keys take their defaults.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from the file at `path`.
///
/// Rejects unknown keys and validates the result. A missing file yields the
/// defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `imgpipe.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imgpipe configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
# Command line flags override these values.

# ---------------------------------------------------------------------------
# Opening images
# ---------------------------------------------------------------------------
[open]
# Rotate images upright from their EXIF orientation tag right after decoding.
# Mirrored orientations cannot be corrected and are left as they are.
auto_orient = true

# ---------------------------------------------------------------------------
# Resize and crop
# ---------------------------------------------------------------------------
[resize]
# Interpolated resampling (true) or a faster nearest-neighbour copy (false).
resample = true

# ---------------------------------------------------------------------------
# Saving
# ---------------------------------------------------------------------------
[save]
# JPEG quality, 0-100. Higher is larger and less compressed.
# quality = 85

# PNG compression level, 0-9. Higher is slower and smaller.
# compression = 6
"##
}
