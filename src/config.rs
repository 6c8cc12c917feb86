//! Tool configuration module.
//!
//! Handles loading, validating, and merging `resizer.toml`. Stock defaults are
//! overridden by an optional user file in the config directory (the current
//! directory unless `--config-dir` says otherwise). The file is only ever
//! read; nothing the user does at run time is written back.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [resize]
//! format = "jpeg"          # jpeg | png | gif | bmp | tiff | webp
//! width = 800              # 1-10000
//! height = 600             # 1-10000
//! quality = 95             # 1-100, used by the JPEG encoder
//! optimize = false         # best PNG compression
//! allow_upscale = false    # informational; upscaling is never blocked
//!
//! [output]
//! dir = "."                # where resized_<name> files are written
//!
//! [logging]
//! level = "error"          # off | error | warn | info | debug | trace
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse, so override just the values you want:
//!
//! ```toml
//! [resize]
//! format = "webp"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{MAX_DIMENSION, MIN_DIMENSION, Quality, TargetFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::level_filters::LevelFilter;

/// File name looked up inside the config directory.
pub const CONFIG_FILE: &str = "resizer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `resizer.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizerConfig {
    /// Defaults for every resize parameter the user can leave out.
    pub resize: ResizeDefaults,
    /// Where output files go.
    pub output: OutputConfig,
    /// Logger settings.
    pub logging: LoggingConfig,
}

impl ResizerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("resize.width", self.resize.width),
            ("resize.height", self.resize.height),
        ] {
            if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be {MIN_DIMENSION}-{MAX_DIMENSION}"
                )));
            }
        }
        if !(Quality::MIN..=Quality::MAX).contains(&self.resize.quality) {
            return Err(ConfigError::Validation(format!(
                "resize.quality must be {}-{}",
                Quality::MIN,
                Quality::MAX
            )));
        }
        self.logging.level_filter()?;
        Ok(())
    }
}

/// Defaults for resize parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeDefaults {
    /// Output encoding.
    pub format: TargetFormat,
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Lossy encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Spend more effort on compression (PNG).
    pub optimize: bool,
    /// Recorded in the request; upscaling is never blocked.
    pub allow_upscale: bool,
}

impl Default for ResizeDefaults {
    fn default() -> Self {
        Self {
            format: TargetFormat::Jpeg,
            width: 800,
            height: 600,
            quality: Quality::default().value(),
            optimize: false,
            allow_upscale: false,
        }
    }
}

/// Output location settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory output files are written into.
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

/// Logger settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Maximum level written: `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "error".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.level
            .parse()
            .map_err(|_| ConfigError::Validation(format!("unknown logging.level: {}", self.level)))
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ResizerConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `resizer.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ResizerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ResizerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `resizer.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<ResizerConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `resizer.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Image Resizer Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# This file is read from the config directory (default: the current
# directory, override with --config-dir). Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Resize defaults (used when a flag is not given on the command line)
# ---------------------------------------------------------------------------
[resize]
# Output encoding: jpeg, png, gif, bmp, tiff or webp.
# The output keeps the source file's name, so converting photo.jpg to png
# still writes resized_photo.jpg (containing PNG data).
format = "jpeg"

# Target size in pixels, 1-10000 each. The image is stretched to exactly
# this size; aspect ratio is not preserved.
width = 800
height = 600

# Lossy encoding quality (1 = worst, 100 = best). Applies to JPEG.
quality = 95

# Use the slowest, smallest PNG compression.
optimize = false

# Recorded for diagnostics only: targets larger than the source are always
# honored.
allow_upscale = false

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Directory that resized_<name> files are written into.
dir = "."

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
# off, error, warn, info, debug or trace. Logs go to stderr.
level = "error"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = ResizerConfig::default();
        assert_eq!(config.resize.format, TargetFormat::Jpeg);
        assert_eq!((config.resize.width, config.resize.height), (800, 600));
        assert_eq!(config.resize.quality, 95);
        assert!(!config.resize.optimize);
        assert!(!config.resize.allow_upscale);
        assert_eq!(config.output.dir, PathBuf::from("."));
        assert_eq!(config.logging.level, "error");
    }

    #[test]
    fn default_config_is_valid() {
        assert!(ResizerConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[resize]
format = "webp"
"#;
        let config: ResizerConfig = toml::from_str(toml).unwrap();
        // Overridden value
        assert_eq!(config.resize.format, TargetFormat::Webp);
        // Default values preserved
        assert_eq!(config.resize.width, 800);
        assert_eq!(config.logging.level, "error");
    }

    #[test]
    fn parse_rejects_unknown_keys() {
        let toml = r#"
[resize]
widht = 100
"#;
        assert!(toml::from_str::<ResizerConfig>(toml).is_err());
    }

    #[test]
    fn parse_rejects_unknown_format() {
        let toml = r#"
[resize]
format = "avif"
"#;
        assert!(toml::from_str::<ResizerConfig>(toml).is_err());
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_rejects_zero_width() {
        let mut config = ResizerConfig::default();
        config.resize.width = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("resize.width")
        ));
    }

    #[test]
    fn validate_rejects_huge_height() {
        let mut config = ResizerConfig::default();
        config.resize.height = 10_001;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("resize.height")
        ));
    }

    #[test]
    fn validate_rejects_quality_out_of_range() {
        let mut config = ResizerConfig::default();
        config.resize.quality = 0;
        assert!(config.validate().is_err());
        config.resize.quality = 101;
        assert!(config.validate().is_err());
        config.resize.quality = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_unknown_level() {
        let mut config = ResizerConfig::default();
        config.logging.level = "loud".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn level_filter_parses_names() {
        let mut logging = LoggingConfig::default();
        assert_eq!(logging.level_filter().unwrap(), LevelFilter::ERROR);
        logging.level = "debug".to_string();
        assert_eq!(logging.level_filter().unwrap(), LevelFilter::DEBUG);
        logging.level = "off".to_string();
        assert_eq!(logging.level_filter().unwrap(), LevelFilter::OFF);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_overlay_replaces_leaf_values() {
        let base: toml::Value = toml::from_str("[resize]\nwidth = 1\nheight = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[resize]\nheight = 5").unwrap();
        let merged = merge_toml(base, overlay);

        assert_eq!(merged["resize"]["width"].as_integer(), Some(1));
        assert_eq!(merged["resize"]["height"].as_integer(), Some(5));
    }

    #[test]
    fn merge_adds_new_tables() {
        let base: toml::Value = toml::from_str("[resize]\nwidth = 1").unwrap();
        let overlay: toml::Value = toml::from_str("[output]\ndir = \"out\"").unwrap();
        let merged = merge_toml(base, overlay);

        assert_eq!(merged["resize"]["width"].as_integer(), Some(1));
        assert_eq!(merged["output"]["dir"].as_str(), Some("out"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, ResizerConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[resize]
width = 1920
quality = 80

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.resize.width, 1920);
        assert_eq!(config.resize.quality, 80);
        assert_eq!(config.logging.level, "debug");
        // Unspecified values should be defaults
        assert_eq!(config.resize.height, 600);
        assert_eq!(config.output.dir, PathBuf::from("."));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_out_of_range_is_validation_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[resize]\nwidth = 0\n").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock config
    // =========================================================================

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: ResizerConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, ResizerConfig::default());
    }
}
