//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::calibration::{DEFAULT_MIN_WIDTH_PX, DEFAULT_PIXELS_PER_MM};
use crate::charts::ChartVariant;
use crate::core::errors::{AcuityError, Result};
use crate::nav::cursor::DEFAULT_CURSOR_STEP_PX;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ACUITY_CONFIG";

/// Full kiosk configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub calibration: CalibrationConfig,
    pub input: InputConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
}

/// Calibration persistence and bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalibrationConfig {
    /// JSON slot file holding the persisted scalar.
    pub file: PathBuf,
    /// Scalar used until a calibration has been saved.
    pub default_pixels_per_mm: f64,
    /// Lower bound for the calibration box width.
    pub min_width_px: u32,
}

/// Key bindings and pointer tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Pixels the virtual cursor moves per arrow press.
    pub cursor_step_px: u32,
    pub mouse_toggle_key: char,
    pub fullscreen_key: char,
}

/// Terminal surface geometry and presentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Pixel width assigned to one terminal cell.
    pub cell_width_px: u32,
    /// Pixel height assigned to one terminal cell.
    pub cell_height_px: u32,
    /// Open this chart instead of the landing view.
    pub start_chart: Option<ChartVariant>,
    /// When false, fullscreen requests are rejected by the host.
    pub allow_fullscreen: bool,
}

/// JSONL session log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub path: PathBuf,
    pub fallback_path: PathBuf,
    pub max_size_bytes: u64,
    pub max_rotated_files: u32,
}

/// Where the effective config came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
}

fn home_dir() -> PathBuf {
    env::var_os("HOME").map_or_else(
        || {
            eprintln!("[ACU-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths");
            PathBuf::from("/tmp")
        },
        PathBuf::from,
    )
}

fn data_dir() -> PathBuf {
    home_dir().join(".local").join("share").join("acuity")
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            file: data_dir().join("calibration.json"),
            default_pixels_per_mm: DEFAULT_PIXELS_PER_MM,
            min_width_px: DEFAULT_MIN_WIDTH_PX,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            cursor_step_px: DEFAULT_CURSOR_STEP_PX,
            mouse_toggle_key: 'm',
            fullscreen_key: 'f',
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cell_width_px: 8,
            cell_height_px: 16,
            start_chart: None,
            allow_fullscreen: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: data_dir().join("session.jsonl"),
            fallback_path: env::temp_dir().join("acuity-session.jsonl"),
            max_size_bytes: 4 * 1024 * 1024,
            max_rotated_files: 3,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            config_file: home_dir().join(".config").join("acuity").join("config.toml"),
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from an explicit path, `ACUITY_CONFIG`, or the default
    /// path, then apply env overrides and validate.
    ///
    /// A missing file at the default path is not an error; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let from_env = env_var(CONFIG_ENV).map(PathBuf::from);
        let explicit = path.map(Path::to_path_buf).or(from_env);
        let path_buf = explicit.clone().unwrap_or_else(Self::default_path);

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| AcuityError::Io {
                path: path_buf.clone(),
                source,
            })?;
            toml::from_str::<Self>(&raw)?
        } else if explicit.is_some() {
            return Err(AcuityError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AcuityError::Serialization {
            context: "toml",
            details: e.to_string(),
        })
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        // calibration
        if let Some(raw) = lookup("ACUITY_CALIBRATION_FILE") {
            self.calibration.file = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("ACUITY_CALIBRATION_DEFAULT_PIXELS_PER_MM") {
            self.calibration.default_pixels_per_mm =
                parse_env("ACUITY_CALIBRATION_DEFAULT_PIXELS_PER_MM", &raw)?;
        }
        if let Some(raw) = lookup("ACUITY_CALIBRATION_MIN_WIDTH_PX") {
            self.calibration.min_width_px = parse_env("ACUITY_CALIBRATION_MIN_WIDTH_PX", &raw)?;
        }

        // input
        if let Some(raw) = lookup("ACUITY_INPUT_CURSOR_STEP_PX") {
            self.input.cursor_step_px = parse_env("ACUITY_INPUT_CURSOR_STEP_PX", &raw)?;
        }
        if let Some(raw) = lookup("ACUITY_INPUT_MOUSE_TOGGLE_KEY") {
            self.input.mouse_toggle_key = parse_env("ACUITY_INPUT_MOUSE_TOGGLE_KEY", &raw)?;
        }
        if let Some(raw) = lookup("ACUITY_INPUT_FULLSCREEN_KEY") {
            self.input.fullscreen_key = parse_env("ACUITY_INPUT_FULLSCREEN_KEY", &raw)?;
        }

        // display
        if let Some(raw) = lookup("ACUITY_DISPLAY_CELL_WIDTH_PX") {
            self.display.cell_width_px = parse_env("ACUITY_DISPLAY_CELL_WIDTH_PX", &raw)?;
        }
        if let Some(raw) = lookup("ACUITY_DISPLAY_CELL_HEIGHT_PX") {
            self.display.cell_height_px = parse_env("ACUITY_DISPLAY_CELL_HEIGHT_PX", &raw)?;
        }
        if let Some(raw) = lookup("ACUITY_DISPLAY_START_CHART") {
            self.display.start_chart = Some(raw.parse()?);
        }
        if let Some(raw) = lookup("ACUITY_DISPLAY_ALLOW_FULLSCREEN") {
            self.display.allow_fullscreen = parse_env("ACUITY_DISPLAY_ALLOW_FULLSCREEN", &raw)?;
        }

        // logging
        if let Some(raw) = lookup("ACUITY_LOG_ENABLED") {
            self.logging.enabled = parse_env("ACUITY_LOG_ENABLED", &raw)?;
        }
        if let Some(raw) = lookup("ACUITY_LOG_PATH") {
            self.logging.path = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("ACUITY_LOG_MAX_SIZE_BYTES") {
            self.logging.max_size_bytes = parse_env("ACUITY_LOG_MAX_SIZE_BYTES", &raw)?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let ppm = self.calibration.default_pixels_per_mm;
        if !ppm.is_finite() || ppm <= 0.0 {
            return Err(AcuityError::InvalidConfig {
                details: format!(
                    "calibration.default_pixels_per_mm must be a positive number, got {ppm}"
                ),
            });
        }
        if self.calibration.min_width_px == 0 {
            return Err(AcuityError::InvalidConfig {
                details: "calibration.min_width_px must be >= 1".to_string(),
            });
        }
        if self.input.cursor_step_px == 0 {
            return Err(AcuityError::InvalidConfig {
                details: "input.cursor_step_px must be >= 1".to_string(),
            });
        }
        validate_binding("input.mouse_toggle_key", self.input.mouse_toggle_key)?;
        validate_binding("input.fullscreen_key", self.input.fullscreen_key)?;
        if self
            .input
            .mouse_toggle_key
            .eq_ignore_ascii_case(&self.input.fullscreen_key)
        {
            return Err(AcuityError::InvalidConfig {
                details: format!(
                    "input.mouse_toggle_key and input.fullscreen_key are both {:?}",
                    self.input.fullscreen_key
                ),
            });
        }
        if self.display.cell_width_px == 0 || self.display.cell_height_px == 0 {
            return Err(AcuityError::InvalidConfig {
                details: "display.cell_width_px and display.cell_height_px must be >= 1"
                    .to_string(),
            });
        }
        if self.logging.enabled && self.logging.max_size_bytes == 0 {
            return Err(AcuityError::InvalidConfig {
                details: "logging.max_size_bytes must be > 0 when logging is enabled".to_string(),
            });
        }
        Ok(())
    }
}

/// Reserved characters cannot be rebound: `q` quits and space activates.
fn validate_binding(name: &str, key: char) -> Result<()> {
    if key.is_control() || key.is_whitespace() || key.eq_ignore_ascii_case(&'q') {
        return Err(AcuityError::InvalidConfig {
            details: format!("{name} cannot be bound to {key:?}"),
        });
    }
    Ok(())
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|error| AcuityError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}
