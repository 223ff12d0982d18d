//! Configuration types for the viewer.
//!
//! Settings are read from TOML. Every field has a default, so an empty file
//! is a valid configuration:
//!
//! ```toml
//! [display]
//! scale = "auto"          # or a percentage, e.g. 150
//! min_scale_percent = 10
//! max_scale_percent = 800
//! background = [0, 0, 0]
//!
//! [input]
//! win_key_ignore = true
//! ```

use crate::errors::ClientError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Complete viewer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Display settings.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Input settings.
    #[serde(default)]
    pub input: InputConfig,
    /// Clipboard settings.
    #[serde(default)]
    pub clipboard: ClipboardConfig,
}

/// Initial scale: `"auto"` or a whole percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScaleValue", into = "ScaleValue")]
pub enum ScaleSetting {
    /// Fit the remote screen into the window, never enlarging.
    Auto,
    /// Fixed percentage.
    Percent(u32),
}

impl Default for ScaleSetting {
    fn default() -> Self {
        Self::Percent(100)
    }
}

impl fmt::Display for ScaleSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Percent(p) => write!(f, "{}%", p),
        }
    }
}

/// Wire form of [`ScaleSetting`]: a bare number or a string.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ScaleValue {
    Percent(u32),
    Name(String),
}

impl TryFrom<ScaleValue> for ScaleSetting {
    type Error = String;

    fn try_from(value: ScaleValue) -> Result<Self, Self::Error> {
        match value {
            ScaleValue::Percent(p) => Ok(Self::Percent(p)),
            ScaleValue::Name(name) => {
                let name = name.trim();
                if name.eq_ignore_ascii_case("auto") {
                    return Ok(Self::Auto);
                }
                name.trim_end_matches('%')
                    .parse::<u32>()
                    .map(Self::Percent)
                    .map_err(|_| format!("invalid scale '{}', expected \"auto\" or a percentage", name))
            }
        }
    }
}

impl From<ScaleSetting> for ScaleValue {
    fn from(setting: ScaleSetting) -> Self {
        match setting {
            ScaleSetting::Auto => Self::Name("auto".to_string()),
            ScaleSetting::Percent(p) => Self::Percent(p),
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Scale applied when the viewer starts.
    #[serde(default)]
    pub scale: ScaleSetting,
    /// Smallest accepted scale percentage.
    #[serde(default = "default_min_scale_percent")]
    pub min_scale_percent: u32,
    /// Largest accepted scale percentage.
    #[serde(default = "default_max_scale_percent")]
    pub max_scale_percent: u32,
    /// Scrollbar thickness in local pixels.
    #[serde(default = "default_scrollbar_size")]
    pub scrollbar_size: u32,
    /// Framebuffer pixels moved per scrollbar line step.
    #[serde(default = "default_scroll_line_step")]
    pub scroll_line_step: u32,
    /// Letterbox colour as `[r, g, b]`.
    #[serde(default)]
    pub background: [u8; 3],
}

fn default_min_scale_percent() -> u32 {
    10
}

fn default_max_scale_percent() -> u32 {
    800
}

fn default_scrollbar_size() -> u32 {
    16
}

fn default_scroll_line_step() -> u32 {
    16
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            scale: ScaleSetting::default(),
            min_scale_percent: default_min_scale_percent(),
            max_scale_percent: default_max_scale_percent(),
            scrollbar_size: default_scrollbar_size(),
            scroll_line_step: default_scroll_line_step(),
            background: [0, 0, 0],
        }
    }
}

/// Input configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Do not forward the Windows/Super keys.
    #[serde(default)]
    pub win_key_ignore: bool,
    /// View-only mode (no input sent to server).
    #[serde(default)]
    pub view_only: bool,
    /// Wheel clicks sent per notch.
    #[serde(default = "default_wheel_speed")]
    pub wheel_speed: u32,
    /// Capacity of the command channel to the engine.
    #[serde(default = "default_command_queue")]
    pub command_queue: usize,
}

fn default_wheel_speed() -> u32 {
    1
}

fn default_command_queue() -> usize {
    256
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            win_key_ignore: false,
            view_only: false,
            wheel_speed: default_wheel_speed(),
            command_queue: default_command_queue(),
        }
    }
}

/// Clipboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardConfig {
    /// Exchange clipboard text with the remote side.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

impl Config {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ClientError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, ClientError> {
        toml::to_string(self).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), ClientError> {
        let display = &self.display;

        if display.min_scale_percent == 0 {
            return Err(ClientError::Config(
                "Minimum scale must be at least 1%".to_string(),
            ));
        }

        if display.min_scale_percent > display.max_scale_percent {
            return Err(ClientError::Config(format!(
                "Minimum scale {}% is above maximum scale {}%",
                display.min_scale_percent, display.max_scale_percent
            )));
        }

        if display.scale == ScaleSetting::Percent(0) {
            return Err(ClientError::Config("Scale cannot be 0%".to_string()));
        }

        if display.scroll_line_step == 0 {
            return Err(ClientError::Config(
                "Scroll line step cannot be 0".to_string(),
            ));
        }

        if self.input.wheel_speed == 0 {
            return Err(ClientError::Config("Wheel speed cannot be 0".to_string()));
        }

        if self.input.command_queue == 0 {
            return Err(ClientError::Config(
                "Command queue capacity cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for creating a `Config`.
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Sets the initial scale.
    #[must_use]
    pub fn scale(mut self, scale: ScaleSetting) -> Self {
        self.config.display.scale = scale;
        self
    }

    /// Sets the accepted scale range in percent.
    #[must_use]
    pub fn scale_limits(mut self, min_percent: u32, max_percent: u32) -> Self {
        self.config.display.min_scale_percent = min_percent;
        self.config.display.max_scale_percent = max_percent;
        self
    }

    /// Sets the letterbox colour.
    #[must_use]
    pub fn background(mut self, rgb: [u8; 3]) -> Self {
        self.config.display.background = rgb;
        self
    }

    /// Ignore the Windows/Super keys.
    #[must_use]
    pub fn win_key_ignore(mut self, ignore: bool) -> Self {
        self.config.input.win_key_ignore = ignore;
        self
    }

    /// Do not forward any input.
    #[must_use]
    pub fn view_only(mut self, view_only: bool) -> Self {
        self.config.input.view_only = view_only;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<Config, ClientError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_builder() {
        let config = Config::builder()
            .scale(ScaleSetting::Auto)
            .win_key_ignore(true)
            .build()
            .unwrap();

        assert_eq!(config.display.scale, ScaleSetting::Auto);
        assert!(config.input.win_key_ignore);
        assert_eq!(config.display.scrollbar_size, 16);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_scale_forms() {
        let auto = Config::from_toml_str("[display]\nscale = \"auto\"\n").unwrap();
        assert_eq!(auto.display.scale, ScaleSetting::Auto);

        let number = Config::from_toml_str("[display]\nscale = 150\n").unwrap();
        assert_eq!(number.display.scale, ScaleSetting::Percent(150));

        let string = Config::from_toml_str("[display]\nscale = \"75%\"\n").unwrap();
        assert_eq!(string.display.scale, ScaleSetting::Percent(75));

        assert!(matches!(
            Config::from_toml_str("[display]\nscale = \"huge\"\n"),
            Err(ClientError::Toml(_))
        ));
    }

    #[test]
    fn test_parse_full_document() {
        let text = r#"
            [display]
            scale = 200
            min_scale_percent = 25
            max_scale_percent = 400
            background = [32, 32, 48]

            [input]
            win_key_ignore = true
            wheel_speed = 3

            [clipboard]
            enabled = false
        "#;
        let config = Config::from_toml_str(text).unwrap();
        assert_eq!(config.display.min_scale_percent, 25);
        assert_eq!(config.display.background, [32, 32, 48]);
        assert_eq!(config.input.wheel_speed, 3);
        assert!(!config.clipboard.enabled);
        assert_eq!(config.input.command_queue, 256);
    }

    #[test]
    fn test_config_validation_inverted_limits() {
        let err = Config::builder().scale_limits(500, 100).build().unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_config_validation_zero_values() {
        let mut config = Config::default();
        config.input.wheel_speed = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.display.scale = ScaleSetting::Percent(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip_preserves_auto() {
        let config = Config::builder().scale(ScaleSetting::Auto).build().unwrap();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("scale = \"auto\""));
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Config::load("/nonexistent/viewer.toml").unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }
}
