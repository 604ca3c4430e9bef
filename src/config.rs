//! Configuration persistence for snapevidence settings

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::annotations::ToolDefaults;
use crate::domain::{Color, Font, StrokeStyle};
use crate::report::DEFAULT_TITLE;

/// Engine settings persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Outline color for rectangles, arrows and freehand strokes
    pub stroke_color: Color,
    /// Stroke width in image pixels
    pub stroke_width: f32,
    /// Whether to add a dark outline under strokes
    pub shadow: bool,
    /// Glyph height for text annotations
    pub font_size: f32,
    pub text_color: Color,
    /// Fill for redactions. It replaces the covered pixels, so an alpha
    /// below 1 gives translucent output pixels, not a view of the base
    pub redaction_color: Color,
    /// Highlights are blended, so this is normally translucent
    pub highlight_color: Color,
    pub report_title: String,
    /// Widest image embedded in a report bundle (None = full size)
    pub embed_max_width_px: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stroke_color: Color::RED,
            stroke_width: 3.0,
            shadow: true,
            font_size: 16.0,
            text_color: Color::RED,
            redaction_color: Color::BLACK,
            highlight_color: Color::YELLOW.with_alpha(0.35),
            report_title: DEFAULT_TITLE.to_string(),
            embed_max_width_px: Some(1200),
        }
    }
}

impl EngineConfig {
    /// Directory name under the platform config directory
    pub const ID: &'static str = "snapevidence";
    const FILE_NAME: &'static str = "config.json";

    /// Default config file location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join(Self::FILE_NAME))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Read configuration from `path`; missing fields take their defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path().context("No config directory available")?;
        self.save_to(&path)?;
        log::debug!("Config saved to {}", path.display());
        Ok(())
    }

    pub fn stroke(&self) -> StrokeStyle {
        StrokeStyle::new(self.stroke_color, self.stroke_width).with_shadow(self.shadow)
    }

    pub fn font(&self) -> Font {
        Font::new(self.font_size)
    }

    /// Styles applied to newly drawn annotations
    pub fn tool_defaults(&self) -> ToolDefaults {
        ToolDefaults::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = EngineConfig {
            stroke_width: 5.0,
            report_title: "Release 3.2 sign-off".to_string(),
            embed_max_width_px: None,
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(EngineConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"stroke_width": 8.0, "shadow": false}"#).unwrap();

        let config = EngineConfig::load_from(&path).unwrap();
        assert_eq!(config.stroke_width, 8.0);
        assert!(!config.shadow);
        assert_eq!(config.report_title, "Test Evidence Report");
        assert_eq!(config.embed_max_width_px, Some(1200));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        let err = EngineConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));

        assert!(EngineConfig::load_from(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_stroke_follows_settings() {
        let config = EngineConfig {
            stroke_color: Color::BLACK,
            stroke_width: 6.0,
            shadow: false,
            ..Default::default()
        };
        let stroke = config.stroke();
        assert_eq!(stroke.color, Color::BLACK);
        assert_eq!(stroke.width, 6.0);
        assert!(!stroke.shadow);
    }
}
