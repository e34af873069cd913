//! Render configuration
//!
//! Uses RON (Rusty Object Notation) for human-readable settings files.
//! Every field is optional in the file; missing ones take the defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use crate::rasterizer::{Color, RasterSettings, Reflection, ShadingMode, Vec3, HEIGHT, WIDTH};
use crate::scene::Camera;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// `None` disables drawing
    pub shading: Option<ShadingMode>,
    pub reflection: Reflection,
    pub wire_color: Color,
    pub background: Color,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub light: Vec3,
    pub light_follows_camera: bool,
    /// Image applied to the demo sphere instead of the checkerboard
    pub texture: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let settings = RasterSettings::default();
        let camera = Camera::default();
        Self {
            width: WIDTH,
            height: HEIGHT,
            fov_y: camera.fov_y,
            near: settings.near,
            far: settings.far,
            shading: settings.shading,
            reflection: settings.reflection,
            wire_color: settings.wire_color,
            background: settings.background,
            camera_position: camera.position,
            camera_target: camera.target,
            light: Vec3::new(10.0, 10.0, -10.0),
            light_follows_camera: true,
            texture: None,
        }
    }
}

impl FromStr for RenderConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: RenderConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

impl RenderConfig {
    /// Load and validate a config from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config: RenderConfig = contents.parse()?;
        info!("loaded render config from {}", path.display());
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "viewport {}x{} has no pixels",
                self.width, self.height
            )));
        }
        // Presentation uploads the framebuffer with 16-bit dimensions
        if self.width > u16::MAX as usize || self.height > u16::MAX as usize {
            return Err(ConfigError::Invalid(format!(
                "viewport {}x{} exceeds {} pixels per side",
                self.width,
                self.height,
                u16::MAX
            )));
        }
        if !(self.near < self.far) {
            return Err(ConfigError::Invalid(format!(
                "near ({}) must be less than far ({})",
                self.near, self.far
            )));
        }
        if !(self.fov_y > 0.0 && self.fov_y < 180.0) {
            return Err(ConfigError::Invalid(format!("fov_y {} out of (0, 180)", self.fov_y)));
        }
        if !(self.reflection.shininess >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "shininess {} must not be negative",
                self.reflection.shininess
            )));
        }
        Ok(())
    }

    pub fn raster_settings(&self) -> RasterSettings {
        RasterSettings {
            near: self.near,
            far: self.far,
            shading: self.shading,
            reflection: self.reflection,
            wire_color: self.wire_color,
            background: self.background,
        }
    }

    pub fn camera(&self) -> Camera {
        Camera {
            fov_y: self.fov_y,
            ..Camera::new(self.camera_position, self.camera_target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!((config.width, config.height), (320, 240));
        assert_eq!(config.fov_y, 45.0);
        assert_eq!(config.near, 0.3);
        assert_eq!(config.far, 1000.0);
        assert_eq!(config.reflection.shininess, 20.0);
        assert_eq!(config.reflection.ambient, Color::BLACK);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: RenderConfig = "(width: 640, height: 480, shading: Some(Gouraud))".parse().unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.shading, Some(ShadingMode::Gouraud));
        assert_eq!(config.far, 1000.0);
        assert_eq!(config.raster_settings().shading, Some(ShadingMode::Gouraud));
    }

    #[test]
    fn test_nested_reflection_defaults() {
        let config: RenderConfig = "(reflection: (shininess: 5.0))".parse().unwrap();
        assert_eq!(config.reflection.shininess, 5.0);
        assert_eq!(config.reflection.diffuse, Color::WHITE);
    }

    #[test]
    fn test_ron_round_trip() {
        let mut config = RenderConfig::default();
        config.shading = None;
        config.texture = Some(PathBuf::from("assets/brick.png"));
        config.light_follows_camera = false;
        let text = config.to_ron().unwrap();
        let back: RenderConfig = text.parse().unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_validation_errors() {
        let err = "(near: 10.0, far: 1.0)".parse::<RenderConfig>().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(matches!("(width: 0)".parse::<RenderConfig>(), Err(ConfigError::Invalid(_))));
        assert!(matches!("(fov_y: 0.0)".parse::<RenderConfig>(), Err(ConfigError::Invalid(_))));
        assert!(matches!("(width: 70000)".parse::<RenderConfig>(), Err(ConfigError::Invalid(_))));
        assert!(matches!("(height: 65536)".parse::<RenderConfig>(), Err(ConfigError::Invalid(_))));
        assert!("(width: 65535, height: 16)".parse::<RenderConfig>().is_ok());
    }

    #[test]
    fn test_parse_error() {
        let err = "(shading: Some(Toon))".parse::<RenderConfig>().unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Parse error"));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("phong-raster-config-{}.ron", std::process::id()));
        let mut config = RenderConfig::default();
        config.width = 640;
        config.save(&path).unwrap();
        let loaded = RenderConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);

        assert!(matches!(RenderConfig::load(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_camera_from_config() {
        let mut config = RenderConfig::default();
        config.fov_y = 60.0;
        let camera = config.camera();
        assert_eq!(camera.fov_y, 60.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, -10.0));
    }
}
