//! # Engine Configuration
//!
//! Startup settings for world generation, the camera and the window, loaded
//! from a JSON file. Every section falls back to its defaults, so a partial
//! file only needs the values it changes:
//!
//! ```json
//! {
//!     "world": { "width": 128, "height": 128 },
//!     "key_bindings": [
//!         { "key": "ArrowUp", "action": "forward" },
//!         { "key": "ArrowDown", "action": "backward" }
//!     ]
//! }
//! ```

use std::path::Path;

use log::{info, warn};
use serde::Deserialize;
use winit::keyboard::KeyCode;

use crate::application_state::input_state::MoveFlag;
use crate::error::{EngineError, Result};

/// Environment variable naming the config file to load.
pub const CONFIG_PATH_ENV: &str = "VOXEL_TERRAIN_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config/terrain.json";

/// Top level configuration for the whole application.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Dimensions of the generated voxel grid
    pub world: WorldConfig,
    /// Octave noise parameters for the height map
    pub terrain: TerrainConfig,
    /// Projection and movement settings
    pub camera: CameraConfig,
    /// Window and asset settings
    pub window: WindowConfig,
    /// Key to movement flag table
    pub key_bindings: Vec<KeyBinding>,
}

/// Grid dimensions in blocks.
///
/// Terrain varies over `width` and `height`; `depth` is the vertical axis
/// along which columns are filled.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WorldConfig {
    /// Extent along x
    pub width: usize,
    /// Extent along y
    pub height: usize,
    /// Extent along z, the vertical axis
    pub depth: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            depth: 16,
        }
    }
}

/// Octave summation parameters for the terrain noise.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Divisor applied to column coordinates before sampling
    pub scale: f64,
    /// Number of noise layers summed per column
    pub octaves: u32,
    /// Frequency multiplier between octaves
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves
    pub persistence: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            scale: 96.3,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }
}

/// Projection and first-person movement settings.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fovy_degrees: f32,
    /// Near clip plane distance
    pub znear: f32,
    /// Far clip plane distance
    pub zfar: f32,
    /// Degrees of rotation per unit of mouse motion
    pub rotation_speed: f32,
    /// World units travelled per millisecond while a move key is held
    pub walk_speed: f32,
    /// Player position on the first frame
    pub start_position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fovy_degrees: 60.0,
            znear: 0.1,
            zfar: 100.0,
            rotation_speed: 0.15,
            walk_speed: 1.0 / 160.0,
            start_position: [7.0, 3.0, 7.0],
        }
    }
}

/// Window and asset settings for the host application.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial inner width in physical pixels
    pub width: u32,
    /// Initial inner height in physical pixels
    pub height: u32,
    /// Window title
    pub title: String,
    /// Block texture; a generated texture is used when it cannot be loaded
    pub texture_path: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: String::from("Voxel Terrain"),
            texture_path: String::from("assets/textures/dirt.png"),
        }
    }
}

/// One entry of the key binding table.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct KeyBinding {
    /// Physical key
    pub key: KeyCode,
    /// Movement flag held while the key is down
    pub action: MoveFlag,
}

impl KeyBinding {
    /// The default WASD layout.
    pub fn defaults() -> Vec<KeyBinding> {
        vec![
            KeyBinding { key: KeyCode::KeyW, action: MoveFlag::Forward },
            KeyBinding { key: KeyCode::KeyS, action: MoveFlag::Backward },
            KeyBinding { key: KeyCode::KeyA, action: MoveFlag::Left },
            KeyBinding { key: KeyCode::KeyD, action: MoveFlag::Right },
        ]
    }
}

impl EngineConfig {
    /// Parses a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: EngineConfig = serde_json::from_str(json)?;
        if config.key_bindings.is_empty() {
            config.key_bindings = KeyBinding::defaults();
        }
        Ok(config)
    }

    /// Loads the config at `path`, using defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                info!("Loading config from {}", path.display());
                Self::from_json(&json)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!("No config at {}, using defaults", path.display());
                Ok(Self::with_default_bindings())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Loads the config named by [`CONFIG_PATH_ENV`], or [`DEFAULT_CONFIG_PATH`].
    pub fn load_from_env() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }

    /// Default settings with the WASD key table filled in.
    pub fn with_default_bindings() -> Self {
        Self {
            key_bindings: KeyBinding::defaults(),
            ..Default::default()
        }
    }

    /// Rejects settings that make startup impossible.
    pub fn validate(&self) -> Result<()> {
        if self.camera.znear == self.camera.zfar {
            return Err(EngineError::InvalidProjection {
                near: self.camera.znear,
                far: self.camera.zfar,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::with_default_bindings());
        assert_eq!(config.world.width, 64);
        assert_eq!(config.world.depth, 16);
        assert_eq!(config.terrain.octaves, 4);
        assert_eq!(config.key_bindings.len(), 4);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = EngineConfig::from_json(r#"{ "world": { "depth": 32 }, "camera": { "fovy_degrees": 75.0 } }"#)
            .unwrap();
        assert_eq!(config.world.width, 64);
        assert_eq!(config.world.depth, 32);
        assert_eq!(config.camera.fovy_degrees, 75.0);
        assert_eq!(config.camera.zfar, 100.0);
    }

    #[test]
    fn custom_key_bindings_replace_defaults() {
        let config = EngineConfig::from_json(
            r#"{ "key_bindings": [ { "key": "ArrowUp", "action": "forward" } ] }"#,
        )
        .unwrap();
        assert_eq!(
            config.key_bindings,
            vec![KeyBinding { key: KeyCode::ArrowUp, action: MoveFlag::Forward }]
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            EngineConfig::from_json("{ world: }"),
            Err(EngineError::ConfigParse(_))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = EngineConfig::load("does/not/exist.json").unwrap();
        assert_eq!(config, EngineConfig::with_default_bindings());
    }

    #[test]
    fn coinciding_clip_planes_fail_validation() {
        let mut config = EngineConfig::with_default_bindings();
        assert!(config.validate().is_ok());

        config.camera.znear = 5.0;
        config.camera.zfar = 5.0;
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidProjection { .. })
        ));
    }
}
