use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::renderer::camera::CameraConfig;

/// Engine configuration, supplied by the host.
///
/// Every field has a default, so a JSON document only needs the fields it
/// changes:
///
/// ```json
/// { "viewport_width": 1280, "viewport_height": 720, "initial_scene": "Splash" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Initial viewport size in pixels.
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// RGBA, 0.0..=1.0.
    pub clear_color: [f32; 4],
    pub camera: CameraConfig,
    /// Frame deltas are clamped to this many seconds (default: 0.1).
    pub max_frame_dt: f32,
    /// Frame cap reported through `FrameClock::sleep_hint`. `None` = uncapped.
    pub target_fps: Option<f32>,
    /// Frames a released resource waits before its GPU memory is freed (default: 1).
    pub frames_in_flight: u32,
    /// Freed textures kept per shape for reuse (default: 8).
    pub texture_pool_limit: usize,
    /// Freed vertex buffers kept per size for reuse (default: 8).
    pub mesh_pool_limit: usize,
    /// Scene entered by `Engine::start`. Falls back to the first registered scene.
    pub initial_scene: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800,
            viewport_height: 600,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            camera: CameraConfig::default(),
            max_frame_dt: 0.1,
            target_fps: Some(60.0),
            frames_in_flight: 1,
            texture_pool_limit: 8,
            mesh_pool_limit: 8,
            initial_scene: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(EngineError::Config(format!(
                "viewport must be non-empty, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        if !(self.max_frame_dt > 0.0) {
            return Err(EngineError::Config(format!(
                "max_frame_dt must be positive, got {}",
                self.max_frame_dt
            )));
        }
        if !(self.camera.ortho_size > 0.0) {
            return Err(EngineError::Config(format!(
                "camera.ortho_size must be positive, got {}",
                self.camera.ortho_size
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(
            r#"{ "viewport_width": 1280, "camera": { "ortho_size": 5.0 }, "initial_scene": "Splash" }"#,
        )
        .unwrap();
        assert_eq!(config.viewport_width, 1280);
        assert_eq!(config.viewport_height, 600);
        assert_eq!(config.camera.ortho_size, 5.0);
        assert_eq!(config.frames_in_flight, 1);
        assert_eq!(config.initial_scene.as_deref(), Some("Splash"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            EngineConfig::from_json(r#"{ "viewport_height": 0 }"#),
            Err(EngineError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "max_frame_dt": -1.0 }"#),
            Err(EngineError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_json("{ not json"),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn survives_json_round_trip() {
        let config = EngineConfig {
            clear_color: [0.1, 0.2, 0.3, 1.0],
            target_fps: None,
            ..EngineConfig::default()
        };
        let parsed = EngineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
