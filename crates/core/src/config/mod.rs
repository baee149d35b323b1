use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
    pub playback: PlaybackConfig,
}

impl AppConfig {
    /// Reads a JSON config file. Missing sections fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Dimensions and clear colour of the drawing surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    pub background: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            background: "#1a1a1a".to_string(),
        }
    }
}

/// Configuration specific to the playback controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Start playing as soon as a scene is loaded.
    pub autoplay: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { autoplay: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{ "canvas": { "width": 800 } }"#).unwrap();
        assert_eq!(cfg.canvas.width, 800.0);
        assert_eq!(cfg.canvas.height, 400.0);
        assert_eq!(cfg.canvas.background, "#1a1a1a");
        assert!(cfg.playback.autoplay);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AppConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, crate::ScenePlayError::Io(_)));
    }
}
