//! Application settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::scene::IdStrategy;

/// Camera controller settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Keep moving after a gesture ends, decaying towards rest
    pub damping_enabled: bool,
    /// Fraction of the pending motion released per tick (0.0 - 1.0)
    pub damping_factor: f32,
    /// Closest allowed distance to the orbit target
    pub min_distance: f32,
    /// Farthest allowed distance from the orbit target
    pub max_distance: f32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Per-notch scale factor for wheel zoom-in (zoom-out uses the reciprocal)
    pub zoom_step: f32,
    /// Keep the polar angle away from the poles
    pub clamp_polar: bool,
    /// Camera position on startup and reset
    pub initial_position: [f32; 3],
    /// Orbit target on startup and reset
    pub initial_target: [f32; 3],
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            damping_enabled: true,
            damping_factor: 0.1,
            min_distance: 2.0,
            max_distance: 100.0,
            fov_degrees: 50.0,
            zoom_step: 0.95,
            clamp_polar: false,
            initial_position: [6.0, 5.0, 8.0],
            initial_target: [0.0, 0.0, 0.0],
        }
    }
}

/// Object creation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// How new object ids are generated
    pub id_strategy: IdStrategy,
    /// Half-size of the cube new objects are placed in
    pub spawn_extent: f64,
    /// Offset applied to duplicated objects
    pub duplicate_offset: [f64; 3],
    /// Fixed seed for placement and color randomness
    pub seed: Option<u64>,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::Uuid,
            spawn_extent: 3.0,
            duplicate_offset: [0.5, 0.0, 0.5],
            seed: None,
        }
    }
}

/// Grid display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSettings {
    /// Show grid
    pub visible: bool,
    /// Grid cell size
    pub size: f32,
    /// Number of grid lines in each direction from origin
    pub range: i32,
    /// Grid line opacity (0.0 - 1.0)
    pub opacity: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: true,
            size: 1.0,
            range: 10,
            opacity: 0.6,
        }
    }
}

/// Viewport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
    /// Emissive tint added to the selected object
    pub highlight_tint: [f32; 3],
    /// Show axes
    pub axes_visible: bool,
    /// Show distance/angle readout
    pub camera_info: bool,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [30, 30, 35],
            highlight_tint: [0.25, 0.25, 0.05],
            axes_visible: true,
            camera_info: true,
        }
    }
}

/// Frame export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Resolution multiplier relative to the screen's pixel density
    pub multiplier: f32,
    /// Upper bound on the export pixel density
    pub hard_cap: f32,
    /// Directory exported images are written to
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            multiplier: 2.0,
            hard_cap: crate::export::DEFAULT_HARD_CAP,
            output_dir: None,
        }
    }
}

impl ExportSettings {
    /// Configured directory, else the user's picture directory, else the working directory
    pub fn resolved_output_dir(&self) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        directories::UserDirs::new()
            .and_then(|dirs| dirs.picture_dir().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    /// Interface language code ("en" or "ru")
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            language: default_language(),
        }
    }
}

/// All application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub scene: SceneSettings,
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub viewport: ViewportSettings,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

impl AppSettings {
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "scene-viewer", "scene-viewer")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if let Ok(json) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("Ignoring malformed settings at {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Some(dir) = path.parent() {
                if std::fs::create_dir_all(dir).is_err() {
                    return;
                }
            }
            if let Ok(json) = serde_json::to_string_pretty(self) {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!("Failed to save settings: {e}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"camera": {"damping_factor": 0.25}}"#;
        let s: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(s.camera.damping_factor, 0.25);
        assert_eq!(s.camera.min_distance, 2.0);
        assert_eq!(s.scene.id_strategy, IdStrategy::Uuid);
        assert_eq!(s.export.multiplier, 2.0);
    }

    #[test]
    fn test_id_strategy_names() {
        let json = r#"{"scene": {"id_strategy": "timestamp"}}"#;
        let s: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(s.scene.id_strategy, IdStrategy::Timestamp);
    }

    #[test]
    fn test_explicit_output_dir_wins() {
        let s = ExportSettings {
            output_dir: Some(PathBuf::from("/tmp/frames")),
            ..Default::default()
        };
        assert_eq!(s.resolved_output_dir(), PathBuf::from("/tmp/frames"));
    }
}
