//! Engine configuration.

use crate::input::ModifierKey;
use serde::{Deserialize, Serialize};

/// Display parameters for the highlight and hide rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Point radius, normal and hidden
    pub point_radius: f32,
    pub hidden_point_radius: f32,
    /// Stroke width of segments and lines, normal and hidden
    pub line_thickness: f32,
    pub hidden_line_thickness: f32,
    pub plane_opacity: f32,
    pub hidden_plane_opacity: f32,
    pub triangle_opacity: f32,
    pub hidden_triangle_opacity: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            point_radius: 1.0,
            hidden_point_radius: 0.4,
            line_thickness: 1.0,
            hidden_line_thickness: 0.15,
            plane_opacity: 0.5,
            hidden_plane_opacity: 0.12,
            triangle_opacity: 0.8,
            hidden_triangle_opacity: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub display: DisplayConfig,
    /// Modifier that turns a drag release over another entity into a connect
    pub connect_modifier: ModifierKey,
    /// Whether the place-point command may create free points
    pub allow_free_points: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            connect_modifier: ModifierKey::Ctrl,
            allow_free_points: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
