use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// Ambient + directional light rig parameters.
pub struct LightingOptions {
    /// Ambient light colour (linear RGB).
    #[schemars(skip)]
    pub ambient_color: [f32; 3],
    /// Ambient light intensity.
    #[schemars(
        title = "Ambient",
        range(min = 0.0, max = 1.0),
        extend("step" = 0.01)
    )]
    pub ambient_intensity: f32,
    /// Directional light colour (linear RGB).
    #[schemars(skip)]
    pub directional_color: [f32; 3],
    /// Directional light intensity.
    #[schemars(
        title = "Key Light",
        range(min = 0.0, max = 3.0),
        extend("step" = 0.05)
    )]
    pub directional_intensity: f32,
    /// Directional light position; it shines toward the origin.
    #[schemars(skip)]
    pub directional_position: [f32; 3],
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.4,
            directional_color: [1.0, 1.0, 1.0],
            directional_intensity: 1.0,
            directional_position: [5.0, 10.0, 7.5],
        }
    }
}
