use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Viewport appearance and pacing.
pub struct DisplayOptions {
    /// Clear colour (linear RGB).
    #[schemars(skip)]
    pub background: [f32; 3],
    /// Frame cap in frames per second (0 = every scheduler tick).
    #[schemars(title = "FPS Cap", range(min = 0, max = 240))]
    pub target_fps: u32,
    /// Structure selector applied at mount (`"dna"`, `"organoid"`, or
    /// anything else for an empty scene).
    #[schemars(title = "Initial Structure")]
    pub initial_structure: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            background: [0.04, 0.05, 0.08],
            target_fps: 0,
            initial_structure: "dna".into(),
        }
    }
}
