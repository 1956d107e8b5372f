use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Double-helix dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "DNA Helix", inline)]
#[serde(default)]
pub struct HelixParams {
    /// Distance from the helix axis to each backbone strand.
    #[schemars(
        title = "Radius",
        range(min = 0.1, max = 5.0),
        extend("step" = 0.1)
    )]
    pub radius: f32,
    /// Total length along the helix axis.
    #[schemars(
        title = "Height",
        range(min = 0.5, max = 20.0),
        extend("step" = 0.5)
    )]
    pub height: f32,
    /// Number of base-pair steps (four full turns over the whole height).
    #[schemars(title = "Segments", range(min = 1, max = 400))]
    pub segment_count: u32,
}

impl Default for HelixParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            height: 4.0,
            segment_count: 30,
        }
    }
}

/// Organoid dimensions and cell placement seed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Organoid", inline)]
#[serde(default)]
pub struct OrganoidParams {
    /// Radius of the opaque core.
    #[schemars(
        title = "Core Radius",
        range(min = 0.1, max = 5.0),
        extend("step" = 0.1)
    )]
    pub core_radius: f32,
    /// Radius of the translucent outer layer.
    #[schemars(
        title = "Outer Radius",
        range(min = 0.1, max = 8.0),
        extend("step" = 0.1)
    )]
    pub outer_radius: f32,
    /// Number of cells scattered inside the core.
    #[schemars(title = "Cells", range(min = 0, max = 2000))]
    pub cell_count: u32,
    /// Radius of each cell.
    #[schemars(
        title = "Cell Radius",
        range(min = 0.01, max = 0.5),
        extend("step" = 0.01)
    )]
    pub cell_radius: f32,
    /// Seed for the cell-placement generator.
    #[schemars(skip)]
    pub seed: u64,
}

impl Default for OrganoidParams {
    fn default() -> Self {
        Self {
            core_radius: 1.0,
            outer_radius: 1.5,
            cell_count: 50,
            cell_radius: 0.08,
            seed: 42,
        }
    }
}

/// Parameters for every structure type; the active type picks its half.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[schemars(title = "Structure", inline)]
#[serde(default)]
pub struct StructureParams {
    /// Helix parameters.
    pub helix: HelixParams,
    /// Organoid parameters.
    pub organoid: OrganoidParams,
}
