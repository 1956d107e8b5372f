use std::f32::consts::FRAC_PI_2;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(
        title = "Field of View",
        range(min = 20.0, max = 120.0),
        extend("step" = 1.0)
    )]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Initial distance from the eye to the origin along +Z.
    #[schemars(
        title = "Distance",
        range(min = 1.0, max = 50.0),
        extend("step" = 0.5)
    )]
    pub distance: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            distance: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Controls", inline)]
#[serde(default)]
/// Orbit controller tuning.
pub struct ControlOptions {
    /// Fraction of the pending motion applied per frame (0 disables
    /// damping).
    #[schemars(
        title = "Damping",
        range(min = 0.0, max = 1.0),
        extend("step" = 0.01)
    )]
    pub damping_factor: f32,
    /// Rotation sensitivity multiplier.
    #[schemars(
        title = "Rotate Speed",
        range(min = 0.1, max = 3.0),
        extend("step" = 0.05)
    )]
    pub rotate_speed: f32,
    /// Pan sensitivity multiplier.
    #[schemars(
        title = "Pan Speed",
        range(min = 0.1, max = 3.0),
        extend("step" = 0.05)
    )]
    pub pan_speed: f32,
    /// Zoom sensitivity multiplier.
    #[schemars(
        title = "Zoom Speed",
        range(min = 0.1, max = 3.0),
        extend("step" = 0.05)
    )]
    pub zoom_speed: f32,
    /// Closest the eye may get to the target.
    #[schemars(skip)]
    pub min_distance: f32,
    /// Farthest the eye may get from the target.
    #[schemars(skip)]
    pub max_distance: f32,
    /// Lower bound of the polar angle (radians from +Y).
    #[schemars(skip)]
    pub min_polar_angle: f32,
    /// Ceiling of the polar angle (radians from +Y).
    #[schemars(skip)]
    pub max_polar_angle: f32,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            damping_factor: 0.05,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 1.0,
            max_distance: 100.0,
            min_polar_angle: 0.0,
            max_polar_angle: FRAC_PI_2,
        }
    }
}
