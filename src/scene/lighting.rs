use glam::Vec3;

use crate::options::LightingOptions;

/// Uniform fill light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    /// Linear RGB colour.
    pub color: [f32; 3],
    /// Intensity multiplier.
    pub intensity: f32,
}

/// Parallel light shining from `position` toward the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Linear RGB colour.
    pub color: [f32; 3],
    /// Intensity multiplier.
    pub intensity: f32,
    /// Where the light sits; only its direction matters.
    pub position: Vec3,
}

/// The ambient + directional pair a non-empty scene is lit by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingRig {
    /// Low-intensity ambient term.
    pub ambient: AmbientLight,
    /// Key light at an elevated off-axis position.
    pub directional: DirectionalLight,
}

impl LightingRig {
    /// Build a rig from the lighting options.
    #[must_use]
    pub fn from_options(options: &LightingOptions) -> Self {
        Self {
            ambient: AmbientLight {
                color: options.ambient_color,
                intensity: options.ambient_intensity,
            },
            directional: DirectionalLight {
                color: options.directional_color,
                intensity: options.directional_intensity,
                position: Vec3::from_array(options.directional_position),
            },
        }
    }
}

impl Default for LightingRig {
    fn default() -> Self {
        Self::from_options(&LightingOptions::default())
    }
}

/// Lighting uniform consumed by the mesh shader.
/// NOTE: Must match WGSL struct layout exactly (48 bytes)
///
/// WGSL layout:
///   ambient_color: vec3<f32>       (offset 0,  align 16)
///   ambient_intensity: f32         (offset 12)
///   direction: vec3<f32>           (offset 16, align 16)
///   directional_intensity: f32     (offset 28)
///   directional_color: vec3<f32>   (offset 32, align 16)
///   _pad: f32                      (offset 44)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Ambient colour.
    pub ambient_color: [f32; 3],
    /// Ambient intensity.
    pub ambient_intensity: f32,
    /// Unit vector pointing toward the directional light.
    pub direction: [f32; 3],
    /// Directional intensity.
    pub directional_intensity: f32,
    /// Directional colour.
    pub directional_color: [f32; 3],
    /// Padding for GPU alignment.
    pub _pad: f32,
}

impl LightingUniform {
    /// No light at all. The direction stays a unit vector so the shader
    /// never normalizes zero.
    #[must_use]
    pub fn unlit() -> Self {
        Self {
            ambient_color: [0.0; 3],
            ambient_intensity: 0.0,
            direction: [0.0, 1.0, 0.0],
            directional_intensity: 0.0,
            directional_color: [0.0; 3],
            _pad: 0.0,
        }
    }
}

impl From<&LightingRig> for LightingUniform {
    fn from(rig: &LightingRig) -> Self {
        Self {
            ambient_color: rig.ambient.color,
            ambient_intensity: rig.ambient.intensity,
            direction: rig
                .directional
                .position
                .normalize_or(Vec3::Y)
                .to_array(),
            directional_intensity: rig.directional.intensity,
            directional_color: rig.directional.color,
            _pad: 0.0,
        }
    }
}
