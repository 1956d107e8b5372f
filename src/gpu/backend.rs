//! The seam between the viewport and whatever draws the pixels.

use std::fmt;

use glam::Mat4;

use super::resources::{GeometryHandle, MaterialHandle, ResourceAllocator};
use crate::camera::core::CameraUniform;
use crate::scene::lighting::LightingUniform;

/// One node to draw this frame.
#[derive(Debug, Clone)]
pub struct DrawItem<'a> {
    /// Geometry to draw.
    pub geometry: GeometryHandle,
    /// Material per geometry index group; the last one covers any extra
    /// groups.
    pub materials: &'a [MaterialHandle],
    /// Model matrix.
    pub model: Mat4,
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone)]
pub struct FrameInput<'a> {
    /// Camera uniform for this frame.
    pub camera: CameraUniform,
    /// Lighting uniform for this frame.
    pub lighting: LightingUniform,
    /// Clear colour (linear RGB).
    pub clear_color: [f32; 3],
    /// Nodes in scene order.
    pub items: Vec<DrawItem<'a>>,
}

/// Why a frame could not be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The surface was lost and must be reconfigured.
    SurfaceLost,
    /// The surface no longer matches the window and must be reconfigured.
    SurfaceOutdated,
    /// Acquiring the next texture timed out.
    Timeout,
    /// The GPU ran out of memory.
    OutOfMemory,
    /// The backend was already released.
    Released,
    /// Any other backend failure.
    Other(String),
}

impl FrameError {
    /// Whether reconfiguring the surface at its current size recovers.
    #[must_use]
    pub fn needs_reconfigure(&self) -> bool {
        matches!(self, Self::SurfaceLost | Self::SurfaceOutdated)
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceLost => write!(f, "surface lost"),
            Self::SurfaceOutdated => write!(f, "surface outdated"),
            Self::Timeout => write!(f, "surface texture acquisition timed out"),
            Self::OutOfMemory => write!(f, "out of GPU memory"),
            Self::Released => write!(f, "backend already released"),
            Self::Other(msg) => write!(f, "frame error: {msg}"),
        }
    }
}

impl std::error::Error for FrameError {}

impl From<wgpu::SurfaceError> for FrameError {
    fn from(e: wgpu::SurfaceError) -> Self {
        match e {
            wgpu::SurfaceError::Lost => Self::SurfaceLost,
            wgpu::SurfaceError::Outdated => Self::SurfaceOutdated,
            wgpu::SurfaceError::Timeout => Self::Timeout,
            wgpu::SurfaceError::OutOfMemory => Self::OutOfMemory,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A rendering context bound to one surface.
pub trait RenderBackend: ResourceAllocator {
    /// Resize the surface buffer (physical pixels, both non-zero).
    fn resize(&mut self, width: u32, height: u32);

    /// Re-apply the surface configuration at its current size.
    fn reconfigure(&mut self);

    /// Draw and present one frame.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError`] if the surface texture cannot be acquired or
    /// the backend was released.
    fn render(&mut self, frame: &FrameInput<'_>) -> Result<(), FrameError>;

    /// Release every GPU resource and detach the surface. Idempotent.
    fn release(&mut self);
}
