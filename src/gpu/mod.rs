//! GPU resource management.
//!
//! Provides the backend seam ([`backend::RenderBackend`]), resource handles,
//! mesh tessellation, and the wgpu implementation that draws scene nodes.

/// Render backend trait and per-frame inputs.
pub mod backend;
/// Per-node instance matrices in a growable vertex buffer.
pub mod instance_buffer;
/// CPU tessellation of geometry descriptions.
pub mod mesh;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Geometry/material handles and the allocation trait.
pub mod resources;
#[cfg(test)]
pub(crate) mod testing;
/// Forward renderer on wgpu.
pub mod wgpu_backend;
