//! GPU-free backend that records every call, for unit tests.

use rustc_hash::FxHashSet;

use super::backend::{FrameError, FrameInput, RenderBackend};
use super::resources::{
    GeometryHandle, HandleAllocator, MaterialHandle, ResourceAllocator,
    ResourceCounts,
};
use crate::structure::{GeometryDesc, MaterialDesc};

/// What one recorded frame looked like.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedFrame {
    pub(crate) items: usize,
    pub(crate) aspect: f32,
    pub(crate) ambient_intensity: f32,
}

#[derive(Default)]
pub(crate) struct RecordingBackend {
    handles: HandleAllocator,
    live_geometries: FxHashSet<GeometryHandle>,
    live_materials: FxHashSet<MaterialHandle>,
    pub(crate) geometries_created: usize,
    pub(crate) materials_created: usize,
    pub(crate) geometries_disposed: usize,
    pub(crate) materials_disposed: usize,
    pub(crate) double_disposals: usize,
    /// Draws that referenced a disposed or unknown resource.
    pub(crate) stale_draws: usize,
    pub(crate) frames: Vec<RecordedFrame>,
    pub(crate) size: Option<(u32, u32)>,
    pub(crate) resizes: usize,
    pub(crate) reconfigures: usize,
    pub(crate) releases: usize,
    pub(crate) released: bool,
    /// Returned (once) by the next `render` call.
    pub(crate) fail_next: Option<FrameError>,
}

impl RecordingBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl ResourceAllocator for RecordingBackend {
    fn create_geometry(&mut self, _desc: &GeometryDesc) -> GeometryHandle {
        let handle = self.handles.next_geometry();
        let _ = self.live_geometries.insert(handle);
        self.geometries_created += 1;
        handle
    }

    fn create_material(&mut self, _desc: &MaterialDesc) -> MaterialHandle {
        let handle = self.handles.next_material();
        let _ = self.live_materials.insert(handle);
        self.materials_created += 1;
        handle
    }

    fn dispose_geometry(&mut self, handle: GeometryHandle) {
        if self.live_geometries.remove(&handle) {
            self.geometries_disposed += 1;
        } else {
            self.double_disposals += 1;
        }
    }

    fn dispose_material(&mut self, handle: MaterialHandle) {
        if self.live_materials.remove(&handle) {
            self.materials_disposed += 1;
        } else {
            self.double_disposals += 1;
        }
    }

    fn live_resources(&self) -> ResourceCounts {
        ResourceCounts {
            geometries: self.live_geometries.len(),
            materials: self.live_materials.len(),
        }
    }
}

impl RenderBackend for RecordingBackend {
    fn resize(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
        self.resizes += 1;
    }

    fn reconfigure(&mut self) {
        self.reconfigures += 1;
    }

    fn render(&mut self, frame: &FrameInput<'_>) -> Result<(), FrameError> {
        if self.released {
            return Err(FrameError::Released);
        }
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        for item in &frame.items {
            let geometry_live = self.live_geometries.contains(&item.geometry);
            let materials_live =
                item.materials.iter().all(|m| self.live_materials.contains(m));
            if !geometry_live || !materials_live {
                self.stale_draws += 1;
            }
        }
        self.frames.push(RecordedFrame {
            items: frame.items.len(),
            aspect: frame.camera.aspect,
            ambient_intensity: frame.lighting.ambient_intensity,
        });
        Ok(())
    }

    fn release(&mut self) {
        self.releases += 1;
        self.released = true;
    }
}
