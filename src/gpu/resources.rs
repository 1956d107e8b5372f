//! Opaque handles to backend-owned GPU resources.
//!
//! Scene nodes hold these handles, never the GPU objects themselves, so the
//! disposal routine can release everything a node owns by walking its
//! handles directly.

use crate::structure::{GeometryDesc, MaterialDesc};

/// Handle to an uploaded geometry (vertex + index buffers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryHandle(u32);

/// Handle to an uploaded material (uniform buffer + bind group).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(u32);

impl GeometryHandle {
    /// Raw numeric id.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl MaterialHandle {
    /// Raw numeric id.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Materials owned by one scene node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialBinding {
    /// One material for the whole geometry.
    Single(MaterialHandle),
    /// One material per geometry index group.
    Multi(Vec<MaterialHandle>),
}

impl MaterialBinding {
    /// Every handle in the binding, in group order.
    #[must_use]
    pub fn handles(&self) -> &[MaterialHandle] {
        match self {
            Self::Single(handle) => std::slice::from_ref(handle),
            Self::Multi(handles) => handles,
        }
    }
}

/// Number of live resources held by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceCounts {
    /// Live geometries.
    pub geometries: usize,
    /// Live materials.
    pub materials: usize,
}

impl ResourceCounts {
    /// `true` when nothing is allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.geometries == 0 && self.materials == 0
    }
}

/// Allocation and disposal of geometry and material resources.
pub trait ResourceAllocator {
    /// Upload a geometry and return its handle.
    fn create_geometry(&mut self, desc: &GeometryDesc) -> GeometryHandle;

    /// Upload a material and return its handle.
    fn create_material(&mut self, desc: &MaterialDesc) -> MaterialHandle;

    /// Release a geometry. Unknown handles are ignored.
    fn dispose_geometry(&mut self, handle: GeometryHandle);

    /// Release a material. Unknown handles are ignored.
    fn dispose_material(&mut self, handle: MaterialHandle);

    /// Currently allocated resources.
    fn live_resources(&self) -> ResourceCounts;
}

/// Monotonic handle issuer shared by geometry and material handles.
#[derive(Debug, Default)]
pub struct HandleAllocator {
    next: u32,
}

impl HandleAllocator {
    fn bump(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }

    /// Issue a fresh geometry handle.
    pub fn next_geometry(&mut self) -> GeometryHandle {
        GeometryHandle(self.bump())
    }

    /// Issue a fresh material handle.
    pub fn next_material(&mut self) -> MaterialHandle {
        MaterialHandle(self.bump())
    }
}
