//! Swaps the renderable content of a [`Scene`] between structure types.
//!
//! Every swap follows the same order: dispose the old nodes' resources,
//! re-add the lighting rig, build, allocate, add. A node's handles are
//! disposed before the node itself is dropped, so nothing in the scene
//! ever references a freed resource.

use super::lighting::LightingRig;
use super::{Scene, SceneNode};
use crate::gpu::resources::{MaterialBinding, ResourceAllocator};
use crate::structure::{
    self, ContentNode, MaterialSpec, StructureParams, StructureType,
};

/// What one content swap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentReport {
    /// Nodes removed (and whose resources were disposed).
    pub disposed: usize,
    /// Nodes built and added.
    pub added: usize,
}

/// Owns the disposal policy and the lighting template for one scene.
#[derive(Debug, Clone)]
pub struct ContentManager {
    lighting: LightingRig,
    current: Option<StructureType>,
}

impl ContentManager {
    /// Manager that re-adds `lighting` after every teardown.
    #[must_use]
    pub fn new(lighting: LightingRig) -> Self {
        Self {
            lighting,
            current: None,
        }
    }

    /// Structure type currently in the scene.
    #[must_use]
    pub fn current(&self) -> Option<StructureType> {
        self.current
    }

    /// Lighting template re-added on every swap.
    #[must_use]
    pub fn lighting(&self) -> &LightingRig {
        &self.lighting
    }

    /// Replace the lighting template. Takes effect on the next swap, or
    /// immediately if the scene is already lit.
    pub fn set_lighting(&mut self, scene: &mut Scene, lighting: LightingRig) {
        self.lighting = lighting;
        if scene.lighting().is_some() {
            scene.set_lighting(lighting);
        }
    }

    /// Replace the scene's content with `structure` built from `params`.
    ///
    /// `None` leaves only the lighting rig.
    pub fn set_structure_type(
        &mut self,
        scene: &mut Scene,
        resources: &mut impl ResourceAllocator,
        structure: Option<StructureType>,
        params: &StructureParams,
    ) -> ContentReport {
        let disposed = dispose_all(scene, resources);
        scene.set_lighting(self.lighting);

        let nodes = structure::build(structure, params);
        let added = nodes.len();
        for node in nodes {
            add_with_resources(scene, resources, node);
        }
        self.current = structure;

        log::debug!(
            "content swap to {}: disposed {disposed}, added {added}",
            structure.map_or("nothing", StructureType::as_str),
        );
        ContentReport { disposed, added }
    }

    /// Dispose every node and remove the lighting rig.
    pub fn clear(
        &mut self,
        scene: &mut Scene,
        resources: &mut impl ResourceAllocator,
    ) -> ContentReport {
        let disposed = dispose_all(scene, resources);
        scene.clear_lighting();
        self.current = None;
        ContentReport { disposed, added: 0 }
    }
}

fn dispose_all(
    scene: &mut Scene,
    resources: &mut impl ResourceAllocator,
) -> usize {
    let nodes = scene.take_nodes();
    let count = nodes.len();
    for node in nodes {
        dispose_node(resources, node);
    }
    count
}

/// Consumes the node so its handles cannot be reused after disposal.
fn dispose_node(resources: &mut impl ResourceAllocator, node: SceneNode) {
    resources.dispose_geometry(node.geometry);
    for &material in node.material.handles() {
        resources.dispose_material(material);
    }
}

fn add_with_resources(
    scene: &mut Scene,
    resources: &mut impl ResourceAllocator,
    node: ContentNode,
) {
    let geometry = resources.create_geometry(&node.geometry);
    let material = match &node.material {
        MaterialSpec::Single(desc) => {
            MaterialBinding::Single(resources.create_material(desc))
        }
        MaterialSpec::Multi(descs) => MaterialBinding::Multi(
            descs.iter().map(|d| resources.create_material(d)).collect(),
        ),
    };
    let _ = scene.add_node(node, geometry, material);
}
