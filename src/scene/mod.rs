//! Authoritative scene: flat node storage plus the lighting rig.
//!
//! Every drawable is a [`SceneNode`]: the builder's [`ContentNode`] paired
//! with the GPU handles it owns. Nodes leave the scene only through
//! [`Scene::take_nodes`], which hands their handles to the caller for
//! disposal.

/// Replaces scene content when the structure type changes.
pub mod content;
/// Ambient + directional light rig and its GPU uniform.
pub mod lighting;

pub use content::{ContentManager, ContentReport};
pub use lighting::{LightingRig, LightingUniform};

use crate::gpu::resources::{GeometryHandle, MaterialBinding};
use crate::structure::ContentNode;

/// Scene-unique node identifier, assigned in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// A content node together with the GPU resources it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// Identifier assigned by the scene.
    pub id: NodeId,
    /// What the builder asked for.
    pub node: ContentNode,
    /// Tessellated geometry.
    pub geometry: GeometryHandle,
    /// One material, or one per geometry group.
    pub material: MaterialBinding,
}

/// The authoritative scene. Owns all nodes in a flat list.
#[derive(Debug, Default)]
pub struct Scene {
    /// Nodes in insertion order.
    nodes: Vec<SceneNode>,
    lighting: Option<LightingRig>,
    next_node_id: u32,
    /// Monotonically increasing generation; bumped on any mutation.
    generation: u64,
}

impl Scene {
    /// Create an empty, unlit scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Mutation counter.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Add a node that already owns its resources. Returns its ID.
    pub fn add_node(
        &mut self,
        node: ContentNode,
        geometry: GeometryHandle,
        material: MaterialBinding,
    ) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.push(SceneNode {
            id,
            node,
            geometry,
            material,
        });
        self.invalidate();
        id
    }

    /// Remove every node, transferring ownership of its handles to the
    /// caller.
    pub fn take_nodes(&mut self) -> Vec<SceneNode> {
        if !self.nodes.is_empty() {
            self.invalidate();
        }
        std::mem::take(&mut self.nodes)
    }

    /// Install (or replace) the lighting rig.
    pub fn set_lighting(&mut self, rig: LightingRig) {
        self.lighting = Some(rig);
        self.invalidate();
    }

    /// Remove the lighting rig.
    pub fn clear_lighting(&mut self) {
        if self.lighting.take().is_some() {
            self.invalidate();
        }
    }

    /// Current lighting rig, if any.
    #[must_use]
    pub fn lighting(&self) -> Option<&LightingRig> {
        self.lighting.as_ref()
    }

    /// Read access to all nodes (insertion order).
    #[must_use]
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Read access to one node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
