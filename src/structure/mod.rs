//! Procedural structure builders.
//!
//! Builders are pure functions from immutable parameters to a list of
//! positioned [`ContentNode`]s. They never touch GPU state: the scene
//! content manager allocates resources for the returned nodes.

mod helix;
mod organoid;
mod params;

use std::fmt;
use std::str::FromStr;

use glam::{Mat4, Quat, Vec3};

pub use helix::build_helix;
pub use organoid::build_organoid;
pub use params::{HelixParams, OrganoidParams, StructureParams};

// ---------------------------------------------------------------------------
// Structure type
// ---------------------------------------------------------------------------

/// Discriminator selecting which builder produces scene content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureType {
    /// Synthetic DNA double helix.
    Helix,
    /// Layered organoid with scattered cells.
    Organoid,
}

impl StructureType {
    /// Host-facing selector string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Helix => "dna",
            Self::Organoid => "organoid",
        }
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structure selector that names no known structure type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStructureType(pub String);

impl fmt::Display for InvalidStructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown structure type: {:?}", self.0)
    }
}

impl std::error::Error for InvalidStructureType {}

impl FromStr for StructureType {
    type Err = InvalidStructureType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dna" => Ok(Self::Helix),
            "organoid" => Ok(Self::Organoid),
            _ => Err(InvalidStructureType(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Content node descriptors
// ---------------------------------------------------------------------------

/// Shape of a primitive, in its local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryDesc {
    /// UV sphere centred on the origin.
    Sphere {
        /// Sphere radius.
        radius: f32,
        /// Longitudinal subdivisions.
        width_segments: u32,
        /// Latitudinal subdivisions.
        height_segments: u32,
    },
    /// Y-axis cylinder centred on the origin, split at `y = 0` into two
    /// index groups (one per half).
    Rung {
        /// Cylinder radius.
        radius: f32,
        /// End-to-end length along Y.
        length: f32,
        /// Subdivisions around the axis.
        radial_segments: u32,
    },
}

impl GeometryDesc {
    /// Number of index groups the tessellated mesh exposes.
    #[must_use]
    pub fn group_count(&self) -> usize {
        match self {
            Self::Sphere { .. } => 1,
            Self::Rung { .. } => 2,
        }
    }
}

/// Surface appearance of a primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialDesc {
    /// Linear RGB base colour.
    pub color: [f32; 3],
    /// Opacity in `[0, 1]`; below 1 the material is blended.
    pub opacity: f32,
    /// Specular exponent.
    pub shininess: f32,
}

impl MaterialDesc {
    /// Opaque material with default shininess.
    #[must_use]
    pub const fn opaque(color: [f32; 3]) -> Self {
        Self {
            color,
            opacity: 1.0,
            shininess: 32.0,
        }
    }

    /// Blended material with the given opacity.
    #[must_use]
    pub const fn translucent(color: [f32; 3], opacity: f32) -> Self {
        Self {
            color,
            opacity,
            shininess: 16.0,
        }
    }

    /// Whether drawing needs alpha blending.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// One material, or one material per geometry index group.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialSpec {
    /// A single material covering the whole geometry.
    Single(MaterialDesc),
    /// Material `i` covers index group `i`.
    Multi(Vec<MaterialDesc>),
}

impl MaterialSpec {
    /// Every material description, in group order.
    #[must_use]
    pub fn descs(&self) -> &[MaterialDesc] {
        match self {
            Self::Single(desc) => std::slice::from_ref(desc),
            Self::Multi(descs) => descs,
        }
    }
}

/// Placement of a primitive in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space translation.
    pub translation: Vec3,
    /// Orientation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_translation(Vec3::ZERO)
    }
}

impl Transform {
    /// Pure translation.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Replace the rotation.
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Model matrix (scale, then rotate, then translate).
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.translation,
        )
    }
}

/// What a node represents inside its structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Helix backbone bead.
    Backbone,
    /// Base-pair rung between the two strands.
    BasePair,
    /// Central core sphere.
    Core,
    /// Translucent organoid boundary.
    OuterShell,
    /// Organoid cell.
    Cell,
}

/// A positioned drawable primitive produced by a builder.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentNode {
    /// Shape.
    pub geometry: GeometryDesc,
    /// Appearance.
    pub material: MaterialSpec,
    /// World placement.
    pub transform: Transform,
    /// Role within the structure.
    pub role: NodeRole,
}

impl ContentNode {
    /// Node with a single material.
    #[must_use]
    pub fn new(
        role: NodeRole,
        geometry: GeometryDesc,
        material: MaterialDesc,
        transform: Transform,
    ) -> Self {
        Self {
            geometry,
            material: MaterialSpec::Single(material),
            transform,
            role,
        }
    }

    /// World-space position of the node's origin.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }
}

/// Build the nodes for `structure`; `None` yields no nodes.
///
/// Organoid placement draws from a generator seeded with
/// [`OrganoidParams::seed`], so repeated calls are identical.
#[must_use]
pub fn build(
    structure: Option<StructureType>,
    params: &StructureParams,
) -> Vec<ContentNode> {
    use rand::SeedableRng;

    match structure {
        Some(StructureType::Helix) => build_helix(&params.helix),
        Some(StructureType::Organoid) => {
            let mut rng =
                rand::rngs::StdRng::seed_from_u64(params.organoid.seed);
            build_organoid(&params.organoid, &mut rng)
        }
        None => Vec::new(),
    }
}
