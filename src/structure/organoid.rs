//! Layered organoid builder.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::Rng;

use super::{
    ContentNode, GeometryDesc, MaterialDesc, NodeRole, OrganoidParams,
    Transform,
};

/// Cells stay within this fraction of the core radius.
const CELL_SPREAD: f32 = 0.8;

const CORE_COLOR: [f32; 3] = [0.85, 0.35, 0.45];
const SHELL_COLOR: [f32; 3] = [0.55, 0.8, 0.95];
const SHELL_OPACITY: f32 = 0.2;
const CELL_COLOR: [f32; 3] = [0.95, 0.9, 0.55];

fn sphere(
    radius: f32,
    width_segments: u32,
    height_segments: u32,
) -> GeometryDesc {
    GeometryDesc::Sphere {
        radius,
        width_segments,
        height_segments,
    }
}

/// Sample one cell centre: azimuth, then polar angle, then radius.
fn sample_cell<R: Rng + ?Sized>(rng: &mut R, max_radius: f32) -> Vec3 {
    let phi = rng.random_range(0.0..TAU);
    let theta = rng.random_range(0.0..PI);
    let r = rng.random_range(0.0..=max_radius);
    Vec3::new(
        r * theta.sin() * phi.cos(),
        r * theta.sin() * phi.sin(),
        r * theta.cos(),
    )
}

/// Build an organoid: core, translucent outer layer, then
/// `cell_count` cells drawn from `rng`.
///
/// Returns `cell_count + 2` nodes. The same generator state always yields
/// the same placement.
#[must_use]
pub fn build_organoid<R: Rng + ?Sized>(
    params: &OrganoidParams,
    rng: &mut R,
) -> Vec<ContentNode> {
    let mut nodes = Vec::with_capacity(params.cell_count as usize + 2);

    nodes.push(ContentNode::new(
        NodeRole::Core,
        sphere(params.core_radius, 32, 24),
        MaterialDesc::opaque(CORE_COLOR),
        Transform::default(),
    ));
    nodes.push(ContentNode::new(
        NodeRole::OuterShell,
        sphere(params.outer_radius, 32, 24),
        MaterialDesc::translucent(SHELL_COLOR, SHELL_OPACITY),
        Transform::default(),
    ));

    let max_radius = (CELL_SPREAD * params.core_radius).max(0.0);
    let cell_material = MaterialDesc::opaque(CELL_COLOR);
    nodes.extend((0..params.cell_count).map(|_| {
        ContentNode::new(
            NodeRole::Cell,
            sphere(params.cell_radius, 12, 8),
            cell_material,
            Transform::from_translation(sample_cell(rng, max_radius)),
        )
    }));

    nodes
}
