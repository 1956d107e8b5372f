//! DNA double-helix builder.
//!
//! Two backbone strands wind four full turns along the Z axis. Each step
//! gets a bead on both strands and a two-tone rung across the diameter;
//! a core sphere anchors the bottom of the assembly.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec3};

use super::{
    ContentNode, GeometryDesc, HelixParams, MaterialDesc, MaterialSpec,
    NodeRole, Transform,
};

/// Full turns across the whole height.
const TURNS: f32 = 4.0;

const BACKBONE_RADIUS: f32 = 0.1;
const RUNG_RADIUS: f32 = 0.04;
const CORE_RADIUS: f32 = 0.3;

const BACKBONE_COLOR: [f32; 3] = [0.25, 0.45, 0.95];
const CORE_COLOR: [f32; 3] = [0.95, 0.75, 0.2];

// Complementary base colours: adenine, thymine, guanine, cytosine.
const ADENINE: [f32; 3] = [0.9, 0.3, 0.3];
const THYMINE: [f32; 3] = [0.3, 0.8, 0.4];
const GUANINE: [f32; 3] = [0.95, 0.6, 0.2];
const CYTOSINE: [f32; 3] = [0.4, 0.6, 0.95];

/// Base pairs in the order they cycle along the helix.
const BASE_PAIRS: [([f32; 3], [f32; 3]); 4] = [
    (ADENINE, THYMINE),
    (GUANINE, CYTOSINE),
    (THYMINE, ADENINE),
    (CYTOSINE, GUANINE),
];

fn backbone_geometry() -> GeometryDesc {
    GeometryDesc::Sphere {
        radius: BACKBONE_RADIUS,
        width_segments: 16,
        height_segments: 12,
    }
}

fn strand_angle(step: f32, segments: f32) -> f32 {
    (step / segments) * TURNS * 2.0 * PI
}

/// Build a double helix.
///
/// Emits `2·(n + 1)` backbone beads, `n` base-pair rungs and one core
/// sphere, `3n + 3` nodes in total, where `n` is `segment_count` clamped
/// to at least one.
#[must_use]
pub fn build_helix(params: &HelixParams) -> Vec<ContentNode> {
    let segments = params.segment_count.max(1);
    let n = segments as f32;
    let step_height = params.height / n;
    let half_height = params.height / 2.0;
    let radius = params.radius;

    let mut nodes = Vec::with_capacity(3 * segments as usize + 3);
    let backbone_material = MaterialDesc::opaque(BACKBONE_COLOR);

    for i in 0..=segments {
        let t = i as f32;
        let angle = strand_angle(t, n);
        let z = t * step_height - half_height;

        let strand_a = Vec3::new(radius * angle.cos(), radius * angle.sin(), z);
        let strand_b = Vec3::new(-strand_a.x, -strand_a.y, z);
        for position in [strand_a, strand_b] {
            nodes.push(ContentNode::new(
                NodeRole::Backbone,
                backbone_geometry(),
                backbone_material,
                Transform::from_translation(position),
            ));
        }

        if i < segments {
            let mid_angle = strand_angle(t + 0.5, n);
            let (left, right) = BASE_PAIRS[i as usize % BASE_PAIRS.len()];
            // The rung's local Y axis is rotated onto the strand diameter.
            let rotation = Quat::from_rotation_z(mid_angle - FRAC_PI_2);
            nodes.push(ContentNode {
                geometry: GeometryDesc::Rung {
                    radius: RUNG_RADIUS,
                    length: 2.0 * radius,
                    radial_segments: 8,
                },
                material: MaterialSpec::Multi(vec![
                    MaterialDesc::opaque(left),
                    MaterialDesc::opaque(right),
                ]),
                transform: Transform::from_translation(Vec3::new(
                    0.0,
                    0.0,
                    z + step_height / 2.0,
                ))
                .with_rotation(rotation),
                role: NodeRole::BasePair,
            });
        }
    }

    nodes.push(ContentNode::new(
        NodeRole::Core,
        GeometryDesc::Sphere {
            radius: CORE_RADIUS,
            width_segments: 24,
            height_segments: 16,
        },
        MaterialDesc::opaque(CORE_COLOR),
        Transform::from_translation(Vec3::new(0.0, 0.0, -half_height)),
    ));

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(nodes: &[ContentNode], role: NodeRole) -> usize {
        nodes.iter().filter(|n| n.role == role).count()
    }

    #[test]
    fn node_count_is_three_n_plus_three() {
        for segment_count in [1, 2, 7, 30, 100] {
            let nodes = build_helix(&HelixParams {
                segment_count,
                ..HelixParams::default()
            });
            let n = segment_count as usize;
            assert_eq!(nodes.len(), 3 * n + 3, "segments = {n}");
            assert_eq!(count(&nodes, NodeRole::Backbone), 2 * (n + 1));
            assert_eq!(count(&nodes, NodeRole::BasePair), n);
            assert_eq!(count(&nodes, NodeRole::Core), 1);
        }
    }

    #[test]
    fn reference_helix_has_93_nodes() {
        let nodes = build_helix(&HelixParams {
            radius: 1.0,
            height: 4.0,
            segment_count: 30,
        });
        assert_eq!(nodes.len(), 93);
    }

    #[test]
    fn zero_segments_clamps_to_one() {
        let nodes = build_helix(&HelixParams {
            segment_count: 0,
            ..HelixParams::default()
        });
        assert_eq!(nodes.len(), 6);
    }

    #[test]
    fn strands_are_diametrically_opposed() {
        let params = HelixParams::default();
        let nodes = build_helix(&params);
        let beads: Vec<_> = nodes
            .iter()
            .filter(|n| n.role == NodeRole::Backbone)
            .collect();
        for pair in beads.chunks(2) {
            let (a, b) = (pair[0].position(), pair[1].position());
            assert!((a.x + b.x).abs() < 1e-5);
            assert!((a.y + b.y).abs() < 1e-5);
            assert_eq!(a.z, b.z);
            assert!((a.truncate().length() - params.radius).abs() < 1e-5);
        }
    }

    #[test]
    fn strands_span_the_full_height() {
        let params = HelixParams::default();
        let nodes = build_helix(&params);
        let first = nodes[0].position();
        // Nodes end with the last strand pair and then the core.
        assert_eq!(nodes[nodes.len() - 3].role, NodeRole::Backbone);
        let last_a = nodes[nodes.len() - 3].position();
        let last_b = nodes[nodes.len() - 2].position();
        assert!((first.z + params.height / 2.0).abs() < 1e-5);
        assert!((last_a.z - params.height / 2.0).abs() < 1e-4);
        // Four full turns: strand A returns to its starting angle.
        assert!((last_a.x - first.x).abs() < 1e-4);
        assert!((last_a.y - first.y).abs() < 1e-4);
        assert!((last_b.x + first.x).abs() < 1e-4);
    }

    #[test]
    fn rungs_span_the_diameter_at_mid_height() {
        let params = HelixParams::default();
        let nodes = build_helix(&params);
        let step = params.height / params.segment_count as f32;
        let rung = &nodes[2];
        assert_eq!(rung.role, NodeRole::BasePair);
        assert!(
            (rung.position().z - (-params.height / 2.0 + step / 2.0)).abs()
                < 1e-5
        );
        let spans_diameter = matches!(
            rung.geometry,
            GeometryDesc::Rung { length, .. }
                if (length - 2.0 * params.radius).abs() < 1e-6
        );
        assert!(spans_diameter);

        // Rotated local Y points along the strand diameter at mid angle.
        let axis = rung.transform.rotation * Vec3::Y;
        let mid = strand_angle(0.5, params.segment_count as f32);
        assert!((axis.x - mid.cos()).abs() < 1e-5);
        assert!((axis.y - mid.sin()).abs() < 1e-5);
        assert!(axis.z.abs() < 1e-6);
    }

    #[test]
    fn rungs_carry_one_material_per_half() {
        let nodes = build_helix(&HelixParams::default());
        for rung in nodes.iter().filter(|n| n.role == NodeRole::BasePair) {
            assert_eq!(
                rung.material.descs().len(),
                rung.geometry.group_count()
            );
        }
    }

    #[test]
    fn core_sits_at_the_bottom() {
        let params = HelixParams::default();
        let nodes = build_helix(&params);
        let core = nodes.last().map(|n| (n.role, n.position()));
        assert_eq!(
            core,
            Some((NodeRole::Core, Vec3::new(0.0, 0.0, -params.height / 2.0)))
        );
    }

    #[test]
    fn builds_are_deterministic() {
        let params = HelixParams::default();
        assert_eq!(build_helix(&params), build_helix(&params));
    }
}
