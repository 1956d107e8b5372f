//! CPU tessellation of [`GeometryDesc`] into indexed triangle meshes.

use std::f32::consts::{PI, TAU};
use std::ops::Range;

use crate::structure::GeometryDesc;

/// Vertex layout shared by every mesh: position + normal.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Local-space position.
    pub position: [f32; 3],
    /// Unit normal.
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Vertex buffer layout (slot 0).
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle mesh with material groups.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertices.
    pub vertices: Vec<MeshVertex>,
    /// Triangle-list indices.
    pub indices: Vec<u32>,
    /// Index ranges, one per material slot, covering `indices` in order.
    pub groups: Vec<Range<u32>>,
}

/// Tessellate a geometry description.
#[must_use]
pub fn tessellate(desc: &GeometryDesc) -> MeshData {
    match *desc {
        GeometryDesc::Sphere {
            radius,
            width_segments,
            height_segments,
        } => sphere(radius, width_segments.max(3), height_segments.max(2)),
        GeometryDesc::Rung {
            radius,
            length,
            radial_segments,
        } => rung(radius, length, radial_segments.max(3)),
    }
}

fn sphere(radius: f32, width: u32, height: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let row = width + 1;

    for iy in 0..=height {
        let theta = iy as f32 / height as f32 * PI;
        for ix in 0..=width {
            let phi = ix as f32 / width as f32 * TAU;
            let normal = [
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            ];
            mesh.vertices.push(MeshVertex {
                position: normal.map(|c| c * radius),
                normal,
            });
        }
    }

    for iy in 0..height {
        for ix in 0..width {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // Pole rows collapse to a single point; skip the degenerate half.
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    mesh.groups.push(0..mesh.indices.len() as u32);
    mesh
}

/// Two stacked cylinder halves meeting at `y = 0`, each capped at its
/// outer end. Group 0 is the lower half, group 1 the upper.
fn rung(radius: f32, length: f32, radial: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let half = length / 2.0;

    for (y_inner, y_outer) in [(0.0, -half), (0.0, half)] {
        let start = mesh.indices.len() as u32;
        let base = mesh.vertices.len() as u32;

        // Side: inner ring then outer ring.
        for y in [y_inner, y_outer] {
            for s in 0..=radial {
                let angle = s as f32 / radial as f32 * TAU;
                let (sin, cos) = angle.sin_cos();
                mesh.vertices.push(MeshVertex {
                    position: [radius * sin, y, radius * cos],
                    normal: [sin, 0.0, cos],
                });
            }
        }
        let ring = radial + 1;
        for s in 0..radial {
            let a = base + s;
            let b = base + s + 1;
            let c = base + ring + s;
            let d = base + ring + s + 1;
            mesh.indices.extend_from_slice(&[a, c, b, b, c, d]);
        }

        // Outer cap.
        let cap_normal = [0.0, y_outer.signum(), 0.0];
        let center = mesh.vertices.len() as u32;
        mesh.vertices.push(MeshVertex {
            position: [0.0, y_outer, 0.0],
            normal: cap_normal,
        });
        for s in 0..=radial {
            let angle = s as f32 / radial as f32 * TAU;
            let (sin, cos) = angle.sin_cos();
            mesh.vertices.push(MeshVertex {
                position: [radius * sin, y_outer, radius * cos],
                normal: cap_normal,
            });
        }
        for s in 0..radial {
            mesh.indices
                .extend_from_slice(&[center, center + 1 + s, center + 2 + s]);
        }

        mesh.groups.push(start..mesh.indices.len() as u32);
    }

    mesh
}
