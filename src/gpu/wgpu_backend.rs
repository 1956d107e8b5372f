//! wgpu implementation of [`RenderBackend`].
//!
//! Every geometry owns a vertex and index buffer, every material a small
//! uniform buffer plus bind group. Per-node model matrices go into one
//! growable instance buffer rewritten each frame; opaque nodes draw first,
//! then blended ones with depth writes off.

use std::ops::Range;

use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use super::backend::{FrameError, FrameInput, RenderBackend};
use super::instance_buffer::InstanceBuffer;
use super::mesh::{tessellate, MeshVertex};
use super::render_context::{RenderContext, RenderContextError};
use super::resources::{
    GeometryHandle, HandleAllocator, MaterialHandle, ResourceAllocator,
    ResourceCounts,
};
use crate::camera::core::CameraUniform;
use crate::scene::lighting::LightingUniform;
use crate::structure::{GeometryDesc, MaterialDesc};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-node instance data: the model matrix, one column per attribute.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceRaw {
    model: [[f32; 4]; 4],
}

impl InstanceRaw {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Must match `Material` in `mesh.wgsl` (32 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MaterialUniform {
    color: [f32; 3],
    opacity: f32,
    shininess: f32,
    _pad: [f32; 3],
}

impl From<&MaterialDesc> for MaterialUniform {
    fn from(desc: &MaterialDesc) -> Self {
        Self {
            color: desc.color,
            opacity: desc.opacity.clamp(0.0, 1.0),
            shininess: desc.shininess.max(1.0),
            _pad: [0.0; 3],
        }
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    groups: Vec<Range<u32>>,
}

struct GpuMaterial {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    transparent: bool,
}

struct DepthTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthTarget {
    fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn uniform_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}

fn create_mesh_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    transparent: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[MeshVertex::layout(), InstanceRaw::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(if transparent {
                    wgpu::BlendState::ALPHA_BLENDING
                } else {
                    wgpu::BlendState::REPLACE
                }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: !transparent,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Forward renderer drawing scene nodes into a wgpu surface.
pub struct WgpuBackend {
    context: RenderContext,
    depth: DepthTarget,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    lighting_buffer: wgpu::Buffer,
    lighting_bind_group: wgpu::BindGroup,
    material_layout: wgpu::BindGroupLayout,
    opaque_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,
    instances: InstanceBuffer<InstanceRaw>,
    geometries: FxHashMap<GeometryHandle, GpuMesh>,
    materials: FxHashMap<MaterialHandle, GpuMaterial>,
    handles: HandleAllocator,
    released: bool,
}

impl WgpuBackend {
    /// Bind a new backend to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderContextError::MissingSurface`] when `target` is
    /// `None`, or the wgpu failure that prevented context creation.
    pub async fn new<T>(
        target: Option<T>,
        size: (u32, u32),
    ) -> Result<Self, RenderContextError>
    where
        T: Into<wgpu::SurfaceTarget<'static>>,
    {
        let context = RenderContext::new(target, size).await?;
        Ok(Self::from_context(context))
    }

    /// Build pipelines and shared uniforms on an existing context.
    #[must_use]
    pub fn from_context(context: RenderContext) -> Self {
        let device = &context.device;

        let camera_layout = uniform_layout(
            device,
            "Camera Bind Group Layout",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );
        let lighting_layout = uniform_layout(
            device,
            "Lighting Bind Group Layout",
            wgpu::ShaderStages::FRAGMENT,
        );
        let material_layout = uniform_layout(
            device,
            "Material Bind Group Layout",
            wgpu::ShaderStages::FRAGMENT,
        );

        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::bytes_of(&CameraUniform::new()),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = uniform_bind_group(
            device,
            "Camera Bind Group",
            &camera_layout,
            &camera_buffer,
        );

        let lighting_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Lighting Buffer"),
                contents: bytemuck::bytes_of(&LightingUniform::unlit()),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let lighting_bind_group = uniform_bind_group(
            device,
            "Lighting Bind Group",
            &lighting_layout,
            &lighting_buffer,
        );

        let shader = device
            .create_shader_module(wgpu::include_wgsl!(
                "../../assets/shaders/mesh.wgsl"
            ));
        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Mesh Pipeline Layout"),
                bind_group_layouts: &[
                    &camera_layout,
                    &lighting_layout,
                    &material_layout,
                ],
                push_constant_ranges: &[],
            });
        let format = context.format();
        let opaque_pipeline = create_mesh_pipeline(
            device,
            "Opaque Mesh Pipeline",
            &shader,
            &pipeline_layout,
            format,
            false,
        );
        let transparent_pipeline = create_mesh_pipeline(
            device,
            "Transparent Mesh Pipeline",
            &shader,
            &pipeline_layout,
            format,
            true,
        );

        let instances = InstanceBuffer::new(device, "Instance Buffer", 256);
        let (width, height) = (context.config.width, context.config.height);
        let depth = DepthTarget::new(device, width, height);

        Self {
            context,
            depth,
            camera_buffer,
            camera_bind_group,
            lighting_buffer,
            lighting_bind_group,
            material_layout,
            opaque_pipeline,
            transparent_pipeline,
            instances,
            geometries: FxHashMap::default(),
            materials: FxHashMap::default(),
            handles: HandleAllocator::default(),
            released: false,
        }
    }

    /// The underlying render context.
    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    fn item_is_transparent(&self, materials: &[MaterialHandle]) -> bool {
        materials
            .iter()
            .filter_map(|h| self.materials.get(h))
            .any(|m| m.transparent)
    }
}

impl ResourceAllocator for WgpuBackend {
    fn create_geometry(&mut self, desc: &GeometryDesc) -> GeometryHandle {
        let mesh = tessellate(desc);
        let device = &self.context.device;
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let handle = self.handles.next_geometry();
        let _ = self.geometries.insert(
            handle,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                groups: mesh.groups,
            },
        );
        handle
    }

    fn create_material(&mut self, desc: &MaterialDesc) -> MaterialHandle {
        let uniform = MaterialUniform::from(desc);
        let buffer = self.context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Material Buffer"),
                contents: bytemuck::bytes_of(&uniform),
                usage: wgpu::BufferUsages::UNIFORM,
            },
        );
        let bind_group = uniform_bind_group(
            &self.context.device,
            "Material Bind Group",
            &self.material_layout,
            &buffer,
        );

        let handle = self.handles.next_material();
        let _ = self.materials.insert(
            handle,
            GpuMaterial {
                buffer,
                bind_group,
                transparent: desc.is_transparent(),
            },
        );
        handle
    }

    fn dispose_geometry(&mut self, handle: GeometryHandle) {
        match self.geometries.remove(&handle) {
            Some(mesh) => {
                mesh.vertex_buffer.destroy();
                mesh.index_buffer.destroy();
            }
            None => log::warn!("dispose of unknown geometry {}", handle.raw()),
        }
    }

    fn dispose_material(&mut self, handle: MaterialHandle) {
        match self.materials.remove(&handle) {
            Some(material) => material.buffer.destroy(),
            None => log::warn!("dispose of unknown material {}", handle.raw()),
        }
    }

    fn live_resources(&self) -> ResourceCounts {
        ResourceCounts {
            geometries: self.geometries.len(),
            materials: self.materials.len(),
        }
    }
}

impl RenderBackend for WgpuBackend {
    fn resize(&mut self, width: u32, height: u32) {
        if self.released {
            return;
        }
        self.context.resize(width, height);
        self.depth.texture.destroy();
        self.depth = DepthTarget::new(
            &self.context.device,
            self.context.config.width,
            self.context.config.height,
        );
    }

    fn reconfigure(&mut self) {
        if !self.released {
            self.context.reconfigure();
        }
    }

    fn render(&mut self, frame: &FrameInput<'_>) -> Result<(), FrameError> {
        if self.released {
            return Err(FrameError::Released);
        }

        let queue = &self.context.queue;
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&frame.camera),
        );
        queue.write_buffer(
            &self.lighting_buffer,
            0,
            bytemuck::bytes_of(&frame.lighting),
        );

        // Opaque first, then blended, each in scene order.
        let (mut order, blended): (Vec<usize>, Vec<usize>) =
            (0..frame.items.len()).partition(|&i| {
                !self.item_is_transparent(frame.items[i].materials)
            });
        let first_blended = order.len();
        order.extend(blended);

        let models: Vec<InstanceRaw> = order
            .iter()
            .map(|&i| InstanceRaw {
                model: frame.items[i].model.to_cols_array_2d(),
            })
            .collect();
        let _ = self.instances.upload(
            &self.context.device,
            &self.context.queue,
            &models,
        );

        let output = self.context.get_next_frame()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();
        {
            let [r, g, b] = frame.clear_color;
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Mesh Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color {
                                    r: f64::from(r),
                                    g: f64::from(g),
                                    b: f64::from(b),
                                    a: 1.0,
                                }),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });

            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_bind_group(1, &self.lighting_bind_group, &[]);
            if self.instances.count() > 0 {
                pass.set_vertex_buffer(1, self.instances.buffer().slice(..));
            }

            for (slot, &i) in order.iter().enumerate() {
                let item = &frame.items[i];
                let Some(mesh) = self.geometries.get(&item.geometry) else {
                    continue;
                };
                pass.set_pipeline(if slot < first_blended {
                    &self.opaque_pipeline
                } else {
                    &self.transparent_pipeline
                });
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(
                    mesh.index_buffer.slice(..),
                    wgpu::IndexFormat::Uint32,
                );

                let instance = slot as u32;
                for (group, range) in mesh.groups.iter().enumerate() {
                    let material = item
                        .materials
                        .get(group)
                        .or_else(|| item.materials.last())
                        .and_then(|h| self.materials.get(h));
                    let Some(material) = material else {
                        continue;
                    };
                    pass.set_bind_group(2, &material.bind_group, &[]);
                    pass.draw_indexed(range.clone(), 0, instance..instance + 1);
                }
            }
        }
        self.context.submit(encoder);
        output.present();
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        let leaked = self.live_resources();
        if !leaked.is_empty() {
            log::warn!(
                "releasing backend with {} geometries and {} materials still \
                 live",
                leaked.geometries,
                leaked.materials
            );
        }
        for (_, mesh) in self.geometries.drain() {
            mesh.vertex_buffer.destroy();
            mesh.index_buffer.destroy();
        }
        for (_, material) in self.materials.drain() {
            material.buffer.destroy();
        }
        self.instances.destroy();
        self.camera_buffer.destroy();
        self.lighting_buffer.destroy();
        self.depth.texture.destroy();
        self.context.detach_surface();
        self.released = true;
        log::debug!("wgpu backend released");
    }
}
