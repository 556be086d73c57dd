use glam::{Mat4, Vec3};
use bytemuck::{Pod, Zeroable};

use crate::controller::FrameSnapshot;
use crate::model::room_pieces;
use crate::utils::{MeshBuffer, Vertex, create_cube_mesh};
use crate::view::texture::{GpuTexture, SurfaceImages, create_surface_sampler};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.08, g: 0.08, b: 0.12, a: 1.0 };

const FLOOR_TINT: Vec3 = Vec3::ONE;
const BOARD_FRAME_COLOR: Vec3 = Vec3::new(0.25, 0.18, 0.12);
const BOARD_SURFACE_COLOR: Vec3 = Vec3::new(0.85, 0.75, 0.55);
const LIGHT_POS: Vec3 = Vec3::new(2.5, 3.5, 1.5);

/// Room shell plus board frame and surface.
const MAX_INSTANCES: usize = 8;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct GlobalsUniform {
    pub view_proj: [[f32; 4]; 4],
    pub light_pos: [f32; 4],
    pub view_pos: [f32; 4],
}

/// Which picture a box is painted with. Must match the `MATERIAL_*`
/// constants in `box.wgsl`.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    /// Flat color only.
    Plain = 0,
    Floor = 1,
    Wall = 2,
}

/// One box to draw: the unit cube scaled and moved into place. The color
/// multiplies the material's texture.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BoxInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub material: u32,
    _pad: [u32; 3],
}

impl BoxInstance {
    pub fn new(center: Vec3, size: Vec3, color: Vec3, material: Material) -> Self {
        Self {
            model: Mat4::from_scale_rotation_translation(size, glam::Quat::IDENTITY, center).to_cols_array_2d(),
            color: color.extend(1.0).to_array(),
            material: material as u32,
            _pad: [0; 3],
        }
    }
}

/// Boxes making up the scene for this frame.
pub fn scene_instances(snapshot: &FrameSnapshot) -> Vec<BoxInstance> {
    let mut instances: Vec<BoxInstance> = room_pieces()
        .iter()
        .map(|piece| {
            let (color, material) = if piece.themed {
                (snapshot.theme_color, Material::Wall)
            } else {
                (FLOOR_TINT, Material::Floor)
            };
            BoxInstance::new(piece.center, piece.size, color, material)
        })
        .collect();

    if snapshot.board.visible {
        let (frame_pos, frame_size) = snapshot.board.frame();
        instances.push(BoxInstance::new(frame_pos, frame_size, BOARD_FRAME_COLOR, Material::Plain));
        instances.push(BoxInstance::new(snapshot.board.pos, snapshot.board.size, BOARD_SURFACE_COLOR, Material::Plain));
    }
    instances
}

pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

/// Draws the room as lit, instanced boxes.
pub struct BoxRenderer {
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    surfaces_bind_group: wgpu::BindGroup,
    _floor: GpuTexture,
    _wall: GpuTexture,
    cube: MeshBuffer,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    _depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
}

impl BoxRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        images: &SurfaceImages,
        width: u32,
        height: u32,
    ) -> Self {
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals_buffer"),
            size: std::mem::size_of::<GlobalsUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: globals_buffer.as_entire_binding() }],
        });

        let floor = GpuTexture::from_rgba(device, queue, &images.floor, "floor_texture");
        let wall = GpuTexture::from_rgba(device, queue, &images.wall, "wall_texture");
        let sampler = create_surface_sampler(device);

        let surface_texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let surfaces_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("surfaces_bind_group_layout"),
            entries: &[
                surface_texture_entry(0),
                surface_texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let surfaces_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("surfaces_bind_group"),
            layout: &surfaces_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&floor.view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&wall.view) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(&sampler) },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("box_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/box.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("box_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout, &surfaces_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("box_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[
                            wgpu::VertexAttribute { offset: 0, shader_location: 0, format: wgpu::VertexFormat::Float32x3 },
                            wgpu::VertexAttribute { offset: 12, shader_location: 1, format: wgpu::VertexFormat::Float32x3 },
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<BoxInstance>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &[
                            wgpu::VertexAttribute { offset: 0, shader_location: 2, format: wgpu::VertexFormat::Float32x4 },
                            wgpu::VertexAttribute { offset: 16, shader_location: 3, format: wgpu::VertexFormat::Float32x4 },
                            wgpu::VertexAttribute { offset: 32, shader_location: 4, format: wgpu::VertexFormat::Float32x4 },
                            wgpu::VertexAttribute { offset: 48, shader_location: 5, format: wgpu::VertexFormat::Float32x4 },
                            wgpu::VertexAttribute { offset: 64, shader_location: 6, format: wgpu::VertexFormat::Float32x4 },
                            wgpu::VertexAttribute { offset: 80, shader_location: 7, format: wgpu::VertexFormat::Uint32 },
                        ],
                    },
                ],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState { format, blend: Some(wgpu::BlendState::ALPHA_BLENDING), write_mask: wgpu::ColorWrites::ALL })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
            multiview: None,
            cache: None,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("box_instances"),
            size: (MAX_INSTANCES * std::mem::size_of::<BoxInstance>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let (depth_texture, depth_view) = create_depth_texture(device, width, height);

        Self {
            pipeline,
            globals_buffer,
            globals_bind_group,
            surfaces_bind_group,
            _floor: floor,
            _wall: wall,
            cube: create_cube_mesh().upload(device),
            instance_buffer,
            instance_count: 0,
            _depth_texture: depth_texture,
            depth_view,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (depth_texture, depth_view) = create_depth_texture(device, width, height);
        self._depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    /// Upload camera and box data for this frame.
    pub fn prepare(&mut self, queue: &wgpu::Queue, snapshot: &FrameSnapshot) {
        let globals = GlobalsUniform {
            view_proj: snapshot.view_proj.to_cols_array_2d(),
            light_pos: LIGHT_POS.extend(1.0).to_array(),
            view_pos: snapshot.camera.eye.extend(1.0).to_array(),
        };
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let mut instances = scene_instances(snapshot);
        instances.truncate(MAX_INSTANCES);
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        self.instance_count = instances.len() as u32;
    }

    /// Clear and draw the room into `view`.
    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
        render_pass.set_bind_group(1, &self.surfaces_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.cube.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.set_index_buffer(self.cube.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.cube.index_count, 0, 0..self.instance_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::controller::FrameDriver;

    #[test]
    fn instance_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<BoxInstance>(), 96);
        assert_eq!(std::mem::offset_of!(BoxInstance, material), 80);
        assert_eq!(std::mem::size_of::<GlobalsUniform>(), 96);
    }

    #[test]
    fn board_drawn_only_when_visible() {
        let driver = FrameDriver::new(&GameConfig::default(), 1000, 700);
        let mut snap = driver.snapshot();
        assert_eq!(scene_instances(&snap).len(), 7);
        snap.board.visible = false;
        assert_eq!(scene_instances(&snap).len(), 5);
        assert!(scene_instances(&snap).len() <= MAX_INSTANCES);
    }

    #[test]
    fn floor_and_walls_are_textured_and_walls_tinted() {
        let driver = FrameDriver::new(&GameConfig::default(), 1000, 700);
        let snap = driver.snapshot();
        let instances = scene_instances(&snap);
        assert_eq!(instances[0].material, Material::Floor as u32);
        assert_eq!(instances[0].color, [1.0, 1.0, 1.0, 1.0]);
        for wall in &instances[1..5] {
            assert_eq!(wall.material, Material::Wall as u32);
            assert_eq!(wall.color, [0.8, 0.8, 0.9, 1.0]);
        }
        for board_part in &instances[5..] {
            assert_eq!(board_part.material, Material::Plain as u32);
        }
    }
}
