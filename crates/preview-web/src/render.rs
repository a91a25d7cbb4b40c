mod helpers;

use glam::Mat4;
use preview_core::constants::{FOG_DENSITY, PARTICLE_OPACITY, PARTICLE_POINT_SIZE};
use preview_core::scene::{Blend, FrameView, MeshRole, PointInstance, SceneGeometry, Topology};
use smallvec::SmallVec;
use web_sys as web;
use wgpu::util::DeviceExt;

use helpers::{make_scene_pipeline, uniform_binding, uniform_layout, ADDITIVE};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ObjectUniforms {
    model: [[f32; 4]; 4],
    tint: [f32; 4],
}

impl ObjectUniforms {
    fn new(model: Mat4, tint: [f32; 3], opacity: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            tint: [tint[0], tint[1], tint[2], opacity],
        }
    }
}

const QUAD_CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0]];
const QUAD_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const INSTANCE_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![1 => Float32x3, 2 => Float32];
const MESH_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

struct MeshBuffers {
    role: MeshRole,
    topology: Topology,
    blend: Blend,
    opacity: f32,
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Per-session GPU resources. Dropped as a unit when geometry is released.
struct SceneBuffers {
    tint: [f32; 3],
    instances: wgpu::Buffer,
    instance_capacity: u32,
    instance_count: u32,
    particle_uniforms: wgpu::Buffer,
    particle_bind_group: wgpu::BindGroup,
    meshes: SmallVec<[MeshBuffers; 4]>,
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    quad_buffer: wgpu::Buffer,

    point_pipeline: wgpu::RenderPipeline,
    line_additive: wgpu::RenderPipeline,
    line_alpha: wgpu::RenderPipeline,
    triangle_additive: wgpu::RenderPipeline,
    triangle_alpha: wgpu::RenderPipeline,

    scene: Option<SceneBuffers>,
    width: u32,
    height: u32,
}

impl GpuState {
    /// Takes ownership of a canvas handle so the surface is `'static` and can
    /// outlive the async setup.
    pub async fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;

        let caps = surface.get_capabilities(&adapter);
        let fallback_format = caps
            .formats
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .unwrap_or(fallback_format);
        // transparent canvas over the page background
        let alpha_mode = caps
            .alpha_modes
            .iter()
            .copied()
            .find(|m| *m == wgpu::CompositeAlphaMode::PreMultiplied)
            .or_else(|| caps.alpha_modes.first().copied())
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(preview_core::SCENE_WGSL.into()),
        });
        let globals_layout = uniform_layout(&device, "globals_bgl");
        let object_layout = uniform_layout(&device, "object_bgl");
        let (globals_buffer, globals_bind_group) = uniform_binding(
            &device,
            &globals_layout,
            "globals",
            std::mem::size_of::<Globals>() as u64,
        );
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&globals_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let point_buffers = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &QUAD_ATTRS,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<PointInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &INSTANCE_ATTRS,
            },
        ];
        let mesh_buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<preview_core::scene::MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &MESH_ATTRS,
        }];
        let alpha = wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING;
        let mesh_pipeline = |label: &str, topology, blend| {
            make_scene_pipeline(
                &device,
                label,
                &layout,
                &shader,
                ("vs_mesh", "fs_mesh"),
                &mesh_buffers,
                topology,
                format,
                blend,
            )
        };
        let line_additive = mesh_pipeline("line_additive", wgpu::PrimitiveTopology::LineList, ADDITIVE);
        let line_alpha = mesh_pipeline("line_alpha", wgpu::PrimitiveTopology::LineList, alpha);
        let triangle_additive =
            mesh_pipeline("triangle_additive", wgpu::PrimitiveTopology::TriangleList, ADDITIVE);
        let triangle_alpha =
            mesh_pipeline("triangle_alpha", wgpu::PrimitiveTopology::TriangleList, alpha);
        let point_pipeline = make_scene_pipeline(
            &device,
            "point_pipeline",
            &layout,
            &shader,
            ("vs_point", "fs_point"),
            &point_buffers,
            wgpu::PrimitiveTopology::TriangleStrip,
            format,
            ADDITIVE,
        );

        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("point_quad"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::info!("[gpu] ready {}x{} format={:?} alpha={:?}", width, height, format, alpha_mode);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            globals_buffer,
            globals_bind_group,
            object_layout,
            quad_buffer,
            point_pipeline,
            line_additive,
            line_alpha,
            triangle_additive,
            triangle_alpha,
            scene: None,
            width,
            height,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Replace the session buffers. Instance data arrives separately.
    pub fn upload(&mut self, geometry: &SceneGeometry) {
        let instance_capacity = geometry.particle_capacity.max(1) as u32;
        let instances = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("point_instances"),
            size: instance_capacity as u64 * std::mem::size_of::<PointInstance>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let object_size = std::mem::size_of::<ObjectUniforms>() as u64;
        let (particle_uniforms, particle_bind_group) =
            uniform_binding(&self.device, &self.object_layout, "particle_uniforms", object_size);

        let meshes = geometry
            .meshes
            .iter()
            .map(|part| {
                let vertices = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_vertices"),
                    contents: bytemuck::cast_slice(&part.mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let indices = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_indices"),
                    contents: bytemuck::cast_slice(&part.mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                let (uniforms, bind_group) =
                    uniform_binding(&self.device, &self.object_layout, "mesh_uniforms", object_size);
                MeshBuffers {
                    role: part.role,
                    topology: part.mesh.topology,
                    blend: part.blend,
                    opacity: part.opacity,
                    vertices,
                    indices,
                    index_count: part.mesh.index_count(),
                    uniforms,
                    bind_group,
                }
            })
            .collect();

        self.scene = Some(SceneBuffers {
            tint: geometry.tint,
            instances,
            instance_capacity,
            instance_count: 0,
            particle_uniforms,
            particle_bind_group,
            meshes,
        });
    }

    pub fn write_instances(&mut self, points: &[PointInstance]) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let n = (points.len() as u32).min(scene.instance_capacity);
        self.queue
            .write_buffer(&scene.instances, 0, bytemuck::cast_slice(&points[..n as usize]));
        scene.instance_count = n;
    }

    pub fn release_geometry(&mut self) {
        self.scene = None;
    }

    pub fn render(&mut self, view: &FrameView<'_>) -> Result<(), wgpu::SurfaceError> {
        if let Some(points) = view.particles {
            self.write_instances(points);
        }
        let Some(scene) = self.scene.as_ref() else {
            return Ok(());
        };
        let globals = Globals {
            view: view.view.to_cols_array_2d(),
            proj: view.projection.to_cols_array_2d(),
            camera_pos: view.camera_position.extend(1.0).to_array(),
            params: [FOG_DENSITY, PARTICLE_POINT_SIZE, 0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        self.queue.write_buffer(
            &scene.particle_uniforms,
            0,
            bytemuck::bytes_of(&ObjectUniforms::new(
                view.particle_model,
                scene.tint,
                PARTICLE_OPACITY,
            )),
        );
        for mesh in &scene.meshes {
            let model = view
                .transforms
                .iter()
                .find(|(role, _)| *role == mesh.role)
                .map(|(_, m)| *m)
                .unwrap_or(Mat4::IDENTITY);
            self.queue.write_buffer(
                &mesh.uniforms,
                0,
                bytemuck::bytes_of(&ObjectUniforms::new(model, view.tint, mesh.opacity)),
            );
        }

        let frame = self.surface.get_current_texture()?;
        let target = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);

            // meshes first so the particle haze sits over the lattice
            for mesh in &scene.meshes {
                let pipeline = match (mesh.topology, mesh.blend) {
                    (Topology::Lines, Blend::Additive) => &self.line_additive,
                    (Topology::Lines, Blend::Alpha) => &self.line_alpha,
                    (Topology::Triangles, Blend::Additive) => &self.triangle_additive,
                    (Topology::Triangles, Blend::Alpha) => &self.triangle_alpha,
                };
                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(1, &mesh.bind_group, &[]);
                rpass.set_vertex_buffer(0, mesh.vertices.slice(..));
                rpass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }

            if scene.instance_count > 0 {
                rpass.set_pipeline(&self.point_pipeline);
                rpass.set_bind_group(1, &scene.particle_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.quad_buffer.slice(..));
                rpass.set_vertex_buffer(1, scene.instances.slice(..));
                rpass.draw(0..4, 0..scene.instance_count);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Reapply the current configuration after a lost or outdated surface.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}
