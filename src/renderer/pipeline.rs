//! WebGPU render pipeline setup
//!
//! `GpuSurface` tessellates every draw call into one triangle list in pixel
//! space and submits it in a single pass when the frame finishes.

use glam::Vec2;
use wgpu::util::DeviceExt;

use super::shapes;
use super::vertex::{Vertex, pixel_to_ndc};
use super::{DrawSurface, RenderError};
use crate::sim::{Background, Glow, Hsl};

/// Pen state, mirroring a 2D canvas context
#[derive(Debug, Clone, Copy)]
struct Pen {
    line_width: f32,
    stroke: [f32; 4],
    fill: [f32; 4],
    glow: Glow,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            stroke: [0.0, 0.0, 0.0, 1.0],
            fill: [0.0, 0.0, 0.0, 1.0],
            glow: Glow::NONE,
        }
    }
}

fn to_wgpu_color(rgba: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: rgba[0] as f64,
        g: rgba[1] as f64,
        b: rgba[2] as f64,
        a: rgba[3] as f64,
    }
}

pub struct GpuSurface {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    /// Viewport size in pixels
    pub size: (u32, u32),
    clear_color: wgpu::Color,
    pen: Pen,
    path: Vec<Vec2>,
    /// Whether the current path already received its glow
    path_glowed: bool,
    /// Triangles accumulated for this frame, in pixel space
    vertices: Vec<Vertex>,
}

impl GpuSurface {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("polyglow-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;

        // Transparent clears need the page to show through
        let alpha_mode = if surface_caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("Surface configured: {:?} {}x{}", surface_format, config.width, config.height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Placeholder until the first frame uploads real geometry
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer"),
            contents: bytemuck::cast_slice(&[Vertex::new(0.0, 0.0, [0.0; 4])]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_count: 0,
            size: (width.max(1), height.max(1)),
            clear_color: wgpu::Color::TRANSPARENT,
            pen: Pen::default(),
            path: Vec::new(),
            path_glowed: false,
            vertices: Vec::with_capacity(4096),
        })
    }

    /// Reconfigure after the surface was lost or went stale
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn push_glow(&mut self, points: &[Vec2]) {
        if !self.path_glowed {
            self.vertices
                .extend(shapes::glow_halo(points, self.pen.line_width, &self.pen.glow));
            self.path_glowed = true;
        }
    }

    /// Upload accumulated vertices and render
    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let (w, h) = (self.size.0 as f32, self.size.1 as f32);
        let ndc_vertices: Vec<Vertex> = self
            .vertices
            .iter()
            .map(|v| {
                let [x, y] = pixel_to_ndc(v.position[0], v.position[1], w, h);
                Vertex::new(x, y, v.color)
            })
            .collect();

        if !ndc_vertices.is_empty() {
            self.vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytemuck::cast_slice(&ndc_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
        }
        self.vertex_count = ndc_vertices.len() as u32;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl DrawSurface for GpuSurface {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 && (new_width, new_height) != self.size {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
        self.pen = Pen::default();
    }

    fn clear(&mut self, background: &Background) {
        self.vertices.clear();
        self.path.clear();
        self.clear_color = match background {
            Background::Clear => wgpu::Color::TRANSPARENT,
            Background::Fill(color) => to_wgpu_color(color.to_rgba(1.0)),
        };
    }

    fn set_line_width(&mut self, width: f32) {
        self.pen.line_width = width;
    }

    fn set_stroke_color(&mut self, color: Hsl) {
        self.pen.stroke = color.to_rgba(1.0);
    }

    fn set_fill_color(&mut self, color: Hsl) {
        self.pen.fill = color.to_rgba(1.0);
    }

    fn set_glow(&mut self, glow: &Glow) {
        self.pen.glow = *glow;
    }

    fn stroke_rect(&mut self, min: Vec2, max: Vec2) {
        let corners = [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)];
        self.vertices
            .extend(shapes::glow_halo(&corners, self.pen.line_width, &self.pen.glow));
        self.vertices
            .extend(shapes::stroke_polygon(&corners, self.pen.line_width, self.pen.stroke));
    }

    fn trace_polygon(&mut self, points: &[Vec2]) {
        self.path.clear();
        self.path.extend_from_slice(points);
        self.path_glowed = false;
    }

    fn fill(&mut self) {
        let path = std::mem::take(&mut self.path);
        self.push_glow(&path);
        self.vertices.extend(shapes::fill_polygon(&path, self.pen.fill));
        self.path = path;
    }

    fn stroke(&mut self) {
        let path = std::mem::take(&mut self.path);
        self.push_glow(&path);
        self.vertices
            .extend(shapes::stroke_polygon(&path, self.pen.line_width, self.pen.stroke));
        self.path = path;
    }

    fn finish_frame(&mut self) -> Result<(), RenderError> {
        self.render()?;
        Ok(())
    }
}
