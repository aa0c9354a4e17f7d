//! wgpu implementation of the triangle ID pass.
//!
//! Owns an `Rgba8Unorm` color texture with a `Depth24Plus` depth buffer, the
//! flat-color pick pipeline and a one-row staging buffer for readback. Every
//! draw uses its own encoder and render pass, so no state leaks into the host
//! renderer.

use glam::Mat4;
use meshpick_core::BACKGROUND_COLOR;
use meshpick_mesh::TriangleDrawable;

use crate::buffer::{
    create_pixel_readback_buffer, create_uniform_buffer, create_vertex_buffer, update_uniform,
};
use crate::error::{RenderError, RenderResult};
use crate::rasterizer::{IdRasterizer, RowOrigin};
use crate::shader::{ShaderBuilder, ShaderProgram};

const PICK_SHADER: &str = include_str!("shaders/pick_triangles.wgsl");
const PICK_COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const PICK_DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// GPU uniforms for the triangle ID pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PickUniforms {
    /// Combined view-projection matrix, column major.
    pub view_proj: [[f32; 4]; 4],
}

impl PickUniforms {
    /// Uniforms for the given view-projection matrix.
    #[must_use]
    pub fn new(view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
        }
    }
}

impl Default for PickUniforms {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}

struct PickProgram {
    program: ShaderProgram,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct PickTextures {
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    width: u32,
    height: u32,
}

/// Offscreen triangle ID target on a wgpu device.
pub struct PickTarget {
    device: wgpu::Device,
    queue: wgpu::Queue,
    program: Option<PickProgram>,
    textures: Option<PickTextures>,
    staging_buffer: wgpu::Buffer,
    background: [u8; 4],
}

impl PickTarget {
    /// Creates a pick target on an existing device.
    ///
    /// Nothing but the staging buffer is allocated until the first pick.
    #[must_use]
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        let staging_buffer = create_pixel_readback_buffer(&device, Some("Pick Staging Buffer"));
        Self {
            device,
            queue,
            program: None,
            textures: None,
            staging_buffer,
            background: BACKGROUND_COLOR,
        }
    }

    /// Creates a pick target on its own device, without any window or
    /// surface.
    pub async fn new_headless() -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("meshpick device (headless)"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await?;

        log::debug!("headless pick device on {}", adapter.get_info().name);
        Ok(Self::new(device, queue))
    }

    /// Current clear color.
    pub fn background(&self) -> [u8; 4] {
        self.background
    }

    /// Size of the offscreen target, if it has been created.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.textures.as_ref().map(|t| (t.width, t.height))
    }

    /// Returns true once the pick pipeline exists.
    pub fn has_program(&self) -> bool {
        self.program.is_some()
    }

    /// The wgpu device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// The wgpu queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    fn create_program(&self) -> RenderResult<PickProgram> {
        let device = &self.device;
        let shader = ShaderBuilder::new()
            .with_source(PICK_SHADER)
            .with_label("Pick Triangles Shader")
            .build_module(device)?;

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Pick Triangles Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Pick Triangles Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Pick Triangles Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    }],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: PICK_COLOR_FORMAT,
                    blend: None, // IDs must be written verbatim
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..wgpu::PrimitiveState::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: PICK_DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::PipelineCreationFailed(error.to_string()));
        }

        let uniform_buffer =
            create_uniform_buffer(device, &PickUniforms::default(), Some("Pick Uniforms"));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Pick Triangles Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(PickProgram {
            program: ShaderProgram {
                pipeline,
                bind_group_layout,
            },
            uniform_buffer,
            bind_group,
        })
    }

    fn create_textures(device: &wgpu::Device, width: u32, height: u32) -> PickTextures {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Pick Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: PICK_COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());

        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Pick Depth Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: PICK_DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        PickTextures {
            color,
            color_view,
            depth_view,
            width,
            height,
        }
    }

    fn clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.background.map(|c| f64::from(c) / 255.0);
        wgpu::Color { r, g, b, a }
    }

    fn wait_idle(&self) -> RenderResult<()> {
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map(|_| ())
            .map_err(|e| RenderError::ReadbackFailed(e.to_string()))
    }
}

impl IdRasterizer for PickTarget {
    fn prepare_program(&mut self) -> RenderResult<()> {
        if self.program.is_some() {
            return Ok(());
        }
        let program = self.create_program()?;
        log::debug!("created triangle pick pipeline");
        self.program = Some(program);
        Ok(())
    }

    fn ensure_target(&mut self, width: u32, height: u32) -> RenderResult<()> {
        let (width, height) = (width.max(1), height.max(1));
        if self.size() == Some((width, height)) {
            return Ok(());
        }
        self.textures = Some(Self::create_textures(&self.device, width, height));
        log::debug!("pick target resized to {width}x{height}");
        Ok(())
    }

    fn set_background(&mut self, color: [u8; 4]) {
        self.background = color;
    }

    fn draw_triangle_ids(
        &mut self,
        drawable: &TriangleDrawable,
        view_proj: Mat4,
    ) -> RenderResult<()> {
        let program = self.program.as_ref().ok_or(RenderError::ProgramNotReady)?;
        let textures = self.textures.as_ref().ok_or(RenderError::TargetNotReady)?;

        update_uniform(&self.queue, &program.uniform_buffer, &PickUniforms::new(view_proj));
        let vertex_buffer = (!drawable.is_empty()).then(|| {
            create_vertex_buffer(&self.device, drawable.vertices(), Some("Pick Triangle Vertices"))
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Pick Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Pick Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &textures.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &textures.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if let Some(buffer) = &vertex_buffer {
                pass.set_pipeline(&program.program.pipeline);
                pass.set_bind_group(0, &program.bind_group, &[]);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..drawable.vertices().len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.wait_idle()
    }

    fn read_pixel(&mut self, x: u32, row: u32) -> RenderResult<[u8; 4]> {
        let textures = self.textures.as_ref().ok_or(RenderError::TargetNotReady)?;
        if x >= textures.width || row >= textures.height {
            return Err(RenderError::PixelOutOfBounds {
                x,
                row,
                width: textures.width,
                height: textures.height,
            });
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Pick Readback Encoder"),
            });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &textures.color,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y: row, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.staging_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = self.staging_buffer.slice(..4);
        let (sender, receiver) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        if let Err(err) = self.wait_idle() {
            // Leave the staging buffer mappable for the next pick.
            self.staging_buffer.unmap();
            return Err(err);
        }
        receiver
            .recv()
            .map_err(|e| RenderError::ReadbackFailed(e.to_string()))?
            .map_err(|e| RenderError::ReadbackFailed(e.to_string()))?;

        let data = buffer_slice.get_mapped_range();
        let pixel = [data[0], data[1], data[2], data[3]];
        drop(data);
        self.staging_buffer.unmap();

        Ok(pixel)
    }

    fn row_origin(&self) -> RowOrigin {
        RowOrigin::TopLeft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_uniforms_layout() {
        assert_eq!(std::mem::size_of::<PickUniforms>(), 64);
        let uniforms = PickUniforms::new(Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(uniforms.view_proj[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_shader_declares_entry_points() {
        assert!(PICK_SHADER.contains("fn vs_main"));
        assert!(PICK_SHADER.contains("fn fs_main"));
        assert!(PICK_SHADER.contains("vertex_index / 3u"));
    }
}
