use raymarch_render::{
    FULLSCREEN_QUAD, ShaderError, ShaderFile, ShaderInputs, ShaderSources, ShaderStage,
    ShaderVariant, UniformBlock,
};
use wgpu::util::DeviceExt;

/// Full-screen quad pipeline for one shader variant.
pub struct QuadRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    block: UniformBlock,
    variant: ShaderVariant,
}

impl QuadRenderer {
    /// Compiles both stages and links the pipeline.
    ///
    /// Validation errors are captured with error scopes so a bad shader
    /// surfaces as a [`ShaderError`] instead of the device's uncaptured
    /// error handler.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        sources: &ShaderSources,
        variant: ShaderVariant,
    ) -> Result<Self, ShaderError> {
        sources.check_inputs(variant)?;

        let vertex_module = compile(device, ShaderStage::Vertex, &sources.vertex)?;
        let fragment_module = compile(device, ShaderStage::Fragment, &sources.fragment)?;

        let block = UniformBlock::new(variant.uniform_layout());
        let uniform_size = block.layout().size() as u64;

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("shader_inputs"),
            size: uniform_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shader_inputs_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(uniform_size),
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shader_inputs_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        // Linking: stage interfaces and the uniform struct are checked
        // against each other and the bind group layout here.
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Link {
                message: err.to_string(),
            });
        }

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fullscreen_quad"),
            contents: bytemuck::cast_slice(&FULLSCREEN_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        tracing::info!(
            %variant,
            uniform_bytes = uniform_size,
            fragment = %sources.fragment.path.display(),
            "shader program built"
        );

        Ok(Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            vertex_buffer,
            block,
            variant,
        })
    }

    /// Input setter for the next recorded frame.
    pub fn inputs_mut(&mut self) -> &mut dyn ShaderInputs {
        &mut self.block
    }

    /// Uploads the current inputs and records a clear plus the quad draw
    /// into `encoder`.
    pub fn record(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) {
        queue.write_buffer(&self.uniform_buffer, 0, self.block.as_bytes());

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("quad_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            ..Default::default()
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..FULLSCREEN_QUAD.len() as u32, 0..1);
    }

    /// Frees GPU buffers now rather than when the device is dropped.
    pub fn release(self) {
        self.uniform_buffer.destroy();
        self.vertex_buffer.destroy();
        tracing::debug!(variant = %self.variant, "quad renderer released");
    }
}

fn compile(
    device: &wgpu::Device,
    stage: ShaderStage,
    file: &ShaderFile,
) -> Result<wgpu::ShaderModule, ShaderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: file.path.file_name().and_then(|n| n.to_str()),
        source: wgpu::ShaderSource::Wgsl(file.text.as_str().into()),
    });
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(ShaderError::Compile {
            stage,
            path: file.path.clone(),
            message: err.to_string(),
        }),
        None => {
            tracing::debug!(%stage, path = %file.path.display(), "shader compiled");
            Ok(module)
        }
    }
}
