use crate::compile::{compile_fragment_shader, compile_vertex_shader};

use super::{GpuContext, GpuError, TARGET_FORMAT};

/// Stride of one `vec2 a_position` vertex.
const VERTEX_STRIDE: wgpu::BufferAddress = (2 * std::mem::size_of::<f32>()) as wgpu::BufferAddress;

/// Compiled program plus the layout its uniform blocks bind against.
pub(crate) struct EffectPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_layout: wgpu::BindGroupLayout,
    binding_count: u32,
}

impl EffectPipeline {
    /// Builds a pipeline whose fragment program reads `binding_count` uniform
    /// blocks at `set = 0, binding = 0..binding_count`.
    pub fn new(
        gpu: &GpuContext,
        label: &str,
        fragment_body: &str,
        binding_count: u32,
    ) -> Result<Self, GpuError> {
        let vertex_module = compile_vertex_shader(gpu)?;
        let fragment_module = compile_fragment_shader(gpu, label, fragment_body)?;

        let entries: Vec<wgpu::BindGroupLayoutEntry> = (0..binding_count)
            .map(|binding| wgpu::BindGroupLayoutEntry {
                binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            })
            .collect();

        let built = gpu.validated(|device| {
            let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("effect uniform layout"),
                entries: &entries,
            });
            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("effect pipeline layout"),
                bind_group_layouts: &[&uniform_layout],
                push_constant_ranges: &[],
            });
            let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &vertex_module,
                    entry_point: Some("main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: VERTEX_STRIDE,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                    }],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
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
                fragment: Some(wgpu::FragmentState {
                    module: &fragment_module,
                    entry_point: Some("main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: TARGET_FORMAT,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multiview: None,
                cache: None,
            });
            (pipeline, uniform_layout)
        });

        let (pipeline, uniform_layout) = built.map_err(|message| GpuError::Pipeline {
            label: label.to_string(),
            message,
        })?;

        Ok(Self {
            pipeline,
            uniform_layout,
            binding_count,
        })
    }

    pub fn binding_count(&self) -> u32 {
        self.binding_count
    }
}
