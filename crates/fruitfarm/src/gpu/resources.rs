use image::RgbaImage;
use tracing::debug;
use wgpu::util::DeviceExt;

use crate::scissor::ScissorRect;

use super::{EffectPipeline, GpuContext, GpuError, RenderTarget};

/// Two triangles covering clip space.
const QUAD_VERTICES: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

/// Everything one renderer allocates on the device.
///
/// The set is created when a renderer attaches to a [`GpuContext`] and every
/// buffer and texture in it is destroyed when it is dropped. Uniform buffers
/// are sized from the blobs they carry; a blob whose length changes gets a
/// fresh buffer and the bind group is rebuilt around it.
pub struct GpuResources {
    gpu: GpuContext,
    label: String,
    pipeline: EffectPipeline,
    vertex_buffer: wgpu::Buffer,
    uniform_buffers: Vec<UniformSlot>,
    bind_group: wgpu::BindGroup,
    target: RenderTarget,
}

struct UniformSlot {
    buffer: wgpu::Buffer,
    len: usize,
}

impl GpuResources {
    /// Compiles `fragment_body` and allocates buffers for `initial_uniforms`,
    /// one blob per uniform binding, plus a `width`x`height` target.
    pub fn new(
        gpu: &GpuContext,
        label: &str,
        fragment_body: &str,
        initial_uniforms: &[Vec<u8>],
        width: u32,
        height: u32,
    ) -> Result<Self, GpuError> {
        let binding_count = u32::try_from(initial_uniforms.len()).map_err(|_| GpuError::Pipeline {
            label: label.to_string(),
            message: "too many uniform blocks".into(),
        })?;
        let pipeline = EffectPipeline::new(gpu, label, fragment_body, binding_count)?;

        let device = gpu.device();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("background quad"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uniform_buffers: Vec<UniformSlot> = initial_uniforms
            .iter()
            .enumerate()
            .map(|(binding, blob)| UniformSlot::allocate(gpu, label, binding, blob))
            .collect();
        let bind_group = build_bind_group(gpu, &pipeline, &uniform_buffers);
        let target = RenderTarget::new(gpu, width, height)?;

        debug!(
            effect = label,
            bindings = binding_count,
            width,
            height,
            "allocated background GPU resources"
        );

        Ok(Self {
            gpu: gpu.clone(),
            label: label.to_string(),
            pipeline,
            vertex_buffer,
            uniform_buffers,
            bind_group,
            target,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        self.target.size()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Recreates the offscreen target when the drawable size changed.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), GpuError> {
        let (width, height) = (width.max(1), height.max(1));
        if self.target.size() == (width, height) {
            return Ok(());
        }
        self.target = RenderTarget::new(&self.gpu, width, height)?;
        debug!(effect = %self.label, width, height, "recreated background target");
        Ok(())
    }

    /// Writes one blob per binding, reallocating any buffer whose blob length
    /// no longer matches.
    pub fn upload(&mut self, blobs: &[Vec<u8>]) -> Result<(), GpuError> {
        if blobs.len() != self.pipeline.binding_count() as usize {
            return Err(GpuError::Pipeline {
                label: self.label.clone(),
                message: format!(
                    "expected {} uniform blocks, got {}",
                    self.pipeline.binding_count(),
                    blobs.len()
                ),
            });
        }

        let mut rebind = false;
        for (binding, (slot, blob)) in self.uniform_buffers.iter_mut().zip(blobs).enumerate() {
            if slot.len != blob.len() {
                slot.buffer.destroy();
                *slot = UniformSlot::allocate(&self.gpu, &self.label, binding, blob);
                rebind = true;
            } else {
                self.gpu
                    .queue()
                    .write_buffer(&slot.buffer, 0, &padded(blob));
            }
        }
        if rebind {
            self.bind_group = build_bind_group(&self.gpu, &self.pipeline, &self.uniform_buffers);
        }
        Ok(())
    }

    /// Clears the target to black and draws the quad, restricted to
    /// `scissor` when one is given.
    pub fn draw(&self, scissor: Option<ScissorRect>) {
        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("background encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("background pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.target.view(),
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline.pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            if let Some(rect) = scissor.and_then(|rect| rect.clamped(self.target.size())) {
                pass.set_scissor_rect(rect.x, rect.y, rect.width, rect.height);
            }
            pass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
        }
        self.gpu.queue().submit(std::iter::once(encoder.finish()));
    }

    pub fn read_pixels(&self) -> Result<RgbaImage, GpuError> {
        self.target.read_pixels(&self.gpu)
    }
}

impl Drop for GpuResources {
    fn drop(&mut self) {
        self.vertex_buffer.destroy();
        for slot in &self.uniform_buffers {
            slot.buffer.destroy();
        }
        debug!(effect = %self.label, "released background GPU resources");
    }
}

impl UniformSlot {
    fn allocate(gpu: &GpuContext, label: &str, binding: usize, blob: &[u8]) -> Self {
        let buffer = gpu
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} uniforms #{binding}")),
                contents: &padded(blob),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        Self {
            buffer,
            len: blob.len(),
        }
    }
}

/// Rounds a blob up to the 16-byte granularity of std140 blocks.
fn padded(blob: &[u8]) -> Vec<u8> {
    let len = blob.len().max(16).div_ceil(16) * 16;
    let mut bytes = Vec::with_capacity(len);
    bytes.extend_from_slice(blob);
    bytes.resize(len, 0);
    bytes
}

fn build_bind_group(
    gpu: &GpuContext,
    pipeline: &EffectPipeline,
    slots: &[UniformSlot],
) -> wgpu::BindGroup {
    let entries: Vec<wgpu::BindGroupEntry> = slots
        .iter()
        .enumerate()
        .map(|(binding, slot)| wgpu::BindGroupEntry {
            binding: binding as u32,
            resource: slot.buffer.as_entire_binding(),
        })
        .collect();
    gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("effect uniforms"),
        layout: &pipeline.uniform_layout,
        entries: &entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blobs_are_padded_to_sixteen_bytes() {
        assert_eq!(padded(&[]).len(), 16);
        assert_eq!(padded(&[1; 8]).len(), 16);
        assert_eq!(padded(&[1; 16]).len(), 16);
        let grown = padded(&[7; 20]);
        assert_eq!(grown.len(), 32);
        assert_eq!(&grown[..20], &[7; 20]);
        assert!(grown[20..].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn quad_covers_clip_space_with_two_triangles() {
        assert_eq!(QUAD_VERTICES.len(), 6);
        for corner in [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]] {
            assert!(QUAD_VERTICES.contains(&corner));
        }
    }
}
