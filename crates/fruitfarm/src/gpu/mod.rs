//! GPU plumbing shared by every effect renderer.
//!
//! - `context` acquires a headless wgpu adapter/device/queue.
//! - `pipeline` compiles an effect's GLSL program into a render pipeline.
//! - `resources` owns one renderer's buffers, bind group and offscreen
//!   target, and encodes the per-frame draw.
//! - `target` is the offscreen colour texture plus pixel read-back.
//!
//! Nothing here is a singleton: each renderer builds its own
//! [`GpuResources`] from a cloned [`GpuContext`] and releases it on drop.

mod context;
mod pipeline;
mod resources;
mod target;

pub use context::{AdapterProfile, GpuContext, GpuPowerPreference};
pub use resources::GpuResources;
pub(crate) use pipeline::EffectPipeline;
pub(crate) use target::RenderTarget;

/// Colour format of every offscreen target.
pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Failures while acquiring or driving GPU resources.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("no compatible GPU adapter: {0}")]
    Adapter(String),
    #[error("failed to create GPU device: {0}")]
    Device(String),
    #[error("shader `{label}` failed to compile: {message}")]
    Shader { label: String, message: String },
    #[error("pipeline `{label}` could not be created: {message}")]
    Pipeline { label: String, message: String },
    #[error("render target is {width}x{height}, device limit is {limit}")]
    TargetTooLarge { width: u32, height: u32, limit: u32 },
    #[error("frame read-back failed: {0}")]
    Readback(String),
}
