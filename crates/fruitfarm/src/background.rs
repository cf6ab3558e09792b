//! The contract every animated background implements, and the generic
//! renderer that pairs an effect program with its GPU resource set.

use bytemuck::Pod;
use image::RgbaImage;
use tracing::warn;

use crate::animation::RedrawThrottle;
use crate::gpu::{GpuContext, GpuError, GpuResources};
use crate::scissor::ScissorRect;
use crate::silhouette::{ShapeMetrics, Silhouette};
use crate::types::{BackgroundEffect, Rect, RendererParams};

/// Lifecycle shared by all background renderers.
///
/// The host calls [`configure`](Background::configure) and
/// [`resize`](Background::resize) when the logo or the view changes,
/// [`advance`](Background::advance) once per tick, and
/// [`render`](Background::render) from its display cycle.
pub trait Background {
    fn kind(&self) -> BackgroundEffect;

    /// Refreshes shape-dependent values and requests a redraw. Never touches
    /// GPU pipeline objects.
    fn configure(&mut self, shape: &dyn Silhouette);

    /// Applies a new frame and drawable size together.
    fn resize(&mut self, frame: Rect, shape: &dyn Silhouette);

    /// Moves the animation forward by `delta` seconds. The only place
    /// animation state changes; `advance(0.0)` is a no-op.
    fn advance(&mut self, delta: f32);

    fn needs_redraw(&self) -> bool;

    /// Draws the pending frame. Returns `false` when nothing was pending.
    fn render(&mut self) -> Result<bool, GpuError>;

    /// Last rendered frame, or `None` when no device is attached.
    fn read_frame(&self) -> Result<Option<RgbaImage>, GpuError>;

    fn params(&self) -> RendererParams;
}

/// Everything an effect may read while computing uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub frame: Rect,
    pub content_scale: f32,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub shape: ShapeMetrics,
}

impl FrameContext {
    pub fn new(params: RendererParams, shape: ShapeMetrics) -> Self {
        let (pixel_width, pixel_height) = params.pixel_size();
        Self {
            frame: params.frame,
            content_scale: params.content_scale,
            pixel_width,
            pixel_height,
            shape,
        }
    }

    /// Drawable size in pixels, as the shaders see it.
    pub fn resolution(&self) -> [f32; 2] {
        [self.pixel_width as f32, self.pixel_height as f32]
    }
}

/// Collects one byte blob per uniform binding, in binding order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UniformWriter {
    blobs: Vec<Vec<u8>>,
}

impl UniformWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<T: Pod>(&mut self, block: &T) -> &mut Self {
        self.blobs.push(bytemuck::bytes_of(block).to_vec());
        self
    }

    pub fn push_slice<T: Pod>(&mut self, blocks: &[T]) -> &mut Self {
        self.blobs.push(bytemuck::cast_slice(blocks).to_vec());
        self
    }

    pub fn blobs(&self) -> &[Vec<u8>] {
        &self.blobs
    }

    pub fn into_blobs(self) -> Vec<Vec<u8>> {
        self.blobs
    }
}

/// The CPU half of one effect: its animation state and how that state maps
/// onto the uniform blocks of its fragment program.
pub trait Effect {
    fn kind(&self) -> BackgroundEffect;

    /// GLSL body appended to the shared prelude.
    fn fragment_source(&self) -> &'static str;

    /// Called with a fresh snapshot whenever the silhouette is re-read.
    fn configure(&mut self, _shape: &ShapeMetrics) {}

    /// Steps the animation. Returns `true` on a discrete event, such as a
    /// palette step, that must be drawn without waiting for the throttle.
    fn advance(&mut self, delta: f32) -> bool;

    fn write_uniforms(&self, frame: &FrameContext, out: &mut UniformWriter);

    fn scissor(&self, _frame: &FrameContext) -> Option<ScissorRect> {
        None
    }
}

/// A [`Background`] built from an [`Effect`] program.
///
/// Without a device the renderer still runs the full animation and uniform
/// computation; it only skips submission.
pub struct EffectRenderer<E> {
    program: E,
    params: RendererParams,
    shape: ShapeMetrics,
    throttle: RedrawThrottle,
    pending_redraw: bool,
    resources: Option<GpuResources>,
}

impl<E: Effect> EffectRenderer<E> {
    pub fn new(
        mut program: E,
        params: RendererParams,
        shape: &dyn Silhouette,
        redraw_interval: f32,
    ) -> Self {
        let shape = ShapeMetrics::capture(shape);
        program.configure(&shape);
        Self {
            program,
            params,
            shape,
            throttle: RedrawThrottle::new(redraw_interval),
            pending_redraw: true,
            resources: None,
        }
    }

    /// Builds the GPU resource set, replacing any previous one.
    pub fn attach(&mut self, gpu: &GpuContext) -> Result<(), GpuError> {
        self.resources = None;
        let (width, height) = self.params.pixel_size();
        let uniforms = self.uniforms();
        let resources = GpuResources::new(
            gpu,
            self.program.kind().id(),
            self.program.fragment_source(),
            &uniforms,
            width,
            height,
        )?;
        self.resources = Some(resources);
        self.pending_redraw = true;
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.resources.is_some()
    }

    pub fn program(&self) -> &E {
        &self.program
    }

    pub fn shape(&self) -> &ShapeMetrics {
        &self.shape
    }

    pub fn frame_context(&self) -> FrameContext {
        FrameContext::new(self.params, self.shape)
    }

    /// Uniform blobs for the current state.
    pub fn uniforms(&self) -> Vec<Vec<u8>> {
        let mut writer = UniformWriter::new();
        self.program
            .write_uniforms(&self.frame_context(), &mut writer);
        writer.into_blobs()
    }

    pub fn scissor(&self) -> Option<ScissorRect> {
        self.program.scissor(&self.frame_context())
    }
}

impl<E: Effect> Background for EffectRenderer<E> {
    fn kind(&self) -> BackgroundEffect {
        self.program.kind()
    }

    fn configure(&mut self, shape: &dyn Silhouette) {
        self.shape = ShapeMetrics::capture(shape);
        self.program.configure(&self.shape);
        self.pending_redraw = true;
    }

    fn resize(&mut self, frame: Rect, shape: &dyn Silhouette) {
        self.params.frame = frame;
        self.shape = ShapeMetrics::capture(shape);
        self.program.configure(&self.shape);
        if let Some(resources) = self.resources.as_mut() {
            let (width, height) = self.params.pixel_size();
            if let Err(err) = resources.resize(width, height) {
                warn!(effect = %self.program.kind(), %err, "keeping previous target");
            }
        }
        self.pending_redraw = true;
    }

    fn advance(&mut self, delta: f32) {
        let event = self.program.advance(delta);
        if self.throttle.tick(delta, event) {
            self.pending_redraw = true;
        }
    }

    fn needs_redraw(&self) -> bool {
        self.pending_redraw
    }

    fn render(&mut self) -> Result<bool, GpuError> {
        if !self.pending_redraw {
            return Ok(false);
        }
        self.pending_redraw = false;
        let Some(resources) = self.resources.as_mut() else {
            return Ok(true);
        };
        let frame = FrameContext::new(self.params, self.shape);
        let mut writer = UniformWriter::new();
        self.program.write_uniforms(&frame, &mut writer);
        resources.upload(writer.blobs())?;
        resources.draw(self.program.scissor(&frame));
        Ok(true)
    }

    fn read_frame(&self) -> Result<Option<RgbaImage>, GpuError> {
        self.resources
            .as_ref()
            .map(GpuResources::read_pixels)
            .transpose()
    }

    fn params(&self) -> RendererParams {
        self.params
    }
}

/// Static black stand-in used when an effect cannot get a device or its
/// pipeline fails to build.
pub struct FallbackBackground {
    requested: BackgroundEffect,
    params: RendererParams,
    pending_redraw: bool,
    resources: Option<GpuResources>,
}

impl FallbackBackground {
    pub fn new(requested: BackgroundEffect, params: RendererParams) -> Self {
        Self {
            requested,
            params,
            pending_redraw: true,
            resources: None,
        }
    }

    /// Allocates a target the fallback clears on every render.
    pub fn with_target(mut self, gpu: &GpuContext) -> Self {
        let (width, height) = self.params.pixel_size();
        match GpuResources::new(gpu, "fallback", FALLBACK_SHADER, &[], width, height) {
            Ok(resources) => self.resources = Some(resources),
            Err(err) => warn!(%err, "fallback background has no target"),
        }
        self
    }

    /// The effect the host asked for before falling back.
    pub fn requested(&self) -> BackgroundEffect {
        self.requested
    }
}

impl Background for FallbackBackground {
    fn kind(&self) -> BackgroundEffect {
        self.requested
    }

    fn configure(&mut self, _shape: &dyn Silhouette) {
        self.pending_redraw = true;
    }

    fn resize(&mut self, frame: Rect, _shape: &dyn Silhouette) {
        self.params.frame = frame;
        if let Some(resources) = self.resources.as_mut() {
            let (width, height) = self.params.pixel_size();
            if let Err(err) = resources.resize(width, height) {
                warn!(%err, "keeping previous fallback target");
            }
        }
        self.pending_redraw = true;
    }

    fn advance(&mut self, _delta: f32) {}

    fn needs_redraw(&self) -> bool {
        self.pending_redraw
    }

    fn render(&mut self) -> Result<bool, GpuError> {
        if !self.pending_redraw {
            return Ok(false);
        }
        self.pending_redraw = false;
        if let Some(resources) = self.resources.as_ref() {
            resources.draw(None);
        }
        Ok(true)
    }

    fn read_frame(&self) -> Result<Option<RgbaImage>, GpuError> {
        self.resources
            .as_ref()
            .map(GpuResources::read_pixels)
            .transpose()
    }

    fn params(&self) -> RendererParams {
        self.params
    }
}

const FALLBACK_SHADER: &str = r"
void main() {
    outColor = vec4(0.0, 0.0, 0.0, 1.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::silhouette::LogoSilhouette;

    #[repr(C)]
    #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
    struct Counter {
        ticks: f32,
        width: f32,
    }

    struct Ticking {
        ticks: f32,
        discrete_every: f32,
    }

    impl Effect for Ticking {
        fn kind(&self) -> BackgroundEffect {
            BackgroundEffect::Solid
        }

        fn fragment_source(&self) -> &'static str {
            FALLBACK_SHADER
        }

        fn advance(&mut self, delta: f32) -> bool {
            if delta <= 0.0 {
                return false;
            }
            let before = (self.ticks / self.discrete_every).floor();
            self.ticks += delta;
            (self.ticks / self.discrete_every).floor() > before
        }

        fn write_uniforms(&self, frame: &FrameContext, out: &mut UniformWriter) {
            out.push(&Counter {
                ticks: self.ticks,
                width: frame.resolution()[0],
            });
        }
    }

    fn renderer() -> EffectRenderer<Ticking> {
        renderer_with_interval(1.0 / 30.0)
    }

    fn renderer_with_interval(interval: f32) -> EffectRenderer<Ticking> {
        let frame = Rect::from_size(100.0, 50.0);
        EffectRenderer::new(
            Ticking {
                ticks: 0.0,
                discrete_every: 1.0,
            },
            RendererParams::new(frame, 2.0),
            &LogoSilhouette::new(frame, 1.0),
            interval,
        )
    }

    #[test]
    fn new_renderer_requests_first_frame() {
        let mut renderer = renderer();
        assert!(renderer.needs_redraw());
        assert!(renderer.render().expect("render"));
        assert!(!renderer.needs_redraw());
        assert!(!renderer.render().expect("render"));
    }

    #[test]
    fn advance_is_throttled_until_the_interval() {
        let mut renderer = renderer();
        renderer.render().expect("render");
        renderer.advance(0.01);
        assert!(!renderer.needs_redraw());
        renderer.advance(0.03);
        assert!(renderer.needs_redraw());
    }

    #[test]
    fn discrete_events_bypass_the_throttle() {
        let mut renderer = renderer_with_interval(10.0);
        renderer.render().expect("render");
        renderer.advance(0.6);
        assert!(!renderer.needs_redraw());
        renderer.advance(0.6);
        assert!(renderer.needs_redraw());
    }

    #[test]
    fn zero_delta_changes_nothing() {
        let mut renderer = renderer();
        renderer.render().expect("render");
        let before = renderer.uniforms();
        renderer.advance(0.0);
        assert!(!renderer.needs_redraw());
        assert_eq!(renderer.uniforms(), before);
    }

    #[test]
    fn resize_updates_resolution_and_requests_redraw() {
        let mut renderer = renderer();
        renderer.render().expect("render");
        let frame = Rect::from_size(300.0, 50.0);
        renderer.resize(frame, &LogoSilhouette::new(frame, 1.0));
        assert!(renderer.needs_redraw());
        assert_eq!(renderer.frame_context().pixel_width, 600);
    }

    #[test]
    fn detached_renderer_has_no_frame() {
        let renderer = renderer();
        assert!(!renderer.is_attached());
        assert!(renderer.read_frame().expect("read").is_none());
    }

    #[test]
    fn fallback_renders_once_per_request() {
        let params = RendererParams::new(Rect::from_size(10.0, 10.0), 1.0);
        let mut fallback = FallbackBackground::new(BackgroundEffect::Warp, params);
        assert_eq!(fallback.kind(), BackgroundEffect::Warp);
        assert!(fallback.render().expect("render"));
        fallback.advance(1.0);
        assert!(!fallback.needs_redraw());
    }
}
