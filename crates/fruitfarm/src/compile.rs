use std::borrow::Cow;

use wgpu::naga::ShaderStage;
use tracing::debug;

use crate::gpu::{GpuContext, GpuError};

/// Compiles the shared full-screen quad vertex program.
pub(crate) fn compile_vertex_shader(gpu: &GpuContext) -> Result<wgpu::ShaderModule, GpuError> {
    gpu.validated(|device| {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("full-screen quad vertex"),
            source: wgpu::ShaderSource::Glsl {
                shader: Cow::Borrowed(VERTEX_SHADER_GLSL),
                stage: ShaderStage::Vertex,
                defines: &[],
            },
        })
    })
    .map_err(|message| GpuError::Shader {
        label: "full-screen quad vertex".into(),
        message,
    })
}

/// Prepends [`PRELUDE`] to an effect program and compiles it as GLSL.
pub(crate) fn compile_fragment_shader(
    gpu: &GpuContext,
    label: &str,
    body: &str,
) -> Result<wgpu::ShaderModule, GpuError> {
    let wrapped = wrap_fragment(body);
    gpu.validated(|device| {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Glsl {
                shader: Cow::Owned(wrapped),
                stage: ShaderStage::Fragment,
                defines: &[],
            },
        })
    })
    .map_err(|message| {
        debug!(shader = label, %message, "fragment compilation failed");
        GpuError::Shader {
            label: label.to_string(),
            message,
        }
    })
}

/// Produces a self-contained fragment program from an effect body.
///
/// Effect bodies declare their own uniform blocks and define `main`, writing
/// to `outColor`. They must not carry a `#version` line.
pub(crate) fn wrap_fragment(body: &str) -> String {
    format!("{PRELUDE}\n{body}")
}

/// Declarations common to every effect program.
///
/// `gl_FragCoord` has a top-left origin, matching the drawable layout the
/// effects were authored against.
const PRELUDE: &str = r"#version 450
layout(location = 0) out vec4 outColor;

#define PI 3.14159265358979
#define TAU 6.28318530717959

vec3 hsv2rgb(vec3 c) {
    vec3 p = abs(fract(vec3(c.x) + vec3(0.0, 2.0 / 3.0, 1.0 / 3.0)) * 6.0 - 3.0);
    return c.z * mix(vec3(1.0), clamp(p - 1.0, 0.0, 1.0), c.y);
}

// Square-pixel coordinates with the origin at the drawable centre and the
// short side spanning [-1, 1].
vec2 centred_uv(vec2 resolution) {
    return (gl_FragCoord.xy * 2.0 - resolution) / min(resolution.x, resolution.y);
}
";

/// Pass-through vertex program for the six-vertex quad.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 a_position;

void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
}
";
