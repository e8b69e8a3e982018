//! Per-frame context and the uniform block it becomes on the GPU.
//!
//! Nothing the shading stage reads is global: each tick the host loop
//! snapshots the clock, the cursor, the camera and the panel parameters into
//! a [`FrameContext`] and hands that to the renderer.
//!
//! ```ignore
//! let ctx = FrameContext::new(&camera, params, cursor.load(), time.elapsed())
//!     .with_viewport(width, height)
//!     .with_field_radius(field.radius());
//! gpu.render(&ctx, |_| {})?;
//! ```

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

use crate::gpu::Camera;
use crate::params::InteractionParams;

/// Point size (pixels) of a particle one world unit in front of the camera.
pub const DEFAULT_POINT_SIZE: f32 = 8.0;

/// Everything the shading stage reads for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext {
    /// Seconds since the first frame.
    pub time: f32,
    /// Cursor in NDC.
    pub cursor: Vec2,
    pub params: InteractionParams,
    pub view: Mat4,
    pub projection: Mat4,
    /// Surface size in physical pixels.
    pub viewport: Vec2,
    /// Radius the field was generated with; maps rest height to a color.
    pub field_radius: f32,
    pub point_size: f32,
}

impl FrameContext {
    pub fn new(camera: &Camera, params: InteractionParams, cursor: Vec2, time: f32) -> Self {
        Self {
            time,
            cursor,
            params: params.sanitized(),
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            viewport: Vec2::new(1280.0, 720.0),
            field_radius: 1.5,
            point_size: DEFAULT_POINT_SIZE,
        }
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Vec2::new(width.max(1) as f32, height.max(1) as f32);
        self
    }

    pub fn with_field_radius(mut self, radius: f32) -> Self {
        self.field_radius = radius;
        self
    }

    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    /// Combined world to clip transform.
    #[inline]
    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Pack into the layout of the WGSL `Uniforms` struct.
    pub fn uniforms(&self) -> FrameUniforms {
        FrameUniforms {
            view_proj: self.view_proj().to_cols_array_2d(),
            view: self.view.to_cols_array_2d(),
            projection: self.projection.to_cols_array_2d(),
            color1: self.params.color1_linear().extend(1.0).to_array(),
            color2: self.params.color2_linear().extend(1.0).to_array(),
            cursor: self.cursor.to_array(),
            viewport: self.viewport.to_array(),
            time: self.time,
            interaction_radius: self.params.interaction_radius,
            repulsion_strength: self.params.repulsion_strength,
            field_radius: self.field_radius,
            point_size: self.point_size,
            _padding: [0.0; 3],
        }
    }
}

/// GPU uniform block. Must match `Uniforms` in the render shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub color1: [f32; 4],
    pub color2: [f32; 4],
    pub cursor: [f32; 2],
    pub viewport: [f32; 2],
    pub time: f32,
    pub interaction_radius: f32,
    pub repulsion_strength: f32,
    pub field_radius: f32,
    pub point_size: f32,
    pub _padding: [f32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size_is_16_aligned() {
        // 3 matrices (192) + 2 vec4 (32) + 2 vec2 (16) + 5 scalars + padding
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 272);
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
    }

    #[test]
    fn test_context_sanitizes_params() {
        let params = InteractionParams {
            interaction_radius: -3.0,
            ..Default::default()
        };
        let ctx = FrameContext::new(&Camera::new(), params, Vec2::ZERO, 0.0);
        assert!(ctx.params.interaction_radius > 0.0);
    }

    #[test]
    fn test_uniforms_carry_frame_values() {
        let ctx = FrameContext::new(&Camera::new(), InteractionParams::default(), Vec2::new(0.1, -0.2), 2.5)
            .with_viewport(1920, 1080)
            .with_field_radius(1.5);
        let u = ctx.uniforms();

        assert_eq!(u.time, 2.5);
        assert_eq!(u.cursor, [0.1, -0.2]);
        assert_eq!(u.viewport, [1920.0, 1080.0]);
        assert_eq!(u.interaction_radius, 0.8);
        assert_eq!(u.repulsion_strength, 0.5);
        assert_eq!(u.field_radius, 1.5);
        assert_eq!(u.view_proj, ctx.view_proj().to_cols_array_2d());
    }
}
