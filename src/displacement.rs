//! CPU mirror of the per-particle shading stage.
//!
//! The render shader evaluates exactly these functions on the GPU; the
//! constants below are interpolated into the WGSL source. Keeping a CPU copy
//! lets the interaction model be tested without a graphics device.
//!
//! Per particle and per frame:
//! 1. project the rest position to NDC,
//! 2. push it away from the cursor with a linear falloff, in the camera's
//!    screen plane,
//! 3. add a small per-particle breathing motion,
//! 4. re-project and size the sprite by view depth,
//! 5. color it by rest height.

use glam::{Mat4, Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::uniforms::FrameContext;

/// Peak per-axis amplitude of the breathing motion, world units.
pub const BREATH_AMPLITUDE: f32 = 0.03;
/// Multiplier from random seed to breathing phase.
pub const BREATH_PHASE_SCALE: f32 = 10.0;
/// Angular speed of the breathing motion per axis.
pub const BREATH_FREQUENCY: [f32; 3] = [0.8, 0.6, 0.7];

/// Sprite-local distance below which a fragment is fully opaque.
pub const ALPHA_INNER: f32 = 0.45;
/// Sprite-local distance at and above which a fragment is fully transparent.
pub const ALPHA_OUTER: f32 = 0.5;
/// Fragments with less alpha than this are discarded.
pub const ALPHA_DISCARD: f32 = 0.01;

/// Cursor distances at or below this have no defined push direction.
pub const DIRECTION_EPSILON: f32 = 1e-6;
/// Depth clamp for the point size, keeps sizes finite near the camera.
pub const MIN_VIEW_DEPTH: f32 = 0.1;

/// Output of the vertex stage for one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleOutput {
    /// Final clip-space position.
    pub clip_position: Vec4,
    /// Sprite diameter in pixels.
    pub point_size: f32,
    /// Linear RGB.
    pub color: Vec3,
    /// Screen-plane push applied before breathing.
    pub repulsion: Vec2,
}

/// Push magnitude at NDC distance `distance` from the cursor.
///
/// `(1 - d / radius) * strength` inside the radius, zero at and beyond it.
#[inline]
pub fn repulsion_magnitude(distance: f32, radius: f32, strength: f32) -> f32 {
    if distance < radius {
        (1.0 - distance / radius) * strength
    } else {
        0.0
    }
}

/// Screen-plane push for a particle at `screen` (NDC) given the cursor.
///
/// Points away from the cursor. A particle exactly under the cursor has no
/// direction to move in and is left in place.
pub fn repulsion_offset(screen: Vec2, cursor: Vec2, radius: f32, strength: f32) -> Vec2 {
    let delta = screen - cursor;
    let distance = delta.length();
    let magnitude = repulsion_magnitude(distance, radius, strength);
    if magnitude == 0.0 || !(distance > DIRECTION_EPSILON) {
        return Vec2::ZERO;
    }
    delta / distance * magnitude
}

/// Bounded per-particle oscillation; each axis stays within
/// `BREATH_AMPLITUDE` of zero.
pub fn breathing_offset(time: f32, seed: f32) -> Vec3 {
    let phase = seed * BREATH_PHASE_SCALE;
    let [fx, fy, fz] = BREATH_FREQUENCY;
    Vec3::new(
        (time * fx + phase).sin(),
        (time * fy + phase).cos(),
        (time * fz + phase).sin(),
    ) * BREATH_AMPLITUDE
}

/// Color from rest height: `color1` at the bottom of the sphere, `color2` at
/// the top, linear in between.
pub fn height_color(rest_y: f32, field_radius: f32, color1: Vec3, color2: Vec3) -> Vec3 {
    let t = if field_radius > 0.0 {
        (rest_y / (2.0 * field_radius) + 0.5).clamp(0.0, 1.0)
    } else {
        0.5
    };
    color1.lerp(color2, t)
}

/// Sprite size in pixels for a point at view-space depth `view_z`
/// (negative in front of the camera).
#[inline]
pub fn point_size(base: f32, view_z: f32) -> f32 {
    base / (-view_z).max(MIN_VIEW_DEPTH)
}

/// Hermite interpolation, same as WGSL `smoothstep`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Soft circular mask at sprite-local distance `distance` from the center
/// (the sprite edge is at 0.5).
#[inline]
pub fn alpha_mask(distance: f32) -> f32 {
    1.0 - smoothstep(ALPHA_INNER, ALPHA_OUTER, distance)
}

/// Fragment alpha, or `None` when the fragment is discarded.
#[inline]
pub fn fragment_alpha(distance: f32) -> Option<f32> {
    let alpha = alpha_mask(distance);
    (alpha >= ALPHA_DISCARD).then_some(alpha)
}

/// Project a world position to NDC. `None` when it sits on or behind the
/// camera plane.
pub fn project_to_ndc(position: Vec3, ctx: &FrameContext) -> Option<Vec2> {
    let clip = ctx.view_proj() * position.extend(1.0);
    (clip.w > DIRECTION_EPSILON).then(|| clip.xy() / clip.w)
}

/// World-space offset for a screen-plane push: `push.x` along the camera's
/// right axis and `push.y` along its up axis.
pub fn screen_push_to_world(push: Vec2, view: &Mat4) -> Vec3 {
    let right = view.row(0).truncate();
    let up = view.row(1).truncate();
    right * push.x + up * push.y
}

/// Screen-plane push for the particle resting at `rest`. Zero when the rest
/// position is not in front of the camera.
pub fn repulsion_at(rest: Vec3, ctx: &FrameContext) -> Vec2 {
    project_to_ndc(rest, ctx)
        .map(|screen| {
            repulsion_offset(
                screen,
                ctx.cursor,
                ctx.params.interaction_radius,
                ctx.params.repulsion_strength,
            )
        })
        .unwrap_or(Vec2::ZERO)
}

fn offset_position(rest: Vec3, seed: f32, repulsion: Vec2, ctx: &FrameContext) -> Vec3 {
    rest + screen_push_to_world(repulsion, &ctx.view) + breathing_offset(ctx.time, seed)
}

/// Run the vertex stage for one particle.
pub fn displace(rest: Vec3, seed: f32, ctx: &FrameContext) -> ParticleOutput {
    let params = &ctx.params;

    let repulsion = repulsion_at(rest, ctx);
    let position = offset_position(rest, seed, repulsion, ctx);

    let view_position = ctx.view * position.extend(1.0);
    let clip_position = ctx.projection * view_position;

    ParticleOutput {
        clip_position,
        point_size: point_size(ctx.point_size, view_position.z),
        color: height_color(
            rest.y,
            ctx.field_radius,
            params.color1_linear(),
            params.color2_linear(),
        ),
        repulsion,
    }
}

/// Displaced world position (before projection) for one particle.
pub fn displaced_position(rest: Vec3, seed: f32, ctx: &FrameContext) -> Vec3 {
    offset_position(rest, seed, repulsion_at(rest, ctx), ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::Camera;
    use crate::params::InteractionParams;

    fn ctx_with_cursor(cursor: Vec2) -> FrameContext {
        FrameContext::new(&Camera::new(), InteractionParams::default(), cursor, 0.0)
    }

    #[test]
    fn test_magnitude_endpoints() {
        assert_eq!(repulsion_magnitude(0.0, 0.8, 0.5), 0.5);
        assert_eq!(repulsion_magnitude(0.8, 0.8, 0.5), 0.0);
        assert_eq!(repulsion_magnitude(1.2, 0.8, 0.5), 0.0);
        assert!((repulsion_magnitude(0.4, 0.8, 0.5) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_offset_zero_distance_is_finite() {
        let offset = repulsion_offset(Vec2::new(0.3, 0.3), Vec2::new(0.3, 0.3), 0.8, 0.5);
        assert_eq!(offset, Vec2::ZERO);
        assert!(offset.is_finite());
    }

    #[test]
    fn test_offset_points_away_from_cursor() {
        let offset = repulsion_offset(Vec2::new(0.2, 0.0), Vec2::ZERO, 0.8, 0.5);
        assert!(offset.x > 0.0);
        assert!(offset.y.abs() < 1e-7);
    }

    #[test]
    fn test_breathing_bounded() {
        for i in 0..1000 {
            let t = i as f32 * 0.37;
            let seed = (i as f32 * 0.013).fract();
            let b = breathing_offset(t, seed);
            assert!(b.abs().max_element() <= BREATH_AMPLITUDE + 1e-6);
        }
    }

    #[test]
    fn test_breathing_differs_per_seed() {
        assert_ne!(breathing_offset(1.0, 0.1), breathing_offset(1.0, 0.2));
    }

    #[test]
    fn test_height_color_endpoints() {
        let c1 = Vec3::new(1.0, 0.0, 0.0);
        let c2 = Vec3::new(0.0, 0.0, 1.0);
        assert_eq!(height_color(-1.5, 1.5, c1, c2), c1);
        assert_eq!(height_color(1.5, 1.5, c1, c2), c2);
        assert_eq!(height_color(0.0, 1.5, c1, c2), Vec3::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn test_point_size_shrinks_with_depth() {
        assert!(point_size(8.0, -2.0) > point_size(8.0, -4.0));
        assert!(point_size(8.0, 0.5).is_finite());
    }

    #[test]
    fn test_fragment_alpha() {
        assert_eq!(fragment_alpha(0.4), Some(1.0));
        let mid = fragment_alpha(0.48).unwrap();
        assert!(mid > 0.0 && mid < 1.0);
        assert_eq!(fragment_alpha(0.6), None);
    }

    #[test]
    fn test_particle_under_cursor_not_nan() {
        // Origin projects exactly to the center of the screen
        let ctx = ctx_with_cursor(Vec2::ZERO);
        let out = displace(Vec3::ZERO, 0.5, &ctx);
        assert_eq!(out.repulsion, Vec2::ZERO);
        assert!(out.clip_position.is_finite());
        assert!(out.point_size.is_finite());
        assert!(out.color.is_finite());
    }

    #[test]
    fn test_displaced_position_matches_repulsion_and_breath() {
        // Cursor left of the particle's projection, so the push goes +x
        let ctx = ctx_with_cursor(Vec2::new(-0.05, 0.0));
        let rest = Vec3::new(0.1, 0.0, 0.0);
        let pos = displaced_position(rest, 0.25, &ctx);
        let out = displace(rest, 0.25, &ctx);
        let expected = rest + out.repulsion.extend(0.0) + breathing_offset(0.0, 0.25);
        assert!((pos - expected).length() < 1e-6);
        assert!(out.repulsion.x > 0.0);
    }

    #[test]
    fn test_push_stays_in_screen_plane_for_orbited_camera() {
        let mut camera = Camera::new();
        camera.yaw = 0.7;
        camera.pitch = -0.4;
        let ctx = FrameContext::new(&camera, InteractionParams::default(), Vec2::ZERO, 0.0);

        let rest = Vec3::new(0.2, 0.1, -0.1);
        let push = repulsion_at(rest, &ctx);
        assert!(push.length() > 0.0);

        // Seen from the camera the offset is exactly the push, with no depth
        let world = screen_push_to_world(push, &ctx.view);
        let in_view = ctx.view * world.extend(0.0);
        assert!((in_view.xy() - push).length() < 1e-5);
        assert!(in_view.z.abs() < 1e-5);

        // And the projected particle moves away from the cursor
        let before = project_to_ndc(rest, &ctx).unwrap();
        let after = project_to_ndc(rest + world, &ctx).unwrap();
        assert!(after.length() > before.length());
    }

    #[test]
    fn test_default_camera_pushes_along_world_xy() {
        let ctx = ctx_with_cursor(Vec2::ZERO);
        let world = screen_push_to_world(Vec2::new(0.3, -0.2), &ctx.view);
        assert!((world - Vec3::new(0.3, -0.2, 0.0)).length() < 1e-6);
    }
}
