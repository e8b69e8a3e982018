//! End-to-end tests of the per-particle shading stage (CPU mirror).

use particle_sphere::displacement::{
    breathing_offset, displace, fragment_alpha, height_color, project_to_ndc,
    repulsion_magnitude, repulsion_offset, ALPHA_DISCARD,
};
use particle_sphere::{Camera, FrameContext, InteractionParams, ParticleField, Vec2, Vec3};

fn params(radius: f32, strength: f32) -> InteractionParams {
    InteractionParams {
        interaction_radius: radius,
        repulsion_strength: strength,
        ..Default::default()
    }
}

fn frame(cursor: Vec2, time: f32) -> FrameContext {
    FrameContext::new(&Camera::new(), params(0.8, 0.5), cursor, time)
        .with_viewport(1280, 720)
        .with_field_radius(1.5)
}

/// World position whose projection lands on `ndc` at NDC depth `depth`.
fn unproject(ctx: &FrameContext, ndc: Vec2, depth: f32) -> Vec3 {
    let world = ctx.view_proj().inverse() * ndc.extend(depth).extend(1.0);
    world.truncate() / world.w
}

// ============================================================================
// Repulsion falloff
// ============================================================================

#[test]
fn test_magnitude_non_increasing_and_cut_off() {
    let (radius, strength) = (0.8, 0.5);
    let mut previous = f32::INFINITY;
    for i in 0..=300 {
        let d = i as f32 * 0.005;
        let m = repulsion_magnitude(d, radius, strength);
        assert!(m <= previous, "magnitude increased at d={d}");
        assert!(m >= 0.0);
        if d >= radius {
            assert_eq!(m, 0.0, "non-zero push at d={d}");
        }
        previous = m;
    }
}

#[test]
fn test_magnitude_limit_at_zero_distance() {
    for d in [1e-3, 1e-5, 1e-7] {
        let m = repulsion_magnitude(d, 0.8, 0.5);
        assert!((m - 0.5).abs() < 1e-3);
    }
}

#[test]
fn test_zero_distance_regression() {
    // Particle projected exactly onto the cursor
    let cursor = Vec2::new(-0.25, 0.4);
    let offset = repulsion_offset(cursor, cursor, 0.8, 0.5);
    assert!(offset.is_finite());
    assert_eq!(offset, Vec2::ZERO);

    let ctx = frame(Vec2::ZERO, 0.0);
    let out = displace(Vec3::ZERO, 0.0, &ctx);
    assert!(out.clip_position.is_finite());
    assert_eq!(out.repulsion, Vec2::ZERO);
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_scenario_cursor_at_origin() {
    let field = ParticleField::generate_seeded(1, 10_000, 1.5);
    let ctx = frame(Vec2::ZERO, 0.0);

    for (rest, seed) in field.iter() {
        let out = displace(rest, seed, &ctx);
        assert!(out.clip_position.is_finite());

        let screen = project_to_ndc(rest, &ctx).expect("sphere is in front of the camera");
        let d = screen.length();
        if d > 1e-6 {
            let expected = repulsion_magnitude(d, 0.8, 0.5);
            assert!((out.repulsion.length() - expected).abs() < 1e-5);

            // Pushed away from the cursor, along the screen direction
            let along = out.repulsion.dot(screen / d);
            assert!((along - expected).abs() < 1e-4);
        }

        // The only other change is the breathing term
        let moved = rest + out.repulsion.extend(0.0) + breathing_offset(0.0, seed);
        let clip = ctx.view_proj() * moved.extend(1.0);
        assert!((clip - out.clip_position).abs().max_element() < 1e-4);
    }
}

#[test]
fn test_scenario_cursor_near_particle() {
    let ctx = frame(Vec2::new(0.1, 0.1), 0.0);
    let rest = unproject(&ctx, Vec2::new(0.15, 0.1), 0.98);

    let screen = project_to_ndc(rest, &ctx).unwrap();
    assert!((screen - Vec2::new(0.15, 0.1)).length() < 1e-4);

    let out = displace(rest, 0.3, &ctx);
    let expected = (1.0 - 0.05 / 0.8) * 0.5;
    assert!((out.repulsion.length() - expected).abs() < 1e-3);
    assert!((out.repulsion.length() - 0.469).abs() < 1e-3);

    // Directed away from the cursor (+x)
    assert!(out.repulsion.x > 0.0);
    assert!(out.repulsion.y.abs() < 1e-2);
}

#[test]
fn test_outside_radius_only_breathes() {
    let ctx = frame(Vec2::new(0.9, 0.9), 1.25);
    let rest = unproject(&ctx, Vec2::new(-0.5, -0.5), 0.98);

    let out = displace(rest, 0.7, &ctx);
    assert_eq!(out.repulsion, Vec2::ZERO);

    let moved = rest + breathing_offset(1.25, 0.7);
    let clip = ctx.view_proj() * moved.extend(1.0);
    assert!((clip - out.clip_position).abs().max_element() < 1e-4);
}

// ============================================================================
// Color and size
// ============================================================================

#[test]
fn test_color_continuous_in_height() {
    let c1 = Vec3::new(1.0, 0.2, 0.1);
    let c2 = Vec3::new(0.1, 0.3, 0.9);
    let lipschitz = (c2 - c1).length() / (2.0 * 1.5);
    let eps = 1e-3;

    for i in 0..=300 {
        let y = -1.5 + i as f32 * 0.01;
        let a = height_color(y, 1.5, c1, c2);
        let b = height_color(y + eps, 1.5, c1, c2);
        assert!((a - b).length() <= lipschitz * eps * 1.01 + 1e-6);
    }
}

#[test]
fn test_color_ignores_displacement() {
    // Same rest height, one particle under the cursor and one far away
    let ctx = frame(Vec2::ZERO, 0.0);
    let near = displace(Vec3::new(0.01, 0.2, 0.0), 0.1, &ctx);
    let far = displace(Vec3::new(1.4, 0.2, 0.0), 0.1, &ctx);
    assert!(near.repulsion.length() > 0.0);
    assert!((near.color - far.color).length() < 1e-6);
}

#[test]
fn test_closer_particles_render_larger() {
    let ctx = frame(Vec2::new(5.0, 5.0), 0.0);
    let front = displace(Vec3::new(0.0, 0.0, 1.0), 0.0, &ctx);
    let back = displace(Vec3::new(0.0, 0.0, -1.0), 0.0, &ctx);
    assert!(front.point_size > back.point_size);
}

// ============================================================================
// Alpha mask
// ============================================================================

#[test]
fn test_alpha_mask_scenario() {
    assert_eq!(fragment_alpha(0.4), Some(1.0));

    let mid = fragment_alpha(0.48).expect("intermediate alpha is kept");
    assert!(mid > 0.0 && mid < 1.0);

    assert!(fragment_alpha(0.6).is_none());
    assert!(particle_sphere::displacement::alpha_mask(0.6) < ALPHA_DISCARD);
}
