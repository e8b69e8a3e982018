//! Live-tunable interaction parameters and the particle count range.
//!
//! The control panel writes into [`InteractionParams`]; the renderer reads a
//! copy of it every frame. The particle count lives outside this struct
//! because changing it rebuilds the whole field instead of a uniform.

use glam::Vec3;

/// Smallest particle count the field can be built with.
pub const MIN_PARTICLES: usize = 10_000;
/// Largest particle count the field can be built with.
pub const MAX_PARTICLES: usize = 200_000;
/// Particle count used when nothing else is configured.
pub const DEFAULT_PARTICLES: usize = 100_000;

/// Lower bound for the interaction radius and repulsion strength.
pub const MIN_INTERACTION: f32 = 0.1;
/// Upper bound for the interaction radius and repulsion strength.
pub const MAX_INTERACTION: f32 = 2.0;

/// Clamp a requested particle count into `[MIN_PARTICLES, MAX_PARTICLES]`.
pub fn clamp_particle_count(count: usize) -> usize {
    count.clamp(MIN_PARTICLES, MAX_PARTICLES)
}

/// Parameters shared between the control panel and the shading stage.
///
/// Colors are sRGB triples in `[0, 1]`. The panel edits them through egui's
/// 8-bit sRGB picker, so a swatch shows exactly what the sphere renders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionParams {
    /// Screen-space (NDC) radius around the cursor that pushes particles.
    pub interaction_radius: f32,
    /// Displacement applied to a particle sitting right under the cursor.
    pub repulsion_strength: f32,
    /// Color at the bottom of the sphere.
    pub color1: [f32; 3],
    /// Color at the top of the sphere.
    pub color2: [f32; 3],
    /// Clear color behind the particles.
    pub background: [f32; 3],
}

impl Default for InteractionParams {
    fn default() -> Self {
        Self {
            interaction_radius: 0.8,
            repulsion_strength: 0.5,
            color1: [1.0, 0.376, 0.188],
            color2: [0.106, 0.224, 0.518],
            background: [0.0, 0.0, 0.02],
        }
    }
}

impl InteractionParams {
    /// Copy with every field forced into the range the panel allows.
    ///
    /// Radius and strength stay strictly positive, which the repulsion
    /// falloff divides by.
    pub fn sanitized(mut self) -> Self {
        self.interaction_radius = clamp_interaction(self.interaction_radius);
        self.repulsion_strength = clamp_interaction(self.repulsion_strength);
        self.color1 = clamp_color(self.color1);
        self.color2 = clamp_color(self.color2);
        self.background = clamp_color(self.background);
        self
    }

    /// Color1 in linear space.
    pub fn color1_linear(&self) -> Vec3 {
        srgb_to_linear(self.color1)
    }

    /// Color2 in linear space.
    pub fn color2_linear(&self) -> Vec3 {
        srgb_to_linear(self.color2)
    }

    /// Background as a `wgpu` clear color (linear).
    pub fn clear_color(&self) -> wgpu::Color {
        let c = srgb_to_linear(self.background);
        wgpu::Color {
            r: c.x as f64,
            g: c.y as f64,
            b: c.z as f64,
            a: 1.0,
        }
    }
}

fn clamp_interaction(v: f32) -> f32 {
    if v.is_nan() {
        MIN_INTERACTION
    } else {
        v.clamp(MIN_INTERACTION, MAX_INTERACTION)
    }
}

fn clamp_color(c: [f32; 3]) -> [f32; 3] {
    c.map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) })
}

/// Convert an sRGB color to linear, channel by channel.
pub fn srgb_to_linear(c: [f32; 3]) -> Vec3 {
    let f = |v: f32| {
        if v <= 0.04045 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };
    Vec3::new(f(c[0]), f(c[1]), f(c[2]))
}
