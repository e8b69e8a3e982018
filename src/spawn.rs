//! Random sampling helpers for building the particle field.

use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Source of random placements for the particle field.
///
/// Wraps a fast RNG and exposes the few distributions the generator needs.
pub struct SphereSampler<R: Rng = SmallRng> {
    rng: R,
}

impl SphereSampler<SmallRng> {
    /// Sampler seeded from the OS entropy source.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Deterministic sampler, same seed gives the same field.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> SphereSampler<R> {
    /// Wrap an existing RNG.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random point inside a sphere of given radius, centered at origin.
    ///
    /// Uniform in volume: the polar angle goes through `acos(2u - 1)` so the
    /// poles are not oversampled, and the radius takes a cube root so the
    /// center is not oversampled.
    pub fn random_in_sphere(&mut self, radius: f32) -> Vec3 {
        let theta = self.rng.gen_range(0.0..TAU);
        let phi = (2.0 * self.random() - 1.0).acos();
        let r = radius * self.random().cbrt();

        spherical_to_cartesian(r, phi, theta)
    }
}

/// `(r, phi, theta)` with `phi` the polar angle from +Z.
#[inline]
pub fn spherical_to_cartesian(r: f32, phi: f32, theta: f32) -> Vec3 {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    Vec3::new(r * sin_phi * cos_theta, r * sin_phi * sin_theta, r * cos_phi)
}
