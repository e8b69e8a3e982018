//! The particle field: rest positions and per-particle seeds.
//!
//! A field is built once and never edited. Changing the particle count goes
//! through [`FieldSlot::regenerate`], which builds a complete replacement
//! before the old field is dropped.
//!
//! # Example
//!
//! ```ignore
//! use particle_sphere::field::{FieldSlot, ParticleField};
//!
//! let field = ParticleField::generate(10_000, 1.5);
//! assert_eq!(field.len(), 10_000);
//!
//! let mut slot = FieldSlot::new(field);
//! slot.regenerate(50_000);
//! assert_eq!(slot.current().len(), 50_000);
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use crate::spawn::SphereSampler;

/// Per-instance vertex data uploaded to the GPU.
///
/// Layout matches the vertex attributes of the render pipeline:
/// location 0 is the rest position, location 1 the random seed.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuParticle {
    pub rest_position: [f32; 3],
    pub seed: f32,
}

/// An immutable set of particles sampled uniformly inside a sphere.
///
/// `rest_positions[i]` and `seeds[i]` describe the same particle; both
/// arrays always have the same length.
#[derive(Clone, Debug)]
pub struct ParticleField {
    radius: f32,
    rest_positions: Vec<Vec3>,
    seeds: Vec<f32>,
}

impl ParticleField {
    /// Build a field of `count` particles inside a sphere of `radius`,
    /// seeded from OS entropy.
    pub fn generate(count: usize, radius: f32) -> Self {
        let mut sampler = SphereSampler::from_entropy();
        Self::generate_with(&mut sampler, count, radius)
    }

    /// Build a field from an explicit RNG (deterministic for seeded RNGs).
    pub fn generate_with_rng<R: Rng>(rng: R, count: usize, radius: f32) -> Self {
        let mut sampler = SphereSampler::with_rng(rng);
        Self::generate_with(&mut sampler, count, radius)
    }

    /// Build a field from a seed.
    pub fn generate_seeded(seed: u64, count: usize, radius: f32) -> Self {
        let mut sampler = SphereSampler::seeded(seed);
        Self::generate_with(&mut sampler, count, radius)
    }

    fn generate_with<R: Rng>(sampler: &mut SphereSampler<R>, count: usize, radius: f32) -> Self {
        let mut rest_positions = Vec::with_capacity(count);
        let mut seeds = Vec::with_capacity(count);

        for _ in 0..count {
            rest_positions.push(sampler.random_in_sphere(radius));
            seeds.push(sampler.random());
        }

        Self {
            radius,
            rest_positions,
            seeds,
        }
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.rest_positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rest_positions.is_empty()
    }

    /// Radius of the sphere the particles were sampled in.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest_positions
    }

    pub fn seeds(&self) -> &[f32] {
        &self.seeds
    }

    /// Iterate over `(rest_position, seed)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Vec3, f32)> + '_ {
        self.rest_positions
            .iter()
            .copied()
            .zip(self.seeds.iter().copied())
    }

    /// Interleave into the vertex buffer layout.
    pub fn to_gpu(&self) -> Vec<GpuParticle> {
        self.iter()
            .map(|(p, seed)| GpuParticle {
                rest_position: p.to_array(),
                seed,
            })
            .collect()
    }
}

/// Owner of the one live particle field.
///
/// Regeneration builds the new field first and only then swaps it in, so a
/// reader never sees a partially built field and the old one is gone as soon
/// as the swap returns.
#[derive(Debug)]
pub struct FieldSlot {
    current: ParticleField,
    generation: u64,
    seed: Option<u64>,
}

impl FieldSlot {
    pub fn new(field: ParticleField) -> Self {
        Self {
            current: field,
            generation: 0,
            seed: None,
        }
    }

    /// Slot whose regenerations derive their RNG from `seed` and the
    /// generation number.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The live field.
    #[inline]
    pub fn current(&self) -> &ParticleField {
        &self.current
    }

    /// How many times the field has been replaced.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the live field with a new one of `count` particles and the
    /// same radius. The previous field is dropped before returning.
    pub fn regenerate(&mut self, count: usize) -> &ParticleField {
        let radius = self.current.radius();
        let next_generation = self.generation + 1;
        let fresh = match self.seed {
            Some(seed) => ParticleField::generate_seeded(
                seed.wrapping_add(next_generation),
                count,
                radius,
            ),
            None => ParticleField::generate(count, radius),
        };
        self.replace(fresh)
    }

    /// Swap in a field built elsewhere.
    pub fn replace(&mut self, field: ParticleField) -> &ParticleField {
        let old = std::mem::replace(&mut self.current, field);
        drop(old);
        self.generation += 1;
        tracing::info!(
            particles = self.current.len(),
            generation = self.generation,
            "particle field regenerated"
        );
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_count_and_lengths() {
        let field = ParticleField::generate(10_000, 1.5);
        assert_eq!(field.len(), 10_000);
        assert_eq!(field.rest_positions().len(), field.seeds().len());
        assert_eq!(field.radius(), 1.5);
        assert!(!field.is_empty());
    }

    #[test]
    fn test_seeded_fields_match() {
        let a = ParticleField::generate_seeded(3, 1000, 1.0);
        let b = ParticleField::generate_seeded(3, 1000, 1.0);
        assert_eq!(a.rest_positions(), b.rest_positions());
        assert_eq!(a.seeds(), b.seeds());
    }

    #[test]
    fn test_to_gpu_interleaves() {
        let field = ParticleField::generate_seeded(11, 64, 2.0);
        let gpu = field.to_gpu();
        assert_eq!(gpu.len(), 64);
        for (g, (p, seed)) in gpu.iter().zip(field.iter()) {
            assert_eq!(g.rest_position, p.to_array());
            assert_eq!(g.seed, seed);
        }
        assert_eq!(std::mem::size_of::<GpuParticle>(), 16);
    }

    #[test]
    fn test_regenerate_replaces_field() {
        let mut slot = FieldSlot::new(ParticleField::generate_seeded(1, 100_000, 1.5)).with_seed(1);
        assert_eq!(slot.generation(), 0);

        let first = slot.current().rest_positions()[0];
        slot.regenerate(50_000);

        assert_eq!(slot.current().len(), 50_000);
        assert_eq!(slot.current().seeds().len(), 50_000);
        assert_eq!(slot.current().radius(), 1.5);
        assert_eq!(slot.generation(), 1);
        assert_ne!(slot.current().rest_positions()[0], first);
    }

    #[test]
    fn test_regenerate_same_count_still_rebuilds() {
        let mut slot = FieldSlot::new(ParticleField::generate_seeded(5, 10_000, 1.0)).with_seed(5);
        let before = slot.current().rest_positions().to_vec();
        slot.regenerate(10_000);
        assert_eq!(slot.current().len(), 10_000);
        assert_ne!(slot.current().rest_positions(), &before[..]);
    }
}
