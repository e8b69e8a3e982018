//! # Particle Sphere
//!
//! An interactive sphere of GPU-rendered particles that parts around the
//! cursor.
//!
//! The crate has two cores:
//!
//! - the **field generator** ([`field`]), which samples rest positions
//!   uniformly inside a solid sphere and gives every particle a random seed;
//! - the **displacement/shading stage** ([`shader`], mirrored on the CPU in
//!   [`displacement`]), a stateless per-particle function evaluated on the
//!   GPU every frame.
//!
//! Everything else (window, surface, cursor plumbing, control panel) is thin
//! glue around `winit`, `wgpu` and `egui`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use particle_sphere::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     ParticleSphere::new()
//!         .with_particle_count(100_000)
//!         .with_radius(1.5)
//!         .with_params(InteractionParams {
//!             interaction_radius: 0.8,
//!             repulsion_strength: 0.5,
//!             ..Default::default()
//!         })
//!         .run()
//! }
//! ```
//!
//! ## Per-frame data flow
//!
//! ```text
//! cursor event ──► CursorState ─┐
//! panel ─────────► params ──────┼──► FrameContext ──► uniforms ──► vs_main / fs_main
//! clock ──────────► time ───────┘                                   (one draw call)
//! ```
//!
//! Changing the particle count rebuilds the field ([`FieldSlot::regenerate`])
//! and swaps the GPU vertex buffer before the next draw.

mod app;
pub mod displacement;
mod error;
pub mod field;
mod gpu;
pub mod input;
#[cfg(feature = "egui")]
pub mod panel;
pub mod params;
pub mod shader;
pub mod spawn;
pub mod time;
pub mod uniforms;

pub use app::{ParticleSphere, SphereConfig, DEFAULT_FIELD_RADIUS};
pub use error::{AppError, GpuError};
pub use field::{FieldSlot, GpuParticle, ParticleField};
pub use glam::{Vec2, Vec3, Vec4};
pub use gpu::Camera;
pub use input::CursorState;
pub use params::InteractionParams;
pub use uniforms::{FrameContext, FrameUniforms};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use particle_sphere::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::ParticleSphere;
    pub use crate::displacement::{displace, ParticleOutput};
    pub use crate::error::AppError;
    pub use crate::field::{FieldSlot, ParticleField};
    pub use crate::gpu::Camera;
    pub use crate::input::CursorState;
    pub use crate::params::InteractionParams;
    pub use crate::uniforms::FrameContext;
    pub use crate::{Vec2, Vec3, Vec4};
}
