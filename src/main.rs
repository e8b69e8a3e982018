//! Particle sphere viewer.
//!
//! Run with: `cargo run --release -- [--count N] [--radius R] [--seed S]`

use particle_sphere::ParticleSphere;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,particle_sphere=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args: Vec<String> = std::env::args().collect();

    let mut sphere = ParticleSphere::new();
    if let Some(count) = parse_arg::<usize>(&args, "--count") {
        sphere = sphere.with_particle_count(count);
    }
    if let Some(radius) = parse_arg::<f32>(&args, "--radius") {
        sphere = sphere.with_radius(radius);
    }
    if let Some(seed) = parse_arg::<u64>(&args, "--seed") {
        sphere = sphere.with_seed(seed);
    }

    if let Err(e) = sphere.run() {
        error!(error = %e, "particle sphere exited with an error");
        std::process::exit(1);
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|v| v == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse::<T>().ok())
}
