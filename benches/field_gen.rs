//! Benchmarks for field generation and CPU-side shading.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;

use particle_sphere::displacement::displace;
use particle_sphere::{shader, Camera, FieldSlot, FrameContext, InteractionParams, ParticleField};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_field");

    for count in [10_000usize, 100_000, 200_000] {
        group.bench_with_input(BenchmarkId::new("seeded", count), &count, |b, &count| {
            b.iter(|| black_box(ParticleField::generate_seeded(7, count, 1.5)))
        });
    }

    group.bench_function("regenerate_100k", |b| {
        let mut slot = FieldSlot::new(ParticleField::generate_seeded(7, 10_000, 1.5)).with_seed(7);
        b.iter(|| black_box(slot.regenerate(100_000).len()))
    });

    group.finish();
}

fn bench_upload_layout(c: &mut Criterion) {
    let field = ParticleField::generate_seeded(11, 100_000, 1.5);
    c.bench_function("to_gpu_100k", |b| b.iter(|| black_box(field.to_gpu())));
}

fn bench_displace(c: &mut Criterion) {
    let mut group = c.benchmark_group("displace");

    let field = ParticleField::generate_seeded(3, 100_000, 1.5);
    let ctx = FrameContext::new(
        &Camera::new(),
        InteractionParams::default(),
        Vec2::new(0.1, 0.1),
        2.5,
    )
    .with_viewport(1280, 720);

    group.bench_function("single", |b| {
        let (rest, seed) = (field.rest_positions()[0], field.seeds()[0]);
        b.iter(|| black_box(displace(black_box(rest), seed, &ctx)))
    });

    group.bench_function("field_100k", |b| {
        b.iter(|| {
            field
                .iter()
                .map(|(rest, seed)| displace(rest, seed, &ctx).point_size)
                .sum::<f32>()
        })
    });

    group.finish();
}

fn bench_shader_source(c: &mut Criterion) {
    c.bench_function("render_shader", |b| b.iter(|| black_box(shader::render_shader())));
}

criterion_group!(
    benches,
    bench_generate,
    bench_upload_layout,
    bench_displace,
    bench_shader_source,
);
criterion_main!(benches);
