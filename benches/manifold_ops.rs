//! Benchmarks for manifold reconstruction.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use watertight::algo::manifold::{GridFrame, Octree};
use watertight::prelude::*;
use nalgebra::Point3;

/// UV sphere of unit radius with `n` rings and `2n` segments.
fn create_sphere(n: usize) -> TriangleMesh {
    let segments = 2 * n;
    let mut vertices = vec![Point3::new(0.0, 0.0, 1.0)];
    for ring in 1..n {
        let theta = std::f64::consts::PI * ring as f64 / n as f64;
        for s in 0..segments {
            let phi = 2.0 * std::f64::consts::PI * s as f64 / segments as f64;
            vertices.push(Point3::new(
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            ));
        }
    }
    let south = vertices.len();
    vertices.push(Point3::new(0.0, 0.0, -1.0));

    let ring_start = |ring: usize| 1 + (ring - 1) * segments;
    let mut faces = Vec::new();
    for s in 0..segments {
        let t = (s + 1) % segments;
        faces.push([0, ring_start(1) + s, ring_start(1) + t]);
        faces.push([south, ring_start(n - 1) + t, ring_start(n - 1) + s]);
    }
    for ring in 1..n - 1 {
        for s in 0..segments {
            let t = (s + 1) % segments;
            let (a, b) = (ring_start(ring) + s, ring_start(ring) + t);
            let (c, d) = (ring_start(ring + 1) + s, ring_start(ring + 1) + t);
            faces.push([a, c, d]);
            faces.push([a, d, b]);
        }
    }

    TriangleMesh::new(vertices, faces)
}

fn bench_octree(c: &mut Criterion) {
    let mesh = create_sphere(32);
    let bounds = watertight::algo::manifold::Aabb::from_points(&mesh.vertices).unwrap();

    let mut group = c.benchmark_group("octree_build");
    for depth in [5u32, 6, 7] {
        let frame = GridFrame::from_bounds(&bounds, depth).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(depth), &frame, |b, &frame| {
            b.iter(|| Octree::build(frame, &mesh, usize::MAX, true).unwrap());
        });
    }
    group.finish();
}

fn bench_process(c: &mut Criterion) {
    let mesh = create_sphere(32);

    let mut group = c.benchmark_group("process_sphere");
    group.sample_size(20);
    for depth in [5u32, 6] {
        group.bench_with_input(BenchmarkId::new("parallel", depth), &depth, |b, &depth| {
            let manifold = Manifold::new(ManifoldOptions::default().with_depth(depth));
            b.iter(|| manifold.process(&mesh).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("sequential", depth), &depth, |b, &depth| {
            let manifold = Manifold::new(ManifoldOptions::default().with_depth(depth).sequential());
            b.iter(|| manifold.process(&mesh).unwrap());
        });
    }
    group.finish();
}

fn bench_topology(c: &mut Criterion) {
    let output = Manifold::new(ManifoldOptions::default().with_depth(6))
        .process(&create_sphere(32))
        .unwrap();

    c.bench_function("topology_report", |b| {
        b.iter(|| output.mesh.topology());
    });
}

criterion_group!(benches, bench_octree, bench_process, bench_topology);
criterion_main!(benches);
