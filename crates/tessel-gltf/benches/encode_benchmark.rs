//! Encoding benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tessel_gltf::Document;

/// A `size` x `size` grid of quads in the XY plane.
fn grid_document(size: u32) -> Document {
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    for y in 0..=size {
        for x in 0..=size {
            vertices.extend_from_slice(&[x as f32, y as f32, 0.0]);
            normals.extend_from_slice(&[0.0, 0.0, 1.0]);
        }
    }
    let row = size + 1;
    let mut indices = Vec::new();
    for y in 0..size {
        for x in 0..size {
            let a = y * row + x;
            indices.extend_from_slice(&[a, a + 1, a + row, a + 1, a + row + 1, a + row]);
        }
    }

    let mut doc = Document::new();
    let material = doc
        .add_material(0.5, 0.5, 0.5, 1.0, 0.0, "grid")
        .expect("grid material is valid");
    doc.add_triangle_mesh(&vertices, &normals, &indices, material, None)
        .expect("grid fits in 16-bit indices");
    doc
}

fn encode_glb(c: &mut Criterion) {
    let doc = grid_document(128);
    c.bench_function("create_glb_grid_128", |b| {
        b.iter(|| black_box(&doc).create_glb())
    });
}

fn build_mesh(c: &mut Criterion) {
    c.bench_function("add_triangle_mesh_grid_64", |b| {
        b.iter(|| grid_document(black_box(64)))
    });
}

criterion_group!(benches, encode_glb, build_mesh);
criterion_main!(benches);
