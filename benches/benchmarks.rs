use criterion::{Criterion, criterion_group, criterion_main};
use quadmesh::{Attribute, DrawMode, Mesh, PositionCells};
use std::hint::black_box;

// Box subdivided a few times, so the edits have a realistic number of cells to scan.
fn dense_box(levels: usize) -> Mesh {
    let (mut mesh, _) = Mesh::quad_box(1.0, 1.0, 1.0).unwrap();
    mesh.subdivide(levels).unwrap();
    mesh
}

// Primitive Creation Benchmarks
fn bench_primitive_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitive_creation");

    group.bench_function("box_batch", |b| {
        b.iter(|| {
            for i in 0..100 {
                let size = 1.0 + i as f32 * 0.01;
                let mesh = Mesh::quad_box(black_box(size), size, size).unwrap();
                black_box(mesh);
            }
        });
    });

    group.bench_function("box_disjoint_batch", |b| {
        b.iter(|| {
            for i in 0..100 {
                let size = 1.0 + i as f32 * 0.01;
                let mesh = Mesh::box_disjoint(black_box(size), size, size).unwrap();
                black_box(mesh);
            }
        });
    });

    group.finish();
}

// Editing Benchmarks
fn bench_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("edits");
    let base = dense_box(2);

    group.bench_function("extrude_dense_box", |b| {
        b.iter(|| {
            let mut mesh = base.clone();
            let cells: Vec<_> = mesh.cells().collect();
            for c in cells.into_iter().step_by(7) {
                mesh.extrude(c, black_box(0.2), 0.1).unwrap();
            }
            black_box(mesh);
        });
    });

    group.bench_function("split_loop_dense_box", |b| {
        b.iter(|| {
            let mut mesh = base.clone();
            let cells: Vec<_> = mesh.cells().collect();
            mesh.split_loop(cells[0], black_box(0.5), false).unwrap();
            black_box(mesh);
        });
    });

    group.bench_function("get_loop_dense_box", |b| {
        let c = base.cells().next().unwrap();
        b.iter(|| {
            let cells = base.get_loop(black_box(c), Attribute::Cells, false).unwrap();
            black_box(cells);
        });
    });

    group.bench_function("merge_disjoint_boxes", |b| {
        let mut disjoint = Mesh::new();
        for _ in 0..20 {
            disjoint.add_box_disjoint(1.0, 1.0, 1.0).unwrap();
        }
        b.iter(|| {
            let mut mesh = disjoint.clone();
            let merged = mesh.merge_positions().unwrap();
            black_box(merged);
        });
    });

    group.finish();
}

// Subdivision Benchmarks
fn bench_subdivision(c: &mut Criterion) {
    let mut group = c.benchmark_group("subdivision");
    let (cube, _) = Mesh::quad_box(1.0, 1.0, 1.0).unwrap();

    group.bench_function("catmull_clark_cube", |b| {
        b.iter(|| {
            let mut mesh = cube.clone();
            mesh.subdivide(black_box(1)).unwrap();
            black_box(mesh);
        });
    });

    group.bench_function("catmull_clark_cube_4_iterations", |b| {
        b.iter(|| {
            let mut mesh = cube.clone();
            mesh.subdivide(black_box(4)).unwrap();
            black_box(mesh);
        });
    });

    group.finish();
}

// Normals and buffer benchmarks
fn bench_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("operations");
    let base = dense_box(3);

    group.bench_function("update_normals", |b| {
        b.iter(|| {
            let mut mesh = base.clone();
            mesh.update_normals().unwrap();
            black_box(mesh);
        });
    });

    group.bench_function("position_cells", |b| {
        b.iter(|| {
            let adjacency: PositionCells = base.position_cells();
            black_box(adjacency);
        });
    });

    group.bench_function("triangle_elements", |b| {
        b.iter(|| {
            let elements = base.elements::<u32>(black_box(DrawMode::Triangles)).unwrap();
            black_box(elements);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_primitive_creation,
    bench_edits,
    bench_subdivision,
    bench_operations
);
criterion_main!(benches);
