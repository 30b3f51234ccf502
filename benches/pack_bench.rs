use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use mesh_overset::prelude::*;

/// Structured nx*ny*nz hex grid on the unit cube.
fn hex_grid(n: usize) -> MeshBlock {
    let np = n + 1;
    let h = 1.0 / n as f64;
    let mut coords = Vec::with_capacity(np * np * np);
    for k in 0..np {
        for j in 0..np {
            for i in 0..np {
                coords.push([i as f64 * h, j as f64 * h, k as f64 * h]);
            }
        }
    }
    let node = |i: usize, j: usize, k: usize| (k * np + j) * np + i;
    let mut verts = Vec::with_capacity(8 * n * n * n);
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                verts.extend_from_slice(&[
                    node(i, j, k),
                    node(i + 1, j, k),
                    node(i + 1, j + 1, k),
                    node(i, j + 1, k),
                    node(i, j, k + 1),
                    node(i + 1, j, k + 1),
                    node(i + 1, j + 1, k + 1),
                    node(i, j + 1, k + 1),
                ]);
            }
        }
    }
    MeshBlock::new(1, coords, vec![CellBlock::new(8, verts)]).expect("valid grid")
}

fn block_with_records(n: usize, nrecords: usize) -> MeshBlock {
    let mut block = hex_grid(n);
    let ncells = n * n * n;
    let h = 1.0 / n as f64;
    let mut rng = SmallRng::seed_from_u64(7);
    let candidates: Vec<Candidate> = (0..nrecords)
        .map(|i| {
            // Sample each query point inside its own donor cell.
            let cell = rng.gen_range(0..ncells);
            let (ci, cj, ck) = (cell % n, (cell / n) % n, cell / (n * n));
            let xyz = [
                (ci as f64 + rng.r#gen::<f64>()) * h,
                (cj as f64 + rng.r#gen::<f64>()) * h,
                (ck as f64 + rng.r#gen::<f64>()) * h,
            ];
            Candidate {
                rank: (i % 4) as i32,
                point_id: i as i32,
                cart_id: Some(i as i32),
                xyz,
                donor: Some(DonorId(cell)),
            }
        })
        .collect();
    build_cartesian_interpolation_list(&mut block, &candidates, &IsoparametricSolver::default())
        .expect("all donors in range");
    block
}

fn bench_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_interpolated_solution");
    let n = 16;
    let nvar = 5;

    for &nrecords in &[1_000usize, 10_000, 50_000] {
        let block = block_with_records(n, nrecords);
        let nnodes = block.num_nodes();
        let mut rng = SmallRng::seed_from_u64(11);
        let field: Vec<f64> = (0..nnodes * nvar).map(|_| rng.r#gen::<f64>()).collect();

        group.bench_with_input(
            BenchmarkId::new("node_major", nrecords),
            &nrecords,
            |b, _| {
                b.iter(|| {
                    let mut sink = CollectSink::default();
                    black_box(pack_interpolated_solution(
                        &block,
                        black_box(&field),
                        nvar,
                        FieldLayout::NodeMajor,
                        &mut sink,
                    ))
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("variable_major", nrecords),
            &nrecords,
            |b, _| {
                b.iter(|| {
                    let mut sink = CollectSink::default();
                    black_box(pack_interpolated_solution(
                        &block,
                        black_box(&field),
                        nvar,
                        FieldLayout::VariableMajor,
                        &mut sink,
                    ))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_pack);
criterion_main!(benches);
