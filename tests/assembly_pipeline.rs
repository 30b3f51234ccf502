//! Classification → list building → packing over a small donor grid.

use mesh_overset::prelude::*;

const CUBE: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

fn donor_block() -> MeshBlock {
    MeshBlock::new(5, CUBE.to_vec(), vec![CellBlock::new(8, (0..8).collect())]).unwrap()
}

fn linear(x: [f64; 3]) -> f64 {
    1.5 * x[0] - 2.0 * x[1] + 0.25 * x[2] + 3.0
}

fn cart_candidate(point_id: i32, xyz: [f64; 3], donor: Option<DonorId>) -> Candidate {
    Candidate {
        rank: 1,
        point_id,
        cart_id: Some(50 + point_id),
        xyz,
        donor,
    }
}

#[test]
fn resolved_candidates_reproduce_a_linear_field() {
    let mut block = donor_block();
    let queries = [[0.2, 0.3, 0.4], [0.9, 0.1, 0.6], [0.5, 0.5, 0.5]];
    let mut candidates: Vec<Candidate> = queries
        .iter()
        .enumerate()
        .map(|(i, &p)| cart_candidate(i as i32, p, Some(DonorId(0))))
        .collect();
    candidates.push(cart_candidate(3, [9.0, 9.0, 9.0], None));

    let built = build_cartesian_interpolation_list(
        &mut block,
        &candidates,
        &IsoparametricSolver::default(),
    )
    .unwrap();
    assert_eq!(built, 3);

    for rec in &block.interp_cart {
        let sum: f64 = rec.weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(rec.weights.iter().all(|w| (0.0..=1.0).contains(w)));
    }

    // nvar = 2 node-major field: the linear function and its double.
    let mut field = Vec::with_capacity(16);
    for x in CUBE {
        field.push(linear(x));
        field.push(2.0 * linear(x));
    }
    let mut sink = CollectSink::default();
    let packed =
        pack_interpolated_solution(&block, &field, 2, FieldLayout::NodeMajor, &mut sink);
    assert_eq!(packed.num_records(), 3);
    assert!(sink.events.is_empty());
    for (i, &p) in queries.iter().enumerate() {
        assert!((packed.reals[2 * i] - linear(p)).abs() < 1e-9);
        assert!((packed.reals[2 * i + 1] - 2.0 * linear(p)).abs() < 1e-9);
        assert_eq!(
            &packed.ints[3 * i..3 * i + 3],
            &[1, 50 + i as i32, i as i32]
        );
    }
}

#[test]
fn random_interior_points_reproduce_a_linear_field() {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    let mut block = donor_block();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let points: Vec<[f64; 3]> = (0..64)
        .map(|_| [rng.r#gen::<f64>(), rng.r#gen::<f64>(), rng.r#gen::<f64>()])
        .collect();
    let candidates: Vec<Candidate> = points
        .iter()
        .enumerate()
        .map(|(i, &p)| cart_candidate(i as i32, p, Some(DonorId(0))))
        .collect();
    build_cartesian_interpolation_list(
        &mut block,
        &candidates,
        &IsoparametricSolver::default(),
    )
    .unwrap();

    let field: Vec<f64> = CUBE.iter().map(|&x| linear(x)).collect();
    let mut sink = CollectSink::default();
    let packed =
        pack_interpolated_solution(&block, &field, 1, FieldLayout::NodeMajor, &mut sink);
    assert!(sink.events.is_empty());
    for (i, &p) in points.iter().enumerate() {
        assert!(
            (packed.reals[i] - linear(p)).abs() < 1e-9,
            "point {i} at {p:?}"
        );
    }
}

#[test]
fn variable_major_field_gives_identical_values() {
    let mut block = donor_block();
    let candidates = [cart_candidate(0, [0.3, 0.6, 0.9], Some(DonorId(0)))];
    build_cartesian_interpolation_list(
        &mut block,
        &candidates,
        &IsoparametricSolver::default(),
    )
    .unwrap();

    let mut node_major = Vec::with_capacity(16);
    for x in CUBE {
        node_major.push(linear(x));
        node_major.push(-linear(x));
    }
    let mut var_major = Vec::with_capacity(16);
    for x in CUBE {
        var_major.push(linear(x));
    }
    for x in CUBE {
        var_major.push(-linear(x));
    }

    let mut sink = LogSink;
    let a = pack_interpolated_solution(&block, &node_major, 2, FieldLayout::NodeMajor, &mut sink);
    let b =
        pack_interpolated_solution(&block, &var_major, 2, FieldLayout::VariableMajor, &mut sink);
    assert_eq!(a.reals, b.reals);
    // The secondary tag trades places with the point id between layouts.
    assert_eq!(a.ints, vec![1, 50, 0]);
    assert_eq!(b.ints, vec![1, 0, 50]);
}

#[test]
fn generic_and_cartesian_lists_pack_back_to_back() {
    let mut block = donor_block();
    let generic = [Candidate {
        rank: 2,
        point_id: 11,
        cart_id: None,
        xyz: [0.5, 0.5, 0.5],
        donor: Some(DonorId(0)),
    }];
    let cart = [cart_candidate(4, [0.25, 0.25, 0.25], Some(DonorId(0)))];
    let solver = IsoparametricSolver::default();
    build_interpolation_list(&mut block, &generic, &solver).unwrap();
    build_cartesian_interpolation_list(&mut block, &cart, &solver).unwrap();

    let field: Vec<f64> = CUBE.iter().map(|&x| linear(x)).collect();
    let mut sink = CollectSink::default();
    let packed =
        pack_interpolated_solution(&block, &field, 1, FieldLayout::NodeMajor, &mut sink);
    assert_eq!(packed.num_records(), 2);
    // Generic list first, with the absent-tag sentinel in the middle slot.
    assert_eq!(&packed.ints[..3], &[2, -1, 11]);
    assert_eq!(&packed.ints[3..], &[1, 54, 4]);
    assert!((packed.reals[0] - linear([0.5, 0.5, 0.5])).abs() < 1e-9);
    assert!((packed.reals[1] - linear([0.25, 0.25, 0.25])).abs() < 1e-9);
}

#[test]
fn classifier_feeds_the_cartesian_list() {
    // The receptor block: a unit cube whose nodes have no donor anywhere.
    struct NoSamples;
    impl CellSampler for NoSamples {
        fn sample_count(&self, _cell: CellId) -> usize {
            0
        }
        fn sample_points(&self, _cell: CellId, _count: usize, _out: &mut Vec<f64>) {}
    }

    let mut receptor = donor_block();
    receptor.set_node_res(vec![None; 8]);
    let scan = identify_mandatory_receptors(&mut receptor, &NoSamples);
    assert_eq!(scan.receptor_cells, 1);
    assert_eq!(scan.total_points, 8);

    // Pretend the background grid resolved every sample point, then build
    // the donor-side records from the candidate buffer.
    let mut donor = donor_block();
    let candidates: Vec<Candidate> = receptor
        .cart
        .coords
        .chunks_exact(3)
        .enumerate()
        .map(|(i, c)| Candidate {
            rank: 0,
            point_id: i as i32,
            cart_id: Some(i as i32),
            xyz: [c[0], c[1], c[2]],
            donor: Some(DonorId(0)),
        })
        .collect();
    let built = build_cartesian_interpolation_list(
        &mut donor,
        &candidates,
        &IsoparametricSolver::default(),
    )
    .unwrap();
    assert_eq!(built, 8);

    // Every candidate resolved: the receptor side may now blank.
    for d in receptor.cart.donors.iter_mut() {
        *d = Some(DonorId(0));
    }
    apply_cartesian_blanking(&mut receptor);
    assert!(receptor.iblank.iter().all(|&b| b == Blanking::Interpolated));
}
