use fsucc_rs::{apply_nbody, apply_spinsym, contract_hermitian, expectation, SpinSymOperator};
use fsucc_rs::maths::{npair, tril_index, unpack_tril};
use ndarray::{ArrayD, IxDyn};
use proptest::prelude::*;

fn ramp(n: usize) -> Vec<f64> {
    (0..n).map(|k| ((k as f64) * 0.531 - 0.4).sin()).collect()
}

fn close(x: &[f64], y: &[f64], tol: f64) -> bool {
    x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| (a - b).abs() <= tol)
}

#[test]
fn one_body_identity_is_number_operator() {
    let norb = 3;
    let nspin = 2 * norb;
    let mut hop = vec![0.0; npair(norb)];
    for p in 0..norb {
        hop[tril_index(p, p)] = 1.0;
    }
    let psi = ramp(1 << nspin);
    let mut hpsi = vec![0.0; 1 << nspin];
    apply_nbody(&hop, &psi, &mut hpsi, norb, 1).unwrap();

    // Same thing as one Hermitian contraction per orbital and spin.
    let mut manual = vec![0.0; 1 << nspin];
    for p in 0..norb {
        for spin in 0..2 {
            let k = p + spin * norb;
            contract_hermitian(&[k], &[k], 1.0, &psi, &mut manual, nspin).unwrap();
        }
    }
    assert_eq!(hpsi, manual);

    for (det, (&h, &c)) in hpsi.iter().zip(psi.iter()).enumerate() {
        let n = (det as u64).count_ones() as f64;
        assert!((h - n * c).abs() < 1e-12);
    }
}

#[test]
fn two_body_matches_nested_contractions() {
    let norb = 2;
    let nspin = 2 * norb;
    let np = npair(norb);
    let hop: Vec<f64> = (0..np * np).map(|k| 0.1 * (k as f64) - 0.3).collect();
    let psi = ramp(1 << nspin);
    let mut hpsi = vec![0.0; 1 << nspin];
    apply_nbody(&hop, &psi, &mut hpsi, norb, 2).unwrap();

    let mut manual = vec![0.0; 1 << nspin];
    for pq in 0..np {
        let (p, q) = unpack_tril(pq);
        for s in 0..2 {
            for rs in 0..np {
                let (r, t) = unpack_tril(rs);
                for u in 0..2 {
                    let aidx = [p + s * norb, r + u * norb];
                    let iidx = [q + s * norb, t + u * norb];
                    contract_hermitian(&aidx, &iidx, hop[pq * np + rs], &psi, &mut manual, nspin).unwrap();
                }
            }
        }
    }
    assert!(close(&hpsi, &manual, 1e-12));
}

#[test]
fn conserves_particle_number_and_spin() {
    let norb = 3;
    let nspin = 2 * norb;
    let np = npair(norb);
    let h1: Vec<f64> = (0..np).map(|k| 0.2 + 0.05 * k as f64).collect();
    let h2: Vec<f64> = (0..np * np).map(|k| ((k as f64) * 0.77).cos()).collect();
    // alpha orbital 0, beta orbital 1.
    let det0 = 0b000_001usize | (0b010 << norb);
    let mut psi = vec![0.0; 1 << nspin];
    psi[det0] = 1.0;

    for (hop, nelec) in [(h1, 1), (h2, 2)] {
        let mut hpsi = vec![0.0; 1 << nspin];
        apply_nbody(&hop, &psi, &mut hpsi, norb, nelec).unwrap();
        for (det, &c) in hpsi.iter().enumerate() {
            if c == 0.0 {continue;}
            let alpha = (det & 0b111).count_ones();
            let beta = (det >> norb).count_ones();
            assert_eq!((alpha, beta), (1, 1), "det {} has amplitude {}", det, c);
        }
    }
}

#[test]
fn spinsym_reference_energy() {
    // Two spatial orbitals, doubly occupied orbital 0: E = h0 + 2 h_00 + (00|00).
    let norb = 2;
    let np = npair(norb);
    let mut h1 = ArrayD::zeros(IxDyn(&[np]));
    h1[[tril_index(0, 0)].as_slice()] = -1.25;
    h1[[tril_index(1, 1)].as_slice()] = -0.5;
    h1[[tril_index(1, 0)].as_slice()] = 0.1;
    let mut h2 = ArrayD::zeros(IxDyn(&[np, np]));
    h2[[0, 0].as_slice()] = 0.675;
    let op = SpinSymOperator::new(0.7, vec![h1, h2]);

    let mut psi = vec![0.0; 1 << (2 * norb)];
    psi[0b0101] = 1.0;
    let e = expectation(&op, &psi, norb).unwrap();
    assert!((e - (0.7 - 2.5 + 0.675)).abs() < 1e-12);
}

#[test]
fn spinsym_is_scaled_sum_of_drivers() {
    let norb = 2;
    let np = npair(norb);
    let nspin = 2 * norb;
    let h1v: Vec<f64> = (0..np).map(|k| 0.3 - 0.2 * k as f64).collect();
    let h2v: Vec<f64> = (0..np * np).map(|k| 0.01 * (k * k) as f64).collect();
    let op = SpinSymOperator::new(-0.25, vec![
        ArrayD::from_shape_vec(IxDyn(&[np]), h1v.clone()).unwrap(),
        ArrayD::from_shape_vec(IxDyn(&[np, np]), h2v.clone()).unwrap(),
    ]);
    let psi = ramp(1 << nspin);
    let mut hpsi = vec![0.0; 1 << nspin];
    apply_spinsym(&op, &psi, &mut hpsi, norb).unwrap();

    let mut manual: Vec<f64> = psi.iter().map(|c| -0.25 * c).collect();
    apply_nbody(&h1v, &psi, &mut manual, norb, 1).unwrap();
    let half: Vec<f64> = h2v.iter().map(|h| 0.5 * h).collect();
    apply_nbody(&half, &psi, &mut manual, norb, 2).unwrap();
    assert!(close(&hpsi, &manual, 1e-12));
}

proptest! {
    #[test]
    fn spinsym_matrix_is_symmetric(h1 in prop::collection::vec(-1.0f64..1.0, 3), h2 in prop::collection::vec(-1.0f64..1.0, 9)) {
        let norb = 2;
        let n = 1 << (2 * norb);
        let op = SpinSymOperator::new(0.0, vec![
            ArrayD::from_shape_vec(IxDyn(&[3]), h1).unwrap(),
            ArrayD::from_shape_vec(IxDyn(&[3, 3]), h2).unwrap(),
        ]);
        let mut mat = vec![0.0; n * n];
        for y in 0..n {
            let mut e = vec![0.0; n];
            e[y] = 1.0;
            let mut col = vec![0.0; n];
            apply_spinsym(&op, &e, &mut col, norb).unwrap();
            for x in 0..n {
                mat[x * n + y] = col[x];
            }
        }
        for x in 0..n {
            for y in 0..x {
                prop_assert!((mat[x * n + y] - mat[y * n + x]).abs() < 1e-12);
            }
        }
    }
}
