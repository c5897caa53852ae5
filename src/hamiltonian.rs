// hamiltonian.rs
use log::debug;
use ndarray::ArrayD;

use crate::contract::contract_hermitian;
use crate::error::{check_fock_len, FsuccError, Result};
use crate::maths::{npair, parallel_dot, parallel_scale_into, unpack_tril};

/// Evaluate H|Psi> += sum h_{p0q0,p1q1,...} (p0'p1'...q1 q0 + h.c.)|Psi>, where H is an
/// `nelec`-body spin-symmetric Hermitian operator over `norb` spatial orbitals and |Psi> a
/// Fock-space CI vector over 2 * norb spin-orbitals with no symmetry compaction. Spin-orbital
/// p + s * norb is spatial orbital p with spin s.
///
/// Each of the `nelec` levels runs over all lower-triangular pairs (p, q) and both spins, so the
/// operator is realised as (2 * npair)^nelec Hermitian contractions.
/// # Arguments:
///     `hop`: [f64], amplitudes of shape [norb (norb + 1) / 2]^nelec, flattened row-major.
///     `psi`: [f64], input wavefunction of length 2^(2 norb).
///     `hpsi`: [f64], output wavefunction of length 2^(2 norb), accumulated into.
///     `norb`: usize, number of spatial orbitals.
///     `nelec`: usize, operator rank.
pub fn apply_nbody(hop: &[f64], psi: &[f64], hpsi: &mut [f64], norb: usize, nelec: usize) -> Result<()> {
    if nelec == 0 {
        return Err(FsuccError::InvalidRank);
    }
    let nspin = 2 * norb;
    check_fock_len("input wavefunction", psi.len(), nspin)?;
    check_fock_len("output wavefunction", hpsi.len(), nspin)?;
    let np = npair(norb);
    let expected = np.checked_pow(nelec as u32).unwrap_or(usize::MAX);
    if hop.len() != expected {
        return Err(FsuccError::OperatorShape {len: hop.len(), expected, npair: np, nelec});
    }
    // No orbital pairs, no contribution.
    if np == 0 {
        return Ok(());
    }

    // One creation and one annihilation index per level, owned by this call only.
    let mut pidx = vec![0usize; nelec];
    let mut qidx = vec![0usize; nelec];
    let mut ncalls = 0usize;
    nbody_level(hop, psi, hpsi, &mut pidx, &mut qidx, norb, 0, &mut ncalls)?;
    debug!("{}-body operator over {} spatial orbitals: {} hermitian contractions", nelec, norb, ncalls);
    Ok(())
}

// Fill level `ielec` of (pidx, qidx) and recurse into the next-minor dimension of `hop`, which
// is the sub-tensor selected by the levels above.
fn nbody_level(hop: &[f64], psi: &[f64], hpsi: &mut [f64], pidx: &mut [usize], qidx: &mut [usize],
               norb: usize, ielec: usize, ncalls: &mut usize) -> Result<()> {
    let nelec = pidx.len();
    let np = npair(norb);
    let opstep = hop.len() / np;

    for pq in 0..np {
        let (p, q) = unpack_tril(pq);
        let sub = &hop[pq * opstep..(pq + 1) * opstep];
        for spin in 0..2 {
            pidx[ielec] = p + spin * norb;
            qidx[ielec] = q + spin * norb;
            if ielec + 1 < nelec {
                nbody_level(sub, psi, hpsi, pidx, qidx, norb, ielec + 1, ncalls)?;
            } else {
                let h = sub[0];
                if h == 0.0 {continue;}
                contract_hermitian(pidx, qidx, h, psi, hpsi, 2 * norb)?;
                *ncalls += 1;
            }
        }
    }
    Ok(())
}

// Storage for a general spin-symmetric Hermitian operator: a constant plus 1-, 2-, ... body
// terms in order of increasing electron count.
#[derive(Clone, Debug)]
pub struct SpinSymOperator {
    pub constant: f64,
    pub terms: Vec<ArrayD<f64>>, // terms[n - 1] has shape [npair; n].
}

impl SpinSymOperator {
    pub fn new(constant: f64, terms: Vec<ArrayD<f64>>) -> Self {
        Self {constant, terms}
    }

    /// Check that every n-body term has shape [npair]^n for `norb` spatial orbitals.
    pub fn check(&self, norb: usize) -> Result<()> {
        let np = npair(norb);
        for (ix, term) in self.terms.iter().enumerate() {
            let nelec = ix + 1;
            if term.ndim() != nelec || term.shape().iter().any(|&d| d != np) {
                let expected = np.checked_pow(nelec as u32).unwrap_or(usize::MAX);
                return Err(FsuccError::OperatorShape {len: term.len(), expected, npair: np, nelec});
            }
        }
        Ok(())
    }
}

/// Evaluate H|Psi> for a spin-symmetric Hermitian operator as
///     H|Psi> = h0 |Psi> + sum_n (1 / n!) H_n |Psi>,
/// where H_n is the n-body driver applied to terms[n - 1]. `hpsi` is overwritten.
/// # Arguments:
///     `op`: SpinSymOperator, operator terms.
///     `psi`: [f64], input wavefunction of length 2^(2 norb).
///     `hpsi`: [f64], output wavefunction of length 2^(2 norb).
///     `norb`: usize, number of spatial orbitals.
pub fn apply_spinsym(op: &SpinSymOperator, psi: &[f64], hpsi: &mut [f64], norb: usize) -> Result<()> {
    op.check(norb)?;
    check_fock_len("input wavefunction", psi.len(), 2 * norb)?;
    check_fock_len("output wavefunction", hpsi.len(), 2 * norb)?;

    parallel_scale_into(op.constant, psi, hpsi);
    let mut fac = 1.0;
    for (ix, term) in op.terms.iter().enumerate() {
        let nelec = ix + 1;
        fac /= nelec as f64;
        // Logical (row-major) order regardless of the term's memory layout.
        let hop: Vec<f64> = term.iter().map(|&h| fac * h).collect();
        apply_nbody(&hop, psi, hpsi, norb, nelec)?;
    }
    Ok(())
}

/// Expectation value <Psi|H|Psi> of a spin-symmetric Hermitian operator.
pub fn expectation(op: &SpinSymOperator, psi: &[f64], norb: usize) -> Result<f64> {
    let mut hpsi = vec![0.0; psi.len()];
    apply_spinsym(op, psi, &mut hpsi, norb)?;
    Ok(parallel_dot(psi, &hpsi))
}
