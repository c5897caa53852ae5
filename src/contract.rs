// contract.rs
use std::collections::HashSet;

use log::trace;
use rayon::prelude::*;

use crate::Generator;
use crate::bits::mask_from_indices;
use crate::error::{check_fock_len, fock_dim, FsuccError, Result};
use crate::mixer::{FockPair, Hermitian, Mixer, Unitary};
use crate::parity::excitation_sign;
use crate::spectator::SpectatorSpace;

// Spectator patterns handed to one worker at a time.
const MIN_CHUNK: usize = 1 << 10;

/// Evaluate O|Psi> = mixer(a0'a1'...i1 i0, i0'i1'...a1 a0)|Psi> over a Fock space of `norb`
/// spin-orbitals. Creation operators are applied left < right, annihilation operators right < left;
/// neither list needs to be sorted. A repeated index inside `aidx` or `iidx` makes the operator
/// vanish: an accumulating mixer leaves the output untouched, an overwriting one leaves it equal
/// to the input.
///
/// Generators that change particle number are only known to be right for single
/// particle/hole operators; general nPmH generators have not been verified.
/// # Arguments:
///     `aidx`: [usize], +cr,-an operator indices.
///     `iidx`: [usize], +an,-cr operator indices.
///     `psi`: FockPair, input and output wavefunctions of length 2^norb.
///     `mixer`: Mixer, local update rule with its amplitude.
///     `norb`: usize, number of spin-orbitals.
pub fn contract<M: Mixer>(aidx: &[usize], iidx: &[usize], mut psi: FockPair<'_>, mixer: &M, norb: usize) -> Result<()> {
    if psi.is_in_place() && !M::IN_PLACE {
        return Err(FsuccError::AliasedAccumulation);
    }
    let (nsrc, ndst) = psi.lens();
    check_fock_len("input wavefunction", nsrc, norb)?;
    check_fock_len("output wavefunction", ndst, norb)?;
    if M::IN_PLACE {
        psi.copy_through();
    }

    let Some(space) = SpectatorSpace::new(aidx, iidx, norb)? else {
        trace!("nilpotent excitation a = {:?}, i = {:?}; no contribution", aidx, iidx);
        return Ok(());
    };

    let ptrs = psi.ptrs();
    (0..space.nspec).into_par_iter().with_min_len(MIN_CHUNK).for_each(|s| {
        let (det_ia, det_ai) = space.pair(s);
        let sgn = excitation_sign(det_ia, det_ai, iidx, aidx);
        // Distinct spectator patterns give disjoint {det_ia, det_ai}, and both are below 2^norb.
        unsafe { mixer.mix(sgn, &ptrs, det_ia as usize, det_ai as usize); }
    });
    Ok(())
}

/// Evaluate U|Psi> = exp(t [a0'a1'...i1 i0 - i0'i1'...a1 a0])|Psi> in place.
/// # Arguments:
///     `aidx`: [usize], +cr,-an operator indices.
///     `iidx`: [usize], +an,-cr operator indices.
///     `tamp`: f64, amplitude (rotation angle).
///     `psi`: [f64], wavefunction of length 2^norb, overwritten.
///     `norb`: usize, number of spin-orbitals.
pub fn contract_unitary(aidx: &[usize], iidx: &[usize], tamp: f64, psi: &mut [f64], norb: usize) -> Result<()> {
    contract(aidx, iidx, FockPair::in_place(psi), &Unitary::new(tamp), norb)
}

/// Evaluate U^\dagger|Psi>, the inverse rotation of `contract_unitary`, in place.
pub fn contract_unitary_adjoint(aidx: &[usize], iidx: &[usize], tamp: f64, psi: &mut [f64], norb: usize) -> Result<()> {
    contract(aidx, iidx, FockPair::in_place(psi), &Unitary::new(-tamp), norb)
}

/// Evaluate H|Psi> += h (a0'a1'...i1 i0 + i0'i1'...a1 a0)|Psi>. `hpsi` is accumulated into, so the
/// caller zeroes it (or seeds it with earlier terms).
/// # Arguments:
///     `aidx`: [usize], +cr,-an operator indices.
///     `iidx`: [usize], +an,-cr operator indices.
///     `hamp`: f64, amplitude.
///     `psi`: [f64], input wavefunction of length 2^norb.
///     `hpsi`: [f64], output wavefunction of length 2^norb.
///     `norb`: usize, number of spin-orbitals.
pub fn contract_hermitian(aidx: &[usize], iidx: &[usize], hamp: f64, psi: &[f64], hpsi: &mut [f64], norb: usize) -> Result<()> {
    contract(aidx, iidx, FockPair::split(psi, hpsi), &Hermitian::new(hamp), norb)
}

/// Project |Psi> onto the determinants that interact with a1'a2'...i1 i0 and i1'i2'...a1 a0, that
/// is, zero every amplitude whose active orbitals are neither exactly det_i nor exactly det_a.
/// Repeated indices are not treated as nilpotent here; they simply set the same bit twice.
/// # Arguments:
///     `aidx`: [usize], +cr,-an operator indices.
///     `iidx`: [usize], +an,-cr operator indices.
///     `psi`: [f64], wavefunction of length 2^norb, modified in place.
///     `norb`: usize, number of spin-orbitals.
pub fn project(aidx: &[usize], iidx: &[usize], psi: &mut [f64], norb: usize) -> Result<()> {
    check_fock_len("wavefunction", psi.len(), norb)?;
    let det_i = union_mask(iidx, norb)?;
    let det_a = union_mask(aidx, norb)?;
    let active = det_i | det_a;

    psi.par_iter_mut().with_min_len(MIN_CHUNK).enumerate().for_each(|(det, c)| {
        let proj = det as u64 & active;
        if proj != det_i && proj != det_a {
            *c = 0.0;
        }
    });
    Ok(())
}

// Occupation mask of `idxs` allowing repeats.
fn union_mask(idxs: &[usize], norb: usize) -> Result<u64> {
    let mut det = 0u64;
    for &k in idxs {
        // Singletons never hit the nilpotent branch.
        det |= mask_from_indices(&[k], norb)?.unwrap_or(0);
    }
    Ok(det)
}

impl Generator {
    pub fn new(aidx: Vec<usize>, iidx: Vec<usize>, amp: f64) -> Self {
        Self {aidx, iidx, amp}
    }

    /// Reject generators that are out of range, nilpotent, or whose amplitude is undefined
    /// because creation and annihilation strings are the same set of orbitals.
    /// # Arguments:
    ///     `norb`: usize, number of spin-orbitals.
    pub fn check(&self, norb: usize) -> Result<()> {
        fock_dim(norb)?;
        if mask_from_indices(&self.aidx, norb)?.is_none() {
            return Err(FsuccError::InvalidGenerator(format!("a = {:?} is nilpotent", self.aidx)));
        }
        if mask_from_indices(&self.iidx, norb)?.is_none() {
            return Err(FsuccError::InvalidGenerator(format!("i = {:?} is nilpotent", self.iidx)));
        }
        let (a, i) = self.key();
        if !a.is_empty() && !i.is_empty() && a == i {
            return Err(FsuccError::InvalidGenerator(format!("undefined amplitude for a = {:?}, i = {:?}", self.aidx, self.iidx)));
        }
        Ok(())
    }

    // Sorted (a, i) strings, unordered between the two since the generator is antisymmetric.
    fn key(&self) -> (Vec<usize>, Vec<usize>) {
        let mut a = self.aidx.clone();
        let mut i = self.iidx.clone();
        a.sort_unstable();
        i.sort_unstable();
        (a, i)
    }
}

/// Check every generator and reject duplicates under permutation of indices and a <-> i.
/// # Arguments:
///     `gens`: [Generator], generator list.
///     `norb`: usize, number of spin-orbitals.
pub fn check_generators(gens: &[Generator], norb: usize) -> Result<()> {
    let mut seen = HashSet::with_capacity(gens.len());
    for g in gens {
        g.check(norb)?;
        let (a, i) = g.key();
        let key = if a <= i {(a, i)} else {(i, a)};
        if !seen.insert(key) {
            return Err(FsuccError::InvalidGenerator(format!("duplicate generator a = {:?}, i = {:?}", g.aidx, g.iidx)));
        }
    }
    Ok(())
}

/// Apply the product of unitary factors prod_k exp(t_k G_k)|Psi> in place, first generator first.
/// With `adjoint` the factors are inverted and applied last to first.
/// # Arguments:
///     `gens`: [Generator], generators with amplitudes.
///     `psi`: [f64], wavefunction of length 2^norb, overwritten.
///     `norb`: usize, number of spin-orbitals.
///     `adjoint`: bool, apply U^\dagger instead of U.
pub fn apply_generators(gens: &[Generator], psi: &mut [f64], norb: usize, adjoint: bool) -> Result<()> {
    if adjoint {
        for g in gens.iter().rev() {
            contract_unitary_adjoint(&g.aidx, &g.iidx, g.amp, psi, norb)?;
        }
    } else {
        for g in gens {
            contract_unitary(&g.aidx, &g.iidx, g.amp, psi, norb)?;
        }
    }
    Ok(())
}
