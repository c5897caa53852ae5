// spectator.rs
use crate::Det;
use crate::bits::{expand_around, mask_from_indices};
use crate::error::{fock_dim, Result};

// Reduced determinant space of the orbitals an excitation does not touch. Every spectator
// pattern s maps to exactly one connected pair (det_ia, det_ai).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpectatorSpace {
    pub det_i: Det,  // iidx orbitals occupied, aidx orbitals empty.
    pub det_a: Det,  // aidx orbitals occupied, iidx orbitals empty.
    pub active: Det, // det_i | det_a.
    pub nspec: usize, // 2^(norb - |active|).
}

impl SpectatorSpace {
    /// Set up the spectator space of the excitation `aidx <- iidx` over `norb` spin-orbitals.
    /// Returns `Ok(None)` for a nilpotent excitation, i.e., a repeated index inside either list.
    /// # Arguments:
    ///     `aidx`: [usize], creation-then-annihilation indices.
    ///     `iidx`: [usize], annihilation-then-creation indices.
    ///     `norb`: usize, number of spin-orbitals.
    pub fn new(aidx: &[usize], iidx: &[usize], norb: usize) -> Result<Option<Self>> {
        let ndet = fock_dim(norb)?;
        let Some(det_i) = mask_from_indices(iidx, norb)? else {return Ok(None)};
        let Some(det_a) = mask_from_indices(aidx, norb)? else {return Ok(None)};
        let active = det_i | det_a;
        // One spin-orbital popped per unique active index.
        let nspec = ndet >> active.count_ones();
        Ok(Some(Self {det_i, det_a, active, nspec}))
    }

    /// Full determinant of spectator pattern `s` with every active orbital empty.
    #[inline(always)]
    pub fn spectator(&self, s: usize) -> Det {
        expand_around(s as Det, self.active)
    }

    /// Connected determinant pair (det_ia, det_ai) of spectator pattern `s`.
    #[inline(always)]
    pub fn pair(&self, s: usize) -> (Det, Det) {
        let det_00 = self.spectator(s);
        (det_00 | self.det_i, det_00 | self.det_a)
    }

    /// Whether `det` restricted to the active orbitals is exactly det_i or det_a.
    #[inline(always)]
    pub fn connects(&self, det: Det) -> bool {
        let proj = det & self.active;
        proj == self.det_i || proj == self.det_a
    }

    /// Iterate serially over all connected pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (Det, Det)> + '_ {
        (0..self.nspec).map(move |s| self.pair(s))
    }
}
