// mixer.rs
use std::marker::PhantomData;

use rayon::prelude::*;

/// Input and output wavefunctions of one contraction. A unitary rotation may update its input in
/// place; a Hermitian accumulation needs a separate output buffer.
pub enum FockPair<'a> {
    InPlace(&'a mut [f64]),
    Split {src: &'a [f64], dst: &'a mut [f64]},
}

impl<'a> FockPair<'a> {
    pub fn in_place(psi: &'a mut [f64]) -> Self {
        FockPair::InPlace(psi)
    }

    pub fn split(src: &'a [f64], dst: &'a mut [f64]) -> Self {
        FockPair::Split {src, dst}
    }

    pub fn is_in_place(&self) -> bool {
        matches!(self, FockPair::InPlace(_))
    }

    /// Lengths of the (source, destination) buffers.
    pub fn lens(&self) -> (usize, usize) {
        match self {
            FockPair::InPlace(psi) => (psi.len(), psi.len()),
            FockPair::Split {src, dst} => (src.len(), dst.len()),
        }
    }

    /// Copy the source into the destination of a split pair. Does nothing in place.
    pub(crate) fn copy_through(&mut self) {
        if let FockPair::Split {src, dst} = self {
            dst.par_iter_mut().zip(src.par_iter()).for_each(|(d, &s)| *d = s);
        }
    }

    /// Raw view shared by all workers of one parallel contraction. Borrows `self` mutably so
    /// nothing else can touch the buffers while the view lives.
    pub(crate) fn ptrs(&mut self) -> FockPtrs<'_> {
        match self {
            FockPair::InPlace(psi) => {
                let p = psi.as_mut_ptr();
                FockPtrs {src: p as *const f64, dst: p, len: psi.len(), _borrow: PhantomData}
            }
            FockPair::Split {src, dst} => {
                FockPtrs {src: src.as_ptr(), dst: dst.as_mut_ptr(), len: dst.len(), _borrow: PhantomData}
            }
        }
    }
}

/// Unsynchronised view of a (source, destination) buffer pair. Workers may only touch the slots
/// of their own determinant pair; distinct spectator patterns never share a slot.
pub struct FockPtrs<'a> {
    src: *const f64,
    dst: *mut f64,
    len: usize,
    _borrow: PhantomData<&'a mut [f64]>,
}

// Disjointness of write sets is guaranteed by the contractor, see `Mixer::mix`.
unsafe impl Send for FockPtrs<'_> {}
unsafe impl Sync for FockPtrs<'_> {}

impl FockPtrs<'_> {
    /// # Safety
    /// `det` < len and no other thread writes `det` concurrently.
    #[inline(always)]
    pub unsafe fn read(&self, det: usize) -> f64 {
        debug_assert!(det < self.len);
        *self.src.add(det)
    }

    /// # Safety
    /// `det` < len and no other thread reads or writes `det` concurrently.
    #[inline(always)]
    pub unsafe fn write(&self, det: usize, value: f64) {
        debug_assert!(det < self.len);
        *self.dst.add(det) = value;
    }

    /// # Safety
    /// `det` < len and no other thread reads or writes `det` concurrently.
    #[inline(always)]
    pub unsafe fn accumulate(&self, det: usize, value: f64) {
        debug_assert!(det < self.len);
        *self.dst.add(det) += value;
    }
}

/// Local update rule applied to one connected determinant pair. The amplitude is bound into the
/// mixer when it is built, so the per-pair call does no setup work.
pub trait Mixer: Sync {
    // Whether the mixer overwrites its slots, so it may run on a single buffer. Out-of-place calls
    // of such mixers start from a copy of the source; the others accumulate.
    const IN_PLACE: bool;

    /// Mix the amplitudes of `det_ia` and `det_ai` with fermionic sign `sgn`.
    /// # Safety
    /// Both determinants are below the buffer length, and no other thread reads or writes either
    /// slot for the duration of the call.
    unsafe fn mix(&self, sgn: f64, psi: &FockPtrs<'_>, det_ia: usize, det_ai: usize);
}

/// Givens rotation by angle t in the plane of the pair: exp(t (E_ai - E_ia)), where
/// E_ai|ia> = sgn|ai> and E_ia|ai> = sgn|ia>.
#[derive(Clone, Copy, Debug)]
pub struct Unitary {
    ct: f64,
    st: f64,
}

impl Unitary {
    pub fn new(theta: f64) -> Self {
        let (st, ct) = theta.sin_cos();
        Self {ct, st}
    }
}

impl Mixer for Unitary {
    const IN_PLACE: bool = true;

    #[inline(always)]
    unsafe fn mix(&self, sgn: f64, psi: &FockPtrs<'_>, det_ia: usize, det_ai: usize) {
        // The generator vanishes when both strings occupy the same orbitals.
        if det_ia == det_ai {
            return;
        }
        // The sign only enters through E_ai and E_ia, i.e., the off-diagonal terms.
        let ct = self.ct;
        let st = sgn * self.st;
        // Both reads happen before either write, so aliasing src and dst is fine.
        let psi_ia = psi.read(det_ia);
        let psi_ai = psi.read(det_ai);
        psi.write(det_ia, ct * psi_ia - st * psi_ai);
        psi.write(det_ai, st * psi_ia + ct * psi_ai);
    }
}

/// Hermitian coupling h (E_ai + E_ia), accumulated into the destination.
#[derive(Clone, Copy, Debug)]
pub struct Hermitian {
    h: f64,
}

impl Hermitian {
    pub fn new(h: f64) -> Self {
        Self {h}
    }
}

impl Mixer for Hermitian {
    const IN_PLACE: bool = false;

    #[inline(always)]
    unsafe fn mix(&self, sgn: f64, psi: &FockPtrs<'_>, det_ia: usize, det_ai: usize) {
        let sh = sgn * self.h;
        psi.accumulate(det_ia, sh * psi.read(det_ai));
        // Diagonal terms (number operators) would otherwise be counted twice.
        if det_ia != det_ai {
            psi.accumulate(det_ai, sh * psi.read(det_ia));
        }
    }
}
