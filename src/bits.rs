// bits.rs
use crate::Det;
use crate::error::{FsuccError, Result};

/// Whether spin-orbital `k` is occupied in determinant `det`.
#[inline(always)]
pub fn occupied(det: Det, k: usize) -> bool {
    (det >> k) & 1 == 1
}

/// Build the occupation bitmask of a list of spin-orbital indices. Returns `Ok(None)` if an
/// index repeats, since a string of fermionic operators with a repeated index is identically
/// zero (nilpotent escape).
/// # Arguments:
///     `idxs`: [usize], spin-orbital indices.
///     `norb`: usize, number of spin-orbitals, already checked against the bitmask width.
pub fn mask_from_indices(idxs: &[usize], norb: usize) -> Result<Option<Det>> {
    let mut det: Det = 0;
    for &k in idxs {
        if k >= norb {
            return Err(FsuccError::IndexOutOfRange {index: k, norb});
        }
        let bit = 1 << k;
        if det & bit != 0 {return Ok(None);}
        det |= bit;
    }
    Ok(Some(det))
}

/// Open a zero bit at position `p`: bits at and above `p` move one place left, bits below stay.
#[inline(always)]
pub fn insert_zero_bit(det: Det, p: u32) -> Det {
    let low = (1 << p) - 1;
    ((det & !low) << 1) | (det & low)
}

/// Scatter the bits of `packed` into the zero positions of `mask`, lowest first.
/// The active positions are opened in ascending order, so each later position already refers
/// to the full-width determinant.
/// # Arguments:
///     `packed`: Det, reduced (spectator) determinant.
///     `mask`: Det, positions that must stay clear.
#[inline(always)]
pub fn expand_around(packed: Det, mask: Det) -> Det {
    let mut det = packed;
    let mut rest = mask;
    while rest != 0 {
        det = insert_zero_bit(det, rest.trailing_zeros());
        rest &= rest - 1;
    }
    det
}

/// Occupied spin-orbital indices of `det`, ascending.
pub fn occupied_indices(det: Det) -> Vec<usize> {
    let mut out = Vec::with_capacity(det.count_ones() as usize);
    let mut rest = det;
    while rest != 0 {
        out.push(rest.trailing_zeros() as usize);
        rest &= rest - 1;
    }
    out
}

/// Occupation string of `det` over `norb` spin-orbitals, orbital 0 leftmost.
pub fn occupation_string(det: Det, norb: usize) -> String {
    (0..norb).map(|k| if occupied(det, k) {'1'} else {'0'}).collect()
}
