// parity.rs
use crate::Det;

/// Parity of moving the creation operators `idxs` of `det` to the front of the string, one at a
/// time in the given order. Popping operator p passes every still-occupied orbital above p, and
/// each of those swaps toggles the sign. The popped orbital is then cleared so later pops do not
/// see it. No ordering of `idxs` is assumed.
/// # Arguments:
///     `det`: Det, determinant in which every index of `idxs` is occupied.
///     `idxs`: [usize], operator indices in application order.
#[inline(always)]
pub fn pop_parity(det: Det, idxs: &[usize]) -> u32 {
    let mut work = det;
    let mut bit = 0u32;
    for &p in idxs {
        // Orbitals strictly above p. p + 1 can equal the word width.
        let above = work.checked_shr(p as u32 + 1).unwrap_or(0);
        bit ^= above.count_ones() & 1;
        work &= !(1 << p);
    }
    bit
}

/// Combined fermionic sign of an excitation connecting `det_ia` (where the `iidx` orbitals are
/// occupied) and `det_ai` (where the `aidx` orbitals are occupied): the product of the signs of
/// ...i1'...i0'|0> -> i0'i1'...|0> and ...a1'...a0'|0> -> a0'a1'...|0>.
/// # Arguments:
///     `det_ia`: Det, determinant with the annihilated orbitals occupied.
///     `det_ai`: Det, determinant with the created orbitals occupied.
///     `iidx`: [usize], annihilation (de-excitation creation) indices.
///     `aidx`: [usize], creation (de-excitation annihilation) indices.
#[inline(always)]
pub fn excitation_sign(det_ia: Det, det_ai: Det, iidx: &[usize], aidx: &[usize]) -> f64 {
    let bit = pop_parity(det_ia, iidx) ^ pop_parity(det_ai, aidx);
    1.0 - 2.0 * bit as f64
}
