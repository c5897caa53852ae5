// utils.rs
use crate::{Det, Generator};
use crate::bits::occupation_string;

/// Format the amplitudes of a Fock-space vector with magnitude above `threshold`, one row per
/// determinant: index, occupation string and amplitude.
/// # Arguments:
///     `psi`: [f64], wavefunction of length 2^norb.
///     `norb`: usize, number of spin-orbitals.
///     `threshold`: f64, smallest magnitude shown.
pub fn fock_vector_rows(psi: &[f64], norb: usize, threshold: f64) -> Vec<String> {
    psi.iter().enumerate().filter(|(_, c)| c.abs() > threshold)
        .map(|(det, c)| format!("{:>10} {:>width$} {:>14.8}", det, occupation_string(det as Det, norb), c, width = norb.max(4)))
        .collect()
}

/// Print a Fock-space vector as a table of non-negligible amplitudes.
/// # Arguments:
///     `psi`: [f64], wavefunction of length 2^norb.
///     `norb`: usize, number of spin-orbitals.
///     `threshold`: f64, smallest magnitude shown.
pub fn print_fock_vector(psi: &[f64], norb: usize, threshold: f64) {
    println!("{:>10} {:>width$} {:>14}", "det", "occ", "c", width = norb.max(4));
    for row in fock_vector_rows(psi, norb, threshold) {
        println!("{}", row);
    }
}

/// Print a list of generators.
pub fn print_generators(gens: &[Generator]) {
    println!("{:<6} {:>16} {:>16} {:>12}", "gen", "a", "i", "amp");
    for (k, g) in gens.iter().enumerate() {
        println!("{:<6} {:>16} {:>16} {:>12.6}", k, format!("{:?}", g.aidx), format!("{:?}", g.iidx), g.amp);
    }
}
